//! Run an import: stations, then observations, then the station date ranges.

use flate2::read::GzDecoder;
use log::{info, warn};
use std::io::{BufRead, Read};

use crate::{
    config::ImportConfig,
    errors::GhcndDataErr,
    fetch::Source,
    loader::{BatchLoader, ObservationSink},
    observation::DailyObservation,
    site::{self, Station, StationId},
};

/// Counts from an import run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Stations loaded from the metadata file.
    pub stations: usize,
    /// Station files that had at least one observation to load.
    pub stations_processed: usize,
    /// Observation rows written.
    pub records: usize,
    /// Number of batches used to write them.
    pub batches: usize,
}

/// Load the station metadata file into the sink. Returns the number of stations loaded.
pub fn import_stations<R, S>(
    reader: R,
    config: &ImportConfig,
    sink: &mut S,
) -> Result<usize, GhcndDataErr>
where
    R: BufRead,
    S: ObservationSink + ?Sized,
{
    let mut stations = vec![];

    for line in reader.split(b'\n') {
        let line = line?;
        let text = utf8_dropping_invalid(&line);
        let line = text.trim_end_matches('\r');

        if !config.accepts_station(site::column(line, 0, 11)) {
            continue;
        }

        match Station::parse_metadata_line(line) {
            Some(station) => stations.push(station),
            None => warn!("Skipping malformed station line: {}", line),
        }
    }

    info!("Found {} stations", stations.len());
    sink.upsert_stations(&stations)?;
    info!("Imported {} stations", stations.len());

    Ok(stations.len())
}

/// Load the contents of station files through a batch loader.
///
/// `files` yields the station identifier and the text of its `.dly` file. Returns the number of
/// stations that had any rows to load.
pub fn load_station_files<I, S>(
    files: I,
    config: &ImportConfig,
    loader: &mut BatchLoader<S>,
) -> Result<usize, GhcndDataErr>
where
    I: IntoIterator<Item = Result<(StationId, String), GhcndDataErr>>,
    S: ObservationSink,
{
    let mut stations_processed = 0;

    for file in files {
        let (station_id, text) = file?;
        if !config.accepts_station(station_id.as_str()) {
            continue;
        }

        let rows = DailyObservation::from_dly(&station_id, &text, config);
        if rows.is_empty() {
            continue;
        }

        stations_processed += 1;
        if loader.extend(rows)? > 0 {
            info!(
                "  Processed {} stations, {} records...",
                stations_processed,
                loader.summary().rows
            );
        }
    }

    Ok(stations_processed)
}

/// Load every accepted `.dly` file in a gzipped tar archive into the sink.
///
/// The station identifier is the file stem of each member.
pub fn import_observations<R, S>(
    reader: R,
    config: &ImportConfig,
    sink: &mut S,
) -> Result<ImportSummary, GhcndDataErr>
where
    R: Read,
    S: ObservationSink + ?Sized,
{
    let mut tarball = tar::Archive::new(GzDecoder::new(reader));
    let mut loader = BatchLoader::new(sink, config.batch_size);

    let files = tarball.entries()?.filter_map(|entry| {
        let mut entry = match entry {
            Ok(entry) => entry,
            Err(err) => return Some(Err(GhcndDataErr::from(err))),
        };

        if !entry.header().entry_type().is_file() {
            return None;
        }

        let path = match entry.path() {
            Ok(path) => path.into_owned(),
            Err(err) => return Some(Err(GhcndDataErr::from(err))),
        };

        if !path.to_string_lossy().ends_with(".dly") {
            return None;
        }

        let station_id = StationId::from_file_name(&path)?;
        if !config.accepts_station(station_id.as_str()) {
            return None;
        }

        let mut bytes = vec![];
        if let Err(err) = entry.read_to_end(&mut bytes) {
            return Some(Err(GhcndDataErr::from(err)));
        }

        Some(Ok((station_id, utf8_dropping_invalid(&bytes))))
    });

    let stations_processed = load_station_files(files, config, &mut loader)?;
    let (_, load_summary) = loader.finish()?;

    info!(
        "Import complete: {} stations, {} records",
        stations_processed, load_summary.rows
    );

    Ok(ImportSummary {
        stations: 0,
        stations_processed,
        records: load_summary.rows,
        batches: load_summary.batches,
    })
}

/// Decode text, leaving out any bytes that are not valid UTF-8 so the fixed width columns after
/// them only shift left, never right.
fn utf8_dropping_invalid(mut bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());

    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                text.push_str(valid);
                return text;
            }
            Err(err) => {
                let (valid, rest) = bytes.split_at(err.valid_up_to());
                text.push_str(std::str::from_utf8(valid).unwrap_or_default());

                // None means a truncated sequence at the very end.
                let skip = err.error_len().unwrap_or_else(|| rest.len());
                bytes = &rest[skip..];
            }
        }
    }
}

/// Run a complete import from the given sources into the sink.
pub fn run_import<S>(
    config: &ImportConfig,
    stations: &Source,
    data: &Source,
    sink: &mut S,
) -> Result<ImportSummary, GhcndDataErr>
where
    S: ObservationSink + ?Sized,
{
    config.validate()?;
    info!("Importing data from {} to present", config.min_year);

    let num_stations = import_stations(stations.open_lines()?, config, sink)?;

    info!("Processing files from {}", data);
    let summary = import_observations(data.open_archive()?, config, sink)?;

    info!("Updating station date ranges...");
    sink.recompute_station_date_ranges()?;
    info!("Date ranges updated");

    Ok(ImportSummary {
        stations: num_stations,
        ..summary
    })
}

/*--------------------------------------------------------------------------------------------------
                                          Unit Tests
--------------------------------------------------------------------------------------------------*/
