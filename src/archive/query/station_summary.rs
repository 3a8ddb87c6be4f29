use super::Archive;
use crate::{errors::GhcndDataErr, site::Station};

/// A summary of the information about a station.
#[derive(Debug)]
pub struct StationSummary {
    /// The station as stored, including the observed date range.
    pub station: Station,
    /// The number of daily observations in the archive for this station.
    pub number_of_observations: u32,
}

impl StationSummary {
    /// Format the observed date range, or a dash if the station has no observations.
    pub fn date_range_as_string(&self) -> String {
        match (self.station.min_date, self.station.max_date) {
            (Some(start), Some(end)) => format!("{} -> {}", start, end),
            _ => "-".to_owned(),
        }
    }
}

impl Archive {
    /// Get a summary of all the stations in the archive.
    pub fn station_summaries(&self) -> Result<Vec<StationSummary>, GhcndDataErr> {
        let mut stmt = self.db_conn.prepare(include_str!("station_summary.sql"))?;

        let vals: Result<Vec<StationSummary>, GhcndDataErr> = stmt
            .query_and_then(rusqlite::NO_PARAMS, Self::parse_row_to_summary)?
            .map(|res| res.map_err(GhcndDataErr::Database))
            .collect();

        vals
    }

    fn parse_row_to_summary(row: &rusqlite::Row) -> Result<StationSummary, rusqlite::Error> {
        let station = Self::parse_row_to_station(row)?;
        let number_of_observations: u32 = row.get(7)?;

        Ok(StationSummary {
            station,
            number_of_observations,
        })
    }
}
