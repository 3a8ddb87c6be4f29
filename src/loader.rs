//! Batching rows into a storage sink.

use log::debug;

use crate::{errors::GhcndDataErr, observation::DailyObservation, site::Station};

/// Somewhere to put stations and observations.
///
/// Each call must be atomic: either the whole slice is applied, or none of it. Rows that match
/// an existing key replace the values stored for it, so loading the same rows twice leaves the
/// store as it was after the first time.
pub trait ObservationSink {
    /// Insert stations, or update the name, location and elevation of ones keyed by the same
    /// identifier.
    fn upsert_stations(&mut self, stations: &[Station]) -> Result<(), GhcndDataErr>;

    /// Insert observations, or replace the values of ones keyed by the same station and date.
    fn upsert_observations(&mut self, rows: &[DailyObservation]) -> Result<(), GhcndDataErr>;

    /// Set the first and last observation dates of every station from the stored observations.
    fn recompute_station_date_ranges(&mut self) -> Result<(), GhcndDataErr>;
}

impl<S: ObservationSink + ?Sized> ObservationSink for &mut S {
    fn upsert_stations(&mut self, stations: &[Station]) -> Result<(), GhcndDataErr> {
        (**self).upsert_stations(stations)
    }

    fn upsert_observations(&mut self, rows: &[DailyObservation]) -> Result<(), GhcndDataErr> {
        (**self).upsert_observations(rows)
    }

    fn recompute_station_date_ranges(&mut self) -> Result<(), GhcndDataErr> {
        (**self).recompute_station_date_ranges()
    }
}

/// Buffers observations and writes them to a sink in batches.
///
/// A batch is written as soon as the buffer holds `batch_size` rows. Call `finish` after the last
/// row to write whatever is left.
#[derive(Debug)]
pub struct BatchLoader<S: ObservationSink> {
    sink: S,
    batch_size: usize,
    buffer: Vec<DailyObservation>,
    rows_loaded: usize,
    batches: usize,
}

/// Counts of what a `BatchLoader` wrote.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Number of rows written to the sink.
    pub rows: usize,
    /// Number of upserts sent to the sink.
    pub batches: usize,
}

impl<S: ObservationSink> BatchLoader<S> {
    /// Create a new loader. A `batch_size` of zero is treated as one.
    pub fn new(sink: S, batch_size: usize) -> Self {
        let batch_size = batch_size.max(1);

        BatchLoader {
            sink,
            batch_size,
            buffer: Vec::with_capacity(batch_size),
            rows_loaded: 0,
            batches: 0,
        }
    }

    /// Add a row, writing a batch if the buffer is full.
    ///
    /// Returns `true` if a batch was written.
    pub fn push(&mut self, row: DailyObservation) -> Result<bool, GhcndDataErr> {
        self.buffer.push(row);

        if self.buffer.len() >= self.batch_size {
            self.flush()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Add many rows. Returns the number of batches written along the way.
    pub fn extend(
        &mut self,
        rows: impl IntoIterator<Item = DailyObservation>,
    ) -> Result<usize, GhcndDataErr> {
        let mut flushes = 0;
        for row in rows {
            if self.push(row)? {
                flushes += 1;
            }
        }

        Ok(flushes)
    }

    /// Rows written so far and batches used to write them.
    pub fn summary(&self) -> LoadSummary {
        LoadSummary {
            rows: self.rows_loaded,
            batches: self.batches,
        }
    }

    /// Number of rows waiting for the next batch.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Write any remaining rows and hand back the sink.
    pub fn finish(mut self) -> Result<(S, LoadSummary), GhcndDataErr> {
        if !self.buffer.is_empty() {
            self.flush()?;
        }

        let summary = self.summary();
        Ok((self.sink, summary))
    }

    fn flush(&mut self) -> Result<(), GhcndDataErr> {
        self.sink.upsert_observations(&self.buffer)?;

        self.rows_loaded += self.buffer.len();
        self.batches += 1;
        debug!(
            "wrote batch {} with {} rows",
            self.batches,
            self.buffer.len()
        );

        self.buffer.clear();
        Ok(())
    }
}

/*--------------------------------------------------------------------------------------------------
                                          Unit Tests
--------------------------------------------------------------------------------------------------*/
#[cfg(test)]
pub(crate) mod unit {
    use super::*;
    use crate::site::StationId;
    use chrono::{Datelike, Duration, NaiveDate};

    /// A sink that remembers every call made on it.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSink {
        pub stations: Vec<Station>,
        pub batches: Vec<Vec<DailyObservation>>,
        pub recomputes: usize,
        pub fail_on_batch: Option<usize>,
    }

    impl ObservationSink for RecordingSink {
        fn upsert_stations(&mut self, stations: &[Station]) -> Result<(), GhcndDataErr> {
            self.stations.extend_from_slice(stations);
            Ok(())
        }

        fn upsert_observations(&mut self, rows: &[DailyObservation]) -> Result<(), GhcndDataErr> {
            if self.fail_on_batch == Some(self.batches.len()) {
                return Err(GhcndDataErr::IO(std::io::Error::new(
                    std::io::ErrorKind::ConnectionAborted,
                    "connection lost",
                )));
            }

            self.batches.push(rows.to_vec());
            Ok(())
        }

        fn recompute_station_date_ranges(&mut self) -> Result<(), GhcndDataErr> {
            self.recomputes += 1;
            Ok(())
        }
    }

    pub(crate) fn make_rows(n: usize) -> Vec<DailyObservation> {
        let start = NaiveDate::from_ymd(2000, 1, 1);
        (0..n)
            .map(|i| {
                let date = start + Duration::days(i as i64);
                DailyObservation {
                    station_id: StationId::from("USC00244558"),
                    date,
                    month: date.month(),
                    day: date.day(),
                    tmax: Some(i as i32),
                    tmin: None,
                    prcp: None,
                    snow: None,
                }
            })
            .collect()
    }

    fn load(n: usize, batch_size: usize) -> (RecordingSink, LoadSummary) {
        let mut loader = BatchLoader::new(RecordingSink::default(), batch_size);
        loader.extend(make_rows(n)).expect("loading failed");
        loader.finish().expect("finish failed")
    }

    #[test]
    fn test_flush_counts_around_threshold() {
        let threshold = 10;

        let (sink, summary) = load(threshold - 1, threshold);
        assert_eq!(sink.batches.len(), 1);
        assert_eq!(sink.batches[0].len(), threshold - 1);
        assert_eq!(summary, LoadSummary { rows: 9, batches: 1 });

        let (sink, summary) = load(threshold, threshold);
        assert_eq!(sink.batches.len(), 1);
        assert_eq!(sink.batches[0].len(), threshold);
        assert_eq!(summary, LoadSummary { rows: 10, batches: 1 });

        let (sink, summary) = load(threshold + 1, threshold);
        assert_eq!(sink.batches.len(), 2);
        assert_eq!(sink.batches[0].len(), threshold);
        assert_eq!(sink.batches[1].len(), 1);
        assert_eq!(summary, LoadSummary { rows: 11, batches: 2 });
    }

    #[test]
    fn test_nothing_to_flush() {
        let (sink, summary) = load(0, 10);
        assert!(sink.batches.is_empty());
        assert_eq!(summary, LoadSummary::default());
    }

    #[test]
    fn test_push_reports_flush() {
        let mut loader = BatchLoader::new(RecordingSink::default(), 2);
        let mut rows = make_rows(3).into_iter();

        assert!(!loader.push(rows.next().unwrap()).unwrap());
        assert_eq!(loader.pending(), 1);
        assert!(loader.push(rows.next().unwrap()).unwrap());
        assert_eq!(loader.pending(), 0);
        assert!(!loader.push(rows.next().unwrap()).unwrap());
        assert_eq!(loader.summary(), LoadSummary { rows: 2, batches: 1 });
    }

    #[test]
    fn test_rows_arrive_in_order() {
        let rows = make_rows(25);
        let (sink, _) = load(25, 7);

        let flushed: Vec<DailyObservation> = sink.batches.into_iter().flatten().collect();
        assert_eq!(flushed, rows);
    }

    #[test]
    fn test_flush_failure_stops_loading() {
        let sink = RecordingSink {
            fail_on_batch: Some(1),
            ..RecordingSink::default()
        };
        let mut loader = BatchLoader::new(sink, 5);

        let result = loader.extend(make_rows(20));
        assert!(result.is_err());
        assert_eq!(loader.summary(), LoadSummary { rows: 5, batches: 1 });
    }

    #[test]
    fn test_zero_batch_size_flushes_every_row() {
        let (sink, summary) = load(3, 0);
        assert_eq!(sink.batches.len(), 3);
        assert_eq!(summary.rows, 3);
    }
}
