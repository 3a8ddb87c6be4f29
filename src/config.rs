//! Settings that control an import run.

use chrono::{Datelike, Local};

use crate::errors::GhcndDataErr;

/// Options for an import run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportConfig {
    /// Lines in a `.dly` file for years before this one are ignored.
    pub min_year: i32,
    /// Number of observation rows buffered before they are written to the archive.
    pub batch_size: usize,
    /// Station identifiers must start with one of these to be imported. An empty list lets every
    /// station through.
    pub id_prefixes: Vec<String>,
}

impl ImportConfig {
    /// Number of years back from the current year to import by default.
    pub const DEFAULT_YEARS_BACK: i32 = 25;
    /// Default number of rows per batch.
    pub const DEFAULT_BATCH_SIZE: usize = 10_000;
    /// Default station prefix, US stations only.
    pub const DEFAULT_ID_PREFIX: &'static str = "US";

    /// The default cutoff year, `DEFAULT_YEARS_BACK` years before the current year.
    pub fn default_min_year() -> i32 {
        Local::now().year() - Self::DEFAULT_YEARS_BACK
    }

    /// Check the values before any processing starts.
    pub fn validate(&self) -> Result<(), GhcndDataErr> {
        if self.batch_size == 0 {
            return Err(GhcndDataErr::InvalidConfig(
                "batch size must be greater than zero".to_owned(),
            ));
        }

        // chrono can't build dates outside this range anyway.
        if self.min_year < 1 || self.min_year > 9999 {
            return Err(GhcndDataErr::InvalidConfig(format!(
                "minimum year out of range: {}",
                self.min_year
            )));
        }

        if self.id_prefixes.iter().any(|prefix| prefix.is_empty()) {
            return Err(GhcndDataErr::InvalidConfig(
                "empty station id prefix".to_owned(),
            ));
        }

        Ok(())
    }

    /// Does a station with this identifier belong in the import?
    pub fn accepts_station(&self, station_id: &str) -> bool {
        self.id_prefixes.is_empty()
            || self
                .id_prefixes
                .iter()
                .any(|prefix| station_id.starts_with(prefix.as_str()))
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        ImportConfig {
            min_year: Self::default_min_year(),
            batch_size: Self::DEFAULT_BATCH_SIZE,
            id_prefixes: vec![Self::DEFAULT_ID_PREFIX.to_owned()],
        }
    }
}

/*--------------------------------------------------------------------------------------------------
                                          Unit Tests
--------------------------------------------------------------------------------------------------*/
