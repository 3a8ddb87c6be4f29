//! An archive of daily station observations in an sqlite database.

use std::path::PathBuf;

pub use self::query::station_summary::StationSummary;

/// The archive.
#[derive(Debug)]
pub struct Archive {
    path: PathBuf,                 // The database file.
    db_conn: rusqlite::Connection, // An sqlite connection.
}

mod modify;
mod query;
mod root;
