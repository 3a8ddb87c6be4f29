#![deny(missing_docs)]
//! Package to load NOAA GHCN-Daily station observations into an sqlite archive.
//!
//! The `.dly` files in the GHCND archive are decoded into readings, temperatures converted to
//! tenths of a degree Fahrenheit, grouped by day into `DailyObservation`s, and written in batches
//! through an `ObservationSink`. Writes are upserts, so running an import again is safe.

//
// Public API
//
pub use crate::archive::{Archive, StationSummary};
pub use crate::cmd_line::CommonCmdLineArgs;
pub use crate::config::ImportConfig;
pub use crate::coords::Coords;
pub use crate::dly::{decode, Reading};
pub use crate::element::Element;
pub use crate::errors::GhcndDataErr;
pub use crate::fetch::Source;
pub use crate::import::{
    import_observations, import_stations, load_station_files, run_import, ImportSummary,
};
pub use crate::loader::{BatchLoader, LoadSummary, ObservationSink};
pub use crate::observation::DailyObservation;
pub use crate::site::{Station, StationId};

//
// Implementation only
//
mod archive;
mod cmd_line;
mod config;
mod coords;
mod dly;
mod element;
mod errors;
mod fetch;
mod import;
mod loader;
mod observation;
mod site;
