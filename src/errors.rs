//! Module for errors.
use std::{error::Error, fmt::Display};

/// Error from the archive interface or the import pipeline.
#[derive(Debug)]
pub enum GhcndDataErr {
    // Inherited errors from std
    /// Error forwarded from std
    IO(::std::io::Error),

    // Other forwarded errors
    /// Database error
    Database(::rusqlite::Error),
    /// Error forwarded from the http client.
    Network(::reqwest::Error),

    // My own errors from this crate
    /// The database structure is wrong.
    InvalidSchema,
    /// A configuration value is missing or out of range.
    InvalidConfig(String),
    /// A download returned something other than success.
    HttpStatus {
        /// The requested url.
        url: String,
        /// The status code returned by the server.
        status: u16,
    },
}

impl Display for GhcndDataErr {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        use crate::errors::GhcndDataErr::*;

        match self {
            IO(err) => write!(f, "std lib io error: {}", err),

            Database(err) => write!(f, "database error: {}", err),
            Network(err) => write!(f, "network error: {}", err),

            InvalidSchema => write!(f, "invalid database format"),
            InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            HttpStatus { url, status } => write!(f, "http status {} from {}", status, url),
        }
    }
}

impl Error for GhcndDataErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use crate::errors::GhcndDataErr::*;

        match self {
            IO(err) => Some(err),
            Database(err) => Some(err),
            Network(err) => Some(err),
            _ => None,
        }
    }
}

impl From<::std::io::Error> for GhcndDataErr {
    fn from(err: ::std::io::Error) -> GhcndDataErr {
        GhcndDataErr::IO(err)
    }
}

impl From<::rusqlite::Error> for GhcndDataErr {
    fn from(err: ::rusqlite::Error) -> GhcndDataErr {
        GhcndDataErr::Database(err)
    }
}

impl From<::reqwest::Error> for GhcndDataErr {
    fn from(err: ::reqwest::Error) -> GhcndDataErr {
        GhcndDataErr::Network(err)
    }
}

/*--------------------------------------------------------------------------------------------------
                                          Unit Tests
--------------------------------------------------------------------------------------------------*/
