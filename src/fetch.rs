//! Where the station list and the observation archive come from.

use log::info;
use std::{
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader, Read, Seek, SeekFrom},
    path::PathBuf,
    str::FromStr,
};

use crate::errors::GhcndDataErr;

/// Station metadata on the NCEI server.
pub const STATIONS_URL: &str = "https://www.ncei.noaa.gov/pub/data/ghcn/daily/ghcnd-stations.txt";
/// All the `.dly` files on the NCEI server, as a gzipped tarball.
pub const DATA_URL: &str = "https://www.ncei.noaa.gov/pub/data/ghcn/daily/ghcnd_all.tar.gz";

/// A file to read, either on a web server or on the local disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /// Download it.
    Url(String),
    /// Read it from disk.
    Path(PathBuf),
}

impl FromStr for Source {
    type Err = GhcndDataErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.is_empty() {
            Err(GhcndDataErr::InvalidConfig("empty source".to_owned()))
        } else if s.starts_with("http://") || s.starts_with("https://") {
            Ok(Source::Url(s.to_owned()))
        } else {
            Ok(Source::Path(PathBuf::from(s)))
        }
    }
}

impl Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        match self {
            Source::Url(url) => write!(f, "{}", url),
            Source::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Source {
    /// The default place to get station metadata.
    pub fn default_stations() -> Self {
        Source::Url(STATIONS_URL.to_owned())
    }

    /// The default place to get the observation archive.
    pub fn default_data() -> Self {
        Source::Url(DATA_URL.to_owned())
    }

    /// Open a text source for reading line by line. Downloads are streamed.
    pub fn open_lines(&self) -> Result<Box<dyn BufRead>, GhcndDataErr> {
        match self {
            Source::Url(url) => {
                info!("Downloading {}", url);
                let response = Self::get(url)?;
                Ok(Box::new(BufReader::new(response)))
            }
            Source::Path(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
        }
    }

    /// Open a large binary source.
    ///
    /// Downloads go to a temporary file first, which is deleted when the returned reader is
    /// dropped.
    pub fn open_archive(&self) -> Result<Box<dyn Read>, GhcndDataErr> {
        match self {
            Source::Url(url) => {
                let mut tmp = tempfile::Builder::new()
                    .prefix("ghcnd")
                    .suffix(".tar.gz")
                    .tempfile()?;
                info!("Downloading {} to {}", url, tmp.path().display());

                let mut response = Self::get(url)?;
                let num_bytes = response.copy_to(&mut tmp)?;
                tmp.seek(SeekFrom::Start(0))?;

                info!("Download complete, {} bytes", num_bytes);
                Ok(Box::new(tmp))
            }
            Source::Path(path) => Ok(Box::new(File::open(path)?)),
        }
    }

    fn get(url: &str) -> Result<reqwest::blocking::Response, GhcndDataErr> {
        // The archive is several gigabytes, no overall timeout.
        let client = reqwest::blocking::Client::builder().timeout(None).build()?;
        let response = client.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(GhcndDataErr::HttpStatus {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }
}

/*--------------------------------------------------------------------------------------------------
                                          Unit Tests
--------------------------------------------------------------------------------------------------*/
