use std::fmt::Display;

/// New type wrapper for a GHCND station identifier, e.g. `USC00244558`.
///
/// The first two characters are the FIPS country code, so a prefix test doubles as a country
/// filter.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationId {
    id: String,
}

impl From<&str> for StationId {
    fn from(val: &str) -> Self {
        StationId {
            id: val.to_owned(),
        }
    }
}

impl From<String> for StationId {
    fn from(val: String) -> Self {
        StationId { id: val }
    }
}

impl Into<String> for StationId {
    fn into(self) -> String {
        self.id
    }
}

impl AsRef<str> for StationId {
    fn as_ref(&self) -> &str {
        &self.id
    }
}

impl Display for StationId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        formatter.pad(&self.id)
    }
}

impl StationId {
    /// Test to see if this is a usable identifier.
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty() && !self.id.contains(char::is_whitespace)
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.id
    }

    /// Derive the station identifier from the name of a file in the archive, the file stem of
    /// something like `ghcnd_all/USC00244558.dly`. Case is preserved.
    pub fn from_file_name(name: &std::path::Path) -> Option<Self> {
        name.file_stem()
            .and_then(|stem| stem.to_str())
            .map(StationId::from)
            .filter(StationId::is_valid)
    }
}

/*--------------------------------------------------------------------------------------------------
                                          Unit Tests
--------------------------------------------------------------------------------------------------*/
