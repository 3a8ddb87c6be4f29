//! Latitude and longitude coordinates of a station.

/// The latitude and longitude in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coords {
    /// Degrees north of the equator.
    pub lat: f64,
    /// Degrees east of the prime meridian.
    pub lon: f64,
}

impl From<(f64, f64)> for Coords {
    fn from(pair: (f64, f64)) -> Self {
        Self {
            lat: pair.0,
            lon: pair.1,
        }
    }
}

impl Coords {
    /// Are both values on the globe?
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lon >= -180.0 && self.lon <= 180.0
    }
}
