//! Elements (measured quantities) loaded from the archive.

use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// The GHCND element codes kept by the import. Every other code in a `.dly` file is skipped.
#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq, EnumString, IntoStaticStr, EnumIter)]
pub enum Element {
    /// Maximum temperature, tenths of degrees C in the source.
    TMAX,
    /// Minimum temperature, tenths of degrees C in the source.
    TMIN,
    /// Precipitation, tenths of mm.
    PRCP,
    /// Snowfall, mm.
    SNOW,
}

impl Element {
    /// Get a static string representation.
    pub fn as_static_str(self) -> &'static str {
        self.into()
    }

    /// Is this one of the temperature elements?
    pub fn is_temperature(self) -> bool {
        match self {
            Element::TMAX | Element::TMIN => true,
            Element::PRCP | Element::SNOW => false,
        }
    }

    /// Convert a raw value from the `.dly` file into the value stored in the archive.
    ///
    /// Temperatures go from tenths of a degree Celsius to tenths of a degree Fahrenheit,
    /// truncating toward zero. Precipitation and snowfall keep the units of the source.
    pub fn normalize(self, raw: i32) -> i32 {
        if self.is_temperature() {
            tenths_celsius_to_tenths_fahrenheit(raw)
        } else {
            raw
        }
    }
}

/// Equivalent to truncating `v * 9 / 5 + 320` toward zero, kept in integer arithmetic so it
/// never picks up floating point error.
#[inline]
pub fn tenths_celsius_to_tenths_fahrenheit(v: i32) -> i32 {
    (v * 9 + 1600) / 5
}

/*--------------------------------------------------------------------------------------------------
                                          Unit Tests
--------------------------------------------------------------------------------------------------*/
