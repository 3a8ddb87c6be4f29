use chrono::NaiveDate;
use metfor::Meters;

use crate::coords::Coords;

pub use self::station_id::StationId;

mod station_id;

/// Description of a station that reports daily observations.
#[derive(Clone, Debug, PartialEq)]
pub struct Station {
    /// The GHCND identifier.
    pub id: StationId,
    /// Station name.
    pub name: String,
    /// Location in decimal degrees.
    pub coords: Coords,
    /// Elevation above sea level, if it was listed.
    pub elevation: Option<Meters>,
    /// The first date with an observation in the archive. This is only filled in when reading the
    /// station back out of the archive after the date ranges were recomputed.
    pub min_date: Option<NaiveDate>,
    /// The last date with an observation in the archive.
    pub max_date: Option<NaiveDate>,
}

impl Station {
    /// Parse a line from the `ghcnd-stations.txt` metadata file.
    ///
    /// Returns `None` if the line is malformed. Columns are 1 based and inclusive:
    ///
    /// ```text
    /// ID            1-11
    /// LATITUDE     13-20
    /// LONGITUDE    22-30
    /// ELEVATION    32-37
    /// NAME         42-71
    /// ```
    pub fn parse_metadata_line(line: &str) -> Option<Station> {
        let id = StationId::from(column(line, 0, 11));
        if !id.is_valid() {
            return None;
        }

        let parse_f64 = |start: usize, end: usize| -> Option<Option<f64>> {
            let field = column(line, start, end);
            if field.is_empty() {
                Some(None)
            } else {
                field.parse::<f64>().ok().map(Some)
            }
        };

        let lat = parse_f64(12, 20)??;
        let lon = parse_f64(21, 30)??;
        let elevation = parse_f64(31, 37)?.map(Meters);
        let name = column(line, 41, 71).to_owned();

        let coords = Coords::from((lat, lon));
        if !coords.is_valid() {
            return None;
        }

        Some(Station {
            id,
            name,
            coords,
            elevation,
            min_date: None,
            max_date: None,
        })
    }
}

/// Get a trimmed fixed width column out of a line, treating anything past the end of the line as
/// blank.
pub(crate) fn column(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    if start >= end {
        return "";
    }

    line.get(start..end).map(str::trim).unwrap_or("")
}

/*--------------------------------------------------------------------------------------------------
                                          Unit Tests
--------------------------------------------------------------------------------------------------*/
#[cfg(test)]
mod unit {
    use super::*;
    use metfor::Quantity;

    const MISSOULA: &str =
        "USW00024153  46.9208 -114.0925  972.3 MT MISSOULA INTL AP                  24153";
    const NO_ELEVATION: &str = "US1MTMS0001  46.8700 -113.9950        MT MISSOULA 1.2 NE";
    const CANADA: &str =
        "CA001012010  48.4667 -123.4167   74.0 BC VICTORIA                                 71799";

    #[test]
    fn test_column() {
        assert_eq!(column("abc  def", 0, 3), "abc");
        assert_eq!(column("abc  def", 3, 8), "def");
        assert_eq!(column("abc", 2, 10), "c");
        assert_eq!(column("abc", 5, 10), "");
    }

    #[test]
    fn test_parse_metadata_line() {
        let station = Station::parse_metadata_line(MISSOULA).expect("parse failed");

        assert_eq!(station.id, StationId::from("USW00024153"));
        assert_eq!(station.name, "MISSOULA INTL AP");
        assert_eq!(station.coords, Coords::from((46.9208, -114.0925)));
        assert_eq!(station.elevation.map(|e| e.unpack()), Some(972.3));
        assert_eq!(station.min_date, None);
        assert_eq!(station.max_date, None);
    }

    #[test]
    fn test_parse_is_repeatable() {
        for line in &[MISSOULA, NO_ELEVATION] {
            assert_eq!(
                Station::parse_metadata_line(line),
                Station::parse_metadata_line(line)
            );
        }
    }

    #[test]
    fn test_blank_elevation_and_short_line() {
        let station = Station::parse_metadata_line(NO_ELEVATION).expect("parse failed");

        assert_eq!(station.elevation, None);
        assert_eq!(station.name, "MISSOULA 1.2 NE");
    }

    #[test]
    fn test_malformed_lines() {
        assert!(Station::parse_metadata_line("").is_none());
        assert!(Station::parse_metadata_line(
            "USW00024153  north   -114.0925  972.3 MT MISSOULA INTL AP",
        )
        .is_none());
        assert!(Station::parse_metadata_line(
            "USW00024153  96.9208 -114.0925  972.3 MT MISSOULA INTL AP",
        )
        .is_none());

        let station = Station::parse_metadata_line(CANADA).expect("parse failed");
        assert_eq!(station.id, StationId::from("CA001012010"));
        assert_eq!(station.name, "VICTORIA");
    }
}
