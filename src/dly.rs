//! Decoder for the fixed width `.dly` files in the GHCND archive.
//!
//! Each line holds one month of one element for one station:
//!
//! ```text
//! ID         1-11   Station identifier
//! YEAR      12-15
//! MONTH     16-17
//! ELEMENT   18-21   TMAX, TMIN, PRCP, SNOW, ...
//! VALUE1    22-26   Day 1, followed by three flag characters
//! ...               31 day slots of 8 characters each
//! ```

use chrono::NaiveDate;
use std::str::FromStr;

use crate::element::Element;

/// A single value for one element on one day, already normalized for storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reading {
    /// The day of the observation.
    pub date: NaiveDate,
    /// What was measured.
    pub element: Element,
    /// The value in archive units.
    pub value: i32,
}

/// Decode the contents of a `.dly` file into readings.
///
/// Lines that are too short, for years before `min_year`, or for elements other than the ones in
/// `Element` produce nothing. So do missing values, values that are not numbers, and day slots
/// past the end of the month. None of these are errors.
pub fn decode<'a>(text: &'a str, min_year: i32) -> impl Iterator<Item = Reading> + 'a {
    text.split('\n')
        .filter_map(move |line| DlyLine::parse(line, min_year))
        .flat_map(DlyLine::readings)
}

#[derive(Clone, Copy, Debug)]
struct DlyLine<'a> {
    year: i32,
    month: u32,
    element: Element,
    line: &'a str,
}

impl<'a> DlyLine<'a> {
    const MIN_LINE_LENGTH: usize = 269;
    const DAYS_IN_LINE: u32 = 31;
    const DAYS_START: usize = 21;
    const SLOT_WIDTH: usize = 8;
    const VALUE_WIDTH: usize = 5;
    const MISSING_VALUE: &'static str = "-9999";

    fn parse(line: &'a str, min_year: i32) -> Option<Self> {
        if line.len() < Self::MIN_LINE_LENGTH {
            return None;
        }

        let year: i32 = line.get(11..15)?.trim().parse().ok()?;
        if year < min_year {
            return None;
        }

        let month: u32 = line.get(15..17)?.trim().parse().ok()?;
        let element = Element::from_str(line.get(17..21)?).ok()?;

        Some(DlyLine {
            year,
            month,
            element,
            line,
        })
    }

    fn readings(self) -> impl Iterator<Item = Reading> + 'a {
        (1..=Self::DAYS_IN_LINE).filter_map(move |day| self.reading(day))
    }

    fn reading(&self, day: u32) -> Option<Reading> {
        let start = Self::DAYS_START + (day as usize - 1) * Self::SLOT_WIDTH;
        let value = self.line.get(start..(start + Self::VALUE_WIDTH))?.trim();

        if value.is_empty() || value == Self::MISSING_VALUE {
            return None;
        }

        let raw: i32 = value.parse().ok()?;
        let date = NaiveDate::from_ymd_opt(self.year, self.month, day)?;

        Some(Reading {
            date,
            element: self.element,
            value: self.element.normalize(raw),
        })
    }
}

/*--------------------------------------------------------------------------------------------------
                                          Unit Tests
--------------------------------------------------------------------------------------------------*/
#[cfg(test)]
pub(crate) mod unit {
    use super::*;

    use strum::IntoEnumIterator;

    /// Build a well formed `.dly` line. Day slots not listed in `values` are `-9999`.
    pub(crate) fn make_line(
        station: &str,
        year: i32,
        month: u32,
        element: &str,
        values: &[(u32, &str)],
    ) -> String {
        let mut line = format!("{:<11}{:04}{:02}{:<4}", station, year, month, element);

        for day in 1..=31 {
            let value = values
                .iter()
                .find(|(d, _)| *d == day)
                .map(|(_, v)| *v)
                .unwrap_or("-9999");
            line.push_str(&format!("{:>5}   ", value));
        }

        assert_eq!(line.len(), 269);
        line
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd(y, m, d)
    }

    #[test]
    fn test_decode_single_line() {
        let line = make_line("USC00244558", 2020, 3, "TMAX", &[(1, "150"), (15, "-37")]);
        let readings: Vec<Reading> = decode(&line, 2000).collect();

        assert_eq!(
            readings,
            vec![
                Reading {
                    date: date(2020, 3, 1),
                    element: Element::TMAX,
                    value: 590
                },
                Reading {
                    date: date(2020, 3, 15),
                    element: Element::TMAX,
                    value: 253
                },
            ]
        );
    }

    #[test]
    fn test_precipitation_is_not_converted() {
        let line = make_line("USC00244558", 2020, 3, "PRCP", &[(1, "00010")]);
        let readings: Vec<Reading> = decode(&line, 2000).collect();

        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].element, Element::PRCP);
        assert_eq!(readings[0].value, 10);
    }

    #[test]
    fn test_plus_sign_is_accepted() {
        let line = make_line("USC00244558", 2020, 3, "TMIN", &[(2, "+0150")]);
        let readings: Vec<Reading> = decode(&line, 2000).collect();

        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].date, date(2020, 3, 2));
        assert_eq!(readings[0].value, 590);
    }

    #[test]
    fn test_short_lines_are_skipped() {
        let line = make_line("USC00244558", 2020, 3, "TMAX", &[(1, "150")]);
        let short = &line[..268];

        assert_eq!(decode(short, 2000).count(), 0);
        assert_eq!(decode("", 2000).count(), 0);
        assert_eq!(decode("USC00244558202003TMAX", 2000).count(), 0);
    }

    #[test]
    fn test_old_years_are_skipped() {
        let old = make_line("USC00244558", 1999, 3, "TMAX", &[(1, "150")]);
        let new = make_line("USC00244558", 2000, 3, "TMAX", &[(1, "150")]);

        assert_eq!(decode(&old, 2000).count(), 0);
        assert_eq!(decode(&new, 2000).count(), 1);
    }

    #[test]
    fn test_unknown_elements_are_skipped() {
        for element in &["TAVG", "WESD", "SNWD", "tmax", "PGTM"] {
            let line = make_line("USC00244558", 2020, 3, element, &[(1, "150")]);
            assert_eq!(decode(&line, 2000).count(), 0, "{}", element);
        }
    }

    #[test]
    fn test_missing_values_never_produce_readings() {
        for element in Element::iter() {
            let all_missing = make_line("USC00244558", 2020, 1, element.as_static_str(), &[]);
            assert_eq!(decode(&all_missing, 2000).count(), 0);

            let blanks: Vec<(u32, &str)> = (1..=31).map(|day| (day, "")).collect();
            let all_blank = make_line("USC00244558", 2020, 1, element.as_static_str(), &blanks);
            assert_eq!(decode(&all_blank, 2000).count(), 0);
        }
    }

    #[test]
    fn test_invalid_dates_never_produce_readings() {
        let every_day: Vec<(u32, &str)> = (1..=31).map(|day| (day, "10")).collect();

        let expected_days = [
            (2019, 2, 28),
            (2020, 2, 29),
            (2020, 4, 30),
            (2020, 6, 30),
            (2020, 7, 31),
            (2020, 12, 31),
        ];

        for &(year, month, days) in &expected_days {
            let line = make_line("USC00244558", year, month, "PRCP", &every_day);
            let readings: Vec<Reading> = decode(&line, 2000).collect();

            assert_eq!(readings.len(), days as usize);
            assert_eq!(readings.last().map(|r| r.date), Some(date(year, month, days)));
        }

        // Month 13 doesn't exist.
        let line = make_line("USC00244558", 2020, 13, "PRCP", &every_day);
        assert_eq!(decode(&line, 2000).count(), 0);
    }

    #[test]
    fn test_non_numeric_values_are_skipped() {
        let line = make_line(
            "USC00244558",
            2020,
            3,
            "TMAX",
            &[(1, "abc"), (2, "1 2"), (3, "100")],
        );
        let readings: Vec<Reading> = decode(&line, 2000).collect();

        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].date, date(2020, 3, 3));
        assert_eq!(readings[0].value, 500);
    }

    #[test]
    fn test_malformed_header_fields_are_skipped() {
        let line = make_line("USC00244558", 2020, 3, "TMAX", &[(1, "100")]);

        let mut bad_year = line.clone();
        bad_year.replace_range(11..15, "20X0");
        assert_eq!(decode(&bad_year, 2000).count(), 0);

        let mut bad_month = line;
        bad_month.replace_range(15..17, "M3");
        assert_eq!(decode(&bad_month, 2000).count(), 0);
    }

    #[test]
    fn test_multiple_lines_and_crlf() {
        let text = format!(
            "{}\r\n{}\r\n",
            make_line("USC00244558", 2020, 3, "TMAX", &[(1, "100")]),
            make_line("USC00244558", 2020, 3, "TMIN", &[(1, "-50")])
        );
        let readings: Vec<Reading> = decode(&text, 2000).collect();

        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].element, Element::TMAX);
        assert_eq!(readings[0].value, 500);
        assert_eq!(readings[1].element, Element::TMIN);
        assert_eq!(readings[1].value, 230);
    }
}
