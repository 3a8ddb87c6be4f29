//! Daily observations, the rows stored in the archive.

use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use crate::{
    config::ImportConfig,
    dly::{self, Reading},
    element::Element,
    site::StationId,
};

/// All the values kept for one station on one day.
///
/// Temperatures are in tenths of a degree Fahrenheit, precipitation and snowfall are in the units
/// of the source archive.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DailyObservation {
    pub station_id: StationId,
    pub date: NaiveDate,
    pub month: u32,
    pub day: u32,
    pub tmax: Option<i32>,
    pub tmin: Option<i32>,
    pub prcp: Option<i32>,
    pub snow: Option<i32>,
}

#[derive(Clone, Copy, Debug, Default)]
struct DayValues {
    tmax: Option<i32>,
    tmin: Option<i32>,
    prcp: Option<i32>,
    snow: Option<i32>,
}

impl DayValues {
    fn set(&mut self, element: Element, value: i32) {
        let slot = match element {
            Element::TMAX => &mut self.tmax,
            Element::TMIN => &mut self.tmin,
            Element::PRCP => &mut self.prcp,
            Element::SNOW => &mut self.snow,
        };

        *slot = Some(value);
    }

    fn has_temperature(&self) -> bool {
        self.tmax.is_some() || self.tmin.is_some()
    }
}

impl DailyObservation {
    /// Group readings by date into observations for one station.
    ///
    /// A later reading for the same date and element replaces an earlier one. Days without a
    /// maximum or minimum temperature are dropped. The result is sorted by date.
    pub fn assemble(
        station_id: &StationId,
        readings: impl IntoIterator<Item = Reading>,
    ) -> Vec<DailyObservation> {
        let mut days: BTreeMap<NaiveDate, DayValues> = BTreeMap::new();

        for Reading {
            date,
            element,
            value,
        } in readings
        {
            days.entry(date).or_default().set(element, value);
        }

        days.into_iter()
            .filter(|(_, values)| values.has_temperature())
            .map(|(date, values)| DailyObservation {
                station_id: station_id.clone(),
                date,
                month: date.month(),
                day: date.day(),
                tmax: values.tmax,
                tmin: values.tmin,
                prcp: values.prcp,
                snow: values.snow,
            })
            .collect()
    }

    /// Decode and assemble the contents of a station's `.dly` file.
    pub fn from_dly(station_id: &StationId, text: &str, config: &ImportConfig) -> Vec<Self> {
        Self::assemble(station_id, dly::decode(text, config.min_year))
    }
}

/*--------------------------------------------------------------------------------------------------
                                          Unit Tests
--------------------------------------------------------------------------------------------------*/
