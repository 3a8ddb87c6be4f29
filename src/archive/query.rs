use chrono::NaiveDate;
use metfor::Meters;

use super::Archive;

use crate::{
    coords::Coords,
    errors::GhcndDataErr,
    observation::DailyObservation,
    site::{Station, StationId},
};

pub mod station_summary;

impl Archive {
    /// Retrieve a list of stations in the archive, sorted by identifier.
    pub fn stations(&self) -> Result<Vec<Station>, GhcndDataErr> {
        let mut stmt = self
            .db_conn
            .prepare(include_str!("query/retrieve_stations.sql"))?;

        let vals: Result<Vec<Station>, GhcndDataErr> = stmt
            .query_and_then(rusqlite::NO_PARAMS, Self::parse_row_to_station)?
            .map(|res| res.map_err(GhcndDataErr::Database))
            .collect();

        vals
    }

    /// Retrieve the information about a single station.
    pub fn station(&self, id: &StationId) -> Option<Station> {
        self.db_conn
            .query_row_and_then(
                "
                    SELECT
                         id,
                         name,
                         latitude,
                         longitude,
                         elevation,
                         min_date,
                         max_date
                    FROM stations
                    WHERE id = ?1
                ",
                &[id.as_str()],
                Self::parse_row_to_station,
            )
            .ok()
    }

    /// Retrieve all the observations for a station, sorted by date.
    pub fn observations(&self, id: &StationId) -> Result<Vec<DailyObservation>, GhcndDataErr> {
        let mut stmt = self
            .db_conn
            .prepare(include_str!("query/retrieve_observations.sql"))?;

        let vals: Result<Vec<DailyObservation>, GhcndDataErr> = stmt
            .query_and_then(&[id.as_str()], Self::parse_row_to_observation)?
            .map(|res| res.map_err(GhcndDataErr::Database))
            .collect();

        vals
    }

    /// Retrieve a single observation.
    pub fn observation(&self, id: &StationId, date: NaiveDate) -> Option<DailyObservation> {
        self.db_conn
            .query_row_and_then(
                "
                    SELECT station_id, date, month, day, tmax, tmin, prcp, snow
                    FROM weather_daily
                    WHERE station_id = ?1 AND date = ?2
                ",
                &[&id.as_str() as &dyn rusqlite::types::ToSql, &date],
                Self::parse_row_to_observation,
            )
            .ok()
    }

    /// Count the observations in the archive.
    pub fn count_observations(&self) -> Result<i64, GhcndDataErr> {
        let num_records: i64 = self.db_conn.query_row(
            "SELECT COUNT(*) FROM weather_daily",
            rusqlite::NO_PARAMS,
            |row| row.get(0),
        )?;

        Ok(num_records)
    }

    pub(crate) fn parse_row_to_station(row: &rusqlite::Row) -> Result<Station, rusqlite::Error> {
        let id: String = row.get(0)?;
        let name: String = row.get(1)?;
        let lat: f64 = row.get(2)?;
        let lon: f64 = row.get(3)?;
        let elevation: Option<Meters> = row.get::<_, Option<f64>>(4)?.map(Meters);
        let min_date: Option<NaiveDate> = row.get(5)?;
        let max_date: Option<NaiveDate> = row.get(6)?;

        Ok(Station {
            id: StationId::from(id),
            name,
            coords: Coords::from((lat, lon)),
            elevation,
            min_date,
            max_date,
        })
    }

    fn parse_row_to_observation(row: &rusqlite::Row) -> Result<DailyObservation, rusqlite::Error> {
        let station_id: String = row.get(0)?;

        Ok(DailyObservation {
            station_id: StationId::from(station_id),
            date: row.get(1)?,
            month: row.get(2)?,
            day: row.get(3)?,
            tmax: row.get(4)?,
            tmin: row.get(5)?,
            prcp: row.get(6)?,
            snow: row.get(7)?,
        })
    }
}

#[cfg(test)]
mod unit {
    use super::*;
    use crate::archive::unit::*; // test helpers.
    use crate::loader::ObservationSink;

    #[test]
    fn test_station_round_trip() {
        let TestArchive {
            tmp: _tmp,
            mut arch,
        } = create_test_archive().expect("Failed to create test archive.");

        let test_stations = get_test_stations();
        arch.upsert_stations(&test_stations)
            .expect("Error adding stations.");

        let retrieved = arch.stations().expect("Error retrieving stations.");
        assert_eq!(retrieved, test_stations);

        let missoula = arch
            .station(&StationId::from("USW00024153"))
            .expect("Error retrieving station.");
        assert_eq!(missoula.name, "MISSOULA INTL AP");
        assert!(missoula.elevation.is_some());

        let no_elevation = arch
            .station(&StationId::from("US1MTMS0001"))
            .expect("Error retrieving station.");
        assert!(no_elevation.elevation.is_none());

        assert!(arch.station(&StationId::from("XXX00000000")).is_none());
    }

    #[test]
    fn test_observation_round_trip() {
        let TestArchive {
            tmp: _tmp,
            mut arch,
        } = create_test_archive().expect("Failed to create test archive.");

        let rows = get_test_observations();
        arch.upsert_observations(&rows)
            .expect("Error adding observations.");

        let id = StationId::from("USW00024153");
        let retrieved = arch.observations(&id).expect("Error retrieving observations.");
        let expected: Vec<DailyObservation> = rows
            .iter()
            .filter(|row| row.station_id == id)
            .cloned()
            .collect();
        assert_eq!(retrieved, expected);

        let first = arch
            .observation(&id, NaiveDate::from_ymd(2020, 3, 1))
            .expect("Error retrieving observation.");
        assert_eq!(first, expected[0]);
        assert!(arch
            .observation(&id, NaiveDate::from_ymd(1990, 3, 1))
            .is_none());

        assert_eq!(
            arch.count_observations().expect("Error counting."),
            rows.len() as i64
        );
    }
}
