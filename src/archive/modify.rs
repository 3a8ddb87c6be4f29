use log::debug;
use metfor::Quantity;
use rusqlite::params;

use super::Archive;

use crate::{
    errors::GhcndDataErr, loader::ObservationSink, observation::DailyObservation, site::Station,
};

impl ObservationSink for Archive {
    fn upsert_stations(&mut self, stations: &[Station]) -> Result<(), GhcndDataErr> {
        let tx = self.db_conn.transaction()?;

        {
            let mut stmt = tx.prepare_cached(include_str!("modify/upsert_station.sql"))?;

            for station in stations {
                stmt.execute(params![
                    station.id.as_str(),
                    station.name,
                    station.coords.lat,
                    station.coords.lon,
                    station.elevation.map(|elev| elev.unpack()),
                ])?;
            }
        }

        tx.commit()?;
        debug!("upserted {} stations", stations.len());

        Ok(())
    }

    fn upsert_observations(&mut self, rows: &[DailyObservation]) -> Result<(), GhcndDataErr> {
        let tx = self.db_conn.transaction()?;

        {
            let mut stmt = tx.prepare_cached(include_str!("modify/upsert_observation.sql"))?;

            for row in rows {
                stmt.execute(params![
                    row.station_id.as_str(),
                    row.date,
                    row.month,
                    row.day,
                    row.tmax,
                    row.tmin,
                    row.prcp,
                    row.snow,
                ])?;
            }
        }

        tx.commit()?;

        Ok(())
    }

    fn recompute_station_date_ranges(&mut self) -> Result<(), GhcndDataErr> {
        let tx = self.db_conn.transaction()?;
        let updated = tx.execute(
            include_str!("modify/update_date_ranges.sql"),
            rusqlite::NO_PARAMS,
        )?;
        tx.commit()?;

        debug!("updated date ranges for {} stations", updated);

        Ok(())
    }
}
