use std::path::Path;

use super::Archive;

use crate::errors::GhcndDataErr;

impl Archive {
    const TABLES: [&'static str; 2] = ["stations", "weather_daily"];

    /// Open the archive at `path`, creating the database file and any missing tables.
    ///
    /// Running this on an existing archive leaves its data in place.
    pub fn create(path: &dyn AsRef<Path>) -> Result<Self, GhcndDataErr> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db_conn = rusqlite::Connection::open_with_flags(
            &path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE | rusqlite::OpenFlags::SQLITE_OPEN_CREATE,
        )?;

        db_conn.execute_batch(include_str!("root/create_index.sql"))?;
        Self::validate_db_structure(&db_conn)?;

        Ok(Archive { path, db_conn })
    }

    /// Open an existing archive.
    pub fn connect(path: &dyn AsRef<Path>) -> Result<Self, GhcndDataErr> {
        let path = path.as_ref().to_path_buf();

        let db_conn = rusqlite::Connection::open_with_flags(
            &path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE,
        )?;

        Self::validate_db_structure(&db_conn)?;

        Ok(Archive { path, db_conn })
    }

    /// Retrieve the path to the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Validate the database structure is correct.
    fn validate_db_structure(db_conn: &rusqlite::Connection) -> Result<(), GhcndDataErr> {
        let mut stmt =
            db_conn.prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")?;

        let names: Vec<String> = stmt
            .query_map(rusqlite::NO_PARAMS, |row| row.get::<_, String>(0))?
            .collect::<Result<_, _>>()?;

        if names.len() != Self::TABLES.len()
            || !names.iter().all(|name| Self::TABLES.contains(&name.as_str()))
        {
            return Err(GhcndDataErr::InvalidSchema);
        }

        Ok(())
    }
}
