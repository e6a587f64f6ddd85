use std::path::Path;

use duckdb::Connection;
use tracing::debug;

use crate::EngineResult;

/// Owns the single database connection of a run. Stages borrow it through
/// [`DbManager::connection`]; release it with [`DbManager::close`].
pub struct DbManager {
    conn: Connection,
}

impl DbManager {
    /// Opens the database file, creating it if it does not exist.
    pub fn open_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .map_err(|err| format!("failed to open database {}: {err}", path.display()))?;
        debug!(path = %path.display(), "opened database");
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> EngineResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn close(self) -> EngineResult<()> {
        self.conn.close().map_err(|(_, err)| err)?;
        debug!("closed database");
        Ok(())
    }
}
