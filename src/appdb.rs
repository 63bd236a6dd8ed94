use anyhow::{Context, Result};
use rusqlite::OptionalExtension;

use crate::{
    db::{Db, Migration},
    store::RecordStore,
};

pub(crate) const MIGRATIONS: &[Migration] = &[Migration {
    id: "001",
    sql: "CREATE TABLE kv_store (
              key          TEXT PRIMARY KEY
            , value        TEXT NOT NULL
            , updated_on   DEFAULT CURRENT_TIMESTAMP
        )",
}];

/// SQLite backed record store.
pub(crate) struct AppDb {
    db: Db,
}

impl AppDb {
    pub(crate) fn new(path: String) -> Self {
        Self { db: Db::new(path) }
    }

    pub(crate) fn run_migrations(&self) -> Result<()> {
        self.db.upgrade(MIGRATIONS)
    }
}

impl RecordStore for AppDb {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let conn = self.db.new_conn()?;
        conn.query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            [key],
            |row| row.get::<usize, String>(0),
        )
        .optional()
        .with_context(|| format!("Failed to load {key}"))
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.db.new_conn()?;
        conn.execute(
            "
                INSERT INTO kv_store (key, value)
                VALUES (?1, ?2)
                ON CONFLICT (key) DO UPDATE SET
                      value = excluded.value
                    , updated_on = CURRENT_TIMESTAMP
            ",
            [key, value],
        )
        .with_context(|| format!("Failed to save {key}"))?;
        Ok(())
    }
}
