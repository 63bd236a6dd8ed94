use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;
use rusqlite::{Connection, OptionalExtension};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("migration ID {0} in database doesn't appear in migration history")]
pub(crate) struct UnknownMigrationError(String);

pub(crate) struct Migration<'a> {
    pub(crate) id: &'a str,
    pub(crate) sql: &'a str,
}

pub(crate) struct Db {
    file_path: PathBuf,
}

impl Db {
    pub(crate) fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// Brings the database up to the last of `migrations`, which must be a
    /// superset of whatever has already been applied.
    pub(crate) fn upgrade(&self, migrations: &[Migration]) -> Result<()> {
        let mut conn = self.new_conn()?;
        let pending = pending_migrations(&conn, migrations)?;

        for migration in pending {
            info!("Running migration {}", migration.id);
            let tx = conn.transaction()?;
            tx.execute(migration.sql, ())?;
            tx.execute(
                "INSERT INTO migrations (migration_id) VALUES (?1)",
                [migration.id],
            )?;
            tx.commit()
                .with_context(|| format!("Failed to commit migration {}", migration.id))?;
        }

        Ok(())
    }

    pub(crate) fn new_conn(&self) -> Result<Connection> {
        Connection::open(&self.file_path).with_context(|| {
            format!(
                "Failed to open sqlite database {}",
                self.file_path.display()
            )
        })
    }
}

fn pending_migrations<'a, 'b>(
    conn: &Connection,
    migrations: &'a [Migration<'b>],
) -> Result<&'a [Migration<'b>]> {
    conn.execute(
        "
            CREATE TABLE IF NOT EXISTS migrations (
                id             INTEGER PRIMARY KEY
              , migration_id   TEXT NOT NULL
              , created_on     DEFAULT CURRENT_TIMESTAMP
            )
        ",
        (),
    )?;

    let current = conn
        .query_row(
            "SELECT migration_id FROM migrations ORDER BY id DESC LIMIT 1",
            (),
            |row| row.get::<usize, String>(0),
        )
        .optional()?;

    match current {
        Some(current_id) => {
            info!("Current DB migration: {}", current_id);
            let idx = migrations
                .iter()
                .position(|m| m.id == current_id)
                .ok_or(UnknownMigrationError(current_id))?;
            Ok(&migrations[idx + 1..])
        }
        None => {
            info!("Current DB migration: None");
            Ok(migrations)
        }
    }
}
