// SQLite persistence layer for published valuation tables.

use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::config::FantasyConfig;
use crate::pipeline::{PipelineOutput, PublishedRow, PublishedTable, TableName};

/// One materialization of a partition.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub partition: String,
    pub computed_at: DateTime<Utc>,
    /// The effective scoring format the run used, overrides applied.
    pub config: serde_json::Value,
    pub warnings: Vec<String>,
}

/// SQLite-backed store of every table a run publishes, keyed by partition.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) a SQLite database at `path` and ensure all tables
    /// exist. Pass `":memory:"` for an ephemeral in-memory database (useful
    /// for tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS published_tables (
                partition       TEXT NOT NULL,
                table_name      TEXT NOT NULL,
                categories_json TEXT NOT NULL,
                row_count       INTEGER NOT NULL,
                PRIMARY KEY (partition, table_name)
            );

            CREATE TABLE IF NOT EXISTS table_rows (
                partition    TEXT NOT NULL,
                table_name   TEXT NOT NULL,
                row_index    INTEGER NOT NULL,
                player       TEXT NOT NULL,
                team         TEXT NOT NULL,
                position     TEXT NOT NULL,
                games_played REAL NOT NULL,
                value        REAL,
                salary       REAL,
                values_json  TEXT NOT NULL,
                PRIMARY KEY (partition, table_name, row_index)
            );

            CREATE TABLE IF NOT EXISTS runs (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                partition   TEXT NOT NULL,
                computed_at TEXT NOT NULL,
                config_json TEXT NOT NULL,
                warnings    TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_runs_partition ON runs(partition);
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the connection. A poisoned lock still holds a usable
    /// connection, since every write runs inside a transaction.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Replace everything stored for `partition` with this run's tables and
    /// append a run record, in a single transaction.
    pub fn save_output(
        &self,
        partition: &str,
        output: &PipelineOutput,
        config: &FantasyConfig,
    ) -> Result<()> {
        let config_json =
            serde_json::to_string(config).context("failed to serialize scoring config")?;
        let warnings: Vec<String> = output.warnings.iter().map(|w| w.to_string()).collect();
        let warnings_json =
            serde_json::to_string(&warnings).context("failed to serialize warnings")?;

        let mut conn = self.conn();
        let tx = conn
            .transaction()
            .context("failed to begin save transaction")?;

        tx.execute(
            "DELETE FROM table_rows WHERE partition = ?1",
            params![partition],
        )
        .context("failed to clear previous rows")?;
        tx.execute(
            "DELETE FROM published_tables WHERE partition = ?1",
            params![partition],
        )
        .context("failed to clear previous tables")?;

        for table in output.tables() {
            let categories_json = serde_json::to_string(&table.categories)
                .context("failed to serialize categories")?;
            tx.execute(
                "INSERT INTO published_tables (partition, table_name, categories_json, row_count)
                 VALUES (?1, ?2, ?3, ?4)",
                params![partition, table.name.as_str(), categories_json, table.rows.len() as i64],
            )
            .with_context(|| format!("failed to record table {}", table.name))?;

            let mut stmt = tx
                .prepare_cached(
                    "INSERT INTO table_rows
                        (partition, table_name, row_index, player, team, position,
                         games_played, value, salary, values_json)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                )
                .context("failed to prepare row insert")?;
            for (index, row) in table.rows.iter().enumerate() {
                let values_json =
                    serde_json::to_string(&row.values).context("failed to serialize values")?;
                stmt.execute(params![
                    partition,
                    table.name.as_str(),
                    index as i64,
                    row.player,
                    row.team,
                    row.position,
                    row.games_played,
                    row.value,
                    row.salary,
                    values_json,
                ])
                .with_context(|| format!("failed to insert row {index} of {}", table.name))?;
            }
        }

        tx.execute(
            "INSERT INTO runs (partition, computed_at, config_json, warnings)
             VALUES (?1, ?2, ?3, ?4)",
            params![partition, Utc::now().to_rfc3339(), config_json, warnings_json],
        )
        .context("failed to record run")?;

        tx.commit().context("failed to commit save transaction")?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Load one published table, rows in stored order. `None` if the
    /// partition has never been saved.
    pub fn load_table(&self, partition: &str, name: TableName) -> Result<Option<PublishedTable>> {
        let conn = self.conn();

        let categories_json: Option<String> = conn
            .query_row(
                "SELECT categories_json FROM published_tables
                 WHERE partition = ?1 AND table_name = ?2",
                params![partition, name.as_str()],
                |row| row.get(0),
            )
            .optional()
            .context("failed to query published table")?;
        let Some(categories_json) = categories_json else {
            return Ok(None);
        };
        let categories: Vec<String> = serde_json::from_str(&categories_json)
            .context("failed to parse stored categories")?;

        let mut stmt = conn
            .prepare(
                "SELECT player, team, position, games_played, value, salary, values_json
                 FROM table_rows WHERE partition = ?1 AND table_name = ?2
                 ORDER BY row_index",
            )
            .context("failed to prepare load_table query")?;

        let raw_rows = stmt
            .query_map(params![partition, name.as_str()], |row| {
                Ok((
                    PublishedRow {
                        player: row.get(0)?,
                        team: row.get(1)?,
                        position: row.get(2)?,
                        games_played: row.get(3)?,
                        values: Vec::new(),
                        value: row.get(4)?,
                        salary: row.get(5)?,
                    },
                    row.get::<_, String>(6)?,
                ))
            })
            .context("failed to query table rows")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map table rows")?;

        let rows = raw_rows
            .into_iter()
            .map(|(row, values_json)| {
                let values: Vec<f64> = serde_json::from_str(&values_json)
                    .with_context(|| format!("failed to parse values for {}", row.player))?;
                Ok(PublishedRow { values, ..row })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(PublishedTable {
            name,
            categories,
            rows,
        }))
    }

    /// Most recent run recorded for `partition`.
    pub fn latest_run(&self, partition: &str) -> Result<Option<RunRecord>> {
        let conn = self.conn();
        let raw: Option<(String, String, String)> = conn
            .query_row(
                "SELECT computed_at, config_json, warnings FROM runs
                 WHERE partition = ?1 ORDER BY id DESC LIMIT 1",
                params![partition],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()
            .context("failed to query latest run")?;

        let Some((computed_at, config_json, warnings_json)) = raw else {
            return Ok(None);
        };

        Ok(Some(RunRecord {
            partition: partition.to_string(),
            computed_at: DateTime::parse_from_rfc3339(&computed_at)
                .context("failed to parse run timestamp")?
                .with_timezone(&Utc),
            config: serde_json::from_str(&config_json).context("failed to parse run config")?,
            warnings: serde_json::from_str(&warnings_json)
                .context("failed to parse run warnings")?,
        }))
    }

    /// Every partition with stored tables, sorted by name.
    pub fn partitions(&self) -> Result<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT DISTINCT partition FROM published_tables ORDER BY partition")
            .context("failed to prepare partitions query")?;
        let partitions = stmt
            .query_map([], |row| row.get(0))
            .context("failed to query partitions")?
            .collect::<std::result::Result<Vec<String>, _>>()
            .context("failed to map partition rows")?;
        Ok(partitions)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
