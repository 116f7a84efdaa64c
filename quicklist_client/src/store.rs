//! Persisted replica of the server's dataset.
//!
//! [`ReplicaStore`] is the contract the event processor needs from a storage
//! engine: keyed upsert, delete and point lookup per table, plus a way to group
//! several writes into one durable commit. [`SqliteStore`] implements it on
//! SQLite; every call outside [`ReplicaStore::atomically`] commits on its own.
use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use log::{debug, warn};
use quicklist_common::model::{AssetClass, Owner, Quicklist, ServerStatus, Ticker};
use quicklist_common::{QuicklistError, Result};
use rusqlite::{Connection, OptionalExtension, Row, params};

/// SQL schema for the replica database.
pub const SCHEMA: &str = r#"
-- Liveness of the upstream API, one row per configured host
CREATE TABLE IF NOT EXISTS qlserver (
    host TEXT PRIMARY KEY,
    status TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Owners with the last applied broadcast sequence number
CREATE TABLE IF NOT EXISTS owners (
    uuid TEXT PRIMARY KEY,
    seq INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS quicklists (
    uuid TEXT PRIMARY KEY,
    owner TEXT NOT NULL REFERENCES owners(uuid),
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tickers (
    uuid TEXT PRIMARY KEY,
    quicklist TEXT NOT NULL REFERENCES quicklists(uuid),
    asset TEXT NOT NULL,
    exchange TEXT NOT NULL DEFAULT '',
    symbol TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_quicklists_owner ON quicklists(owner);
CREATE INDEX IF NOT EXISTS idx_tickers_quicklist ON tickers(quicklist);
"#;

/// How long a writer waits for a reader holding the database.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Storage operations the replica client relies on.
pub trait ReplicaStore {
    /// Runs `f` so that all of its writes commit together or not at all.
    fn atomically<T, F>(&mut self, f: F) -> Result<T>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Result<T>;

    /// Records the liveness reported for `host`.
    fn set_server_status(&mut self, host: &str, status: ServerStatus) -> Result<()>;
    /// Last liveness recorded for `host`.
    fn server_status(&self, host: &str) -> Result<Option<ServerStatus>>;

    /// Sequence cursor of `owner`, `None` when the owner is unknown.
    fn owner_cursor(&self, owner: &str) -> Result<Option<u64>>;
    /// Creates `owner` with cursor 0 unless it exists. Returns whether it was created.
    fn insert_owner_if_absent(&mut self, owner: &str) -> Result<bool>;
    /// Moves the cursor of `owner` forward to `seq_id`, creating the owner if needed.
    /// A lower `seq_id` leaves the cursor unchanged.
    fn advance_cursor(&mut self, owner: &str, seq_id: u64) -> Result<()>;
    /// All known owners.
    fn owners(&self) -> Result<Vec<Owner>>;

    /// Inserts a quicklist or renames the stored one; materializes its owner.
    fn upsert_quicklist(&mut self, quicklist: &Quicklist) -> Result<()>;
    /// Renames an existing quicklist. Returns whether it existed.
    fn rename_quicklist(&mut self, uuid: &str, name: &str) -> Result<bool>;
    /// Deletes a quicklist. Returns whether it existed.
    fn delete_quicklist(&mut self, uuid: &str) -> Result<bool>;
    /// Point lookup of a quicklist.
    fn quicklist(&self, uuid: &str) -> Result<Option<Quicklist>>;
    /// All quicklists ordered by name.
    fn quicklists(&self) -> Result<Vec<Quicklist>>;
    /// Identifiers of all stored quicklists.
    fn quicklist_ids(&self) -> Result<Vec<String>>;

    /// Inserts a ticker or overwrites every field of the stored one.
    fn upsert_ticker(&mut self, ticker: &Ticker) -> Result<()>;
    /// Deletes a ticker. Returns whether it existed.
    fn delete_ticker(&mut self, uuid: &str) -> Result<bool>;
    /// Point lookup of a ticker.
    fn ticker(&self, uuid: &str) -> Result<Option<Ticker>>;
    /// Tickers of one quicklist ordered by symbol.
    fn tickers_in(&self, quicklist: &str) -> Result<Vec<Ticker>>;
    /// Identifiers of all stored tickers.
    fn ticker_ids(&self) -> Result<Vec<String>>;
}

/// Parse a string value from the database, returning a rusqlite error on parse failure.
fn parse_db<T: std::str::FromStr>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(QuicklistError::Format(format!(
                "invalid value '{value}' in column '{column}'"
            ))),
        )
    })
}

fn seq_to_db(seq_id: u64) -> Result<i64> {
    i64::try_from(seq_id)
        .map_err(|_| QuicklistError::Format(format!("sequence number {} out of range", seq_id)))
}

fn seq_from_db(seq: i64) -> u64 {
    u64::try_from(seq).unwrap_or(0)
}

fn ticker_from_row(row: &Row<'_>) -> std::result::Result<Ticker, rusqlite::Error> {
    let asset: String = row.get("asset")?;
    Ok(Ticker {
        uuid: row.get("uuid")?,
        quicklist: row.get("quicklist")?,
        asset: parse_db::<AssetClass>(&asset, "asset")?,
        exchange: row.get("exchange")?,
        symbol: row.get("symbol")?,
    })
}

fn quicklist_from_row(row: &Row<'_>) -> std::result::Result<Quicklist, rusqlite::Error> {
    Ok(Quicklist {
        uuid: row.get("uuid")?,
        owner: row.get("owner")?,
        name: row.get("name")?,
    })
}

/// SQLite-backed replica store.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create a replica database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!("Replica database {} opened in {} mode", path.display(), mode);
        Self::init(conn)
    }

    /// Open a private in-memory replica.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        // Bulk snapshots arrive table by table, so tickers may reference a
        // quicklist that is not stored yet. References stay unenforced.
        conn.pragma_update(None, "foreign_keys", false)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    fn ids(&self, sql: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(sql)?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(ids)
    }
}

impl ReplicaStore for SqliteStore {
    fn atomically<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        let outcome = f(self).and_then(|value| {
            self.conn.execute_batch("COMMIT")?;
            Ok(value)
        });
        if outcome.is_err() && !self.conn.is_autocommit() {
            if let Err(e) = self.conn.execute_batch("ROLLBACK") {
                warn!("Rollback failed: {}", e);
            }
        }
        outcome
    }

    fn set_server_status(&mut self, host: &str, status: ServerStatus) -> Result<()> {
        self.conn.execute(
            "INSERT INTO qlserver(host, status, updated_at) VALUES(?1, ?2, ?3)
             ON CONFLICT(host) DO UPDATE SET status = excluded.status, updated_at = excluded.updated_at",
            params![host, status.to_string(), Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn server_status(&self, host: &str) -> Result<Option<ServerStatus>> {
        let status = self
            .conn
            .query_row(
                "SELECT status FROM qlserver WHERE host = ?1",
                params![host],
                |row| {
                    let status: String = row.get(0)?;
                    parse_db::<ServerStatus>(&status, "status")
                },
            )
            .optional()?;
        Ok(status)
    }

    fn owner_cursor(&self, owner: &str) -> Result<Option<u64>> {
        let seq: Option<i64> = self
            .conn
            .query_row(
                "SELECT seq FROM owners WHERE uuid = ?1",
                params![owner],
                |row| row.get(0),
            )
            .optional()?;
        Ok(seq.map(seq_from_db))
    }

    fn insert_owner_if_absent(&mut self, owner: &str) -> Result<bool> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO owners(uuid, seq) VALUES(?1, 0)",
            params![owner],
        )?;
        Ok(inserted == 1)
    }

    fn advance_cursor(&mut self, owner: &str, seq_id: u64) -> Result<()> {
        self.conn.execute(
            "INSERT INTO owners(uuid, seq) VALUES(?1, ?2)
             ON CONFLICT(uuid) DO UPDATE SET seq = MAX(seq, excluded.seq)",
            params![owner, seq_to_db(seq_id)?],
        )?;
        Ok(())
    }

    fn owners(&self) -> Result<Vec<Owner>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uuid, seq FROM owners ORDER BY uuid")?;
        let owners = stmt
            .query_map([], |row| {
                Ok(Owner {
                    uuid: row.get(0)?,
                    cursor: seq_from_db(row.get(1)?),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(owners)
    }

    fn upsert_quicklist(&mut self, quicklist: &Quicklist) -> Result<()> {
        self.insert_owner_if_absent(&quicklist.owner)?;
        self.conn.execute(
            "INSERT INTO quicklists(uuid, owner, name) VALUES(?1, ?2, ?3)
             ON CONFLICT(uuid) DO UPDATE SET name = excluded.name",
            params![quicklist.uuid, quicklist.owner, quicklist.name],
        )?;
        Ok(())
    }

    fn rename_quicklist(&mut self, uuid: &str, name: &str) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE quicklists SET name = ?1 WHERE uuid = ?2",
            params![name, uuid],
        )?;
        Ok(updated > 0)
    }

    fn delete_quicklist(&mut self, uuid: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM quicklists WHERE uuid = ?1", params![uuid])?;
        Ok(deleted > 0)
    }

    fn quicklist(&self, uuid: &str) -> Result<Option<Quicklist>> {
        let quicklist = self
            .conn
            .query_row(
                "SELECT uuid, owner, name FROM quicklists WHERE uuid = ?1",
                params![uuid],
                quicklist_from_row,
            )
            .optional()?;
        Ok(quicklist)
    }

    fn quicklists(&self) -> Result<Vec<Quicklist>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uuid, owner, name FROM quicklists ORDER BY name ASC")?;
        let quicklists = stmt
            .query_map([], quicklist_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(quicklists)
    }

    fn quicklist_ids(&self) -> Result<Vec<String>> {
        self.ids("SELECT uuid FROM quicklists")
    }

    fn upsert_ticker(&mut self, ticker: &Ticker) -> Result<()> {
        self.conn.execute(
            "INSERT INTO tickers(uuid, quicklist, asset, exchange, symbol) VALUES(?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(uuid) DO UPDATE SET quicklist = excluded.quicklist, asset = excluded.asset,
                exchange = excluded.exchange, symbol = excluded.symbol",
            params![
                ticker.uuid,
                ticker.quicklist,
                ticker.asset.to_string(),
                ticker.exchange,
                ticker.symbol
            ],
        )?;
        Ok(())
    }

    fn delete_ticker(&mut self, uuid: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM tickers WHERE uuid = ?1", params![uuid])?;
        Ok(deleted > 0)
    }

    fn ticker(&self, uuid: &str) -> Result<Option<Ticker>> {
        let ticker = self
            .conn
            .query_row(
                "SELECT uuid, quicklist, asset, exchange, symbol FROM tickers WHERE uuid = ?1",
                params![uuid],
                ticker_from_row,
            )
            .optional()?;
        Ok(ticker)
    }

    fn tickers_in(&self, quicklist: &str) -> Result<Vec<Ticker>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, quicklist, asset, exchange, symbol FROM tickers
             WHERE quicklist = ?1 ORDER BY symbol ASC",
        )?;
        let tickers = stmt
            .query_map(params![quicklist], ticker_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tickers)
    }

    fn ticker_ids(&self) -> Result<Vec<String>> {
        self.ids("SELECT uuid FROM tickers")
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
