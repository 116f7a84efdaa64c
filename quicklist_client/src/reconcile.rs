//! Replace-style synchronization of a table from a bulk fetch.
//!
//! A bulk reply is an authoritative snapshot: every fetched row is upserted and
//! every stored row missing from the snapshot is deleted, all in one commit.
use std::collections::HashSet;

use quicklist_common::Result;
use quicklist_common::model::{Quicklist, Ticker};

use crate::store::ReplicaStore;

/// Row counts touched by one reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reconciled {
    /// Rows inserted or updated.
    pub upserted: usize,
    /// Stored rows deleted for being absent from the snapshot.
    pub deleted: usize,
}

/// A table that can be reconciled against a snapshot.
pub trait Snapshot {
    /// Identifier of this row.
    fn id(&self) -> &str;
    /// Inserts or updates this row.
    fn upsert<S: ReplicaStore>(&self, store: &mut S) -> Result<()>;
    /// Identifiers of every stored row of this table.
    fn stored_ids<S: ReplicaStore>(store: &S) -> Result<Vec<String>>;
    /// Deletes the stored row `id`.
    fn delete<S: ReplicaStore>(store: &mut S, id: &str) -> Result<bool>;
}

impl Snapshot for Ticker {
    fn id(&self) -> &str {
        &self.uuid
    }

    fn upsert<S: ReplicaStore>(&self, store: &mut S) -> Result<()> {
        store.upsert_ticker(self)
    }

    fn stored_ids<S: ReplicaStore>(store: &S) -> Result<Vec<String>> {
        store.ticker_ids()
    }

    fn delete<S: ReplicaStore>(store: &mut S, id: &str) -> Result<bool> {
        store.delete_ticker(id)
    }
}

impl Snapshot for Quicklist {
    fn id(&self) -> &str {
        &self.uuid
    }

    fn upsert<S: ReplicaStore>(&self, store: &mut S) -> Result<()> {
        store.upsert_quicklist(self)
    }

    fn stored_ids<S: ReplicaStore>(store: &S) -> Result<Vec<String>> {
        store.quicklist_ids()
    }

    fn delete<S: ReplicaStore>(store: &mut S, id: &str) -> Result<bool> {
        store.delete_quicklist(id)
    }
}

/// Makes the stored table equal to `rows`.
pub fn reconcile<S, T>(store: &mut S, rows: &[T]) -> Result<Reconciled>
where
    S: ReplicaStore,
    T: Snapshot,
{
    store.atomically(|store| {
        let fetched: HashSet<&str> = rows.iter().map(|row| row.id()).collect();
        for row in rows {
            row.upsert(store)?;
        }

        let mut deleted = 0;
        for id in T::stored_ids(store)? {
            if !fetched.contains(id.as_str()) && T::delete(store, &id)? {
                deleted += 1;
            }
        }

        Ok(Reconciled {
            upserted: rows.len(),
            deleted,
        })
    })
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
