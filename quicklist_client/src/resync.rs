//! Gap detection and full resynchronization.
//!
//! Lost broadcasts are never retransmitted. Discontinuities are only checked at
//! stream resumption (the first replayed event) and when an owner's sequence
//! restarts at 1; a detected gap is repaired by re-fetching the owner's data in
//! bulk instead of applying the event.
use log::info;
use quicklist_common::event::Broadcast;
use quicklist_common::{Request, Result};

use crate::store::ReplicaStore;
use crate::tracker::RequestTracker;

/// Outcome of the reload gate for one incremental event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Apply the event and advance the owner's cursor.
    Apply,
    /// Skip the event; a bulk fetch will supersede it.
    Resync,
}

/// Decides whether an event at replay `position` can be applied directly.
///
/// The cursor is consulted only for the first replayed event or `SeqID == 1`.
/// `SeqID == 1` always resyncs, even for an owner that has advanced further.
/// An unknown owner never counts as a gap.
pub fn evaluate<S: ReplicaStore>(
    store: &S,
    broadcast: &Broadcast,
    position: Option<usize>,
) -> Result<Gate> {
    let seq_id = broadcast.seq_id;
    if position != Some(0) && seq_id != 1 {
        return Ok(Gate::Apply);
    }
    if seq_id == 1 {
        return Ok(Gate::Resync);
    }
    match store.owner_cursor(&broadcast.owner)? {
        // cursor < SeqID - 1
        Some(cursor) if cursor.saturating_add(1) < seq_id => Ok(Gate::Resync),
        _ => Ok(Gate::Apply),
    }
}

/// Requests the authoritative state of `owner`: owners, then its quicklists,
/// then its tickers scoped to `quicklist` when known.
pub fn request(tracker: &RequestTracker, owner: &str, quicklist: Option<&str>) -> Result<()> {
    info!(
        "Reloading owner {} (quicklist {})",
        owner,
        quicklist.unwrap_or("-")
    );
    tracker.submit(|req_id| Request::GetOwners { req_id })?;
    tracker.submit(|req_id| Request::GetQuicklists {
        owner: owner.to_string(),
        quicklist: None,
        req_id,
    })?;
    tracker.submit(|req_id| Request::GetTickers {
        owner: owner.to_string(),
        quicklist: quicklist.map(str::to_string),
        req_id,
    })?;
    Ok(())
}

#[cfg(test)]
#[path = "resync_tests.rs"]
mod tests;
