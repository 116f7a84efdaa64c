//! Request numbering and origin-hash correlation.
//!
//! The server never echoes `ReqID`; it echoes the digest of the request body
//! instead. The tracker remembers the digest of every tracked request and
//! counts replies whose digest it recognizes. The settle predicate is advisory:
//! it drives the presentation layer's "pending" display, never replication.
use std::collections::HashMap;
use std::sync::Mutex;

use crossbeam_channel::Sender;
use log::{debug, trace};
use quicklist_common::digest::origin_hash;
use quicklist_common::{QuicklistError, Request, Result};

#[derive(Debug, Default)]
struct TrackerState {
    last_request_id: u64,
    completed: u64,
    in_flight: HashMap<String, u64>,
}

/// Issues request numbers, enqueues outbound frames and settles replies.
///
/// Shared between tasks behind an `Arc`; one mutex guards every read-modify-write.
pub struct RequestTracker {
    state: Mutex<TrackerState>,
    outbound: Sender<String>,
}

impl RequestTracker {
    /// Creates a tracker that enqueues frame bodies on `outbound`.
    pub fn new(outbound: Sender<String>) -> Self {
        Self {
            state: Mutex::new(TrackerState::default()),
            outbound,
        }
    }

    /// Returns the next request number, starting at 1.
    pub fn next_request_id(&self) -> Result<u64> {
        let mut state = self.state.lock()?;
        state.last_request_id += 1;
        Ok(state.last_request_id)
    }

    /// Enqueues `body` for the dispatcher. When `req_id` is given, the digest
    /// of the exact body is recorded under it first so a fast reply cannot be
    /// missed.
    pub fn send_request(&self, body: String, req_id: Option<u64>) -> Result<()> {
        if let Some(req_id) = req_id {
            let digest = origin_hash(&body);
            let mut state = self.state.lock()?;
            trace!("Tracking request {} as {}", req_id, digest);
            state.in_flight.insert(digest, req_id);
        }
        self.outbound
            .send(body)
            .map_err(|e| QuicklistError::ChannelSend(format!("outbound queue closed: {}", e)))
    }

    /// Allocates a request number, builds the request and sends it tracked.
    pub fn submit<F>(&self, build: F) -> Result<u64>
    where
        F: FnOnce(u64) -> Request,
    {
        let req_id = self.next_request_id()?;
        let request = build(req_id);
        self.send_request(request.to_body()?, Some(req_id))?;
        Ok(req_id)
    }

    /// Settles the request whose digest is `digest`. Returns whether a pending
    /// request was settled; unknown and repeated digests are ignored.
    pub fn on_ack(&self, digest: &str) -> Result<bool> {
        let mut state = self.state.lock()?;
        match state.in_flight.remove(digest) {
            Some(req_id) => {
                state.completed += 1;
                debug!("Request {} settled", req_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// True when as many requests have settled as have been numbered.
    pub fn all_settled(&self) -> Result<bool> {
        let state = self.state.lock()?;
        Ok(state.completed == state.last_request_id)
    }

    /// Number of tracked requests still awaiting a reply.
    pub fn in_flight(&self) -> Result<usize> {
        Ok(self.state.lock()?.in_flight.len())
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
