//! Write-intents submitted by the presentation layer.
//!
//! An intent becomes a tracked outbound request. The replica itself only
//! changes once the server broadcasts the result, so the session keeps the
//! ticker submissions it has not seen settle yet, for display as "pending".
use std::sync::Arc;

use log::debug;
use quicklist_common::model::{AssetClass, TickerObject};
use quicklist_common::net::STATUS_PROBE;
use quicklist_common::{QuicklistError, Request, Result};

use crate::tracker::RequestTracker;

/// Something the user asked the server to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteIntent {
    /// Add an instrument to a quicklist.
    CreateTicker {
        /// Owner of the quicklist.
        owner: String,
        /// Target quicklist.
        quicklist: String,
        /// Trading symbol.
        symbol: String,
        /// Exchange, may be empty.
        exchange: String,
        /// Asset class.
        asset: AssetClass,
    },
    /// Remove an instrument.
    DeleteTicker {
        /// Owner of the ticker.
        owner: String,
        /// Ticker to remove.
        ticker: String,
    },
    /// Re-fetch all owners.
    RefreshOwners,
    /// Re-fetch all quicklists.
    RefreshQuicklists,
    /// Re-fetch all tickers.
    RefreshTickers,
    /// Ask for the upstream liveness status.
    Status,
}

impl WriteIntent {
    fn into_request(self, req_id: u64) -> Result<Request> {
        let request = match self {
            WriteIntent::CreateTicker {
                owner,
                quicklist,
                symbol,
                exchange,
                asset,
            } => Request::CreateTicker {
                req_id,
                quicklist,
                owner,
                object: TickerObject {
                    symbol,
                    exchange,
                    asset,
                },
            },
            WriteIntent::DeleteTicker { owner, ticker } => Request::DeleteTicker {
                req_id,
                owner,
                ticker,
            },
            WriteIntent::RefreshOwners => Request::GetOwners { req_id },
            WriteIntent::RefreshQuicklists => Request::GetBulkQuicklists { req_id },
            WriteIntent::RefreshTickers => Request::GetBulkTickers { req_id },
            WriteIntent::Status => {
                return Err(QuicklistError::Format(
                    "the status probe is not a tracked request".to_string(),
                ));
            }
        };
        Ok(request)
    }
}

/// Per-session view of submitted intents.
pub struct IntentSession {
    tracker: Arc<RequestTracker>,
    pending: Vec<Request>,
}

impl IntentSession {
    /// Starts a session submitting through `tracker`.
    pub fn new(tracker: Arc<RequestTracker>) -> Self {
        Self {
            tracker,
            pending: Vec::new(),
        }
    }

    /// Sends `intent`. Returns the request number, or `None` for the untracked
    /// status probe.
    pub fn submit(&mut self, intent: WriteIntent) -> Result<Option<u64>> {
        if intent == WriteIntent::Status {
            self.tracker.send_request(STATUS_PROBE.to_string(), None)?;
            return Ok(None);
        }

        let req_id = self.tracker.next_request_id()?;
        let request = intent.into_request(req_id)?;
        self.tracker.send_request(request.to_body()?, Some(req_id))?;
        if let Request::CreateTicker { .. } = request {
            debug!("Ticker submission {} pending", req_id);
            self.pending.push(request);
        }
        Ok(Some(req_id))
    }

    /// Ticker submissions not yet known to be settled.
    pub fn pending(&self) -> &[Request] {
        &self.pending
    }

    /// Forgets pending submissions once every request has settled.
    /// Returns whether the list was cleared.
    pub fn sweep(&mut self) -> Result<bool> {
        if self.tracker.all_settled()? {
            self.pending.clear();
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
#[path = "intents_tests.rs"]
mod tests;
