//! Inbound events pushed or returned by the server.
//!
//! A non-status frame is a JSON object. It is first opened as an [`Envelope`]
//! so the `OriginHash` echo can be read even when the event itself is rejected
//! or unknown, then decoded once into the closed [`Event`] union.
use serde::Deserialize;
use serde_json::Value;

use crate::error::QuicklistError;
use crate::model::{OwnerRef, Quicklist, Ticker, TickerObject};
use crate::result::Result;

/// Error code reported by the server for a successful operation.
pub const SUCCESS: i64 = 0;

/// JSON object frame with its origin hash split off.
#[derive(Debug, Clone)]
pub struct Envelope {
    /// Digest of the request this frame answers, if any.
    pub origin_hash: Option<String>,
    body: Value,
}

impl Envelope {
    /// Parses frame text that is expected to hold a JSON object.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Wraps an already parsed JSON value, such as a replayed sub-event.
    pub fn from_value(body: Value) -> Result<Self> {
        if !body.is_object() {
            return Err(QuicklistError::Format(format!(
                "expected a JSON object, got {}",
                body
            )));
        }
        let origin_hash = body
            .get("OriginHash")
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(Self { origin_hash, body })
    }

    /// Decodes the event discriminator and its payload.
    pub fn into_event(self) -> Result<Event> {
        Ok(serde_json::from_value(self.body)?)
    }
}

/// Sequencing header shared by incremental mutation events.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Broadcast {
    /// Owner whose sequence this event belongs to.
    #[serde(rename = "BroadcastOwnerUUID")]
    pub owner: String,
    /// Position of this event in the owner's sequence.
    #[serde(rename = "SeqID")]
    pub seq_id: u64,
    /// Server error codes; index 0 is the overall outcome.
    #[serde(rename = "Errors", default)]
    pub errors: Vec<i64>,
}

impl Broadcast {
    /// Whether the server reported the operation as successful.
    pub fn succeeded(&self) -> bool {
        self.errors.first() == Some(&SUCCESS)
    }
}

/// A ticker was added to a quicklist.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TickerCreated {
    /// Sequencing header.
    #[serde(flatten)]
    pub broadcast: Broadcast,
    /// New ticker identifier.
    #[serde(rename = "TickerUUID")]
    pub uuid: String,
    /// Containing quicklist.
    #[serde(rename = "QuicklistUUID")]
    pub quicklist: String,
    /// Instrument fields.
    #[serde(rename = "Object")]
    pub object: TickerObject,
}

/// A ticker was removed.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TickerDeleted {
    /// Sequencing header.
    #[serde(flatten)]
    pub broadcast: Broadcast,
    /// Removed ticker identifier.
    #[serde(rename = "TickerUUID")]
    pub uuid: String,
    /// Quicklist the ticker belonged to, when the server includes it.
    #[serde(rename = "QuicklistUUID", default)]
    pub quicklist: Option<String>,
}

/// A quicklist was created or renamed.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct QuicklistChanged {
    /// Sequencing header.
    #[serde(flatten)]
    pub broadcast: Broadcast,
    /// Quicklist identifier.
    #[serde(rename = "QuicklistUUID")]
    pub uuid: String,
    /// New display name.
    #[serde(rename = "Name")]
    pub name: String,
}

/// A quicklist was removed.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct QuicklistDeleted {
    /// Sequencing header.
    #[serde(flatten)]
    pub broadcast: Broadcast,
    /// Removed quicklist identifier.
    #[serde(rename = "QuicklistUUID")]
    pub uuid: String,
}

/// Every event kind the client understands.
#[allow(missing_docs)]
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "Event")]
pub enum Event {
    GetTickers {
        #[serde(rename = "ObjectArray")]
        tickers: Vec<Ticker>,
    },
    GetBulkTickers {
        #[serde(rename = "ObjectArray")]
        tickers: Vec<Ticker>,
    },
    GetQuicklists {
        #[serde(rename = "ObjectArray")]
        quicklists: Vec<Quicklist>,
    },
    GetBulkQuicklists {
        #[serde(rename = "ObjectArray")]
        quicklists: Vec<Quicklist>,
    },
    GetOwners {
        #[serde(rename = "ObjectArray")]
        owners: Vec<OwnerRef>,
    },
    CreateTicker(TickerCreated),
    DeleteTicker(TickerDeleted),
    CreateQuicklist(QuicklistChanged),
    UpdateQuicklist(QuicklistChanged),
    DeleteQuicklist(QuicklistDeleted),
    /// Missed broadcasts replayed in order after a subscribe. Sub-events stay
    /// undecoded so one malformed entry does not discard the rest.
    ReplayLog {
        #[serde(rename = "ObjectArray", default)]
        events: Vec<Value>,
    },
    /// Any discriminator this client does not know.
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
