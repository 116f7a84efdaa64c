//! Replica rows and enumerations shared between the wire format and the store.
//!
//! The same structs decode the `ObjectArray` of bulk replies and are what the
//! replica store upserts, so field names follow the server's PascalCase keys.
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Asset class of a tracked instrument.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, EnumString, Hash, Eq, PartialEq)]
pub enum AssetClass {
    Stock,
    Crypto,
}

/// Liveness of the upstream market API as reported by the server.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Display, EnumString, Hash, Eq, PartialEq)]
pub enum ServerStatus {
    /// Upstream reachable.
    #[strum(serialize = "UP")]
    #[serde(rename = "UP")]
    Up,
    /// Upstream unreachable.
    #[strum(serialize = "DOWN")]
    #[serde(rename = "DOWN")]
    Down,
    /// Requests are being queued upstream.
    #[strum(serialize = "QUEUE")]
    #[serde(rename = "QUEUE")]
    Queue,
}

/// Owner reference as listed by `GetOwners`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OwnerRef {
    /// Owner identifier.
    #[serde(rename = "OwnerUUID")]
    pub owner_uuid: String,
}

/// Owner as persisted locally, with its sequence cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    /// Owner identifier.
    pub uuid: String,
    /// Last applied `SeqID` for this owner.
    pub cursor: u64,
}

/// Named collection of tickers under one owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quicklist {
    /// Quicklist identifier.
    #[serde(rename = "QuicklistUUID")]
    pub uuid: String,
    /// Identifier of the owning owner.
    #[serde(rename = "OwnerUUID")]
    pub owner: String,
    /// Display name.
    #[serde(rename = "Name")]
    pub name: String,
}

/// Instrument tracked in a quicklist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ticker {
    /// Ticker identifier.
    #[serde(rename = "TickerUUID")]
    pub uuid: String,
    /// Identifier of the containing quicklist.
    #[serde(rename = "QuicklistUUID")]
    pub quicklist: String,
    /// Asset class.
    #[serde(rename = "AssetClass")]
    pub asset: AssetClass,
    /// Exchange; empty when the server omits it.
    #[serde(rename = "Exchange", default)]
    pub exchange: String,
    /// Trading symbol.
    #[serde(rename = "Symbol")]
    pub symbol: String,
}

/// Instrument fields carried in the `Object` of ticker create requests and events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TickerObject {
    /// Trading symbol.
    #[serde(rename = "Symbol")]
    pub symbol: String,
    /// Exchange; empty when omitted.
    #[serde(rename = "Exchange", default)]
    pub exchange: String,
    /// Asset class.
    #[serde(rename = "AssetClass")]
    pub asset: AssetClass,
}

impl TickerObject {
    /// Builds the full ticker row once the identifiers are known.
    pub fn into_ticker(self, uuid: &str, quicklist: &str) -> Ticker {
        Ticker {
            uuid: uuid.to_string(),
            quicklist: quicklist.to_string(),
            asset: self.asset,
            exchange: self.exchange,
            symbol: self.symbol,
        }
    }
}
