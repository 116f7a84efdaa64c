//! Outbound request payloads.
//!
//! Every request except the bare `STATUS` probe is a JSON object whose `Event`
//! key names the operation and whose `ReqID` carries the client-side request
//! number. The exact serialized body is what the origin hash is computed over.
use serde::{Deserialize, Serialize};

use crate::model::TickerObject;
use crate::result::Result;

/// Request sent from the client to the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "Event")]
pub enum Request {
    /// Start receiving broadcast events, including a replay of missed ones.
    SubscribeStream {
        /// Client request number.
        #[serde(rename = "ReqID")]
        req_id: u64,
    },
    /// List every owner visible to this client.
    GetOwners {
        /// Client request number.
        #[serde(rename = "ReqID")]
        req_id: u64,
    },
    /// Fetch all tickers of all owners.
    GetBulkTickers {
        /// Client request number.
        #[serde(rename = "ReqID")]
        req_id: u64,
    },
    /// Fetch all quicklists of all owners.
    GetBulkQuicklists {
        /// Client request number.
        #[serde(rename = "ReqID")]
        req_id: u64,
    },
    /// Fetch the quicklists of one owner.
    GetQuicklists {
        /// Owner whose lists are fetched.
        #[serde(rename = "OwnerUUID")]
        owner: String,
        /// Optional quicklist scope.
        #[serde(rename = "QuicklistUUID", default, skip_serializing_if = "Option::is_none")]
        quicklist: Option<String>,
        /// Client request number.
        #[serde(rename = "ReqID")]
        req_id: u64,
    },
    /// Fetch the tickers of one owner, optionally scoped to a quicklist.
    GetTickers {
        /// Owner whose tickers are fetched.
        #[serde(rename = "OwnerUUID")]
        owner: String,
        /// Optional quicklist scope.
        #[serde(rename = "QuicklistUUID", default, skip_serializing_if = "Option::is_none")]
        quicklist: Option<String>,
        /// Client request number.
        #[serde(rename = "ReqID")]
        req_id: u64,
    },
    /// Add an instrument to a quicklist.
    CreateTicker {
        /// Client request number.
        #[serde(rename = "ReqID")]
        req_id: u64,
        /// Target quicklist.
        #[serde(rename = "QuicklistUUID")]
        quicklist: String,
        /// Owner of the target quicklist.
        #[serde(rename = "OwnerUUID")]
        owner: String,
        /// Instrument fields.
        #[serde(rename = "Object")]
        object: TickerObject,
    },
    /// Remove an instrument.
    DeleteTicker {
        /// Client request number.
        #[serde(rename = "ReqID")]
        req_id: u64,
        /// Owner of the ticker.
        #[serde(rename = "OwnerUUID")]
        owner: String,
        /// Ticker to delete.
        #[serde(rename = "TickerUUID")]
        ticker: String,
    },
}

impl Request {
    /// Client request number carried by this request.
    pub fn req_id(&self) -> u64 {
        match self {
            Request::SubscribeStream { req_id }
            | Request::GetOwners { req_id }
            | Request::GetBulkTickers { req_id }
            | Request::GetBulkQuicklists { req_id }
            | Request::GetQuicklists { req_id, .. }
            | Request::GetTickers { req_id, .. }
            | Request::CreateTicker { req_id, .. }
            | Request::DeleteTicker { req_id, .. } => *req_id,
        }
    }

    /// Serializes the request into the exact frame body sent on the wire.
    pub fn to_body(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
