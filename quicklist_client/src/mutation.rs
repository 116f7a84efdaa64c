//! Incremental replica changes carried by broadcast events.
use quicklist_common::Result;
use quicklist_common::event::{
    Broadcast, QuicklistChanged, QuicklistDeleted, TickerCreated, TickerDeleted,
};
use quicklist_common::model::{Quicklist, Ticker};

use crate::store::ReplicaStore;

/// One change to the replica, detached from its wire event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Insert or overwrite a ticker.
    UpsertTicker(Ticker),
    /// Remove a ticker.
    DeleteTicker(String),
    /// Insert a quicklist or rename the stored one.
    UpsertQuicklist(Quicklist),
    /// Rename a quicklist if it is known.
    RenameQuicklist {
        /// Quicklist identifier.
        uuid: String,
        /// New display name.
        name: String,
    },
    /// Remove a quicklist.
    DeleteQuicklist(String),
}

/// A mutation together with its sequencing header and the quicklist it
/// concerns, which scopes the ticker fetch of a resync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequenced {
    /// Owner, sequence number and outcome.
    pub broadcast: Broadcast,
    /// Change to apply.
    pub mutation: Mutation,
    /// Quicklist named by the event, if any.
    pub quicklist: Option<String>,
}

impl From<TickerCreated> for Sequenced {
    fn from(event: TickerCreated) -> Self {
        let TickerCreated {
            broadcast,
            uuid,
            quicklist,
            object,
        } = event;
        Sequenced {
            broadcast,
            mutation: Mutation::UpsertTicker(object.into_ticker(&uuid, &quicklist)),
            quicklist: Some(quicklist),
        }
    }
}

impl From<TickerDeleted> for Sequenced {
    fn from(event: TickerDeleted) -> Self {
        Sequenced {
            broadcast: event.broadcast,
            mutation: Mutation::DeleteTicker(event.uuid),
            quicklist: event.quicklist,
        }
    }
}

impl Sequenced {
    /// `CreateQuicklist`: the list belongs to the broadcasting owner.
    pub fn quicklist_created(event: QuicklistChanged) -> Self {
        let quicklist = Quicklist {
            uuid: event.uuid.clone(),
            owner: event.broadcast.owner.clone(),
            name: event.name,
        };
        Sequenced {
            broadcast: event.broadcast,
            mutation: Mutation::UpsertQuicklist(quicklist),
            quicklist: Some(event.uuid),
        }
    }

    /// `UpdateQuicklist`.
    pub fn quicklist_updated(event: QuicklistChanged) -> Self {
        Sequenced {
            broadcast: event.broadcast,
            mutation: Mutation::RenameQuicklist {
                uuid: event.uuid.clone(),
                name: event.name,
            },
            quicklist: Some(event.uuid),
        }
    }
}

impl From<QuicklistDeleted> for Sequenced {
    fn from(event: QuicklistDeleted) -> Self {
        Sequenced {
            broadcast: event.broadcast,
            mutation: Mutation::DeleteQuicklist(event.uuid.clone()),
            quicklist: Some(event.uuid),
        }
    }
}

impl Mutation {
    /// Writes this change to `store`. Does not touch the owner's cursor.
    pub fn apply<S: ReplicaStore>(&self, store: &mut S) -> Result<()> {
        match self {
            Mutation::UpsertTicker(ticker) => store.upsert_ticker(ticker),
            Mutation::DeleteTicker(uuid) => store.delete_ticker(uuid).map(|_| ()),
            Mutation::UpsertQuicklist(quicklist) => store.upsert_quicklist(quicklist),
            Mutation::RenameQuicklist { uuid, name } => {
                store.rename_quicklist(uuid, name).map(|_| ())
            }
            Mutation::DeleteQuicklist(uuid) => store.delete_quicklist(uuid).map(|_| ()),
        }
    }
}
