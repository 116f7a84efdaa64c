//! Single consumer of inbound frames.
//!
//! Every replica write and every resync decision happens on this task, one
//! frame at a time, so the store needs no locking and each frame's changes are
//! committed before the next frame is looked at.
use std::sync::Arc;

use crossbeam_channel::{Receiver, select};
use log::{debug, error, info, trace, warn};
use quicklist_common::event::Envelope;
use quicklist_common::model::ServerStatus;
use quicklist_common::{Event, QuicklistError, Result};
use serde_json::Value;

use crate::mutation::Sequenced;
use crate::reconcile::reconcile;
use crate::resync::{self, Gate};
use crate::store::ReplicaStore;
use crate::tracker::RequestTracker;

/// Classifies inbound frames and applies them to the replica.
pub struct EventProcessor<S> {
    store: S,
    tracker: Arc<RequestTracker>,
    host: String,
}

impl<S: ReplicaStore> EventProcessor<S> {
    /// Creates a processor writing to `store`; liveness is recorded under `host`.
    pub fn new(store: S, tracker: Arc<RequestTracker>, host: &str) -> Self {
        Self {
            store,
            tracker,
            host: host.to_string(),
        }
    }

    /// Read access to the replica.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Processes frames until `inbound` closes or `shutdown` fires.
    ///
    /// A frame that fails is logged and dropped; the next resync repairs
    /// whatever it would have changed.
    pub fn run(mut self, inbound: Receiver<String>, shutdown: Receiver<()>) {
        info!("Event processor running");
        loop {
            select! {
                recv(shutdown) -> _ => break,
                recv(inbound) -> frame => match frame {
                    Ok(frame) => {
                        if let Err(e) = self.process_frame(&frame) {
                            report(&e, &frame);
                        }
                    }
                    Err(_) => {
                        debug!("Inbound queue closed");
                        break;
                    }
                },
            }
        }
        info!("Event processor stopping...");
    }

    /// Classifies and applies one frame.
    pub fn process_frame(&mut self, frame: &str) -> Result<()> {
        let text = frame.trim();
        if text.is_empty() {
            return Ok(());
        }
        if let Ok(status) = text.parse::<ServerStatus>() {
            debug!("Server {} is {}", self.host, status);
            return self.store.set_server_status(&self.host, status);
        }
        self.process_envelope(Envelope::parse(text)?, None)
    }

    fn process_envelope(&mut self, envelope: Envelope, position: Option<usize>) -> Result<()> {
        if let Some(hash) = &envelope.origin_hash {
            self.tracker.on_ack(hash)?;
        }

        match envelope.into_event()? {
            Event::GetTickers { tickers } | Event::GetBulkTickers { tickers } => {
                let outcome = reconcile(&mut self.store, &tickers)?;
                info!(
                    "Tickers reconciled: {} upserted, {} deleted",
                    outcome.upserted, outcome.deleted
                );
            }
            Event::GetQuicklists { quicklists } | Event::GetBulkQuicklists { quicklists } => {
                let outcome = reconcile(&mut self.store, &quicklists)?;
                info!(
                    "Quicklists reconciled: {} upserted, {} deleted",
                    outcome.upserted, outcome.deleted
                );
            }
            Event::GetOwners { owners } => {
                for owner in owners {
                    if self.store.insert_owner_if_absent(&owner.owner_uuid)? {
                        debug!("New owner {}", owner.owner_uuid);
                    }
                }
            }
            Event::CreateTicker(event) => self.mutate(event.into(), position)?,
            Event::DeleteTicker(event) => self.mutate(event.into(), position)?,
            Event::CreateQuicklist(event) => {
                self.mutate(Sequenced::quicklist_created(event), position)?
            }
            Event::UpdateQuicklist(event) => {
                self.mutate(Sequenced::quicklist_updated(event), position)?
            }
            Event::DeleteQuicklist(event) => self.mutate(event.into(), position)?,
            Event::ReplayLog { events } => self.replay(events),
            Event::Unknown => trace!("Ignoring unknown event"),
        }
        Ok(())
    }

    /// Applies replayed sub-events in order, tagging each with its position.
    fn replay(&mut self, events: Vec<Value>) {
        debug!("Replaying {} events", events.len());
        for (position, value) in events.into_iter().enumerate() {
            let outcome = Envelope::from_value(value)
                .and_then(|envelope| self.process_envelope(envelope, Some(position)));
            if let Err(e) = outcome {
                warn!("Dropping replayed event {}: {}", position, e);
            }
        }
    }

    fn mutate(&mut self, event: Sequenced, position: Option<usize>) -> Result<()> {
        let Sequenced {
            broadcast,
            mutation,
            quicklist,
        } = event;

        if !broadcast.succeeded() {
            debug!(
                "Server rejected {:?} (errors {:?}); not applied",
                mutation, broadcast.errors
            );
            return Ok(());
        }

        match resync::evaluate(&self.store, &broadcast, position)? {
            Gate::Resync => {
                info!(
                    "Sequence gap for owner {} at SeqID {}",
                    broadcast.owner, broadcast.seq_id
                );
                resync::request(&self.tracker, &broadcast.owner, quicklist.as_deref())
            }
            Gate::Apply => self.store.atomically(|store| {
                mutation.apply(store)?;
                store.advance_cursor(&broadcast.owner, broadcast.seq_id)
            }),
        }
    }
}

fn report(err: &QuicklistError, frame: &str) {
    match err {
        QuicklistError::SerdeJson(_) | QuicklistError::Format(_) => {
            warn!("Dropping malformed frame ({}): {}", err, frame)
        }
        _ => error!("Failed to process frame ({}): {}", err, frame),
    }
}

#[cfg(test)]
#[path = "processor_tests.rs"]
mod tests;
