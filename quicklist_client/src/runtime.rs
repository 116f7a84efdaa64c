//! Wiring of the four long-lived tasks and their shutdown.
//!
//! ```text
//! reader ──inbound──▶ processor ──┐
//!                                 ├─▶ tracker ──outbound──▶ dispatcher
//! keepalive ──────────────────────┘
//! ```
//!
//! Cancellation is broadcast by dropping the only sender of the shutdown
//! channel: every `select!` on it wakes with a disconnect. The reader blocks in
//! the socket instead, so the connection is shut down to wake it. Shutdown
//! starts on an external signal or as soon as any task ends on its own.
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded, select, unbounded};
use log::{error, info, warn};
use quicklist_common::{Request, Result};

use crate::config::ClientConfig;
use crate::intents::{IntentSession, WriteIntent};
use crate::processor::EventProcessor;
use crate::sender::{OutboundSender, run_keepalive};
use crate::store::{ReplicaStore, SqliteStore};
use crate::tracker::RequestTracker;
use crate::transport::{Connection, FrameReader};

const READER: &str = "reader";

struct Task {
    name: &'static str,
    handle: JoinHandle<Result<()>>,
}

/// Spawned tasks, each reporting its name on `done` when it returns.
struct Tasks {
    tasks: Vec<Task>,
    done: Sender<&'static str>,
}

impl Tasks {
    fn new(done: Sender<&'static str>) -> Self {
        Self {
            tasks: Vec::new(),
            done,
        }
    }

    fn spawn<F>(&mut self, name: &'static str, task: F) -> Result<()>
    where
        F: FnOnce() -> Result<()> + Send + 'static,
    {
        let done = self.done.clone();
        let handle = thread::Builder::new()
            .name(format!("quicklist-{}", name))
            .spawn(move || {
                let outcome = task();
                let _ = done.send(name);
                outcome
            })?;
        self.tasks.push(Task { name, handle });
        Ok(())
    }

    /// Waits up to the grace period for every task, joins the finished ones
    /// and returns the reader's failure, if any.
    fn join(
        self,
        done: &Receiver<&'static str>,
        already_done: Option<&'static str>,
        config: &ClientConfig,
    ) -> Result<()> {
        let deadline = Instant::now() + config.grace;
        let mut finished: Vec<&'static str> = already_done.into_iter().collect();
        while finished.len() < self.tasks.len() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match done.recv_timeout(remaining) {
                Ok(name) => finished.push(name),
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        let mut outcome = Ok(());
        for task in self.tasks {
            if !finished.contains(&task.name) {
                warn!("Task {} did not stop within {:?}; detaching", task.name, config.grace);
                continue;
            }
            match task.handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    error!("Task {} failed: {}", task.name, e);
                    if task.name == READER {
                        outcome = Err(e);
                    }
                }
                Err(_) => error!("Task {} panicked", task.name),
            }
        }
        outcome
    }
}

/// Opens the replica, connects and replicates until `signal` fires or the
/// connection ends. A failed connect is returned immediately.
pub fn run(config: &ClientConfig, signal: Receiver<()>) -> Result<()> {
    let store = SqliteStore::open(&config.db_path)?;
    info!("Connecting to {}", config.endpoint);
    let connection = Connection::connect(&config.endpoint)?;
    info!("Connected to {}", config.endpoint);
    run_with(connection, store, config, signal)
}

/// Replicates over an established `connection` into `store`.
///
/// A message on `signal`, or dropping its sender, starts the shutdown.
pub fn run_with<S>(
    connection: Connection,
    store: S,
    config: &ClientConfig,
    signal: Receiver<()>,
) -> Result<()>
where
    S: ReplicaStore + Send + 'static,
{
    let (outbound_tx, outbound_rx) = unbounded::<String>();
    let (inbound_tx, inbound_rx) = unbounded::<String>();
    let (shutdown_tx, shutdown_rx) = bounded::<()>(0);
    let (done_tx, done_rx) = unbounded::<&'static str>();
    let tracker = Arc::new(RequestTracker::new(outbound_tx));

    // Nothing else is queued before the subscription.
    tracker.submit(|req_id| Request::SubscribeStream { req_id })?;
    if config.bootstrap {
        let mut session = IntentSession::new(Arc::clone(&tracker));
        for intent in [
            WriteIntent::RefreshOwners,
            WriteIntent::RefreshQuicklists,
            WriteIntent::RefreshTickers,
        ] {
            session.submit(intent)?;
        }
    }

    let mut tasks = Tasks::new(done_tx);

    let reader = FrameReader::new(connection.try_clone()?, config.max_frame_bytes);
    tasks.spawn(READER, move || reader.forward_to(inbound_tx))?;

    let dispatcher = OutboundSender::new(connection.try_clone()?);
    let shutdown = shutdown_rx.clone();
    tasks.spawn("dispatcher", move || dispatcher.run(outbound_rx, shutdown))?;

    let processor = EventProcessor::new(store, Arc::clone(&tracker), &config.host);
    let shutdown = shutdown_rx.clone();
    tasks.spawn("processor", move || {
        processor.run(inbound_rx, shutdown);
        Ok(())
    })?;

    let keepalive_tracker = Arc::clone(&tracker);
    let interval = config.keepalive;
    let shutdown = shutdown_rx;
    tasks.spawn("keepalive", move || {
        run_keepalive(keepalive_tracker, interval, shutdown);
        Ok(())
    })?;

    info!("Client is running. Press Ctrl+C to exit.");
    let first_done = select! {
        recv(signal) -> _ => {
            info!("Shutdown requested");
            None
        }
        recv(done_rx) -> name => {
            let name = name.ok();
            info!("Task {} ended; shutting down", name.unwrap_or("?"));
            name
        }
    };

    drop(shutdown_tx);
    if let Err(e) = connection.shutdown() {
        warn!("Failed to shut the connection down: {}", e);
    }
    tasks.join(&done_rx, first_done, config)
}

#[cfg(all(test, unix))]
#[path = "runtime_tests.rs"]
mod tests;
