//! Outbound side of the connection.
//!
//! `OutboundSender` owns the write half and is the only writer, so frames
//! queued by different tasks reach the wire whole and in queue order. The
//! keepalive loop probes server liveness with an untracked `STATUS` frame.
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, select, tick};
use log::{debug, error, info};
use quicklist_common::Result;
use quicklist_common::net::STATUS_PROBE;

use crate::tracker::RequestTracker;
use crate::transport::FrameWriter;

/// Single writer draining the outbound queue.
pub struct OutboundSender<W> {
    writer: FrameWriter<W>,
}

impl<W: Write> OutboundSender<W> {
    /// Wraps the write half of the connection.
    pub fn new(writer: W) -> Self {
        Self {
            writer: FrameWriter::new(writer),
        }
    }

    /// Writes queued frames in order until `shutdown` fires, every producer is
    /// gone, or a write fails.
    pub fn run(mut self, outbound: Receiver<String>, shutdown: Receiver<()>) -> Result<()> {
        info!("Outbound dispatcher running");
        loop {
            select! {
                recv(shutdown) -> _ => break,
                recv(outbound) -> frame => match frame {
                    Ok(frame) => {
                        if let Err(e) = self.writer.write_frame(&frame) {
                            error!("Failed to write frame: {}", e);
                            return Err(e);
                        }
                    }
                    Err(_) => {
                        debug!("Outbound queue closed");
                        break;
                    }
                },
            }
        }
        info!("Outbound dispatcher stopping...");
        Ok(())
    }
}

/// Enqueues a liveness probe now and then once per `interval` until `shutdown` fires.
pub fn run_keepalive(tracker: Arc<RequestTracker>, interval: Duration, shutdown: Receiver<()>) {
    info!("Keepalive running every {:?}", interval);
    let ticker = tick(interval);
    loop {
        if let Err(e) = tracker.send_request(STATUS_PROBE.to_string(), None) {
            error!("Keepalive failed to enqueue probe: {}", e);
            break;
        }
        debug!("STATUS probe queued");
        select! {
            recv(shutdown) -> _ => break,
            recv(ticker) -> _ => {}
        }
    }
    info!("Keepalive stopping...");
}

#[cfg(test)]
#[path = "sender_tests.rs"]
mod tests;
