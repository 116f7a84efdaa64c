//! Duplex connection to the quicklist server and newline framing.
//!
//! Both directions carry UTF-8 text frames terminated by `\n`. The reader scans
//! a growing buffer for the terminator and only hands out complete frames, so a
//! frame split across several socket reads is reassembled intact. The lookahead
//! is bounded: a peer that never sends a terminator fails the connection
//! instead of exhausting memory.
use std::io::{self, ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream};
#[cfg(unix)]
use std::os::unix::net::UnixStream;

use crossbeam_channel::Sender;
use log::{debug, info, warn};
use quicklist_common::net::{Endpoint, FRAME_TERMINATOR};
use quicklist_common::{QuicklistError, Result};

/// Bytes requested from the socket per read.
const READ_CHUNK: usize = 8 * 1024;

/// Stream connection to the server.
#[derive(Debug)]
pub enum Connection {
    /// TCP stream.
    Tcp(TcpStream),
    /// Unix-domain stream.
    #[cfg(unix)]
    Unix(UnixStream),
}

impl Connection {
    /// Opens a connection to `endpoint`.
    pub fn connect(endpoint: &Endpoint) -> Result<Self> {
        match endpoint {
            Endpoint::Tcp(addr) => Ok(Connection::Tcp(TcpStream::connect(addr)?)),
            #[cfg(unix)]
            Endpoint::Unix(path) => Ok(Connection::Unix(UnixStream::connect(path)?)),
            #[cfg(not(unix))]
            Endpoint::Unix(path) => Err(QuicklistError::InvalidEndpoint(format!(
                "unix sockets are not supported on this platform: {}",
                path.display()
            ))),
        }
    }

    /// Returns an independent handle to the same stream.
    pub fn try_clone(&self) -> Result<Self> {
        match self {
            Connection::Tcp(stream) => Ok(Connection::Tcp(stream.try_clone()?)),
            #[cfg(unix)]
            Connection::Unix(stream) => Ok(Connection::Unix(stream.try_clone()?)),
        }
    }

    /// Shuts both directions down, waking any thread blocked in a read.
    pub fn shutdown(&self) -> Result<()> {
        let result = match self {
            Connection::Tcp(stream) => stream.shutdown(Shutdown::Both),
            #[cfg(unix)]
            Connection::Unix(stream) => stream.shutdown(Shutdown::Both),
        };
        match result {
            Err(e) if e.kind() == ErrorKind::NotConnected => Ok(()),
            other => Ok(other?),
        }
    }
}

impl Read for Connection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Connection::Tcp(stream) => stream.read(buf),
            #[cfg(unix)]
            Connection::Unix(stream) => stream.read(buf),
        }
    }
}

impl Write for Connection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Connection::Tcp(stream) => stream.write(buf),
            #[cfg(unix)]
            Connection::Unix(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Connection::Tcp(stream) => stream.flush(),
            #[cfg(unix)]
            Connection::Unix(stream) => stream.flush(),
        }
    }
}

/// Splits an inbound byte stream into text frames.
pub struct FrameReader<R> {
    reader: R,
    buf: Vec<u8>,
    chunk: Vec<u8>,
    /// Prefix of `buf` already known to hold no terminator.
    scanned: usize,
    max_frame_bytes: usize,
}

impl<R: Read> FrameReader<R> {
    /// Wraps `reader`, failing any frame longer than `max_frame_bytes`.
    pub fn new(reader: R, max_frame_bytes: usize) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            chunk: vec![0u8; READ_CHUNK],
            scanned: 0,
            max_frame_bytes,
        }
    }

    /// Reads the next frame without its terminator.
    ///
    /// Returns `Ok(None)` when the peer closes the stream between frames. A
    /// frame that is not UTF-8 is consumed before its error is returned.
    pub fn read_frame(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(offset) = self.buf[self.scanned..]
                .iter()
                .position(|b| *b == FRAME_TERMINATOR)
            {
                let end = self.scanned + offset;
                if end > self.max_frame_bytes {
                    return Err(self.too_large(end));
                }
                let mut frame: Vec<u8> = self.buf.drain(..=end).collect();
                frame.pop();
                self.scanned = 0;
                return Ok(Some(String::from_utf8(frame)?));
            }

            self.scanned = self.buf.len();
            if self.buf.len() > self.max_frame_bytes {
                return Err(self.too_large(self.buf.len()));
            }

            let n = match self.reader.read(&mut self.chunk) {
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if n == 0 {
                if self.buf.is_empty() {
                    return Ok(None);
                }
                return Err(io::Error::new(
                    ErrorKind::UnexpectedEof,
                    format!("connection closed inside a {} byte frame", self.buf.len()),
                )
                .into());
            }
            self.buf.extend_from_slice(&self.chunk[..n]);
        }
    }

    /// Forwards frames to `inbound` until the peer hangs up or the receiver is gone.
    pub fn forward_to(mut self, inbound: Sender<String>) -> Result<()> {
        info!("Inbound reader running");
        loop {
            let frame = match self.read_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(QuicklistError::Utf8(e)) => {
                    warn!("Dropping frame that is not UTF-8: {}", e);
                    continue;
                }
                Err(e) => return Err(e),
            };
            if inbound.send(frame).is_err() {
                debug!("Inbound queue closed");
                break;
            }
        }
        info!("Inbound reader stopping...");
        Ok(())
    }

    fn too_large(&self, got_bytes: usize) -> QuicklistError {
        QuicklistError::FrameTooLarge {
            max_frame_bytes: self.max_frame_bytes,
            got_bytes,
        }
    }
}

/// Writes terminated text frames.
pub struct FrameWriter<W> {
    writer: W,
}

impl<W: Write> FrameWriter<W> {
    /// Wraps `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes `payload` followed by the terminator as one frame.
    pub fn write_frame(&mut self, payload: &str) -> Result<()> {
        let mut bytes = Vec::with_capacity(payload.len() + 1);
        bytes.extend_from_slice(payload.as_bytes());
        bytes.push(FRAME_TERMINATOR);
        self.writer.write_all(&bytes)?;
        self.writer.flush()?;
        debug!("Sent frame: {}", payload);
        Ok(())
    }

    /// Consumes the writer, returning the inner stream.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
