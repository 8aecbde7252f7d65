//! Diagnostic sinks for trapped errors.

use crate::error::{BootstrapError, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// A logged runtime error: `"<page path> @ <url>:<line> <message>"`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub page_path: String,
    pub url: String,
    pub line: u32,
    pub message: String,
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {}:{} {}",
            self.page_path, self.url, self.line, self.message
        )
    }
}

/// Destination for error records. Failures are reported, never panicked;
/// the trap discards them.
pub trait DiagnosticSink: Send + Sync {
    fn log(&self, record: &ErrorRecord) -> Result<()>;
}

/// Emits records as `tracing` warnings.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn log(&self, record: &ErrorRecord) -> Result<()> {
        warn!(
            page = %record.page_path,
            url = %record.url,
            line = record.line,
            error = %record.message,
            "uncaught error: {}",
            record
        );
        Ok(())
    }
}

/// Forwards records over a bounded channel.
///
/// A full or disconnected channel is a sink failure; the record is lost.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    sender: Sender<ErrorRecord>,
}

impl ChannelSink {
    /// Create a sink holding at most `capacity` undelivered records.
    ///
    /// A capacity of 0 is raised to 1, so the sink always buffers.
    pub fn new(capacity: usize) -> (Self, RecordReceiver) {
        let (sender, receiver) = bounded(capacity.max(1));
        (Self { sender }, RecordReceiver { receiver })
    }
}

impl DiagnosticSink for ChannelSink {
    fn log(&self, record: &ErrorRecord) -> Result<()> {
        self.sender.try_send(record.clone()).map_err(|e| match e {
            crossbeam_channel::TrySendError::Full(_) => {
                BootstrapError::Sink("channel full".to_string())
            }
            crossbeam_channel::TrySendError::Disconnected(_) => {
                BootstrapError::Sink("channel disconnected".to_string())
            }
        })
    }
}

/// Receiving side of a [`ChannelSink`].
pub struct RecordReceiver {
    pub receiver: Receiver<ErrorRecord>,
}

impl RecordReceiver {
    /// Receive the next record (blocking).
    pub fn recv(&self) -> std::result::Result<ErrorRecord, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a record (non-blocking).
    pub fn try_recv(&self) -> std::result::Result<ErrorRecord, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> std::result::Result<ErrorRecord, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}
