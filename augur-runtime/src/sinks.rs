//! Stock alert sinks. Delivery channels beyond these are the caller's concern.

use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::info;

use augur_core::errors::{AugurError, AugurResult};
use augur_core::models::Signal;
use augur_core::traits::ISignalSink;

/// Logs every signal at `info`.
#[derive(Debug, Default)]
pub struct TracingSink;

impl ISignalSink for TracingSink {
    fn emit(&self, signal: &Signal) -> AugurResult<()> {
        info!(
            prediction_id = %signal.prediction_id,
            category = %signal.category,
            confidence = signal.confidence,
            pattern_id = %signal.pattern_id,
            reasoning = %signal.reasoning,
            "signal"
        );
        Ok(())
    }
}

/// Forwards signals to a bounded channel without blocking the pipeline.
/// A full or closed channel is reported as a delivery failure.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: mpsc::Sender<Signal>,
}

impl ChannelSink {
    pub fn new(sender: mpsc::Sender<Signal>) -> Self {
        Self { sender }
    }

    /// A sink and the receiving end of its channel.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Signal>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self::new(sender), receiver)
    }
}

impl ISignalSink for ChannelSink {
    fn emit(&self, signal: &Signal) -> AugurResult<()> {
        self.sender
            .try_send(signal.clone())
            .map_err(|e| AugurError::DegradedMode {
                component: "signal_channel".to_string(),
                fallback: format!("signal dropped: {e}"),
            })
    }
}

/// Keeps every emitted signal in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    signals: Mutex<Vec<Signal>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signals(&self) -> Vec<Signal> {
        self.signals
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.signals.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ISignalSink for RecordingSink {
    fn emit(&self, signal: &Signal) -> AugurResult<()> {
        let mut signals = self.signals.lock().map_err(|_| AugurError::DegradedMode {
            component: "recording_sink".to_string(),
            fallback: "none".to_string(),
        })?;
        signals.push(signal.clone());
        Ok(())
    }
}
