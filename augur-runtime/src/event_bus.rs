//! In-process pub/sub for pipeline events.
//!
//! The pipeline publishes what each tick produced; the reassessment worker
//! subscribes and turns each event into a reassessment request. Neither side
//! holds a reference to the other.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use augur_core::models::ValidationResult;
use augur_reassessment::ReassessmentRequest;

/// Something a tick or a sweep produced that may warrant reassessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// A pending prediction reached a terminal status.
    Validated(ValidationResult),
    SequenceStarted {
        pattern_id: String,
        at: DateTime<Utc>,
    },
    /// Patterns that were voting before the tick and were pruned by it.
    PatternsBroken {
        pattern_ids: Vec<String>,
        at: DateTime<Utc>,
    },
    PerformanceDropped {
        previous: f64,
        current: f64,
        at: DateTime<Utc>,
    },
}

impl PipelineEvent {
    pub fn reassessment_request(&self) -> ReassessmentRequest {
        match self {
            PipelineEvent::Validated(result) => ReassessmentRequest::validated(result),
            PipelineEvent::SequenceStarted { pattern_id, at } => {
                ReassessmentRequest::new_sequence(pattern_id, *at)
            }
            PipelineEvent::PatternsBroken { pattern_ids, at } => {
                ReassessmentRequest::pattern_broken(pattern_ids, *at)
            }
            PipelineEvent::PerformanceDropped {
                previous,
                current,
                at,
            } => ReassessmentRequest::performance_drop(*previous, *current, *at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventBusError {
    #[error("event bus closed")]
    Closed,
    #[error("receiver lagged behind by {0} events")]
    Lagged(u64),
}

#[derive(Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<PipelineEvent>>,
}

impl EventBus {
    /// `capacity` events are buffered per subscriber before old ones are dropped.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Returns the number of subscribers that received the event.
    pub fn publish(&self, event: PipelineEvent) -> usize {
        let receivers = self.sender.send(event).unwrap_or(0);
        if receivers == 0 {
            debug!("pipeline event published with no subscribers");
        }
        receivers
    }

    pub fn publish_all(&self, events: impl IntoIterator<Item = PipelineEvent>) {
        for event in events {
            self.publish(event);
        }
    }

    pub fn subscribe(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

pub struct EventReceiver {
    receiver: broadcast::Receiver<PipelineEvent>,
}

impl EventReceiver {
    pub async fn recv(&mut self) -> Result<PipelineEvent, EventBusError> {
        self.receiver.recv().await.map_err(|e| match e {
            broadcast::error::RecvError::Closed => EventBusError::Closed,
            broadcast::error::RecvError::Lagged(n) => {
                warn!(skipped = n, "event receiver lagged");
                EventBusError::Lagged(n)
            }
        })
    }

    pub fn try_recv(&mut self) -> Option<Result<PipelineEvent, EventBusError>> {
        match self.receiver.try_recv() {
            Ok(event) => Some(Ok(event)),
            Err(broadcast::error::TryRecvError::Empty) => None,
            Err(broadcast::error::TryRecvError::Closed) => Some(Err(EventBusError::Closed)),
            Err(broadcast::error::TryRecvError::Lagged(n)) => Some(Err(EventBusError::Lagged(n))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use augur_core::models::ReassessmentTrigger;

    #[test]
    fn every_subscriber_sees_the_event() {
        let bus = EventBus::new(8);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();
        let at = Utc::now();
        let delivered = bus.publish(PipelineEvent::SequenceStarted {
            pattern_id: "seq-1".into(),
            at,
        });
        assert_eq!(delivered, 2);

        for receiver in [&mut first, &mut second] {
            let event = receiver.try_recv().unwrap().unwrap();
            assert_eq!(
                event.reassessment_request().trigger,
                ReassessmentTrigger::NewSequenceStarted
            );
        }
        assert!(first.try_recv().is_none());
    }

    #[test]
    fn slow_subscriber_reports_lag() {
        let bus = EventBus::new(2);
        let mut receiver = bus.subscribe();
        let at = Utc::now();
        for i in 0..4 {
            bus.publish(PipelineEvent::PerformanceDropped {
                previous: 0.8,
                current: 0.1 * f64::from(i),
                at,
            });
        }
        assert_eq!(receiver.try_recv(), Some(Err(EventBusError::Lagged(2))));
    }
}
