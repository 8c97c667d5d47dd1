use std::future::Future;

use crate::outcome::Outcome;

/// Feed of outcomes from the monitored process.
///
/// Implementations deliver each outcome exactly once, in chronological order.
/// `None` means the feed has ended. Reconnection and backoff are the
/// source's own concern.
pub trait OutcomeSource: Send {
    fn next(&mut self) -> impl Future<Output = Option<Outcome>> + Send;
}
