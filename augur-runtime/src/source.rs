use tokio::sync::mpsc;

use augur_core::traits::OutcomeSource;
use augur_core::Outcome;

/// Outcome feed backed by an mpsc channel. Ends when every sender is dropped.
#[derive(Debug)]
pub struct ChannelSource(mpsc::Receiver<Outcome>);

impl ChannelSource {
    pub fn new(receiver: mpsc::Receiver<Outcome>) -> Self {
        Self(receiver)
    }

    /// A source and the sender an adapter pushes outcomes into.
    pub fn channel(capacity: usize) -> (mpsc::Sender<Outcome>, Self) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (sender, Self(receiver))
    }
}

impl OutcomeSource for ChannelSource {
    async fn next(&mut self) -> Option<Outcome> {
        self.0.recv().await
    }
}
