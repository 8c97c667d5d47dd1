use crate::errors::AugurResult;
use crate::models::Signal;

/// Alert boundary. Delivery channel and retries belong to the implementation.
pub trait ISignalSink: Send + Sync {
    fn emit(&self, signal: &Signal) -> AugurResult<()>;
}
