use crate::errors::AugurResult;
use crate::models::PredictionRecord;

/// Durable home for prediction records, keyed by id.
pub trait IPredictionStore: Send + Sync {
    /// Insert or replace the record with the same id.
    fn save(&self, record: &PredictionRecord) -> AugurResult<()>;

    /// Every record still in `Pending` status, oldest first.
    fn load_pending(&self) -> AugurResult<Vec<PredictionRecord>>;

    /// The latest terminal records, newest first.
    fn load_recent(&self, limit: usize) -> AugurResult<Vec<PredictionRecord>>;
}
