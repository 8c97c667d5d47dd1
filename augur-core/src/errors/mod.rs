mod augur_error;
mod storage_error;

pub use augur_error::{AugurError, AugurResult};
pub use storage_error::StorageError;
