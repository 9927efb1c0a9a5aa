use thiserror::Error;

use crate::domain::{InstanceId, InstanceStatus};
use crate::ports::StoreError;

#[derive(Debug, Error)]
pub enum AlmanacError {
    #[error("instance not found: id={0}")]
    NotFound(InstanceId),

    #[error("instance id={id} is already {status}")]
    InvalidTransition { id: InstanceId, status: InstanceStatus },

    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),

    #[error("document under key={key} is corrupt: {reason}")]
    CorruptDocument { key: String, reason: String },
}
