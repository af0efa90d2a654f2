#[derive(Debug, thiserror::Error)]
pub enum GoalError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("goal not found: {0}")]
    NotFound(String),
    #[error("goal owner does not match the authenticated user")]
    OwnershipMismatch,
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to write goal file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read goal file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to delete goal directory: {0}")]
    FileDelete(std::io::Error),
    #[error("failed to serialize goal: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize goal: {0}")]
    Deserialization(serde_json::Error),
    #[error("storage task failed: {0}")]
    BlockingTask(#[from] tokio::task::JoinError),
}

pub type GoalResult<T> = std::result::Result<T, GoalError>;
