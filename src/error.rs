use thiserror::Error;

pub type Result<T> = std::result::Result<T, BoardError>;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Invalid move of task {task} from lane {lane} at index {index}: {reason}")]
    InvalidMove {
        task: String,
        lane: String,
        index: usize,
        reason: String,
    },

    #[error("Index {index} out of range for lane {lane} (length {len})")]
    IndexOutOfRange {
        lane: String,
        index: usize,
        len: usize,
    },

    #[error("Lane not found: {0}")]
    LaneNotFound(String),

    #[error("Task already on the board: {0}")]
    DuplicateTask(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Invalid task ID: {0:?}")]
    InvalidTaskId(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Persistence error: {0}")]
    PersistenceError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BoardError {
    /// Whether re-running `rebuild` against a fresh snapshot is the way out
    pub fn is_recoverable_by_refresh(&self) -> bool {
        matches!(
            self,
            Self::InvalidMove { .. }
                | Self::PersistenceError(_)
                | Self::StorageError(_)
                | Self::IoError(_)
        )
    }
}
