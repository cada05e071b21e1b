use thiserror::Error;

// Create a type alias for Result using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the tracking core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage operation failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Notification delivery failed: {0}")]
    Notification(#[from] NotificationError),
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Store file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize store state: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Push delivery failed: {0}")]
    Push(String),

    #[error("Email delivery failed: {0}")]
    Email(String),
}
