use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    ValidationFailed(String),

    #[error("User already exists: {0}")]
    DuplicateUser(String),

    #[error("A movie with the same title already exists: '{title}' ({year})")]
    DuplicateTitle { title: String, year: i32 },

    #[error("A movie with fingerprint {0} already exists")]
    DuplicateFingerprint(String),

    #[error("Rating must be between 1 and 5")]
    RatingOutOfRange,

    #[error("User not found")]
    UserNotFound,

    #[error("Wrong password")]
    BadSecret,

    #[error("Movie not found: {0}")]
    MovieNotFound(u64),

    #[error("Database error: {0}")]
    Store(#[from] sled::Error),

    #[error("Encoding error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("Hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

impl ServiceError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        ServiceError::ValidationFailed(message.into())
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
