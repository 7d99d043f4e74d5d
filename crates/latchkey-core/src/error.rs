use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid token slot {slot}: only {count} slots are configured")]
    InvalidTokenSlot { slot: u8, count: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a configuration error with a custom message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
