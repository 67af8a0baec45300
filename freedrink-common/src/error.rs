// File: freedrink-common/src/error.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Address parse error: {0}")]
    AddrParse(#[from] std::net::AddrParseError),

    #[error("Missing or malformed field: {0}")]
    Validation(String),

    #[error("Under legal drinking age")]
    Underage,

    #[error("Already claimed today")]
    DuplicateToday,

    #[error("Invalid token")]
    NotFound,

    #[error("Already redeemed")]
    AlreadyRedeemed,

    #[error("Token expired")]
    Expired,

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Random generator failure: {0}")]
    Rng(String),
}

impl From<chrono::format::ParseError> for Error {
    fn from(err: chrono::format::ParseError) -> Self {
        Error::Parse(err.to_string())
    }
}
