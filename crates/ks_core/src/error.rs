use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown city: {0}")]
    UnknownCity(String),

    #[error("Malformed row: {0}")]
    MalformedRow(String),

    #[error("No articles recorded for {city} since {since}, month range is empty")]
    EmptyDateRange { city: String, since: String },

    #[error("Render error: {0}")]
    Render(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
