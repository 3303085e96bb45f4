use thiserror::Error;

/// Errors that stop the server from starting
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid listen address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        source: std::net::AddrParseError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Errors from the fun fact provider, always recovered with a fallback
#[derive(Error, Debug)]
pub enum FactError {
    #[error("fact request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("fact service answered {status}")]
    Status { status: u16 },
}

pub type Result<T> = std::result::Result<T, ServerError>;
