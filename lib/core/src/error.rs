use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Broad failure class, used for logging and exit reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Data,
    Resource,
    Io,
    Serialization,
}

#[derive(Error, Debug)]
pub enum Error {
    /// Missing or unreadable input, absent required columns, invalid options
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Not enough usable rows or vocabulary to build a similarity table
    #[error("Data error: {0}")]
    Data(String),

    #[error(
        "Resource error: catalog has {items} items, dense similarity is capped at {ceiling}; \
         lower --max-rows"
    )]
    Resource { items: usize, ceiling: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::Data(_) => ErrorKind::Data,
            Error::Resource { .. } => ErrorKind::Resource,
            Error::Io(_) => ErrorKind::Io,
            Error::Serialization(_) => ErrorKind::Serialization,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
