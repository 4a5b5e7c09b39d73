use std::{fmt, io};

/// Crate-wide `Result` type using [`EsdumpError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, EsdumpError>;

/// Top-level error type for esdump operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum EsdumpError {
    /// Remote store errors (connection, query, unexpected responses).
    Store(StoreError),

    /// Restore-specific errors (missing paths, empty or malformed dumps).
    Restore(RestoreError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),

    /// JSON serialization/deserialization errors.
    Json(serde_json::Error),

    /// HTTP transport errors.
    Http(reqwest::Error),

    /// Chunk archive errors.
    Archive(zip::result::ZipError),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Remote-store-specific errors.
#[derive(Debug)]
pub enum StoreError {
    /// The request could not be sent or the transport failed mid-flight.
    RequestFailed(String),

    /// The store answered with a non-success status.
    UnexpectedStatus { status: u16, reason: String },

    /// The store answered with a body this client cannot interpret.
    InvalidResponse(String),
}

/// Restore-specific errors.
#[derive(Debug)]
pub enum RestoreError {
    /// Dump directory or its data subdirectory does not exist.
    MissingPath(String),

    /// Data directory exists but contains zero chunk archives.
    NoData(String),

    /// A chunk archive's payload is not a valid document array.
    MalformedChunk { archive: String, reason: String },
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Missing required field.
    MissingField(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for EsdumpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EsdumpError::Store(e) => write!(f, "Store error: {e}"),
            EsdumpError::Restore(e) => write!(f, "Restore error: {e}"),
            EsdumpError::Config(e) => write!(f, "Configuration error: {e}"),
            EsdumpError::Io(e) => write!(f, "I/O error: {e}"),
            EsdumpError::Json(e) => write!(f, "JSON error: {e}"),
            EsdumpError::Http(e) => write!(f, "HTTP error: {e}"),
            EsdumpError::Archive(e) => write!(f, "Archive error: {e}"),
            EsdumpError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::RequestFailed(msg) => write!(f, "Request failed: {msg}"),
            StoreError::UnexpectedStatus { status, reason } => {
                write!(f, "Unexpected status {status}: {reason}")
            }
            StoreError::InvalidResponse(msg) => write!(f, "Invalid response: {msg}"),
        }
    }
}

impl fmt::Display for RestoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestoreError::MissingPath(path) => write!(f, "Not existing path: {path}"),
            RestoreError::NoData(path) => write!(f, "No chunk archives in {path}"),
            RestoreError::MalformedChunk { archive, reason } => {
                write!(f, "Malformed chunk {archive}: {reason}")
            }
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::MissingField(field) => write!(f, "Missing required field: {field}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl std::error::Error for EsdumpError {}
impl std::error::Error for StoreError {}
impl std::error::Error for RestoreError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to EsdumpError ========================= */

impl From<io::Error> for EsdumpError {
    fn from(err: io::Error) -> Self {
        EsdumpError::Io(err)
    }
}

impl From<serde_json::Error> for EsdumpError {
    fn from(err: serde_json::Error) -> Self {
        EsdumpError::Json(err)
    }
}

impl From<reqwest::Error> for EsdumpError {
    fn from(err: reqwest::Error) -> Self {
        EsdumpError::Http(err)
    }
}

impl From<zip::result::ZipError> for EsdumpError {
    fn from(err: zip::result::ZipError) -> Self {
        EsdumpError::Archive(err)
    }
}

impl From<StoreError> for EsdumpError {
    fn from(err: StoreError) -> Self {
        EsdumpError::Store(err)
    }
}

impl From<RestoreError> for EsdumpError {
    fn from(err: RestoreError) -> Self {
        EsdumpError::Restore(err)
    }
}

impl From<ConfigError> for EsdumpError {
    fn from(err: ConfigError) -> Self {
        EsdumpError::Config(err)
    }
}

impl From<String> for EsdumpError {
    fn from(msg: String) -> Self {
        EsdumpError::Generic(msg)
    }
}

impl From<&str> for EsdumpError {
    fn from(msg: &str) -> Self {
        EsdumpError::Generic(msg.to_owned())
    }
}
