//! Custom error types for the backup keeper
//!
//! Provides structured error handling with context for the different failure
//! scenarios a retention run can hit.

use std::fmt;

/// Main error type for the keeper
#[derive(Debug)]
pub enum KeeperError {
    /// Configuration-related errors
    Config(ConfigError),

    /// Storage backend errors
    Store(StoreError),

    /// Store name not present in the registry
    UnknownStore { store: String },

    /// Finalize event could not be mapped to a scope
    InvalidEvent { reason: String },

    /// Request parameters rejected before touching the store
    InvalidRequest { reason: String },
}

/// Configuration error variants
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to load configuration file
    LoadFailed { path: String, reason: String },

    /// Invalid configuration value
    InvalidValue { field: String, reason: String },

    /// Missing required configuration
    MissingRequired { field: String },

    /// Configuration parsing error
    ParseError { reason: String },
}

/// Storage backend error variants
#[derive(Debug)]
pub enum StoreError {
    /// Backend could not be reached or answered with a server error
    Unavailable { backend: String, reason: String },

    /// Credentials rejected or filesystem permissions insufficient
    PermissionDenied { backend: String, target: String },

    /// Target artifact or scope does not exist
    NotFound { target: String },

    /// Artifact name or scope is not acceptable for this backend
    InvalidName { name: String, reason: String },

    /// Backend returned something we could not interpret
    Backend { backend: String, reason: String },
}

impl StoreError {
    /// Whether redelivering the triggering event may succeed later.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable { .. })
    }
}

impl KeeperError {
    /// Transient failures are handed back to the delivery mechanism for redelivery.
    pub fn is_transient(&self) -> bool {
        match self {
            KeeperError::Store(e) => e.is_transient(),
            _ => false,
        }
    }
}

impl fmt::Display for KeeperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeeperError::Config(e) => write!(f, "Configuration error: {}", e),
            KeeperError::Store(e) => write!(f, "Store error: {}", e),
            KeeperError::UnknownStore { store } => write!(f, "Store '{}' is not configured", store),
            KeeperError::InvalidEvent { reason } => write!(f, "Invalid finalize event: {}", reason),
            KeeperError::InvalidRequest { reason } => write!(f, "Invalid request: {}", reason),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::LoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path, reason)
            }
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
            ConfigError::MissingRequired { field } => {
                write!(f, "Missing required field: {}", field)
            }
            ConfigError::ParseError { reason } => {
                write!(f, "Failed to parse config: {}", reason)
            }
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable { backend, reason } => {
                write!(f, "{} backend unavailable: {}", backend, reason)
            }
            StoreError::PermissionDenied { backend, target } => {
                write!(f, "{} backend denied access to '{}'", backend, target)
            }
            StoreError::NotFound { target } => {
                write!(f, "'{}' not found", target)
            }
            StoreError::InvalidName { name, reason } => {
                write!(f, "Invalid artifact name '{}': {}", name, reason)
            }
            StoreError::Backend { backend, reason } => {
                write!(f, "{} backend error: {}", backend, reason)
            }
        }
    }
}

impl std::error::Error for KeeperError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for StoreError {}

impl From<ConfigError> for KeeperError {
    fn from(err: ConfigError) -> Self {
        KeeperError::Config(err)
    }
}

impl From<StoreError> for KeeperError {
    fn from(err: StoreError) -> Self {
        KeeperError::Store(err)
    }
}
