//! Central repository for limits, timeouts and default values
//!
//! Organised by category so the retention policy and transport settings have
//! a single source of truth.

use std::time::Duration;

/// Retention policy constants
pub mod retention {
    /// Default maximum number of artifacts kept per scope
    pub const DEFAULT_MAX_COUNT: usize = 50;

    /// Minimum accepted limit; a limit of zero would evict every upload
    pub const MIN_MAX_COUNT: usize = 1;
}

/// HTTP client timeout constants
pub mod http {
    use super::Duration;

    /// Default timeout for requests to an agent
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Timeout for establishing agent connections
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Limits and constraints
pub mod limits {
    /// Scopes enforced concurrently during a sweep of a single store
    pub const MAX_CONCURRENT_SCOPES: usize = 4;

    /// Upper bound on pages drained for one listing
    pub const MAX_LIST_PAGES: usize = 10_000;

    /// Default page size used by the agent listing endpoint
    pub const DEFAULT_PAGE_SIZE: usize = 1000;
}

/// Default configuration values
pub mod defaults {
    /// Default bind host for the keeper API
    pub const HOST: &str = "0.0.0.0";

    /// Default port for the keeper API
    pub const PORT: u16 = 8096;

    /// Default configuration directory
    pub const CONFIG_DIR: &str = "config";

    /// Key used when neither config nor environment provides one
    pub const DEVELOPMENT_API_KEY: &str = "default-development-key";
}

/// Agent server constants
pub mod agent {
    /// Default port for agent HTTP server
    pub const DEFAULT_PORT: u16 = 8745;

    /// Default bind address for agent
    pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8745";
}
