pub mod artifact;
pub mod config;
pub mod constants;
pub mod errors;
pub mod protocol;
pub mod retention;
pub mod scheduler;
pub mod services;
pub mod store;
pub mod web;

// Re-export commonly used types
pub use artifact::{ArtifactEntry, ArtifactMetadata, ArtifactPage, DeleteOutcome};
pub use config::{Config, ConfigManager, StoreConfig};
pub use errors::{ConfigError, KeeperError, StoreError};
pub use retention::{EnforceOutcome, FinalizeEvent, RetentionEngine};
pub use scheduler::SweepScheduler;
pub use services::RetentionService;
pub use store::{AgentStore, ArtifactStore, LocalFsStore, MemoryStore};
