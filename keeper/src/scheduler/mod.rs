//! Cron-based scheduling of retention sweeps
//!
//! The finalize webhook keeps scopes in check as uploads arrive; a scheduled
//! sweep catches scopes whose events were lost or whose eviction failed.
//!
//! # Configuration
//!
//! Schedules use the 6-field cron format (sec min hour day month dow), set
//! globally in `config/main.toml` or per store:
//!
//! ```toml
//! # config/main.toml
//! sweep_schedule = "0 0 * * * *"   # Hourly
//!
//! # config/user-backups.toml
//! [store]
//! backend = "local"
//! root_path = "/srv/backups"
//! sweep_schedule = "0 30 3 * * *"  # Daily at 03:30
//! ```

pub mod cron;
pub mod sweep;

pub use cron::validate_6_field_cron;
pub use sweep::SweepScheduler;
