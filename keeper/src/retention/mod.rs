//! Backup retention: keep every scope at or below its artifact limit
//!
//! The engine is invoked once per finalized write. It lists the scope, and
//! if the scope holds more than `max_count` artifacts it deletes the single
//! least recently modified one. At most one artifact is deleted per call.
//!
//! # Error policy
//!
//! - **Listing failure**: returned to the caller, which may redeliver
//! - **Metadata failure for one artifact**: that artifact is skipped this run
//! - **Delete failure / already gone**: logged, reported as a no-op
//!
//! # Delivery
//!
//! The same [`RetentionEngine::enforce`] call backs every trigger: the HTTP
//! finalize webhook, direct calls, and the scheduled sweep.

pub mod engine;
pub mod trigger;

pub use engine::{select_oldest, Candidate, EnforceOutcome, RetentionEngine};
pub use trigger::{FinalizeEvent, ResolvedEvent};
