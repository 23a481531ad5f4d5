pub mod retention_service;

pub use retention_service::{
    FinalizeReport, RetentionService, ScopeFailure, ScopeStats, StoreSummary, SweepReport,
};
