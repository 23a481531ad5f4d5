// Handler module organization

pub mod common;
pub mod events;
pub mod stores;

pub use common::{ApiResponse, ApiResult};
pub use events::handle_finalize_event;
pub use stores::{enforce_scope, get_scope_stats, health, list_stores, sweep_store};
