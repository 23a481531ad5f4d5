// Finalize event webhook

use axum::extract::{Json, State};
use tracing::{error, info, warn};

use super::common::{error_response, ApiResponse, ApiResult};
use crate::retention::FinalizeEvent;
use crate::services::FinalizeReport;
use crate::web::auth::ApiKeyAuth;
use crate::web::AppState;

/// Run retention for the scope of a newly finalized artifact
pub async fn handle_finalize_event(
    _auth: ApiKeyAuth,
    State(state): State<AppState>,
    Json(event): Json<FinalizeEvent>,
) -> ApiResult<FinalizeReport> {
    info!("Finalize event for {} in {}", event.artifact_path, event.bucket);

    match state.retention_service.handle_finalize(&event).await {
        Ok(report) => Ok(Json(ApiResponse::success(report))),
        Err(e) if e.is_transient() => {
            warn!("Transient failure handling {}: {}", event.artifact_path, e);
            Err(error_response(&e))
        }
        Err(e) => {
            error!("Failed to handle finalize event for {}: {}", event.artifact_path, e);
            Err(error_response(&e))
        }
    }
}
