use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::warn;

use super::classifier::HankeDisruption;
use super::layers::{GeometrySetId, SpatialLayerSource};
use super::DisruptionAssessor;
use crate::error::AppError;

/// Router builder exposing the disruption classification of a geometry set.
pub fn disruption_router<S>(assessor: Arc<DisruptionAssessor<S>>) -> Router
where
    S: SpatialLayerSource + 'static,
{
    Router::new()
        .route(
            "/api/v1/geometriat/:geometry_set_id/tormaystarkastelu",
            get(assess_handler::<S>),
        )
        .with_state(assessor)
}

/// Layer queries block on their own threads, so the assessment runs on the
/// blocking pool instead of a runtime worker.
async fn assess_handler<S>(
    State(assessor): State<Arc<DisruptionAssessor<S>>>,
    Path(geometry_set_id): Path<i64>,
) -> Result<Json<HankeDisruption>, AppError>
where
    S: SpatialLayerSource + 'static,
{
    let geometry_set = GeometrySetId(geometry_set_id);
    let outcome = tokio::task::spawn_blocking(move || assessor.assess(geometry_set))
        .await
        .map_err(AppError::from)
        .and_then(|assessed| assessed.map_err(AppError::from));

    match outcome {
        Ok(disruption) => Ok(Json(disruption)),
        Err(error) => {
            warn!(%geometry_set, error = %error, "disruption classification failed");
            Err(error)
        }
    }
}
