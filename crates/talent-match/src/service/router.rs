use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::{MatchQuery, MatchServiceError, SnapshotSource, TalentMatchService};
use crate::engine::MatchReport;

/// Router builder exposing the match run and its reference lookups.
pub fn match_router<S>(service: Arc<TalentMatchService<S>>) -> Router
where
    S: SnapshotSource + 'static,
{
    Router::new()
        .route("/api/v1/match", post(match_handler::<S>))
        .route("/api/v1/positions", get(positions_handler::<S>))
        .route("/api/v1/high-performers", get(high_performers_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub report: MatchReport,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct HighPerformerParams {
    #[serde(default)]
    pub(crate) min_rating: Option<i32>,
}

pub(crate) async fn match_handler<S>(
    State(service): State<Arc<TalentMatchService<S>>>,
    Json(query): Json<MatchQuery>,
) -> Response
where
    S: SnapshotSource + 'static,
{
    run_blocking(move || {
        service.run(query).map(|report| MatchResponse {
            generated_at: Utc::now(),
            report,
        })
    })
    .await
}

pub(crate) async fn positions_handler<S>(
    State(service): State<Arc<TalentMatchService<S>>>,
) -> Response
where
    S: SnapshotSource + 'static,
{
    run_blocking(move || service.positions()).await
}

pub(crate) async fn high_performers_handler<S>(
    State(service): State<Arc<TalentMatchService<S>>>,
    Query(params): Query<HighPerformerParams>,
) -> Response
where
    S: SnapshotSource + 'static,
{
    run_blocking(move || service.high_performers(params.min_rating)).await
}

/// Service calls read the snapshot from disk, so they run off the async workers.
async fn run_blocking<T, F>(task: F) -> Response
where
    T: Serialize + Send + 'static,
    F: FnOnce() -> Result<T, MatchServiceError> + Send + 'static,
{
    match tokio::task::spawn_blocking(task).await {
        Ok(Ok(body)) => (StatusCode::OK, Json(body)).into_response(),
        Ok(Err(err)) => service_error_response(err),
        Err(join_error) => {
            error!(error = %join_error, "blocking service task failed");
            let payload = json!({ "error": "request aborted" });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

fn service_error_response(err: MatchServiceError) -> Response {
    let status = match &err {
        MatchServiceError::Request(_) => StatusCode::BAD_REQUEST,
        MatchServiceError::Source(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    if status.is_server_error() {
        error!(error = %err, "match service failure");
    }

    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
