use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::error::AppError;
use super::coverage::CoverageReport;
use super::domain::{ApplicantProfile, CreditAssessment};
use super::error::QualificationError;
use super::resolver::QualificationEngine;
use super::session::PrequalificationSession;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub profile: ApplicantProfile,
    pub assessment: CreditAssessment,
}

/// Router builder exposing the resolver, wizard progression and table introspection.
pub fn prequalification_router(engine: QualificationEngine) -> Router {
    Router::new()
        .route("/api/v1/prequalification/resolve", post(resolve_handler))
        .route("/api/v1/prequalification/next-step", post(next_step_handler))
        .route(
            "/api/v1/prequalification/employment-types/:code",
            get(employment_type_handler),
        )
        .route("/api/v1/prequalification/coverage", get(coverage_handler))
        .with_state(engine)
}

pub(crate) async fn resolve_handler(
    State(engine): State<QualificationEngine>,
    axum::Json(request): axum::Json<ResolveRequest>,
) -> Response {
    match engine.resolve_detailed(&request.profile, &request.assessment) {
        Ok(resolution) => (StatusCode::OK, axum::Json(resolution)).into_response(),
        Err(err) => qualification_error_response(err),
    }
}

pub(crate) async fn next_step_handler(
    State(engine): State<QualificationEngine>,
    axum::Json(session): axum::Json<PrequalificationSession>,
) -> Response {
    match session.next_step(&engine) {
        Ok(progress) => (StatusCode::OK, axum::Json(progress)).into_response(),
        Err(err) => qualification_error_response(err),
    }
}

pub(crate) async fn employment_type_handler(
    State(engine): State<QualificationEngine>,
    Path(code): Path<String>,
) -> Response {
    match engine.table().entry(&code) {
        Ok(entry) => (StatusCode::OK, axum::Json(entry.view())).into_response(),
        Err(err) => {
            let payload = json!({
                "error": err.to_string(),
                "kind": err.kind(),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn coverage_handler(State(engine): State<QualificationEngine>) -> Response {
    let report = CoverageReport::for_table(engine.table());
    (StatusCode::OK, axum::Json(report)).into_response()
}

fn qualification_error_response(err: QualificationError) -> Response {
    if !err.is_table_defect() {
        warn!(kind = err.kind(), error = %err, "rejected pre-qualification input");
    }
    AppError::from(err).into_response()
}
