use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::qualification::domain::{ApplicantProfile, CreditAssessment, ScoreBand};
use crate::qualification::router::{prequalification_router, resolve_handler, ResolveRequest};

fn post_json(uri: &str, payload: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).expect("serialize")))
        .expect("request builds")
}

#[tokio::test]
async fn resolve_route_returns_flag() {
    let router = prequalification_router(engine());
    let response = router
        .oneshot(post_json(
            "/api/v1/prequalification/resolve",
            json!({
                "profile": {
                    "employment_type_code": "ET_NLS105",
                    "rent_responsible": true,
                    "is_student": false
                },
                "assessment": {
                    "credit_report_available": true,
                    "credit_score_band": "300-560",
                    "can_pay_extra_deposit": true
                }
            }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["outcome"], "flag");
    assert_eq!(body["flag"], "V_NLS569");
    assert_eq!(body["standing"]["kind"], "reported");
    assert_eq!(body["standing"]["band"], "300-560");
}

#[tokio::test]
async fn resolve_handler_rejects_incomplete_assessment() {
    let request = ResolveRequest {
        profile: ApplicantProfile::new("ET_NLS92", true, true),
        assessment: CreditAssessment::reported(ScoreBand::Fair, None),
    };
    let response = resolve_handler(State(engine()), axum::Json(request)).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["kind"], "incomplete_credit_assessment");
}

#[tokio::test]
async fn resolve_handler_reports_table_defects_as_server_errors() {
    let request = ResolveRequest {
        profile: ApplicantProfile::new("ET_NLS1", true, true),
        assessment: CreditAssessment::reported(ScoreBand::Excellent, Some(true)),
    };
    let response = resolve_handler(State(gapped_engine()), axum::Json(request)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = read_json_body(response).await;
    assert_eq!(body["kind"], "unmapped_combination");
    assert!(body["error"]
        .as_str()
        .is_some_and(|message| message.starts_with("qualification error:")));
}

#[tokio::test]
async fn next_step_route_reports_pending_question() {
    let router = prequalification_router(engine());
    let response = router
        .oneshot(post_json(
            "/api/v1/prequalification/next-step",
            json!({ "employment_type_code": "ET_NLS92", "rent_responsible": true }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["step"], "residency");
    assert!(body.get("outcome").is_none());
}

#[tokio::test]
async fn employment_type_route_returns_flag_blocks() {
    let router = prequalification_router(engine());
    let response = router
        .oneshot(
            Request::get("/api/v1/prequalification/employment-types/ET_NLS92")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["category"], "NLS3");
    assert_eq!(body["responsible_first"], "V_NLS459");
    assert_eq!(body["responsible_last"], "V_NLS466");
}

#[tokio::test]
async fn employment_type_route_returns_not_found_for_unknown_codes() {
    let router = prequalification_router(engine());
    let response = router
        .oneshot(
            Request::get("/api/v1/prequalification/employment-types/ET_NLS999")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn coverage_route_summarises_table() {
    let router = prequalification_router(engine());
    let response = router
        .oneshot(
            Request::get("/api/v1/prequalification/coverage")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["distinct_flags"], 1188);
    assert_eq!(body["gaps"].as_array().map(Vec::len), Some(0));
    assert_eq!(body["version"]["label"], "2025.2");
}
