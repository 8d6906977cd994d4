use crate::infra::{deserialize_optional_timestamp, AppState};
use crate::report::{build_report, package_report};
use aadhaar_report::error::AppError;
use aadhaar_report::workflows::intake::{UpstreamImporter, VerificationMode};
use aadhaar_report::workflows::verification::{DownloadDescriptor, ExportFormat, Report};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub(crate) struct ReportRequest {
    pub(crate) mode: VerificationMode,
    /// Upstream response body, passed through untouched.
    pub(crate) envelope: Value,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub(crate) generated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExportRequest {
    #[serde(flatten)]
    pub(crate) report: ReportRequest,
    pub(crate) format: ExportFormat,
}

pub(crate) fn report_routes() -> axum::Router {
    axum::Router::new()
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/reports", axum::routing::post(report_endpoint))
        .route(
            "/api/v1/reports/export",
            axum::routing::post(export_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn report_endpoint(
    Json(payload): Json<ReportRequest>,
) -> Result<Json<Report>, AppError> {
    Ok(Json(report_from_request(payload)?))
}

pub(crate) async fn export_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ExportRequest>,
) -> Result<Json<DownloadDescriptor>, AppError> {
    let ExportRequest { report, format } = payload;
    let report = report_from_request(report)?;
    Ok(Json(package_report(&report, format, &state.export)?))
}

fn report_from_request(request: ReportRequest) -> Result<Report, AppError> {
    let ReportRequest {
        mode,
        envelope,
        generated_at,
    } = request;

    let payload = UpstreamImporter::from_value(&envelope, mode)?;
    build_report(&payload, generated_at.unwrap_or_else(Utc::now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::state_for_tests;
    use aadhaar_report::workflows::verification::Assessment;
    use axum::body::Body;
    use axum::http::Request;
    use axum::response::Response;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use tower::ServiceExt;

    const GENERATED_AT: &str = "2026-03-14T09:30:00Z";

    fn batch_envelope() -> Value {
        json!({
            "success": true,
            "results": [
                { "filename": "a.jpg", "assessment": "LOW" },
                { "filename": "b.jpg", "assessment": "HIGH" },
                { "filename": "c.jpg", "assessment": "HIGH" }
            ]
        })
    }

    async fn read_json_body(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body).expect("serialize body")))
            .expect("request builds")
    }

    #[tokio::test]
    async fn report_endpoint_builds_batch_summary() {
        let request = ReportRequest {
            mode: VerificationMode::Batch,
            envelope: batch_envelope(),
            generated_at: None,
        };

        let Json(report) = report_endpoint(Json(request)).await.expect("report builds");
        let Report::Batch(batch) = report else {
            panic!("expected a batch report");
        };
        assert_eq!(batch.summary.valid_count, 3);
        assert_eq!(batch.summary.overall_batch_risk, Assessment::Moderate);
    }

    #[tokio::test]
    async fn report_endpoint_rejects_non_sequence_batch() {
        let request = ReportRequest {
            mode: VerificationMode::Batch,
            envelope: json!({ "success": true, "results": "nope" }),
            generated_at: None,
        };

        let error = report_endpoint(Json(request))
            .await
            .expect_err("shape error");
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn readiness_reports_initializing_until_bound() {
        let response = readiness_endpoint(Extension(state_for_tests(false)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = readiness_endpoint(Extension(state_for_tests(true)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn report_route_returns_tagged_json() {
        let router = report_routes().layer(Extension(state_for_tests(true)));
        let body = json!({
            "mode": "single",
            "generated_at": GENERATED_AT,
            "envelope": {
                "success": true,
                "result": {
                    "filename": "front.jpg",
                    "assessment": "HIGH",
                    "fraud_score": 82,
                    "extracted": {
                        "aadhaar": "1234 5678 9012",
                        "name": "A",
                        "dob": "1990",
                        "gender": "male"
                    }
                }
            }
        });

        let response = router
            .oneshot(post_json("/api/v1/reports", &body))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload["verification_type"], "single");
        assert_eq!(payload["validation_results"]["name"]["status"], "TOO_SHORT");
        assert_eq!(payload["risk_breakdown"]["text_extraction_risk"], "LOW");
        assert_eq!(payload["risk_breakdown"]["overall_risk"], "HIGH");
    }

    #[tokio::test]
    async fn export_route_returns_download_descriptor() {
        let router = report_routes().layer(Extension(state_for_tests(true)));
        let body = json!({
            "mode": "batch",
            "format": "csv",
            "generated_at": GENERATED_AT,
            "envelope": batch_envelope()
        });

        let response = router
            .oneshot(post_json("/api/v1/reports/export", &body))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(
            payload["full_filename"],
            "batch_aadhaar_verification_2026-03-14T09-30-00-000Z.csv"
        );
        assert_eq!(payload["mime_type"], "text/csv");

        let encoded = payload["encoded_payload"].as_str().expect("payload string");
        let csv = String::from_utf8(STANDARD.decode(encoded).expect("base64")).expect("utf8");
        assert!(csv.starts_with("\"Filename\",\"IsCard\""));
        assert_eq!(csv.lines().count(), 4);
    }

    #[tokio::test]
    async fn export_route_rejects_single_non_card() {
        let router = report_routes().layer(Extension(state_for_tests(true)));
        let body = json!({
            "mode": "single",
            "format": "json",
            "envelope": { "success": false, "error": "NOT_AADHAAR" }
        });

        let response = router
            .oneshot(post_json("/api/v1/reports/export", &body))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = read_json_body(response).await;
        assert!(payload["error"]
            .as_str()
            .is_some_and(|message| message.contains("not an Aadhaar card")));
    }
}
