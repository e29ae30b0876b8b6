//! Axum admin API: scrape trigger, ingest-log audit, liveness.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use chainmenu_core::{IngestLog, IngestSummary};
use chainmenu_ingest::{IngestError, IngestRunner};

pub const CRATE_NAME: &str = "chainmenu-web";

const DEFAULT_LOG_LIMIT: i64 = 20;
const MAX_LOG_LIMIT: i64 = 100;

/// What the admin API needs from the ingest side. Implemented by
/// `IngestRunner` in production and stubbed in handler tests.
#[async_trait]
pub trait IngestService: Send + Sync {
    async fn run_brand(&self, slug: &str) -> Result<IngestSummary, IngestError>;

    async fn recent_logs(&self, slug: &str, limit: i64) -> Result<Vec<IngestLog>, IngestError>;
}

#[async_trait]
impl IngestService for IngestRunner {
    async fn run_brand(&self, slug: &str) -> Result<IngestSummary, IngestError> {
        IngestRunner::run_brand(self, slug).await
    }

    async fn recent_logs(&self, slug: &str, limit: i64) -> Result<Vec<IngestLog>, IngestError> {
        let brand = self
            .store()
            .brand_by_slug(slug)
            .await?
            .ok_or_else(|| IngestError::BrandNotFound(slug.to_string()))?;
        Ok(self.store().recent_ingest_logs(brand.id, limit).await?)
    }
}

#[derive(Clone)]
pub struct AppState {
    admin_token: String,
    ingest: Arc<dyn IngestService>,
}

impl AppState {
    pub fn new(admin_token: impl Into<String>, ingest: Arc<dyn IngestService>) -> Self {
        Self {
            admin_token: admin_token.into(),
            ingest,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeResponse {
    success: bool,
    brand: String,
    total: usize,
    created: usize,
    updated: usize,
    errors: usize,
    error_details: Vec<String>,
}

impl From<IngestSummary> for ScrapeResponse {
    fn from(summary: IngestSummary) -> Self {
        Self {
            success: summary.errors == 0,
            brand: summary.brand,
            total: summary.total,
            created: summary.created,
            updated: summary.updated,
            errors: summary.errors,
            error_details: summary.error_details,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IngestLogResponse {
    id: String,
    status: String,
    changed_count: i32,
    error: Option<String>,
    fetched_at: String,
}

impl From<IngestLog> for IngestLogResponse {
    fn from(log: IngestLog) -> Self {
        Self {
            id: log.id.to_string(),
            status: log.status.as_str().to_string(),
            changed_count: log.changed_count,
            error: log.error,
            fetched_at: log.fetched_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct LogsQuery {
    limit: Option<i64>,
}

pub fn app(state: AppState) -> Router {
    let state = Arc::new(state);
    let admin = Router::new()
        .route("/admin/menu-items/{brand}/scrape", post(scrape_handler))
        .route(
            "/admin/menu-items/{brand}/ingest-logs",
            get(ingest_logs_handler),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .merge(admin)
        .route("/healthz", get(healthz_handler))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: AppState, port: u16) -> anyhow::Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "admin api listening");
    axum::serve(listener, app(state)).await?;
    Ok(())
}

/// Static bearer-token guard. An empty configured token rejects every
/// request rather than opening the admin surface up.
async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let authorized =
        !state.admin_token.is_empty() && presented == Some(state.admin_token.as_str());
    if !authorized {
        return error_response(StatusCode::UNAUTHORIZED, "unauthorized");
    }
    next.run(request).await
}

async fn scrape_handler(
    State(state): State<Arc<AppState>>,
    Path(brand): Path<String>,
) -> Response {
    match state.ingest.run_brand(&brand).await {
        Ok(summary) => Json(ScrapeResponse::from(summary)).into_response(),
        Err(err) => ingest_error_response(err),
    }
}

async fn ingest_logs_handler(
    State(state): State<Arc<AppState>>,
    Path(brand): Path<String>,
    Query(query): Query<LogsQuery>,
) -> Response {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LOG_LIMIT)
        .clamp(1, MAX_LOG_LIMIT);
    match state.ingest.recent_logs(&brand, limit).await {
        Ok(logs) => {
            let rows: Vec<IngestLogResponse> =
                logs.into_iter().map(IngestLogResponse::from).collect();
            Json(rows).into_response()
        }
        Err(err) => ingest_error_response(err),
    }
}

async fn healthz_handler() -> Response {
    Json(serde_json::json!({ "status": "ok" })).into_response()
}

fn ingest_error_response(err: IngestError) -> Response {
    match err {
        IngestError::BrandNotFound(_) | IngestError::ScraperUnavailable(_) => {
            error_response(StatusCode::NOT_FOUND, &err.to_string())
        }
        IngestError::Store(err) => {
            tracing::error!(error = %err, "ingest request failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request as HttpRequest;
    use chrono::Utc;
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use uuid::Uuid;

    use chainmenu_core::IngestStatus;
    use chainmenu_storage::db::StoreError;

    struct StubIngest;

    #[async_trait]
    impl IngestService for StubIngest {
        async fn run_brand(&self, slug: &str) -> Result<IngestSummary, IngestError> {
            match slug {
                "mcdonalds" => Ok(IngestSummary {
                    brand: "mcdonalds".to_string(),
                    total: 5,
                    created: 2,
                    updated: 2,
                    errors: 1,
                    error_details: vec!["no candidate matched `맥윙`".to_string()],
                }),
                "broken" => Err(IngestError::Store(StoreError::Backend(
                    "connection refused".to_string(),
                ))),
                other => Err(IngestError::BrandNotFound(other.to_string())),
            }
        }

        async fn recent_logs(
            &self,
            slug: &str,
            limit: i64,
        ) -> Result<Vec<IngestLog>, IngestError> {
            if slug != "mcdonalds" {
                return Err(IngestError::BrandNotFound(slug.to_string()));
            }
            assert!(limit >= 1);
            Ok(vec![IngestLog {
                id: Uuid::new_v4(),
                brand_id: Uuid::new_v4(),
                status: IngestStatus::Partial,
                changed_count: 4,
                error: Some("[\"no candidate matched `맥윙`\"]".to_string()),
                fetched_at: Utc::now(),
            }])
        }
    }

    fn test_app() -> Router {
        app(AppState::new("secret-token", Arc::new(StubIngest)))
    }

    fn scrape_request(token: Option<&str>) -> HttpRequest<Body> {
        let mut builder = HttpRequest::builder()
            .method("POST")
            .uri("/admin/menu-items/mcdonalds/scrape");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn scrape_returns_camel_case_run_summary() {
        let resp = test_app()
            .oneshot(scrape_request(Some("secret-token")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["brand"], "mcdonalds");
        assert_eq!(json["total"], 5);
        assert_eq!(json["created"], 2);
        assert_eq!(json["updated"], 2);
        assert_eq!(json["errors"], 1);
        assert_eq!(json["errorDetails"][0], "no candidate matched `맥윙`");
    }

    #[tokio::test]
    async fn scrape_without_token_is_unauthorized() {
        let resp = test_app().oneshot(scrape_request(None)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn scrape_with_wrong_token_is_unauthorized() {
        let resp = test_app()
            .oneshot(scrape_request(Some("wrong")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn empty_configured_token_rejects_everything() {
        let app = app(AppState::new("", Arc::new(StubIngest)));
        let resp = app.oneshot(scrape_request(Some(""))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_brand_is_not_found() {
        let resp = test_app()
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/admin/menu-items/subway/scrape")
                    .header("authorization", "Bearer secret-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("subway"));
    }

    #[tokio::test]
    async fn store_failure_is_internal_error() {
        let resp = test_app()
            .oneshot(
                HttpRequest::builder()
                    .method("POST")
                    .uri("/admin/menu-items/broken/scrape")
                    .header("authorization", "Bearer secret-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn ingest_logs_lists_recent_rows() {
        let resp = test_app()
            .oneshot(
                HttpRequest::builder()
                    .uri("/admin/menu-items/mcdonalds/ingest-logs?limit=5")
                    .header("authorization", "Bearer secret-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["status"], "partial");
        assert_eq!(rows[0]["changedCount"], 4);
    }

    #[tokio::test]
    async fn healthz_needs_no_auth() {
        let resp = test_app()
            .oneshot(
                HttpRequest::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "ok");
    }
}
