use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use tripplan_core::plan::{GENERATE_PATH, GenerationRequest, PlanGenerator, handle_generate};
use tripplan_core::session::MISSING_PLAN_NOTICE;
use tripplan_store::{FileStore, PlanId, PlanStore, StoreError};

use crate::render::{escape_html, plan_html};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<PlanGenerator>,
    pub store: Arc<Mutex<PlanStore<FileStore>>>,
    pub base_url: String,
}

impl AppState {
    pub fn new(generator: Arc<PlanGenerator>, store: PlanStore<FileStore>, base_url: String) -> Self {
        Self {
            generator,
            store: Arc::new(Mutex::new(store)),
            base_url,
        }
    }

    fn with_store<R>(&self, f: impl FnOnce(&PlanStore<FileStore>) -> R) -> R {
        let store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        f(&store)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route(GENERATE_PATH, post(generate_plan))
        .route("/plans/{id}", get(plan_detail))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(state: AppState, bind: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("tripplan serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("tripplan serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn generate_plan(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let request: GenerationRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::bad_request(format!("invalid request body: {e}")))?;

    let response = handle_generate(&state.generator, request).await;
    let status = StatusCode::from_u16(response.status).map_err(AppError::internal)?;
    Ok((status, Json(response.body)).into_response())
}

#[derive(Debug, Deserialize)]
struct IndexQuery {
    notice: Option<String>,
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\
<html><head><meta charset=\"utf-8\"><title>{title}</title></head><body>{body}</body></html>",
        title = escape_html(title),
    )
}

async fn index(
    State(state): State<AppState>,
    Query(query): Query<IndexQuery>,
) -> Result<Response, AppError> {
    let urls = state
        .with_store(|s| s.list_saved_plan_urls(&state.base_url))
        .map_err(AppError::internal)?;

    let notice = query
        .notice
        .map(|n| format!("<p class=\"notice\">{}</p>", escape_html(&n)))
        .unwrap_or_default();

    let list = if urls.is_empty() {
        "<p>No saved plans yet.</p>".to_string()
    } else {
        let items: String = urls
            .iter()
            .map(|u| {
                let u = escape_html(u);
                format!("<li><a href=\"{u}\">{u}</a></li>")
            })
            .collect();
        format!("<ul>{items}</ul>")
    };

    let body = format!("<h1>tripplan</h1>{notice}<h2>Saved plans</h2>{list}");
    Ok(Html(page("tripplan", &body)).into_response())
}

/// `/?notice=<message>` with the message form-encoded.
fn notice_location(notice: &str) -> String {
    match reqwest::Url::parse_with_params("http://localhost/", [("notice", notice)]) {
        Ok(url) => format!("/?{}", url.query().unwrap_or_default()),
        Err(_) => "/".to_string(),
    }
}

async fn plan_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Ok(id) = id.parse::<PlanId>() else {
        return Ok(Redirect::to(&notice_location(MISSING_PLAN_NOTICE)).into_response());
    };

    match state.with_store(|s| s.load_plan(id)) {
        Ok(plan) => {
            let body = format!(
                "<h1>Plan {id}</h1><p>{kind}, {days} day(s)</p>{content}<p><a href=\"/\">All plans</a></p>",
                kind = plan.kind(),
                days = plan.day_count(),
                content = plan_html(&plan),
            );
            Ok(Html(page("tripplan plan", &body)).into_response())
        }
        Err(StoreError::NotFound(_)) => {
            tracing::debug!(%id, "plan_detail: not found, redirecting");
            Ok(Redirect::to(&notice_location(MISSING_PLAN_NOTICE)).into_response())
        }
        Err(e) => Err(AppError::internal(e)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
