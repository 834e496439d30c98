use askama::Template;
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use log::error;
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::ApiError;
use super::state::AppState;
use crate::view::QueueView;

#[derive(Template)]
#[template(path = "zuul-status.html")]
struct StatusTemplate<'a> {
    view: &'a QueueView,
}

#[derive(Debug, Deserialize)]
struct StatusQuery {
    queue: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status_page))
        .route("/health", get(health))
        .with_state(state)
}

async fn status_page(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Html<String>, ApiError> {
    let queue_name = query.queue.unwrap_or_else(|| state.default_queue.clone());
    let view = state.dashboard.queue_view(&queue_name).await?;

    let template = StatusTemplate { view: &view };
    match template.render() {
        Ok(html) => Ok(Html(html)),
        Err(e) => {
            error!("Status template render error: {e}");
            Err(ApiError::Internal(format!("Template error: {e}")))
        }
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
