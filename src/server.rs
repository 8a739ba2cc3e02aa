use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::activity::ActivityState;
use crate::service::{ActivityReport, ActivityService, AnalysisError};

const INDEX_HTML: &str = include_str!("../assets/index.html");

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    image: Option<String>,
}

pub fn router(service: Arc<ActivityService>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/analyze", post(analyze))
        .route("/current_activity", get(current_activity))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(service)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

// The body is parsed here rather than through `Json` so that a bad or oversized request
// still gets the normal activity envelope.
async fn analyze(
    State(service): State<Arc<ActivityService>>,
    body: Result<Bytes, BytesRejection>,
) -> Json<ActivityReport> {
    let body = match body {
        Ok(body) => body,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return Json(service.reject(AnalysisError::PayloadTooLarge));
        }
        Err(rejection) => {
            log::warn!("Failed to read /analyze body: {}", rejection.body_text());
            return Json(service.reject(AnalysisError::MissingImage));
        }
    };

    let image = match serde_json::from_slice::<AnalyzeRequest>(&body) {
        Ok(request) => request.image,
        Err(e) => {
            log::warn!("Unreadable /analyze body: {}", e);
            None
        }
    };

    Json(service.analyze(image.as_deref()).await)
}

async fn current_activity(State(service): State<Arc<ActivityService>>) -> Json<ActivityState> {
    Json(ActivityState::clone(&service.current_activity()))
}
