use axum::{
    routing::{get, post},
    Router,
    extract::{Json, State},
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::error::{AppError, Result};
use crate::api::models::{Health, RewriteRequest};
use crate::rewriter::RewrittenContent;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/rewrite-content", post(rewrite_handler))
        .route("/healthz", get(health_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn health_handler() -> Json<Health> {
    Json(Health {
        ok: true,
        service: "seo-rewriter",
    })
}

async fn rewrite_handler(
    State(state): State<AppState>,
    Json(req): Json<RewriteRequest>,
) -> Result<Json<RewrittenContent>> {
    // Both fields must be present and non-empty before anything is dispatched
    if req.title.is_empty() || req.content.is_empty() {
        return Err(AppError::MissingFields);
    }

    info!("Rewriting content for title: {}", req.title);
    let start_time = std::time::Instant::now();

    let result = state
        .rewriter
        .rewrite(
            &req.title,
            &req.content,
            &req.meta_description,
            &req.url,
            &req.options,
        )
        .await;

    match result {
        Ok(rewritten) => {
            info!(
                "Rewrite completed in {:?} ({} words)",
                start_time.elapsed(),
                rewritten.word_count
            );
            Ok(Json(rewritten))
        }
        Err(err) => {
            error!("Rewrite failed: {}", err);
            Err(err)
        }
    }
}
