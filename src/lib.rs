pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod rewriter;

use std::sync::Arc;
use rewriter::ContentRewriter;

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub rewriter: Arc<dyn ContentRewriter>,
}
