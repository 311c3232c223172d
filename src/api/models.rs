use serde::{Deserialize, Serialize};

use crate::rewriter::SeoOptions;

/// Body of `POST /api/rewrite-content`. Only `title` and `content` are
/// required; everything else defaults to the values used when a caller
/// sends the minimal two-field payload.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RewriteRequest {
    pub title: String,
    pub content: String,
    pub meta_description: String,
    pub url: String,
    pub options: SeoOptions,
}

#[derive(Serialize)]
pub struct Health {
    pub ok: bool,
    pub service: &'static str,
}
