use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::llm;

const GENERIC_REWRITE_ERROR: &str = "Failed to rewrite content";

const SYSTEM_PROMPT: &str = "You are an SEO copywriter. Rewrite the page the user provides so it reads \
naturally while ranking better for the given keywords. Respond with a single JSON object and nothing \
else, using exactly these keys: \"title\", \"content\", \"metaDescription\".";

/// Configuration controlling keyword emphasis and length preservation during rewriting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoOptions {
    pub maintain_length: bool,
    pub seo_keywords: Vec<String>,
}

impl Default for SeoOptions {
    fn default() -> Self {
        SeoOptions {
            maintain_length: true,
            seo_keywords: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewrittenContent {
    pub title: String,
    pub content: String,
    pub meta_description: String,
    pub word_count: usize,
    pub rewritten_at: DateTime<Utc>,
}

/// Shape the model is instructed to reply with.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LlmRewrite {
    title: String,
    content: String,
    #[serde(default)]
    meta_description: String,
}

#[async_trait]
pub trait ContentRewriter: Send + Sync {
    async fn rewrite(
        &self,
        title: &str,
        content: &str,
        meta_description: &str,
        url: &str,
        options: &SeoOptions,
    ) -> Result<RewrittenContent>;
}

/// Rewriter backed by a single OpenRouter chat completion per request.
pub struct OpenRouterRewriter {
    api_key: String,
    model: String,
}

impl OpenRouterRewriter {
    pub fn new(config: &Config) -> Self {
        OpenRouterRewriter {
            api_key: config.openrouter_api_key.clone(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl ContentRewriter for OpenRouterRewriter {
    async fn rewrite(
        &self,
        title: &str,
        content: &str,
        meta_description: &str,
        url: &str,
        options: &SeoOptions,
    ) -> Result<RewrittenContent> {
        let prompt = build_prompt(title, content, meta_description, url, options);
        let site_url = if url.is_empty() { None } else { Some(url) };

        let reply =
            llm::chat_completion(&self.api_key, &self.model, SYSTEM_PROMPT, &prompt, site_url)
                .await?;

        let parsed = parse_rewrite_reply(&reply)
            .ok_or_else(|| AppError::RewriteError(GENERIC_REWRITE_ERROR.to_string()))?;

        let word_count = parsed.content.split_whitespace().count();

        Ok(RewrittenContent {
            title: parsed.title,
            content: parsed.content,
            meta_description: parsed.meta_description,
            word_count,
            rewritten_at: Utc::now(),
        })
    }
}

/// Build the user prompt for one rewrite call.
pub fn build_prompt(
    title: &str,
    content: &str,
    meta_description: &str,
    url: &str,
    options: &SeoOptions,
) -> String {
    let mut prompt = String::with_capacity(content.len() + title.len() + 512);

    prompt.push_str("Rewrite the following page content for SEO.\n\n");

    prompt.push_str("TITLE:\n");
    prompt.push_str(title);
    prompt.push_str("\n\nCONTENT:\n");
    prompt.push_str(content);
    prompt.push('\n');

    if !meta_description.is_empty() {
        prompt.push_str("\nCURRENT META DESCRIPTION:\n");
        prompt.push_str(meta_description);
        prompt.push('\n');
    }

    if !url.is_empty() {
        prompt.push_str("\nPAGE URL: ");
        prompt.push_str(url);
        prompt.push('\n');
    }

    if !options.seo_keywords.is_empty() {
        prompt.push_str("\nTARGET KEYWORDS (in priority order): ");
        prompt.push_str(&options.seo_keywords.join(", "));
        prompt.push('\n');
    }

    if options.maintain_length {
        prompt.push_str("\nKeep the rewritten content close to the original length.\n");
    }

    prompt
}

/// Parse the raw model reply into the expected rewrite shape.
/// The object is pulled out of surrounding prose or code fences first;
/// returns None when no usable object is present.
fn parse_rewrite_reply(raw: &str) -> Option<LlmRewrite> {
    let json_str = extract_json_object(raw)?;
    serde_json::from_str(json_str).ok()
}

fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_maintain_length_with_no_keywords() {
        let options = SeoOptions::default();
        assert!(options.maintain_length);
        assert!(options.seo_keywords.is_empty());
    }

    #[test]
    fn options_deserialize_camel_case_with_defaults() {
        let options: SeoOptions = serde_json::from_str(r#"{"seoKeywords": ["rust"]}"#).unwrap();
        assert!(options.maintain_length);
        assert_eq!(options.seo_keywords, vec!["rust".to_string()]);
    }

    #[test]
    fn prompt_includes_keywords_and_length_instruction() {
        let options = SeoOptions {
            maintain_length: true,
            seo_keywords: vec!["crab".into(), "ferris".into()],
        };
        let prompt = build_prompt("Title", "Body text", "", "", &options);

        assert!(prompt.contains("TARGET KEYWORDS (in priority order): crab, ferris"));
        assert!(prompt.contains("close to the original length"));
    }

    #[test]
    fn prompt_omits_empty_sections() {
        let options = SeoOptions {
            maintain_length: false,
            seo_keywords: Vec::new(),
        };
        let prompt = build_prompt("Title", "Body text", "", "", &options);

        assert!(!prompt.contains("TARGET KEYWORDS"));
        assert!(!prompt.contains("META DESCRIPTION"));
        assert!(!prompt.contains("PAGE URL"));
        assert!(!prompt.contains("original length"));
    }

    #[test]
    fn prompt_carries_meta_and_url_when_present() {
        let prompt = build_prompt(
            "Title",
            "Body",
            "A short description",
            "https://example.com/page",
            &SeoOptions::default(),
        );

        assert!(prompt.contains("CURRENT META DESCRIPTION:\nA short description"));
        assert!(prompt.contains("PAGE URL: https://example.com/page"));
    }

    #[test]
    fn parses_plain_json_reply() {
        let raw = r#"{"title": "New", "content": "Rewritten body", "metaDescription": "Meta"}"#;
        let parsed = parse_rewrite_reply(raw).unwrap();
        assert_eq!(parsed.title, "New");
        assert_eq!(parsed.content, "Rewritten body");
        assert_eq!(parsed.meta_description, "Meta");
    }

    #[test]
    fn parses_reply_wrapped_in_code_fence() {
        let raw = "Here you go:\n```json\n{\"title\": \"New\", \"content\": \"Body\"}\n```";
        let parsed = parse_rewrite_reply(raw).unwrap();
        assert_eq!(parsed.title, "New");
        assert_eq!(parsed.meta_description, "");
    }

    #[test]
    fn garbage_reply_fails_to_parse() {
        assert!(parse_rewrite_reply("I cannot rewrite that.").is_none());
        assert!(parse_rewrite_reply("} backwards {").is_none());
        assert!(parse_rewrite_reply("{\"title\": \"missing content\"}").is_none());
    }
}
