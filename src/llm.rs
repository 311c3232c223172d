use serde::Serialize;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use once_cell::sync::Lazy;
use crate::error::{Result, AppError};

pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat-v3-0324";

const CHAT_COMPLETIONS_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

// Create a static client to reuse connections
static CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(5))
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build HTTP client")
});

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
}

pub async fn chat_completion(
    api_key: &str,
    model: &str,
    system_prompt: &str,
    user_prompt: &str,
    site_url: Option<&str>,
) -> Result<String> {
    let body = ChatRequest {
        model: model.into(),
        messages: vec![
            Message {
                role: "system".into(),
                content: system_prompt.into(),
            },
            Message {
                role: "user".into(),
                content: user_prompt.into(),
            },
        ],
    };

    let mut request = CLIENT
        .post(CHAT_COMPLETIONS_URL)
        .bearer_auth(api_key)
        .json(&body);

    // OpenRouter attribution header, only when the caller has a page URL
    if let Some(url) = site_url {
        request = request.header("HTTP-Referer", url);
    }

    let res = request.send().await?;

    let json: serde_json::Value = res.json().await?;
    let reply = extract_reply(&json)
        .ok_or_else(|| AppError::RewriteError("Invalid response format from LLM".to_string()))?
        .to_string();

    Ok(reply)
}

fn extract_reply(json: &serde_json::Value) -> Option<&str> {
    json["choices"][0]["message"]["content"].as_str()
}
