//! Chat-completions client.
//!
//! Sibling of [`crate::embedding`]: same provider, same authentication,
//! same retry strategy, different endpoint (`POST {base_url}/chat/completions`).
//! Failures are returned as errors; the caller decides how to surface them.

use anyhow::{bail, Result};
use std::time::Duration;

use crate::config::{ChatConfig, OpenAiConfig};

pub struct ChatClient {
    base_url: String,
    api_key: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
    max_retries: u32,
    timeout: Duration,
}

impl ChatClient {
    pub fn new(openai: &OpenAiConfig, config: &ChatConfig) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable not set"))?;

        Ok(Self {
            base_url: openai.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            max_retries: config.max_retries,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Send one user message and return the text of the first choice.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;

        let body = serde_json::json!({
            "model": self.model,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "messages": [
                {"role": "user", "content": prompt},
            ],
        });

        let url = format!("{}/chat/completions", self.base_url);
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tracing::warn!(attempt, "retrying chat completion request");
                tokio::time::sleep(delay).await;
            }

            let resp = client
                .post(&url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let json: serde_json::Value = response.json().await?;
                        return parse_chat_response(&json);
                    }

                    // Rate limited or server error — retry
                    if status.as_u16() == 429 || status.is_server_error() {
                        let body_text = response.text().await.unwrap_or_default();
                        last_err =
                            Some(anyhow::anyhow!("Chat API error {}: {}", status, body_text));
                        continue;
                    }

                    // Client error (not 429) — don't retry
                    let body_text = response.text().await.unwrap_or_default();
                    bail!("Chat API error {}: {}", status, body_text);
                }
                Err(e) => {
                    last_err = Some(e.into());
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("Chat completion failed after retries")))
    }
}

/// Extract `choices[0].message.content` from a chat-completions response.
fn parse_chat_response(json: &serde_json::Value) -> Result<String> {
    let content = json
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid chat response: missing choices[0].message.content"))?;

    Ok(content.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_choice_content() {
        let json = serde_json::json!({
            "choices": [
                {"message": {"role": "assistant", "content": "The answer."}},
                {"message": {"role": "assistant", "content": "Ignored."}},
            ]
        });
        assert_eq!(parse_chat_response(&json).unwrap(), "The answer.");
    }

    #[test]
    fn empty_choices_is_an_error() {
        let json = serde_json::json!({"choices": []});
        assert!(parse_chat_response(&json).is_err());
    }

    #[test]
    fn missing_content_is_an_error() {
        let json = serde_json::json!({"choices": [{"message": {"role": "assistant"}}]});
        assert!(parse_chat_response(&json).is_err());
    }
}
