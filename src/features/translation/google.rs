//! Google Translate web endpoint client
//!
//! Uses the keyless `translate_a/single` endpoint with automatic source language
//! detection.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Leave the overall deadline to the gate
//! - 1.0.0: Initial release

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::time::Duration;

use crate::features::gate::{NormalizedRequest, Upstream};

const TRANSLATE_URL: &str = "https://translate.googleapis.com/translate_a/single";

#[derive(Clone)]
pub struct GoogleTranslator {
    client: reqwest::Client,
    endpoint: String,
}

impl GoogleTranslator {
    /// No overall request timeout is set here: the gate bounds every call.
    pub fn new() -> Result<Self> {
        Self::with_endpoint(TRANSLATE_URL)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .user_agent("Mozilla/5.0 (compatible; TurnstileBot/0.4)")
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Translate `text` into `target_lang`, detecting the source language
    pub async fn translate(&self, text: &str, target_lang: &str) -> Result<String> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    anyhow!("Could not connect to translation service")
                } else {
                    anyhow!("Translation request failed: {e}")
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::BAD_REQUEST {
            return Err(anyhow!("Unsupported language code: {target_lang}"));
        }
        if !status.is_success() {
            return Err(anyhow!("Translation service returned HTTP {status}"));
        }

        let body: Value = response.json().await?;
        let translated = parse_translation(&body);
        debug!(
            "Translated {} chars into {target_lang} ({} chars)",
            text.chars().count(),
            translated.chars().count()
        );
        Ok(translated)
    }
}

#[async_trait]
impl Upstream for GoogleTranslator {
    type Output = String;

    async fn call(&self, request: NormalizedRequest) -> Result<String> {
        self.translate(&request.text, &request.lang).await
    }
}

/// Join the translated segments of a `translate_a/single` response.
///
/// The body is a nested array whose first element lists `[translated, original, ...]`
/// pairs, one per sentence. Anything unexpected yields an empty string.
pub fn parse_translation(body: &Value) -> String {
    body.get(0)
        .and_then(Value::as_array)
        .map(|segments| {
            segments
                .iter()
                .filter_map(|segment| segment.get(0).and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::cache::ExpiringCache;
    use crate::features::gate::{GateError, GateRequest, RequestGate, TextLimits};
    use crate::features::rate_limiting::RateLimiter;
    use serde_json::json;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_silent_service_reports_gate_timeout() {
        // Accepts connections and never answers
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let translator = GoogleTranslator::with_endpoint(format!("http://{addr}/translate")).unwrap();
        let gate = RequestGate::new(
            "translate",
            translator,
            RateLimiter::new(5, Duration::from_secs(60)),
            ExpiringCache::new(10, Duration::from_secs(60)),
            TextLimits::DISCORD_TRANSLATION,
            Duration::from_millis(200),
        );

        let err = gate
            .execute(1, &GateRequest::new("Hello", "fr"))
            .await
            .unwrap_err();
        assert!(matches!(err, GateError::UpstreamTimeout(d) if d == Duration::from_millis(200)));
        assert!(gate.cache().is_empty());
    }

    #[test]
    fn test_parse_single_segment() {
        let body = json!([[["Bonjour le monde", "Hello world", null, null, 10]], null, "en"]);
        assert_eq!(parse_translation(&body), "Bonjour le monde");
    }

    #[test]
    fn test_parse_joins_sentences() {
        let body = json!([
            [["Hallo. ", "Hello. ", null], ["Wie geht's?", "How are you?", null]],
            null,
            "en"
        ]);
        assert_eq!(parse_translation(&body), "Hallo. Wie geht's?");
    }

    #[test]
    fn test_parse_unexpected_shape_is_empty() {
        assert_eq!(parse_translation(&json!({"error": "nope"})), "");
        assert_eq!(parse_translation(&json!([null])), "");
    }
}
