//! Google Translate (`translate_a/single`, `client=gtx`) adapter.

use super::{batch_lines, TranslationError, Translator};
use crate::config::TranslationSettings;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

/// Translator backed by the public Google Translate web endpoint.
pub struct GoogleTranslator {
    http: reqwest::Client,
    endpoint: String,
    max_chunk_chars: usize,
}

impl GoogleTranslator {
    pub fn new(settings: &TranslationSettings) -> Result<Self, TranslationError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: settings.endpoint.clone(),
            max_chunk_chars: settings.max_chunk_chars.max(1),
        })
    }

    async fn translate_batch(
        &self,
        batch: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslationError> {
        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("client", "gtx"), ("sl", source), ("tl", target), ("dt", "t")])
            .form(&[("q", batch)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TranslationError::Request(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TranslationError::InvalidResponse(e.to_string()))?;

        parse_response(&body)
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    #[instrument(skip(self, text), fields(chars = text.len()))]
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslationError> {
        let batches = batch_lines(text, self.max_chunk_chars);
        debug!("Translating {} batch(es) {} -> {}", batches.len(), source, target);

        let mut translated = Vec::with_capacity(batches.len());
        for batch in &batches {
            let out = self.translate_batch(batch, source, target).await?;
            translated.push(out.trim_end_matches('\n').to_string());
        }

        Ok(translated.join("\n"))
    }
}

/// Concatenate the translated sentence pieces of a `gtx` response.
///
/// The body looks like `[[["Hello world","Hallo Welt",null,null,10], ...], null, "de", ...]`.
fn parse_response(body: &Value) -> Result<String, TranslationError> {
    let sentences = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslationError::InvalidResponse("missing sentence list".to_string()))?;

    let text: String = sentences
        .iter()
        .filter_map(|sentence| sentence.get(0).and_then(Value::as_str))
        .collect();

    if text.trim().is_empty() {
        return Err(TranslationError::InvalidResponse(
            "empty translation".to_string(),
        ));
    }

    Ok(text)
}
