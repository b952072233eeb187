//! Search phrase generation from an article.
//!
//! One chat completion asks the model for the single best YouTube search
//! phrase. Any failure degrades to the configured fallback query.

use crate::config::{KeywordSettings, Prompts};
use crate::error::{Result, TubescribeError};
use crate::openai::create_client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// Trait for search phrase providers. Never fails.
#[async_trait]
pub trait PhraseSource: Send + Sync {
    async fn best_phrase(&self, text: &str) -> String;
}

/// Picks a search phrase with an OpenAI-compatible chat model.
pub struct KeywordGenerator {
    client: Option<Client<OpenAIConfig>>,
    model: String,
    temperature: f32,
    fallback_query: String,
    max_article_chars: usize,
    prompts: Prompts,
}

impl KeywordGenerator {
    /// Create a generator. Without an API key every call returns the fallback query.
    pub fn new(settings: &KeywordSettings, prompts: Prompts) -> Result<Self> {
        let client = match settings.api_key() {
            Some(key) => Some(create_client(&settings.api_base, &key)?),
            None => {
                warn!("{} is not set, searches will use the default query", settings.api_key_env);
                None
            }
        };

        Ok(Self {
            client,
            model: settings.model.clone(),
            temperature: settings.temperature,
            fallback_query: settings.fallback_query.clone(),
            max_article_chars: settings.max_article_chars,
            prompts,
        })
    }

    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    async fn request_phrase(&self, client: &Client<OpenAIConfig>, text: &str) -> Result<String> {
        let mut vars = HashMap::new();
        vars.insert(
            "text".to_string(),
            truncate_chars(text, self.max_article_chars).to_string(),
        );
        let prompt = self
            .prompts
            .render_with_custom(&self.prompts.keywords.user, &vars);

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| TubescribeError::OpenAI(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| TubescribeError::OpenAI(e.to_string()))?;

        let response = client
            .chat()
            .create(request)
            .await
            .map_err(|e| TubescribeError::OpenAI(format!("Keyword extraction failed: {}", e)))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .ok_or_else(|| TubescribeError::OpenAI("Empty response from model".to_string()))?;

        Ok(clean_phrase(content))
    }
}

#[async_trait]
impl PhraseSource for KeywordGenerator {
    #[instrument(skip(self, text), fields(chars = text.len()))]
    async fn best_phrase(&self, text: &str) -> String {
        let Some(client) = &self.client else {
            return self.fallback_query.clone();
        };

        match self.request_phrase(client, text).await {
            Ok(phrase) if !phrase.is_empty() => {
                info!("Search phrase: {}", phrase);
                phrase
            }
            Ok(_) => {
                warn!("Model returned an empty phrase, using default query");
                self.fallback_query.clone()
            }
            Err(e) => {
                warn!("{}, using default query", e);
                self.fallback_query.clone()
            }
        }
    }
}

/// Collapse whitespace runs in a model reply.
pub fn clean_phrase(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The first `max_chars` characters of `text`.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => {
            debug!("Truncating article to {} characters", max_chars);
            &text[..idx]
        }
        None => text,
    }
}
