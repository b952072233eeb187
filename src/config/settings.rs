//! Configuration settings for Tubescribe.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub discovery: DiscoverySettings,
    pub captions: CaptionSettings,
    pub translation: TranslationSettings,
    pub keywords: KeywordSettings,
    pub pipeline: PipelineSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory holding seed articles.
    pub article_dir: String,
    /// Directory for the processed-video log.
    pub logs_dir: String,
    /// Directory where result JSON files are written.
    pub results_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            article_dir: "Article".to_string(),
            logs_dir: "logs".to_string(),
            results_dir: "results".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// Video discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverySettings {
    /// Number of search results to process per run.
    pub max_results: usize,
    /// Path or name of the yt-dlp executable.
    pub ytdlp_path: String,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            max_results: 3,
            ytdlp_path: "yt-dlp".to_string(),
        }
    }
}

/// Caption fetching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionSettings {
    /// English language codes in order of preference for catalog tracks.
    pub english_languages: Vec<String>,
    /// Languages requested from the official transcript service.
    pub official_languages: Vec<String>,
    /// HTTP timeout for caption requests.
    pub request_timeout_secs: u64,
    /// User agent sent to the video platform.
    pub user_agent: String,
}

impl Default for CaptionSettings {
    fn default() -> Self {
        Self {
            english_languages: vec!["en".to_string(), "en-US".to_string(), "en-GB".to_string()],
            official_languages: vec!["en".to_string()],
            request_timeout_secs: 30,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36".to_string(),
        }
    }
}

/// Translation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationSettings {
    /// Translation endpoint URL.
    pub endpoint: String,
    /// Source language ("auto" to detect).
    pub source_language: String,
    /// Target language.
    pub target_language: String,
    /// Maximum characters per translation request.
    pub max_chunk_chars: usize,
    /// HTTP timeout for translation requests.
    pub request_timeout_secs: u64,
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://translate.googleapis.com/translate_a/single".to_string(),
            source_language: "auto".to_string(),
            target_language: "en".to_string(),
            max_chunk_chars: 4500,
            request_timeout_secs: 60,
        }
    }
}

/// Keyword phrase generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordSettings {
    /// Base URL of the OpenAI-compatible API.
    pub api_base: String,
    /// Chat model used to pick the search phrase.
    pub model: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    /// Query used when no key is configured or the request fails.
    pub fallback_query: String,
    /// Article characters included in the prompt.
    pub max_article_chars: usize,
    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for KeywordSettings {
    fn default() -> Self {
        Self {
            api_base: "https://openrouter.ai/api/v1".to_string(),
            model: "openai/gpt-oss-20b:free".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            fallback_query: "latest research update".to_string(),
            max_article_chars: 12_000,
            temperature: 0.0,
        }
    }
}

impl KeywordSettings {
    /// The configured API key, if set and non-empty.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Batch pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Videos processed concurrently (1 = sequential).
    pub max_concurrent_videos: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_concurrent_videos: 1,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            settings.validate()?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::TubescribeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tubescribe")
            .join("config.toml")
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.captions.english_languages.is_empty() {
            return Err(crate::error::TubescribeError::Config(
                "captions.english_languages must not be empty".to_string(),
            ));
        }
        if self.pipeline.max_concurrent_videos == 0 {
            return Err(crate::error::TubescribeError::Config(
                "pipeline.max_concurrent_videos must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded article directory path.
    pub fn article_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.article_dir)
    }

    /// Get the expanded logs directory path.
    pub fn logs_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.logs_dir)
    }

    /// Get the expanded results directory path.
    pub fn results_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.results_dir)
    }

    /// Path of the append-only processed-video log.
    pub fn video_log_path(&self) -> PathBuf {
        self.logs_dir().join("videos.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.discovery.max_results, 3);
        assert_eq!(
            settings.captions.english_languages,
            vec!["en", "en-US", "en-GB"]
        );
        assert_eq!(settings.keywords.fallback_query, "latest research update");
        assert_eq!(settings.video_log_path(), PathBuf::from("logs").join("videos.log"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [discovery]
            max_results = 5

            [captions]
            english_languages = ["en-GB"]
            "#,
        )
        .unwrap();

        assert_eq!(settings.discovery.max_results, 5);
        assert_eq!(settings.discovery.ytdlp_path, "yt-dlp");
        assert_eq!(settings.captions.english_languages, vec!["en-GB"]);
        assert_eq!(settings.captions.official_languages, vec!["en"]);
    }

    #[test]
    fn test_round_trip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.pipeline.max_concurrent_videos = 4;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.pipeline.max_concurrent_videos, 4);
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[pipeline]\nmax_concurrent_videos = 0\n").unwrap();

        assert!(Settings::load_from(Some(&path)).is_err());
    }
}
