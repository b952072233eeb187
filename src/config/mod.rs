//! Configuration module for Tubescribe.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{KeywordPrompts, Prompts};
pub use settings::{
    CaptionSettings, DiscoverySettings, GeneralSettings, KeywordSettings, PipelineSettings,
    PromptSettings, Settings, TranslationSettings,
};
