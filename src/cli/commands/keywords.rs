//! Keywords command implementation.

use crate::article::load_article;
use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::keywords::{KeywordGenerator, PhraseSource};
use anyhow::Result;

/// Print the search phrase generated for an article.
pub async fn run_keywords(file: &str, settings: Settings) -> Result<()> {
    let article = load_article(file)?;
    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;
    let generator = KeywordGenerator::new(&settings.keywords, prompts)?;

    if !generator.has_client() {
        Output::warning(&format!(
            "{} is not set; using the default query",
            settings.keywords.api_key_env
        ));
    }

    let spinner = Output::spinner("Generating search phrase...");
    let phrase = generator.best_phrase(&article.text).await;
    spinner.finish_and_clear();

    println!("{}", phrase);
    Ok(())
}
