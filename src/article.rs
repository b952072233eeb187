//! Seed article loading.

use crate::error::{Result, TubescribeError};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File extensions read as articles.
const ARTICLE_EXTENSIONS: &[&str] = &["txt", "md"];

/// A seed document.
#[derive(Debug, Clone)]
pub struct Article {
    /// File stem; names the results file.
    pub name: String,
    pub path: PathBuf,
    pub text: String,
}

/// Load a single article file.
pub fn load_article(path: impl AsRef<Path>) -> Result<Article> {
    let path = path.as_ref();

    if !is_article_file(path) {
        return Err(TubescribeError::Article(format!(
            "Unsupported article format: {} (expected .txt or .md)",
            path.display()
        )));
    }

    let text = std::fs::read_to_string(path)
        .map_err(|e| TubescribeError::Article(format!("{}: {}", path.display(), e)))?;

    if text.trim().is_empty() {
        return Err(TubescribeError::Article(format!(
            "Article is empty: {}",
            path.display()
        )));
    }

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "article".to_string());

    debug!("Loaded article {} ({} chars)", name, text.len());

    Ok(Article {
        name,
        path: path.to_path_buf(),
        text,
    })
}

/// Load the first article in `dir`, by sorted file name.
pub fn first_article(dir: impl AsRef<Path>) -> Result<Article> {
    let dir = dir.as_ref();

    let entries = std::fs::read_dir(dir).map_err(|e| {
        TubescribeError::Article(format!("Cannot read {}: {}", dir.display(), e))
    })?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_article_file(path))
        .collect();
    candidates.sort();

    let first = candidates.into_iter().next().ok_or_else(|| {
        TubescribeError::Article(format!("No articles in {}", dir.display()))
    })?;

    load_article(first)
}

pub(crate) fn is_article_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ARTICLE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_article_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b_second.txt"), "second").unwrap();
        std::fs::write(dir.path().join("a_first.md"), "# first").unwrap();
        std::fs::write(dir.path().join("0_ignored.pdf"), "binary").unwrap();

        let article = first_article(dir.path()).unwrap();
        assert_eq!(article.name, "a_first");
        assert_eq!(article.text, "# first");
    }

    #[test]
    fn test_empty_dir_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = first_article(dir.path()).unwrap_err();
        assert!(matches!(err, TubescribeError::Article(_)));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paper.docx");
        std::fs::write(&path, "x").unwrap();
        assert!(load_article(&path).is_err());
    }

    #[test]
    fn test_blank_article_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.txt");
        std::fs::write(&path, "  \n").unwrap();
        assert!(load_article(&path).is_err());
    }
}
