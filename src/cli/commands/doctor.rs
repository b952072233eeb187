//! Doctor command - verify system requirements and configuration.

use crate::article::is_article_file;
use crate::cli::Output;
use crate::config::Settings;
use console::style;
use std::path::Path;
use std::process::Command;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Tubescribe Doctor");
    println!();

    let mut checks = Vec::new();

    // Check external tools
    println!("{}", style("External Tools").bold());
    let tool_check = check_tool(&settings.discovery.ytdlp_path, install_hint_ytdlp());
    tool_check.print();
    checks.push(tool_check);
    println!();

    // Check API keys
    println!("{}", style("API Configuration").bold());
    let key_check = check_api_key(&settings.keywords.api_key_env, &settings.keywords.fallback_query);
    key_check.print();
    checks.push(key_check);
    println!();

    // Check directories
    println!("{}", style("Directories").bold());
    let dir_checks = check_directories(settings);
    for check in &dir_checks {
        check.print();
    }
    checks.extend(dir_checks);
    println!();

    // Check configuration
    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);
    println!();

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before running Tubescribe.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Tubescribe is ready to use.");
    }

    Ok(())
}

/// Check if an external tool is available.
fn check_tool(name: &str, hint: &str) -> CheckResult {
    match Command::new(name).arg("--version").output() {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout)
                .lines()
                .next()
                .unwrap_or("installed")
                .trim()
                .chars()
                .take(50)
                .collect::<String>();
            CheckResult::ok(name, &version)
        }
        Ok(_) => CheckResult::error(name, "installed but not working", hint),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            CheckResult::error(name, "not found", hint)
        }
        Err(e) => CheckResult::error(name, &format!("error: {}", e), hint),
    }
}

/// Check the keyword API key. Missing keys only degrade search quality.
fn check_api_key(env_var: &str, fallback_query: &str) -> CheckResult {
    match std::env::var(env_var) {
        Ok(key) if !key.trim().is_empty() => {
            CheckResult::ok(env_var, &format!("configured ({})", mask_key(&key)))
        }
        _ => CheckResult::warning(
            env_var,
            &format!("not set, searches will use \"{}\"", fallback_query),
            &format!("Set with: export {}='sk-or-...'", env_var),
        ),
    }
}

fn check_directories(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();

    let article_dir = settings.article_dir();
    results.push(match count_articles(&article_dir) {
        Some(0) => CheckResult::error(
            "Article directory",
            &format!("{} (no .txt or .md files)", article_dir.display()),
            "Add the seed article before running",
        ),
        Some(n) => CheckResult::ok(
            "Article directory",
            &format!("{} ({} article(s))", article_dir.display(), n),
        ),
        None => CheckResult::error(
            "Article directory",
            &format!("{} (missing)", article_dir.display()),
            "Create it and add the seed article",
        ),
    });

    for (name, dir) in [("Logs directory", settings.logs_dir()), ("Results directory", settings.results_dir())] {
        if dir.exists() {
            results.push(CheckResult::ok(name, &dir.display().to_string()));
        } else {
            results.push(CheckResult::warning(
                name,
                &format!("{} (will be created)", dir.display()),
                "Directory will be created on first run",
            ));
        }
    }

    let log_path = settings.video_log_path();
    if let Ok(content) = std::fs::read_to_string(&log_path) {
        let logged = content.lines().filter(|l| !l.trim().is_empty()).count();
        results.push(CheckResult::ok(
            "Video log",
            &format!("{} ({} processed videos)", log_path.display(), logged),
        ));
    }

    results
}

fn count_articles(dir: &Path) -> Option<usize> {
    let entries = std::fs::read_dir(dir).ok()?;
    Some(
        entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| is_article_file(p))
            .count(),
    )
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: tubescribe config edit",
        )
    }
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "****".to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Platform-specific install hint for yt-dlp.
fn install_hint_ytdlp() -> &'static str {
    if cfg!(target_os = "macos") {
        "Install with: brew install yt-dlp"
    } else if cfg!(target_os = "linux") {
        "Install with: pip install yt-dlp (or your package manager)"
    } else {
        "Install from: https://github.com/yt-dlp/yt-dlp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_missing_api_key_is_warning() {
        let result = check_api_key("TUBESCRIBE_TEST_UNSET_KEY", "latest research update");
        assert_eq!(result.status, CheckStatus::Warning);
        assert!(result.message.contains("latest research update"));
    }

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("short"), "****");
        assert_eq!(mask_key("sk-or-v1-abcdefghijklmnop"), "sk-or-...mnop");
    }

    #[test]
    fn test_count_articles() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(count_articles(dir.path()), Some(0));
        std::fs::write(dir.path().join("a.txt"), "x").unwrap();
        std::fs::write(dir.path().join("b.pdf"), "x").unwrap();
        std::fs::write(dir.path().join("C.MD"), "x").unwrap();
        assert_eq!(count_articles(dir.path()), Some(2));
        assert_eq!(count_articles(&dir.path().join("missing")), None);
    }
}
