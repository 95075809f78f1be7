use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::output::{print_json, OutputFormat, OutputOptions};
use crate::core::config::AppConfig;

/// JSON payload of `config init`.
#[derive(Debug, Serialize)]
struct InitResult {
    path: String,
    created: bool,
}

/// JSON payload of `config check`.
#[derive(Debug, PartialEq, Serialize)]
struct CheckResult {
    path: String,
    exists: bool,
    valid: bool,
    issues: Vec<String>,
}

fn check_result(path: &Path, config: Option<&AppConfig>) -> CheckResult {
    let issues = config.map(AppConfig::validate).unwrap_or_default();
    CheckResult {
        path: path.display().to_string(),
        exists: config.is_some(),
        valid: config.is_some() && issues.is_empty(),
        issues,
    }
}

pub fn init(opts: &OutputOptions) -> Result<()> {
    let path = AppConfig::config_path();
    let created = !path.exists();
    if created {
        AppConfig::default()
            .save()
            .context("Failed to generate config")?;
    }

    match opts.format {
        OutputFormat::Json => print_json(
            &InitResult {
                path: path.display().to_string(),
                created,
            },
            opts,
        ),
        OutputFormat::Text => {
            if created {
                println!("Generated config at {}", path.display());
            } else {
                eprintln!("Config file already exists at {}", path.display());
                eprintln!("Remove it first if you want to regenerate.");
            }
            Ok(())
        }
    }
}

pub fn check(opts: &OutputOptions) -> Result<()> {
    let path = AppConfig::config_path();
    let config = if path.exists() {
        Some(AppConfig::load().context("Failed to load config")?)
    } else {
        None
    };
    let result = check_result(&path, config.as_ref());

    if matches!(opts.format, OutputFormat::Json) {
        print_json(&result, opts)?;
        if result.exists && !result.valid {
            anyhow::bail!("Config issues found in {}", result.path);
        }
        return Ok(());
    }

    if !result.exists {
        eprintln!("No config file found at {}", result.path);
        eprintln!("Run `ccost config init` to create one.");
        return Ok(());
    }
    if !result.valid {
        let mut message = format!("Config issues found in {}:", result.path);
        for issue in &result.issues {
            message.push_str(&format!("\n  - {}", issue));
        }
        anyhow::bail!(message);
    }

    println!("Config is valid: {}", result.path);
    if let Some(config) = &config {
        println!("  API: {}", config.api.url);
    }
    Ok(())
}

/// Print the effective configuration (file values merged over defaults).
pub fn show(config: &AppConfig, opts: &OutputOptions) -> Result<()> {
    match opts.format {
        OutputFormat::Text => {
            let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
            println!("# {}\n{}", AppConfig::config_path().display(), content);
            Ok(())
        }
        OutputFormat::Json => print_json(config, opts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn check_result_for_missing_file() {
        let result = check_result(&PathBuf::from("/tmp/none/config.toml"), None);
        assert!(!result.exists);
        assert!(!result.valid);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn check_result_collects_issues() {
        let mut config = AppConfig::default();
        config.settings.color = "sometimes".to_string();
        let result = check_result(&PathBuf::from("/tmp/c.toml"), Some(&config));
        assert!(result.exists);
        assert!(!result.valid);
        assert_eq!(result.issues.len(), 1);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["path"], "/tmp/c.toml");
        assert_eq!(json["valid"], false);
    }

    #[test]
    fn check_result_valid_defaults() {
        let result = check_result(&PathBuf::from("/tmp/c.toml"), Some(&AppConfig::default()));
        assert!(result.valid);
    }
}
