//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use tracing::debug;

use orderscan_core::AppConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "llm.model")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },

    /// Show configuration file path and API key status
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path.map(PathBuf::from).unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => show_config(&path),
        ConfigCommand::Init(init_args) => init_config(init_args, &path),
        ConfigCommand::Get { key } => get_config(&path, &key),
        ConfigCommand::Set { key, value } => set_config(&path, &key, &value),
        ConfigCommand::Path => show_path(&path),
    }
}

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("orderscan")
        .join("config.json")
}

/// Load configuration for a command.
///
/// An explicit path must exist. Without one, the default location is used
/// when present and built-in defaults otherwise.
pub fn load(config_path: Option<&str>) -> anyhow::Result<AppConfig> {
    if let Some(path) = config_path {
        return Ok(AppConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(AppConfig::from_file(&default_path)?)
    } else {
        Ok(AppConfig::default())
    }
}

fn load_or_default(path: &Path) -> anyhow::Result<AppConfig> {
    if path.exists() {
        Ok(AppConfig::from_file(path)?)
    } else {
        Ok(AppConfig::default())
    }
}

fn show_config(path: &Path) -> anyhow::Result<()> {
    let mut config = if path.exists() {
        AppConfig::from_file(path)?
    } else {
        eprintln!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
        AppConfig::default()
    };

    if config.llm.api_key.is_some() {
        config.llm.api_key = Some("********".to_string());
    }

    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(args: InitArgs, path: &Path) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(|| path.to_path_buf());

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    // Create parent directory if needed
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let config = AppConfig::default();
    config.save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

/// Look up a dotted key such as `llm.model` in a JSON value.
fn lookup<'a>(json: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
    key.split('.').try_fold(json, |current, part| current.get(part))
}

fn get_config(path: &Path, key: &str) -> anyhow::Result<()> {
    let config = load_or_default(path)?;

    // Convert config to JSON for key lookup
    let json = serde_json::to_value(&config)?;
    let value = lookup(&json, key)
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;

    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

fn set_config(path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let config = load_or_default(path)?;

    // Parse the value
    let parsed_value: serde_json::Value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));

    // Convert config to JSON, modify, and convert back
    let mut json = serde_json::to_value(&config)?;
    let known_before = lookup(&json, key).is_some();

    let parts: Vec<&str> = key.split('.').collect();
    let mut current = &mut json;

    for (i, part) in parts.iter().enumerate() {
        if i == parts.len() - 1 {
            if let Some(obj) = current.as_object_mut() {
                obj.insert((*part).to_string(), parsed_value.clone());
            } else {
                anyhow::bail!("Cannot set value at non-object path");
            }
        } else {
            current = current.get_mut(*part).ok_or_else(|| {
                anyhow::anyhow!("Configuration path not found: {}", key)
            })?;
        }
    }

    let config: AppConfig = serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;

    // Unknown fields are dropped on deserialization
    if !known_before && lookup(&serde_json::to_value(&config)?, key).is_none() {
        anyhow::bail!("Configuration key not found: {}", key);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;

    let shown = if key == "llm.api_key" {
        "\"********\"".to_string()
    } else {
        serde_json::to_string(&parsed_value)?
    };
    println!("{} Set {} = {}", style("✓").green(), key, shown);

    Ok(())
}

fn show_path(path: &Path) -> anyhow::Result<()> {
    println!("Configuration file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'orderscan config init' to create a configuration file.");
    }

    let config = load_or_default(path)?;
    let key_status = if config.resolve_api_key().is_some() {
        style("configured".to_string()).green()
    } else {
        style(format!("missing (set {} or llm.api_key)", config.llm.api_key_env)).red()
    };
    println!("API key: {}", key_status);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_sees_later_changes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let path_str = path.to_str().unwrap();

        AppConfig::default().save(&path).unwrap();
        assert_eq!(load(Some(path_str)).unwrap().llm.api_key, None);

        set_config(&path, "llm.api_key", "sk-added-later").unwrap();
        assert_eq!(
            load(Some(path_str)).unwrap().llm.api_key.as_deref(),
            Some("sk-added-later")
        );
    }

    #[test]
    fn test_set_unknown_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let err = set_config(&path, "llm.modle", "x").unwrap_err();
        assert!(err.to_string().contains("llm.modle"));
        assert!(!path.exists());

        let err = set_config(&path, "nothing.here", "x").unwrap_err();
        assert!(err.to_string().contains("nothing.here"));
    }

    #[test]
    fn test_set_optional_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        set_config(&path, "llm.timeout_secs", "30").unwrap();
        assert_eq!(AppConfig::from_file(&path).unwrap().llm.timeout_secs, Some(30));
    }

    #[test]
    fn test_lookup_dotted_key() {
        let json = serde_json::json!({"llm": {"model": "deepseek-chat"}});
        assert_eq!(lookup(&json, "llm.model"), Some(&serde_json::json!("deepseek-chat")));
        assert_eq!(lookup(&json, "llm.modle"), None);
    }
}
