use anyhow::Result;
use colored::Colorize;
use saas_pricing_calculator::config::{self, Config};
use std::path::Path;
use tracing::info;

/// Execute the config show command
///
/// Displays the current configuration with secrets masked
pub fn show(config_path: &Path) -> Result<()> {
    println!("{}", "Loading configuration...".yellow());
    info!("Loading configuration for display");

    let cfg = config::load_config(config_path)?;
    let sanitized = sanitize_secrets(&cfg);

    println!("{}", "Current Configuration:".green().bold());
    println!();

    let toml_string = toml::to_string_pretty(&sanitized)?;
    println!("{}", toml_string);

    Ok(())
}

/// Execute the config validate command
pub fn validate(config_path: &Path) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());

    let cfg = config::load_config(config_path)?;

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    println!("  API Keys: {} ({} enabled)", cfg.api_keys.len(), count_enabled_keys(&cfg));
    println!("  Catalog Plans: {} ({})", cfg.catalog.plans.len(), cfg.catalog.currency);
    println!("  Activity Entries: {}", cfg.activity.max_entries);

    info!("Configuration validation successful");
    Ok(())
}

/// Mask operator API keys for safe display
fn sanitize_secrets(cfg: &Config) -> Config {
    let mut sanitized = cfg.clone();
    for key in &mut sanitized.api_keys {
        key.key = mask_api_key(&key.key);
    }
    sanitized
}

/// Mask an API key for safe display
///
/// Shows first 7 and last 4 characters
/// Example: "pk-1234567890abcdef" -> "pk-1234...cdef"
fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 11 {
        // Too short to mask meaningfully
        return "***".to_string();
    }

    let prefix: String = chars[..7].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();

    format!("{}...{}", prefix, suffix)
}

fn count_enabled_keys(cfg: &Config) -> usize {
    cfg.api_keys.iter().filter(|k| k.enabled).count()
}
