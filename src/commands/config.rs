//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config get`: Print one value
//! - `config set`: Set a configuration value

use owo_colors::OwoColorize;
use serde_json::json;

use super::{AppContext, CommandOutput, OutputOptions};
use crate::config::{Config, mask_sensitive_value};
use crate::error::{FeedbackError, Result};

/// Show current configuration
pub fn cmd_config_show(ctx: &AppContext, output: OutputOptions) -> Result<()> {
    let config = &ctx.config;
    let path = Config::config_path()?;
    let token = config.token().map(|t| mask_sensitive_value(&t));

    let json_output = json!({
        "base_url": config.base_url(),
        "user": ctx.session.user(),
        "page_size": config.page_size(),
        "timeout_secs": config.timeout_secs,
        "auth": {
            "token_configured": token.is_some(),
        },
        "config_file": path.to_string_lossy(),
    });

    let mut text = format!("{}\n\n", "Configuration:".cyan().bold());
    text.push_str(&format!("{}: {}\n", "base_url".cyan(), config.base_url()));
    text.push_str(&format!("{}: {}\n", "user".cyan(), ctx.session.user()));
    text.push_str(&format!("{}: {}\n", "page_size".cyan(), config.page_size()));
    let timeout = if config.timeout_secs == 0 {
        "none".dimmed().to_string()
    } else {
        format!("{}s", config.timeout_secs)
    };
    text.push_str(&format!("{}: {}\n", "timeout_secs".cyan(), timeout));
    let token_status = match token {
        Some(masked) => masked.green().to_string(),
        None => "not configured".dimmed().to_string(),
    };
    text.push_str(&format!("{}: {}\n\n", "auth.token".cyan(), token_status));
    text.push_str(&format!("{}", format!("Config file: {}", path.display()).dimmed()));

    CommandOutput::new(json_output).with_text(text).print(output)
}

/// Get a specific configuration value
pub fn cmd_config_get(ctx: &AppContext, key: &str, output: OutputOptions) -> Result<()> {
    let value = ctx
        .config
        .get_value(key)?
        .ok_or_else(|| FeedbackError::Config(format!("{key} not set")))?;

    CommandOutput::new(json!({ "key": key, "value": value }))
        .with_text(value)
        .print(output)
}

/// Set a configuration value and save the file
pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    let mut config = Config::load()?;
    config.set_value(key, value)?;
    config.save()?;

    let shown = if key == "auth.token" {
        mask_sensitive_value(value)
    } else {
        value.to_string()
    };
    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "success": true,
    }))
    .with_text(format!("Set {} to {}", key.cyan(), shown))
    .print(output)
}
