//! `hookrelay config`: Configuration management commands.

use std::path::Path;

pub fn show(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config =
        super::load_config(config_path).map_err(|e| format!("Failed to load config: {e}"))?;
    println!("{}", config.to_toml());
    Ok(())
}

pub fn path(config_path: Option<&Path>) {
    println!("{}", super::config_file(config_path).display());
}

pub fn validate(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    match super::load_config(config_path) {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");
            println!();
            println!("   Listen:    {}", config.server.bind_addr());
            println!("   Callback:  {}", config.server.callback_url);
            println!("   Slack API: {}", config.slack.api_base);
            println!(
                "   Timeout:   {}",
                config
                    .http
                    .timeout_secs
                    .map(|s| format!("{s}s"))
                    .unwrap_or_else(|| "none".into())
            );
            println!("   Sessions:  {} retained", config.sessions.max_retained);
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}
