//! `hookrelay doctor`: Diagnose configuration problems.

use hookrelay_config::AppConfig;
use std::path::Path;

/// Problems that won't stop the server from starting but will break the relay.
pub fn diagnose(config: &AppConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    let callback = config.server.callback_url.to_lowercase();
    if ["://localhost", "://127.0.0.1", "://[::1]"]
        .iter()
        .any(|h| callback.contains(h))
    {
        warnings.push(format!(
            "Callback URL {} is loopback; the queue platform can only reach it from this host",
            config.server.callback_url
        ));
    }

    if !callback.contains(&format!(":{}/", config.server.port))
        && callback.contains("://localhost")
    {
        warnings.push(format!(
            "Callback URL does not use the listen port {}",
            config.server.port
        ));
    }

    if config.http.timeout_secs.is_none() {
        warnings.push("No upstream timeout set; a hung platform call blocks its request".into());
    }

    warnings
}

pub fn run(config_path: Option<&Path>) {
    println!("🩺 hookrelay Doctor — Configuration Diagnostics");
    println!("==============================================\n");

    let file = super::config_file(config_path);
    if file.exists() {
        println!("  ✅ Config file found at {}", file.display());
    } else {
        println!("  ⚠️  No config file at {} — using defaults", file.display());
    }

    let config = match super::load_config(config_path) {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            return;
        }
    };

    let warnings = diagnose(&config);
    for w in &warnings {
        println!("  ⚠️  {w}");
    }

    println!();
    if warnings.is_empty() {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {} issue(s) found. See above for details.", warnings.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_warns_about_loopback_callback() {
        let warnings = diagnose(&AppConfig::default());
        assert!(warnings.iter().any(|w| w.contains("loopback")));
        assert!(warnings.iter().any(|w| w.contains("timeout")));
    }

    #[test]
    fn public_callback_with_timeout_is_clean() {
        let mut config = AppConfig::default();
        config.server.callback_url = "https://relay.example.com/callback".into();
        config.http.timeout_secs = Some(30);
        assert!(diagnose(&config).is_empty());
    }

    #[test]
    fn port_mismatch_detected() {
        let mut config = AppConfig::default();
        config.server.port = 6000;
        let warnings = diagnose(&config);
        assert!(warnings.iter().any(|w| w.contains("listen port 6000")));
    }
}
