//! `hookrelay serve`: Start the relay HTTP server.

use hookrelay_config::AppConfig;
use std::path::Path;

/// Command-line values that win over file and environment settings.
#[derive(Debug, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub callback_url: Option<String>,
}

impl Overrides {
    pub fn apply(self, config: &mut AppConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = self.callback_url {
            config.server.callback_url = url;
        }
    }
}

pub async fn run(
    config_path: Option<&Path>,
    overrides: Overrides,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config =
        super::load_config(config_path).map_err(|e| format!("Failed to load config: {e}"))?;
    overrides.apply(&mut config);
    config.validate()?;

    println!("🔗 hookrelay");
    println!("   Listening: {}", config.server.bind_addr());
    println!("   Callback:  {}", config.server.callback_url);
    println!("   Slack API: {}", config.slack.api_base);

    hookrelay_gateway::start(config).await?;

    Ok(())
}
