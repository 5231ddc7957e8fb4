//! Chat-platform (Slack Web API) client.
//!
//! Uses two endpoints under the configured API base:
//! - `channels.list` to map a channel name to its id
//! - `chat.postMessage` to relay the stored message
//!
//! Both pass the token as a query parameter, the way the Web API's
//! form-style methods accept it.

use async_trait::async_trait;
use hookrelay_core::error::{RelayError, Result};
use hookrelay_core::platform::{ChannelId, ChatPlatform, UpstreamResponse};
use serde::Deserialize;
use tracing::{debug, info, warn};

const SERVICE: &str = "slack";

pub struct SlackClient {
    api_base: String,
    client: reqwest::Client,
}

impl SlackClient {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self::with_client(api_base.into(), reqwest::Client::new())
    }

    pub fn with_client(api_base: impl AsRef<str>, client: reqwest::Client) -> Self {
        Self {
            api_base: api_base.as_ref().trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{method}", self.api_base)
    }
}

/// First channel whose display name is exactly `name`.
fn find_channel<'a>(channels: &'a [ApiChannel], name: &str) -> Option<&'a ApiChannel> {
    channels.iter().find(|c| c.name == name)
}

#[async_trait]
impl ChatPlatform for SlackClient {
    fn name(&self) -> &str {
        SERVICE
    }

    async fn resolve_channel_id(&self, token: &str, channel_name: &str) -> Result<ChannelId> {
        let url = self.endpoint("channels.list");
        debug!(channel = %channel_name, "Listing channels");

        let response = self
            .client
            .get(&url)
            .query(&[("token", token), ("pretty", "1")])
            .send()
            .await
            .map_err(|e| RelayError::upstream(SERVICE, e.to_string()))?;

        let status = response.status().as_u16();
        let listing: ChannelListResponse = response.json().await.map_err(|e| {
            RelayError::upstream(
                SERVICE,
                format!("Failed to parse channels.list response (status {status}): {e}"),
            )
        })?;

        if listing.ok == Some(false) {
            let reason = listing.error.unwrap_or_else(|| "unknown error".into());
            warn!(status, error = %reason, "channels.list rejected");
            return Err(RelayError::upstream(SERVICE, format!("channels.list: {reason}")));
        }

        let channels = listing.channels.ok_or_else(|| {
            RelayError::upstream(SERVICE, "channels.list response has no channels")
        })?;

        let found = find_channel(&channels, channel_name)
            .ok_or_else(|| RelayError::ChannelNotFound(channel_name.to_string()))?;

        info!(channel = %channel_name, id = %found.id, "Resolved channel");
        Ok(ChannelId(found.id.clone()))
    }

    async fn post_message(
        &self,
        token: &str,
        channel: &ChannelId,
        text: &str,
    ) -> Result<UpstreamResponse> {
        let url = self.endpoint("chat.postMessage");

        let response = self
            .client
            .post(&url)
            .query(&[
                ("token", token),
                ("channel", channel.0.as_str()),
                ("text", text),
                ("pretty", "1"),
            ])
            .send()
            .await
            .map_err(|e| RelayError::upstream(SERVICE, e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| RelayError::upstream(SERVICE, e.to_string()))?;

        info!(channel = %channel, status, text_len = text.len(), "Message posted");
        Ok(UpstreamResponse { status, body })
    }
}

// --- Web API wire types ---

#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    #[serde(default)]
    ok: Option<bool>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    channels: Option<Vec<ApiChannel>>,
}

#[derive(Debug, Deserialize)]
struct ApiChannel {
    id: String,
    name: String,
}
