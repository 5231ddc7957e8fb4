//! The setup request accepted by the registrar.

use serde::Deserialize;

/// Body of `POST /createHook`. Every field is required.
#[derive(Clone, Deserialize)]
pub struct SetupRequest {
    /// Queue-platform hook endpoint.
    pub mmx_url: String,
    pub mmx_app_id: String,
    pub mmx_api_key: String,
    /// Metadata header the hook matches on.
    pub mmx_hdr_key: String,
    pub mmx_hdr_value: String,
    pub slack_api_token: String,
    pub slack_channel_name: String,
    pub slack_msg_body: String,
}

impl std::fmt::Debug for SetupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetupRequest")
            .field("mmx_url", &self.mmx_url)
            .field("mmx_app_id", &self.mmx_app_id)
            .field("mmx_api_key", &"[REDACTED]")
            .field("mmx_hdr_key", &self.mmx_hdr_key)
            .field("mmx_hdr_value", &self.mmx_hdr_value)
            .field("slack_api_token", &"[REDACTED]")
            .field("slack_channel_name", &self.slack_channel_name)
            .field("slack_msg_body_len", &self.slack_msg_body.len())
            .finish()
    }
}
