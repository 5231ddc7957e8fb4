//! Platform traits: the abstraction over the two upstream services.
//!
//! A `QueuePlatform` accepts hook registrations and later calls back into the
//! relay. A `ChatPlatform` resolves channel names and receives the relayed
//! message. Implementations live in `hookrelay-clients`; tests swap in
//! in-process fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;

/// Hook name registered with the queue platform.
pub const HOOK_NAME: &str = "message queued";

/// Event type the hook fires on.
pub const HOOK_EVENT_TYPE: &str = "MESSAGE_WITH_META";

/// Resolved chat-platform channel identifier (e.g. `C123`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub String);

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Body of a hook-creation call on the queue platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookCreateRequest {
    pub hook_name: String,
    pub event_type: String,
    /// Message-metadata match: a single header key mapped to its value.
    pub event_config: BTreeMap<String, String>,
    #[serde(rename = "targetURL")]
    pub target_url: String,
}

impl HookCreateRequest {
    /// Build the "message queued" hook that fires when a message carrying
    /// `header_key: header_value` in its metadata is queued.
    pub fn message_queued(
        header_key: impl Into<String>,
        header_value: impl Into<String>,
        target_url: impl Into<String>,
    ) -> Self {
        let mut event_config = BTreeMap::new();
        event_config.insert(header_key.into(), header_value.into());
        Self {
            hook_name: HOOK_NAME.into(),
            event_type: HOOK_EVENT_TYPE.into(),
            event_config,
            target_url: target_url.into(),
        }
    }
}

/// Application credentials sent as headers on queue-platform calls.
#[derive(Clone)]
pub struct QueueCredentials {
    pub app_id: String,
    pub api_key: String,
}

impl std::fmt::Debug for QueueCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueCredentials")
            .field("app_id", &self.app_id)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Raw upstream reply. Callers log it but never interpret it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The message-queue platform that hooks are registered with.
#[async_trait]
pub trait QueuePlatform: Send + Sync {
    /// A human-readable name for this platform (e.g., "mmx").
    fn name(&self) -> &str;

    /// POST `request` to the hook endpoint at `url`.
    ///
    /// Only transport failures are errors; any HTTP reply is returned as-is.
    async fn register_hook(
        &self,
        url: &str,
        credentials: &QueueCredentials,
        request: &HookCreateRequest,
    ) -> Result<UpstreamResponse>;
}

/// The team-chat platform that messages are relayed to.
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// A human-readable name for this platform (e.g., "slack").
    fn name(&self) -> &str;

    /// Find the id of the channel whose display name equals `channel_name`.
    async fn resolve_channel_id(&self, token: &str, channel_name: &str) -> Result<ChannelId>;

    /// Post `text` to `channel`. The platform's reply is returned unparsed.
    async fn post_message(
        &self,
        token: &str,
        channel: &ChannelId,
        text: &str,
    ) -> Result<UpstreamResponse>;
}
