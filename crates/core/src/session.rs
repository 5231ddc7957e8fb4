//! Relay session state.
//!
//! Each setup call creates a fresh [`RelaySession`] and makes it current.
//! Records are never mutated after the channel id is resolved, so a callback
//! that has already read a session keeps relaying that session even if a new
//! setup call lands in the meantime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{RelayError, Result};
use crate::platform::ChannelId;

/// Default number of sessions kept addressable by id.
pub const DEFAULT_MAX_RETAINED: usize = 100;

/// Identifier handed to the queue platform in the hook's target URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The relay configuration captured by one setup call.
#[derive(Clone)]
pub struct RelaySession {
    pub id: SessionId,
    /// Chat-platform API token.
    pub token: String,
    /// Channel display name the setup call asked for.
    pub channel_name: String,
    /// Resolved channel; `None` until resolution succeeds.
    pub channel_id: Option<ChannelId>,
    pub message_body: String,
    pub created_at: DateTime<Utc>,
}

impl RelaySession {
    pub fn new(
        token: impl Into<String>,
        channel_name: impl Into<String>,
        message_body: impl Into<String>,
    ) -> Self {
        Self {
            id: SessionId::new(),
            token: token.into(),
            channel_name: channel_name.into(),
            channel_id: None,
            message_body: message_body.into(),
            created_at: Utc::now(),
        }
    }

    /// The resolved channel, or `MissingField` if resolution never succeeded.
    pub fn require_channel_id(&self) -> Result<&ChannelId> {
        self.channel_id
            .as_ref()
            .ok_or(RelayError::MissingField("channel_id"))
    }
}

impl std::fmt::Debug for RelaySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelaySession")
            .field("id", &self.id)
            .field("token", &"[REDACTED]")
            .field("channel_name", &self.channel_name)
            .field("channel_id", &self.channel_id)
            .field("message_body_len", &self.message_body.len())
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Holds the current session plus a bounded history addressable by id.
///
/// The newest record is always the current one. When the store is full the
/// oldest record is evicted; callbacks that still reference it fail with
/// `SessionNotFound`.
pub struct SessionStore {
    sessions: RwLock<VecDeque<RelaySession>>,
    max_retained: usize,
}

impl SessionStore {
    pub fn new(max_retained: usize) -> Self {
        Self {
            sessions: RwLock::new(VecDeque::new()),
            max_retained: max_retained.max(1),
        }
    }

    /// Store a new record and make it current. Returns its id.
    pub async fn begin(&self, session: RelaySession) -> SessionId {
        let id = session.id.clone();
        let mut sessions = self.sessions.write().await;
        sessions.push_back(session);
        while sessions.len() > self.max_retained {
            if let Some(evicted) = sessions.pop_front() {
                debug!(session = %evicted.id, "Evicted relay session");
            }
        }
        id
    }

    /// Record the resolved channel for the session `id`.
    pub async fn set_channel_id(&self, id: &SessionId, channel_id: ChannelId) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| RelayError::SessionNotFound(id.to_string()))?;
        session.channel_id = Some(channel_id);
        Ok(())
    }

    /// A snapshot of the current session.
    pub async fn current(&self) -> Result<RelaySession> {
        self.sessions
            .read()
            .await
            .back()
            .cloned()
            .ok_or(RelayError::NotConfigured)
    }

    /// A snapshot of the session `id`.
    pub async fn get(&self, id: &SessionId) -> Result<RelaySession> {
        self.sessions
            .read()
            .await
            .iter()
            .find(|s| &s.id == id)
            .cloned()
            .ok_or_else(|| RelayError::SessionNotFound(id.to_string()))
    }

    /// Whether any setup call has stored a session yet.
    pub async fn is_configured(&self) -> bool {
        !self.sessions.read().await.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETAINED)
    }
}
