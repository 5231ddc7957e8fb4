//! The relay flow: hook registration and callback delivery.
//!
//! [`Relay::create_hook`] captures a setup request as a new session,
//! resolves the target channel, and registers a hook whose target URL
//! points back at this service. [`Relay::handle_callback`] later reads that
//! session and posts its message to the chat platform.

mod setup;

pub use setup::SetupRequest;

use std::sync::Arc;

use hookrelay_core::error::Result;
use hookrelay_core::platform::{
    ChannelId, ChatPlatform, HookCreateRequest, QueueCredentials, QueuePlatform,
    UpstreamResponse,
};
use hookrelay_core::session::{RelaySession, SessionId, SessionStore};
use tracing::{info, warn};

/// Query parameter that carries the session id on callbacks.
pub const SESSION_QUERY_PARAM: &str = "session";

/// What a successful setup call produced.
#[derive(Debug, Clone)]
pub struct SetupOutcome {
    pub session_id: SessionId,
    pub channel_id: ChannelId,
    pub hook: HookCreateRequest,
    /// Raw reply from the queue platform; logged, never interpreted.
    pub hook_response: UpstreamResponse,
}

/// Orchestrates the two upstream platforms around a session store.
pub struct Relay {
    queue: Arc<dyn QueuePlatform>,
    chat: Arc<dyn ChatPlatform>,
    sessions: Arc<SessionStore>,
    callback_url: String,
}

impl Relay {
    pub fn new(
        queue: Arc<dyn QueuePlatform>,
        chat: Arc<dyn ChatPlatform>,
        sessions: Arc<SessionStore>,
        callback_url: impl Into<String>,
    ) -> Self {
        Self {
            queue,
            chat,
            sessions,
            callback_url: callback_url.into(),
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn callback_url(&self) -> &str {
        &self.callback_url
    }

    /// Callback URL tagged with `session` so the hook names its own record.
    pub fn target_url(&self, session: &SessionId) -> String {
        let sep = if self.callback_url.contains('?') { '&' } else { '?' };
        format!("{}{sep}{SESSION_QUERY_PARAM}={session}", self.callback_url)
    }

    /// Handle a setup request.
    ///
    /// The session is stored before channel resolution, so a failed lookup
    /// leaves it current with `channel_id` unset. Callbacks against it then
    /// fail with `MissingField`.
    pub async fn create_hook(&self, request: SetupRequest) -> Result<SetupOutcome> {
        let SetupRequest {
            mmx_url,
            mmx_app_id,
            mmx_api_key,
            mmx_hdr_key,
            mmx_hdr_value,
            slack_api_token,
            slack_channel_name,
            slack_msg_body,
        } = request;
        let credentials = QueueCredentials {
            app_id: mmx_app_id,
            api_key: mmx_api_key,
        };
        let session = RelaySession::new(slack_api_token, slack_channel_name, slack_msg_body);
        let hook = HookCreateRequest::message_queued(
            mmx_hdr_key,
            mmx_hdr_value,
            self.target_url(&session.id),
        );

        let session_id = self.sessions.begin(session.clone()).await;
        info!(
            session = %session_id,
            channel = %session.channel_name,
            "Relay session stored"
        );

        let channel_id = self
            .chat
            .resolve_channel_id(&session.token, &session.channel_name)
            .await?;
        self.sessions
            .set_channel_id(&session_id, channel_id.clone())
            .await?;

        let hook_response = self
            .queue
            .register_hook(&mmx_url, &credentials, &hook)
            .await?;
        if !hook_response.is_success() {
            warn!(
                session = %session_id,
                status = hook_response.status,
                body = %hook_response.body,
                "Queue platform did not accept hook"
            );
        }

        Ok(SetupOutcome {
            session_id,
            channel_id,
            hook,
            hook_response,
        })
    }

    /// Relay the stored message for `session`, or for the current session
    /// when the callback carries no id.
    pub async fn handle_callback(&self, session: Option<&SessionId>) -> Result<UpstreamResponse> {
        let record: RelaySession = match session {
            Some(id) => self.sessions.get(id).await?,
            None => self.sessions.current().await?,
        };
        let channel_id = record.require_channel_id()?;

        let response = self
            .chat
            .post_message(&record.token, channel_id, &record.message_body)
            .await?;
        if !response.is_success() {
            warn!(
                session = %record.id,
                status = response.status,
                "Chat platform rejected relayed message"
            );
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests;
