use super::*;
use hookrelay_core::error::RelayError;
use std::sync::Mutex;

// ── Mock platforms ───────────────────────────────────────────────────────

/// Chat platform with a fixed channel list that records every post.
struct FakeChat {
    channels: Vec<(&'static str, &'static str)>,
    posts: Mutex<Vec<(String, String, String)>>,
}

impl FakeChat {
    fn with_channels(channels: Vec<(&'static str, &'static str)>) -> Self {
        Self {
            channels,
            posts: Mutex::new(Vec::new()),
        }
    }

    fn posts(&self) -> Vec<(String, String, String)> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ChatPlatform for FakeChat {
    fn name(&self) -> &str {
        "fake_chat"
    }

    async fn resolve_channel_id(&self, _token: &str, channel_name: &str) -> Result<ChannelId> {
        self.channels
            .iter()
            .find(|(name, _)| *name == channel_name)
            .map(|(_, id)| ChannelId((*id).into()))
            .ok_or_else(|| RelayError::ChannelNotFound(channel_name.into()))
    }

    async fn post_message(
        &self,
        token: &str,
        channel: &ChannelId,
        text: &str,
    ) -> Result<UpstreamResponse> {
        self.posts
            .lock()
            .unwrap()
            .push((token.into(), channel.0.clone(), text.into()));
        Ok(UpstreamResponse {
            status: 200,
            body: r#"{"ok":true}"#.into(),
        })
    }
}

/// Queue platform that records hook registrations, optionally failing.
#[derive(Default)]
struct FakeQueue {
    hooks: Mutex<Vec<(String, String, HookCreateRequest)>>,
    unreachable: bool,
    reply_status: Option<u16>,
}

impl FakeQueue {
    fn hooks(&self) -> Vec<(String, String, HookCreateRequest)> {
        self.hooks.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl QueuePlatform for FakeQueue {
    fn name(&self) -> &str {
        "fake_queue"
    }

    async fn register_hook(
        &self,
        url: &str,
        credentials: &QueueCredentials,
        request: &HookCreateRequest,
    ) -> Result<UpstreamResponse> {
        if self.unreachable {
            return Err(RelayError::upstream("fake_queue", "connection refused"));
        }
        self.hooks
            .lock()
            .unwrap()
            .push((url.into(), credentials.app_id.clone(), request.clone()));
        Ok(UpstreamResponse {
            status: self.reply_status.unwrap_or(201),
            body: String::new(),
        })
    }
}

const CALLBACK: &str = "http://localhost:5000/callback";

fn setup(body: &str) -> SetupRequest {
    SetupRequest {
        mmx_url: "http://q/hook".into(),
        mmx_app_id: "A1".into(),
        mmx_api_key: "K1".into(),
        mmx_hdr_key: "H".into(),
        mmx_hdr_value: "V".into(),
        slack_api_token: "T".into(),
        slack_channel_name: "general".into(),
        slack_msg_body: body.into(),
    }
}

fn relay_with(queue: Arc<FakeQueue>, chat: Arc<FakeChat>) -> Relay {
    Relay::new(queue, chat, Arc::new(SessionStore::default()), CALLBACK)
}

fn general_chat() -> Arc<FakeChat> {
    Arc::new(FakeChat::with_channels(vec![
        ("random", "C001"),
        ("general", "C123"),
    ]))
}

// ── Registrar ────────────────────────────────────────────────────────────

#[tokio::test]
async fn setup_resolves_and_stores_channel_id() {
    let relay = relay_with(Arc::new(FakeQueue::default()), general_chat());

    let outcome = relay.create_hook(setup("hello")).await.unwrap();
    assert_eq!(outcome.channel_id, ChannelId("C123".into()));
    assert_eq!(outcome.hook.target_url, relay.target_url(&outcome.session_id));

    let current = relay.sessions().current().await.unwrap();
    assert_eq!(current.id, outcome.session_id);
    assert_eq!(current.channel_id, Some(ChannelId("C123".into())));
    assert_eq!(current.token, "T");
    assert_eq!(current.message_body, "hello");
}

#[tokio::test]
async fn hook_body_carries_event_config_and_callback_target() {
    let queue = Arc::new(FakeQueue::default());
    let relay = relay_with(queue.clone(), general_chat());

    let outcome = relay.create_hook(setup("hello")).await.unwrap();

    let hooks = queue.hooks();
    assert_eq!(hooks.len(), 1);
    let (url, app_id, hook) = &hooks[0];
    assert_eq!(url, "http://q/hook");
    assert_eq!(app_id, "A1");

    let json = serde_json::to_value(hook).unwrap();
    assert_eq!(json["eventConfig"], serde_json::json!({"H": "V"}));
    assert_eq!(json["hookName"], "message queued");
    assert_eq!(json["eventType"], "MESSAGE_WITH_META");
    let target = json["targetURL"].as_str().unwrap();
    assert!(target.starts_with(CALLBACK));
    assert_eq!(target, format!("{CALLBACK}?session={}", outcome.session_id));
}

#[tokio::test]
async fn unknown_channel_leaves_session_partially_set() {
    let queue = Arc::new(FakeQueue::default());
    let relay = relay_with(queue.clone(), general_chat());

    let mut request = setup("hello");
    request.slack_channel_name = "missing".into();
    let err = relay.create_hook(request).await.unwrap_err();
    assert!(matches!(err, RelayError::ChannelNotFound(_)));

    // Token, name, and body are stored; the channel id is not.
    let current = relay.sessions().current().await.unwrap();
    assert_eq!(current.token, "T");
    assert_eq!(current.channel_name, "missing");
    assert_eq!(current.message_body, "hello");
    assert!(current.channel_id.is_none());

    // No hook was registered.
    assert!(queue.hooks().is_empty());
}

#[tokio::test]
async fn queue_transport_failure_surfaces() {
    let queue = Arc::new(FakeQueue {
        unreachable: true,
        ..FakeQueue::default()
    });
    let relay = relay_with(queue, general_chat());

    let err = relay.create_hook(setup("hello")).await.unwrap_err();
    assert!(matches!(err, RelayError::Upstream { .. }));
}

#[tokio::test]
async fn queue_rejection_is_not_an_error() {
    let queue = Arc::new(FakeQueue {
        reply_status: Some(401),
        ..FakeQueue::default()
    });
    let relay = relay_with(queue, general_chat());

    let outcome = relay.create_hook(setup("hello")).await.unwrap();
    assert_eq!(outcome.hook_response.status, 401);
}

#[test]
fn target_url_respects_existing_query() {
    let relay = Relay::new(
        Arc::new(FakeQueue::default()),
        general_chat(),
        Arc::new(SessionStore::default()),
        "https://relay.example.com/callback?team=ops",
    );
    let id = SessionId("abc".into());
    assert_eq!(
        relay.target_url(&id),
        "https://relay.example.com/callback?team=ops&session=abc"
    );
}

// ── Callback handler ─────────────────────────────────────────────────────

#[tokio::test]
async fn callback_before_setup_fails() {
    let chat = general_chat();
    let relay = relay_with(Arc::new(FakeQueue::default()), chat.clone());

    let err = relay.handle_callback(None).await.unwrap_err();
    assert!(matches!(err, RelayError::NotConfigured));
    assert!(chat.posts().is_empty());
}

#[tokio::test]
async fn callback_posts_current_message() {
    let chat = general_chat();
    let relay = relay_with(Arc::new(FakeQueue::default()), chat.clone());
    relay.create_hook(setup("hello")).await.unwrap();

    let response = relay.handle_callback(None).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(
        chat.posts(),
        vec![("T".to_string(), "C123".to_string(), "hello".to_string())]
    );
}

#[tokio::test]
async fn second_setup_overwrites_first() {
    let chat = general_chat();
    let relay = relay_with(Arc::new(FakeQueue::default()), chat.clone());

    relay.create_hook(setup("first")).await.unwrap();
    let mut second = setup("second");
    second.slack_channel_name = "random".into();
    relay.create_hook(second).await.unwrap();

    relay.handle_callback(None).await.unwrap();
    let posts = chat.posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].1, "C001");
    assert_eq!(posts[0].2, "second");
}

#[tokio::test]
async fn callback_with_session_id_uses_that_session() {
    let chat = general_chat();
    let relay = relay_with(Arc::new(FakeQueue::default()), chat.clone());

    let first = relay.create_hook(setup("first")).await.unwrap();
    relay.create_hook(setup("second")).await.unwrap();

    relay.handle_callback(Some(&first.session_id)).await.unwrap();
    assert_eq!(chat.posts()[0].2, "first");
}

#[tokio::test]
async fn callback_with_unknown_session_fails() {
    let relay = relay_with(Arc::new(FakeQueue::default()), general_chat());
    relay.create_hook(setup("hello")).await.unwrap();

    let err = relay
        .handle_callback(Some(&SessionId("nope".into())))
        .await
        .unwrap_err();
    assert!(matches!(err, RelayError::SessionNotFound(_)));
}

#[tokio::test]
async fn callback_after_failed_resolution_is_missing_field() {
    let chat = general_chat();
    let relay = relay_with(Arc::new(FakeQueue::default()), chat.clone());

    let mut request = setup("hello");
    request.slack_channel_name = "missing".into();
    let _ = relay.create_hook(request).await;

    let err = relay.handle_callback(None).await.unwrap_err();
    assert!(matches!(err, RelayError::MissingField("channel_id")));
    assert!(chat.posts().is_empty());
}

#[test]
fn setup_request_debug_redacts_secrets() {
    let debug = format!("{:?}", setup("hello"));
    assert!(debug.contains("general"));
    assert!(!debug.contains("K1"));
    assert!(debug.contains("[REDACTED]"));
}

#[test]
fn setup_request_requires_every_field() {
    let partial = serde_json::json!({
        "mmx_url": "http://q/hook",
        "mmx_app_id": "A1"
    });
    assert!(serde_json::from_value::<SetupRequest>(partial).is_err());
}
