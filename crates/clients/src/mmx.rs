//! Message-queue platform client.
//!
//! Registers a webhook through the platform's REST hook endpoint. The
//! endpoint URL is supplied per call by the setup request, so the client
//! itself carries no base URL.

use async_trait::async_trait;
use hookrelay_core::error::{RelayError, Result};
use hookrelay_core::platform::{
    HookCreateRequest, QueueCredentials, QueuePlatform, UpstreamResponse,
};
use tracing::{debug, info};

/// Header carrying the application id.
pub const HEADER_APP_ID: &str = "X-mmx-app-id";

/// Header carrying the REST API key.
pub const HEADER_API_KEY: &str = "X-mmx-api-key";

const SERVICE: &str = "mmx";

pub struct MmxClient {
    client: reqwest::Client,
}

impl MmxClient {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for MmxClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueuePlatform for MmxClient {
    fn name(&self) -> &str {
        SERVICE
    }

    async fn register_hook(
        &self,
        url: &str,
        credentials: &QueueCredentials,
        request: &HookCreateRequest,
    ) -> Result<UpstreamResponse> {
        debug!(
            url = %url,
            app_id = %credentials.app_id,
            hook = %request.hook_name,
            target = %request.target_url,
            "Registering hook"
        );

        let response = self
            .client
            .post(url)
            .header(HEADER_APP_ID, &credentials.app_id)
            .header(HEADER_API_KEY, &credentials.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| RelayError::upstream(SERVICE, e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| RelayError::upstream(SERVICE, e.to_string()))?;

        info!(status, body_len = body.len(), "Hook registration answered");
        Ok(UpstreamResponse { status, body })
    }
}
