//! Upstream platform clients.
//!
//! - [`mmx::MmxClient`] registers hooks on the message-queue platform
//! - [`slack::SlackClient`] resolves channels and posts messages
//!
//! Both wrap a single `reqwest::Client` that is reused for every call.
//! Nothing here retries; a failed call is reported once and the caller
//! decides what to do with it.

pub mod mmx;
pub mod slack;

pub use mmx::MmxClient;
pub use slack::SlackClient;

use hookrelay_config::AppConfig;
use std::time::Duration;

/// Build the shared HTTP client. `None` leaves requests without a timeout.
pub fn http_client(timeout: Option<Duration>) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

/// Build both platform clients from configuration, sharing one connection pool.
pub fn from_config(config: &AppConfig) -> Result<(MmxClient, SlackClient), reqwest::Error> {
    let client = http_client(config.http.timeout())?;
    Ok((
        MmxClient::with_client(client.clone()),
        SlackClient::with_client(&config.slack.api_base, client),
    ))
}
