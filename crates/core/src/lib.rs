//! # hookrelay core
//!
//! Domain types, traits, and error definitions for the hookrelay service.
//! This crate has no HTTP or web-framework dependencies (only `tokio` sync
//! primitives, `uuid`, and `chrono`); it defines the relay model that the
//! client, relay, and gateway crates implement against.
//!
//! ## Layout
//!
//! - [`platform`]: the two upstream seams (`QueuePlatform`, `ChatPlatform`)
//!   and the payload types that cross them
//! - [`session`]: relay session records and the store that holds them
//! - [`error`]: the `RelayError` taxonomy

pub mod error;
pub mod platform;
pub mod session;

// Re-export key types at crate root for ergonomics
pub use error::{RelayError, Result};
pub use platform::{
    ChannelId, ChatPlatform, HookCreateRequest, QueuePlatform, QueueCredentials, UpstreamResponse,
};
pub use session::{RelaySession, SessionId, SessionStore};
