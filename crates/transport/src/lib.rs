#![deny(unsafe_code)]

//! HTTP transport for the chat widget: chat, lead submission and health endpoints.

mod client;
mod error;
mod types;

pub use client::{
    BoxFuture, ChatBackend, DEFAULT_CHAT_PATH, DEFAULT_HEALTH_PATH, DEFAULT_LEAD_PATH, Endpoints,
    HttpTransport,
};
pub use error::{FailureKind, TransportError, TransportResult};
pub use types::{ChatReply, ChatRequest, HealthStatus, LEAD_SOURCE, LeadAck, LeadSubmission, Turn};
