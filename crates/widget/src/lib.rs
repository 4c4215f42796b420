#![deny(unsafe_code)]

//! Chat widget client: message exchange, lead capture and the session state they share.
//!
//! Rendering goes through [`view::WidgetView`]; the backend through
//! [`chatline_transport::ChatBackend`].
pub mod app;
/// Conversation buffer, formatter and the chat exchange controller.
pub mod chat;
pub mod events;
/// Lead invitation, form surface and submission.
pub mod lead;
pub mod session;
/// Layered settings loaded through figment.
pub mod settings;
pub mod terminal;
pub mod view;

#[cfg(test)]
mod test_support;
