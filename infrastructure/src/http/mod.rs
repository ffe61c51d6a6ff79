//! HTTP adapter for the chat service REST API.

pub mod error;
pub mod service;
pub mod wire;

pub use error::HttpError;
pub use service::HttpChatService;
