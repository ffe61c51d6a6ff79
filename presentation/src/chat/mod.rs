//! Interactive chat module
//!
//! Provides a readline-based chat REPL driven by the [`ChatController`](chatsync_application::ChatController).

mod command;
mod repl;

pub use command::{ReplCommand, resolve_open_target};
pub use repl::ChatRepl;
