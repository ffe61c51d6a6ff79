//! Configuration file loading for chatsync
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `CHATSYNC_ENDPOINT` / `CHATSYNC_<SECTION>__<KEY>` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./chatsync.toml` or `./.chatsync.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/chatsync/config.toml`
//! 5. Default values

mod file_config;
mod loader;
mod validation;

pub use file_config::{
    DEFAULT_ENDPOINT, FileConfig, FileLoggingConfig, FileReplConfig, FileServiceConfig,
};
pub use loader::ConfigLoader;
pub use validation::{ConfigIssue, Severity};
