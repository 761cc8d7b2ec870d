//! Gesture action library
//!
//! Named browser commands triggered by mouse gestures or shortcuts. A
//! recognizer resolves a gesture to a command name plus the invoking tab's
//! [`ExecutionContext`] and calls [`Dispatcher::dispatch`]; the command then
//! acts on the browser through a [`BrowserHost`].

pub mod agent;
pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod host;
pub mod registry;
pub mod types;

// Re-exports for convenience
pub use agent::{PageAgent, PageEnvironment, PageMessage, ScrollAnimation};
pub use commands::{Action, CommandContext, TargetKey};
pub use config::{Config, load_config};
pub use dispatcher::Dispatcher;
pub use error::{ActionError, HostError, HostResult, Result};
pub use host::{BrowserHost, MemoryHost};
pub use registry::CommandTable;
pub use types::{ExecutionContext, Payload};
