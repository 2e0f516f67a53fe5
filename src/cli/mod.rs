// src/cli/mod.rs
//! CLI command handlers.

pub mod args;
pub mod dispatch;
pub mod handlers;

pub use args::{ChangeCommand, Cli, Commands, DropCommand};
