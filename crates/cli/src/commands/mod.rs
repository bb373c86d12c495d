//! CLI subcommand implementations.

pub mod chat;
pub mod session;
