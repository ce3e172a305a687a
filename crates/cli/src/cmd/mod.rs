//! CLI command implementations
//!
//! This module contains all command implementations for the shipit CLI.

pub mod add_subhook;
pub mod dispatch;
pub mod init;
pub mod remote;
pub mod run_hook;
