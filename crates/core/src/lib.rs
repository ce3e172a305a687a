//! Core types for shipit
//!
//! This is the foundation crate that the engine and CLI depend on.
//! It provides:
//! - Base error types
//! - Project naming rules and bare-repository path derivation
//! - Environment variable names shared between the CLI, the dispatcher
//!   and subhook scripts
//!
//! This crate has no dependencies on other shipit crates.

pub mod env;
pub mod error;
pub mod project;

pub use error::{Error, Result};
pub use project::ProjectName;
