//! Provisioning and hook-dispatch engine for shipit
//!
//! This crate owns everything between the CLI front end and the external
//! processes it drives (the git binary and operator-authored subhook
//! scripts):
//!
//! - `process`: blocking child-process execution with structured failures
//! - `repository`: bare repository creation and hook skeleton install
//! - `registry`: the ordered `post-receive.d` subhook directory
//! - `dispatcher`: the native post-receive orchestration
//! - `replay`: operator-facing synthetic hook invocation
//! - `push`: the `<old-id> <new-id> <ref-name>` push metadata lines
//!
//! Everything here is single-threaded and blocking. Concurrent pushes to
//! the same repository are serialized by git's own ref locking; no extra
//! locking is layered on top.

pub mod dispatcher;
mod env_file;
mod fsutil;
pub mod process;
pub mod push;
pub mod registry;
pub mod replay;
pub mod repository;

pub use dispatcher::Dispatcher;
pub use process::{Invocation, RunOutput};
pub use push::PushEvent;
pub use registry::{SubhookEntry, SubhookRegistry};
pub use repository::{BareRepository, InitOptions};
