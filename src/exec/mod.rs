// src/exec/mod.rs

//! Process execution layer.
//!
//! Rendered commands are run with `tokio::process::Command` through a shell.
//!
//! - [`supervisor`] owns the process-wide execution slot, the timeout race and
//!   failure classification.
//! - [`terminate`] decides how a timed-out child (and whatever it started) is
//!   killed.
//! - [`observer`] defines the per-command state machine and an observer hook
//!   for instrumentation.

pub mod observer;
pub mod supervisor;
pub mod terminate;

pub use observer::{ProcessObserver, ProcessState};
pub use supervisor::{DEFAULT_SHELL, Supervisor};
pub use terminate::{GroupKill, Terminator};
