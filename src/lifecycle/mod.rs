//! Lifecycle management.
//!
//! # Data Flow
//! ```text
//! Setup (controller.rs):
//!     Logger → optional log redirect → config load → token → signal watcher → server
//!
//! Run:
//!     server.run() ◀── cancellation ── signal watcher (SIGINT/SIGTERM)
//!
//! Teardown (reverse order):
//!     release signal subscription → restore console, close log file → farewell
//! ```
//!
//! Cancellation is cooperative. No deadline is imposed on the server.

pub mod controller;
pub mod signals;

pub use controller::{Controller, ExitStatus, Phase, RunOptions, DEFAULT_CONFIG_PATH};
pub use signals::{ShutdownSignal, SignalWatcher};
