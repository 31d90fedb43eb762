//! # svcctl - Service Lifecycle Controller
//!
//! svcctl bootstraps a long-running service process: it configures logging,
//! optionally redirects log output to a file, loads the service configuration,
//! wires SIGINT/SIGTERM to a cooperative cancellation token and supervises a
//! single run of a [`Server`](server::Server) until it stops.
//!
//! ## Lifecycle
//!
//! ```text
//! Init ─▶ LoggingConfigured ─▶ ConfigLoaded ─▶ Running ─▶ Terminated
//!   │            │                  │
//!   └────────────┴──── fatal (exit 1) ─────────────────────▶ Terminated
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use svcctl::lifecycle::{Controller, RunOptions};
//! use svcctl::server::ServiceServer;
//!
//! #[tokio::main]
//! async fn main() -> std::process::ExitCode {
//!     let options = RunOptions {
//!         log: Some("svc.log".into()),
//!         ..RunOptions::default()
//!     };
//!     Controller::new(options).run::<ServiceServer>().await.into()
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod lifecycle;
pub mod logging;
pub mod server;

/// Common error types used throughout svcctl
pub mod error {
    use std::io;
    use std::path::PathBuf;

    /// Setup-phase failures. Every variant is fatal and ends the process
    /// with exit status 1 before the server is constructed.
    #[derive(Debug, thiserror::Error)]
    pub enum Error {
        /// The log file could not be opened for appending
        #[error("open log file {} fail: {source}", .path.display())]
        LogOpen {
            /// Requested log file
            path: PathBuf,
            /// Underlying I/O failure
            source: io::Error,
        },
        /// The configuration file could not be read
        #[error("read config {} fail: {source}", .path.display())]
        ConfigRead {
            /// Configuration file
            path: PathBuf,
            /// Underlying I/O failure
            source: io::Error,
        },
        /// The configuration file contents are malformed
        #[error("parse config {} fail: {source}", .path.display())]
        ConfigParse {
            /// Configuration file
            path: PathBuf,
            /// Parser failure
            source: ParseError,
        },
        /// Registration with the OS signal mechanism failed
        #[error("subscribe to shutdown signals fail: {0}")]
        SignalSubscribe(#[source] io::Error),
    }

    /// Parser failures for the supported configuration formats
    #[derive(Debug, thiserror::Error)]
    pub enum ParseError {
        /// Invalid JSON
        #[error(transparent)]
        Json(#[from] serde_json::Error),
        /// Invalid TOML
        #[error(transparent)]
        Toml(#[from] toml::de::Error),
        /// TOML input that is not UTF-8
        #[error(transparent)]
        Utf8(#[from] std::str::Utf8Error),
    }

    /// Result type alias for svcctl operations
    pub type Result<T> = std::result::Result<T, Error>;
}

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{load_config, ServiceConfig};
    pub use crate::lifecycle::{Controller, ExitStatus, RunOptions};
    pub use crate::logging::{Logger, Severity};
    pub use crate::server::{Server, ServerOption, ServiceServer};
    pub use crate::{Error, Result};
    pub use tokio_util::sync::CancellationToken;
}
