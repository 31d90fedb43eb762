//! Server collaborator interface
//!
//! The controller only knows how to build a server from its configuration
//! and how to run it until it stops. Request handling lives entirely inside
//! the implementation.

pub mod service;

use crate::logging::Logger;
use serde::de::DeserializeOwned;
use std::future::Future;
use tokio_util::sync::CancellationToken;

pub use service::ServiceServer;

/// Bundle handed to a server at construction
#[derive(Debug, Clone)]
pub struct ServerOption {
    /// Cancelled once shutdown is requested; servers should return promptly
    pub token: CancellationToken,
    /// Logger shared with the controller
    pub logger: Logger,
}

/// A service supervised by the lifecycle controller
pub trait Server: Sized {
    /// Configuration schema, parsed from the configuration file
    type Config: DeserializeOwned;

    /// Construct the server from its configuration
    fn new(config: Self::Config, option: ServerOption) -> Self;

    /// Run until the server has fully stopped.
    ///
    /// `overrides` replaces the construction configuration for this run
    /// when present. Cancellation is cooperative: the future is awaited
    /// without any deadline.
    fn run(&self, overrides: Option<Self::Config>) -> impl Future<Output = ()>;
}
