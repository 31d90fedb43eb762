//! Lifecycle controller: setup, supervised run and ordered teardown

use crate::config::load_config;
use crate::lifecycle::signals::SignalWatcher;
use crate::logging::{LogRedirect, Logger, OutputTarget};
use crate::server::{Server, ServerOption};
use crate::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

const MODULE: &str = "lifecycle";

/// Configuration file used when none is given
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Inputs of one controller run, normally supplied by the CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Configuration file
    pub config: PathBuf,
    /// File to redirect log output to; absent or empty keeps the console
    pub log: Option<PathBuf>,
    /// Emit debug-level lines
    pub debug: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            config: PathBuf::from(DEFAULT_CONFIG_PATH),
            log: None,
            debug: false,
        }
    }
}

/// How a controller run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// The server ran and stopped
    Graceful,
    /// A setup step failed before the server was started
    Fatal,
}

impl ExitStatus {
    /// Process exit code for this status
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Graceful => 0,
            ExitStatus::Fatal => 1,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Controller state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing set up yet
    Init,
    /// Logger created and optional redirection applied
    LoggingConfigured,
    /// Configuration parsed
    ConfigLoaded,
    /// Server constructed and running
    Running,
    /// Teardown finished
    Terminated,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Init => write!(f, "init"),
            Phase::LoggingConfigured => write!(f, "logging-configured"),
            Phase::ConfigLoaded => write!(f, "config-loaded"),
            Phase::Running => write!(f, "running"),
            Phase::Terminated => write!(f, "terminated"),
        }
    }
}

/// Sequences logging, configuration, signal handling and one server run.
///
/// Teardown runs innermost first: the signal subscription is released when
/// the server returns, then the log file, then the farewell line is written
/// to the restored console.
pub struct Controller {
    options: RunOptions,
    console: Option<OutputTarget>,
    phase: Phase,
}

impl Controller {
    /// Create a controller for one run
    pub fn new(options: RunOptions) -> Self {
        Self {
            options,
            console: None,
            phase: Phase::Init,
        }
    }

    /// Use `console` instead of stdout as the default log target
    pub fn with_console(mut self, console: OutputTarget) -> Self {
        self.console = Some(console);
        self
    }

    /// Run the server type `S`, built with [`Server::new`]
    pub async fn run<S: Server>(self) -> ExitStatus {
        self.run_with(S::new).await
    }

    /// Run a server produced by `build` from the loaded configuration
    pub async fn run_with<S, F>(mut self, build: F) -> ExitStatus
    where
        S: Server,
        F: FnOnce(S::Config, ServerOption) -> S,
    {
        let logger = match self.console.take() {
            Some(console) => Logger::with_console(console, self.options.debug),
            None => Logger::new(self.options.debug),
        };
        logger.info(
            MODULE,
            format!(
                "version {} on {}",
                env!("CARGO_PKG_VERSION"),
                gethostname::gethostname().to_string_lossy()
            ),
        );

        let status = self.supervise(&logger, build).await;

        self.enter(&logger, Phase::Terminated);
        logger.info(MODULE, "Bye!!");
        status
    }

    async fn supervise<S, F>(&mut self, logger: &Logger, build: F) -> ExitStatus
    where
        S: Server,
        F: FnOnce(S::Config, ServerOption) -> S,
    {
        let redirect = match LogRedirect::open(logger, self.options.log.as_deref()) {
            Ok(redirect) => redirect,
            Err(error) => return logger.fatal(MODULE, error.to_string()),
        };
        self.enter(logger, Phase::LoggingConfigured);

        let status = match self.serve(logger, build).await {
            Ok(()) => ExitStatus::Graceful,
            Err(error) => logger.fatal(MODULE, error.to_string()),
        };

        if let Some(redirect) = redirect {
            redirect.release();
        }
        status
    }

    async fn serve<S, F>(&mut self, logger: &Logger, build: F) -> Result<()>
    where
        S: Server,
        F: FnOnce(S::Config, ServerOption) -> S,
    {
        let config: S::Config = load_config(&self.options.config)?;
        self.enter(logger, Phase::ConfigLoaded);

        let token = CancellationToken::new();
        let watcher =
            SignalWatcher::spawn(logger.clone(), token.clone()).map_err(Error::SignalSubscribe)?;

        let server = build(
            config,
            ServerOption {
                token: token.clone(),
                logger: logger.clone(),
            },
        );
        self.enter(logger, Phase::Running);
        server.run(None).await;

        if let Some(signal) = watcher.shutdown().await {
            logger.debug(MODULE, format!("server stopped after {signal}"));
        }
        token.cancel();
        Ok(())
    }

    fn enter(&mut self, logger: &Logger, phase: Phase) {
        logger.debug(MODULE, format!("{} -> {}", self.phase, phase));
        self.phase = phase;
    }
}
