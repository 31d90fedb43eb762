//! Bundled service server used by the `svcctl` binary

use crate::config::ServiceConfig;
use crate::logging::Logger;
use crate::server::{Server, ServerOption};
use std::future::pending;
use tokio::time::{interval_at, sleep, Instant, Interval};
use tokio_util::sync::CancellationToken;

const MODULE: &str = "server";

/// Minimal long-running server: idles until cancelled, optionally emitting
/// debug heartbeats and stopping on its own after `run_for_secs`.
pub struct ServiceServer {
    config: ServiceConfig,
    token: CancellationToken,
    logger: Logger,
}

impl Server for ServiceServer {
    type Config = ServiceConfig;

    fn new(config: ServiceConfig, option: ServerOption) -> Self {
        Self {
            config,
            token: option.token,
            logger: option.logger,
        }
    }

    async fn run(&self, overrides: Option<ServiceConfig>) {
        let config = overrides.as_ref().unwrap_or(&self.config);
        self.logger
            .info(MODULE, format!("server {} started", config.name));

        let mut heartbeat = config
            .heartbeat()
            .map(|period| interval_at(Instant::now() + period, period));
        let run_for = config.run_for();
        let deadline = async move {
            match run_for {
                Some(duration) => sleep(duration).await,
                None => pending().await,
            }
        };
        tokio::pin!(deadline);

        let mut beats: u64 = 0;
        loop {
            tokio::select! {
                _ = self.token.cancelled() => {
                    self.logger.info(MODULE, "shutdown requested");
                    if let Some(drain) = config.drain() {
                        self.logger
                            .info(MODULE, format!("draining for {} seconds", drain.as_secs()));
                        sleep(drain).await;
                    }
                    break;
                }
                _ = &mut deadline => {
                    self.logger.info(MODULE, "run time elapsed");
                    break;
                }
                _ = next_beat(&mut heartbeat) => {
                    beats += 1;
                    self.logger.debug(MODULE, format!("heartbeat {beats}"));
                }
            }
        }

        self.logger
            .info(MODULE, format!("server {} stopped", config.name));
    }
}

async fn next_beat(heartbeat: &mut Option<Interval>) {
    match heartbeat {
        Some(interval) => {
            interval.tick().await;
        }
        None => pending().await,
    }
}
