//! Fleet runner
//!
//! Wires the supervisor and the optional status reporter together and owns
//! the shutdown sequence: stop reporting, signal every bot, wait for the
//! table to drain, then hard-kill whatever is left.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;

use shared::{logging, service_info, service_warn, ServiceId};

use crate::core::load_config;
use crate::error::LauncherResult;
use crate::services::{
    DotenvLoader, HttpPanelClient, RealSupervisor, ReporterConfig, StatusReporter, SysinfoSampler,
    TracingLogSink,
};

/// Time given to bots to exit after SIGTERM before they are killed
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct FleetConfig {
    pub config_path: PathBuf,
    /// Panel base URL; reporting is disabled when absent
    pub panel_url: Option<String>,
    pub host_id: String,
    pub interval: Duration,
    pub restart_delay: Duration,
    pub check_before_send: bool,
    pub shutdown_grace: Duration,
}

pub type FleetSupervisor = RealSupervisor<TracingLogSink, DotenvLoader>;

pub struct Fleet {
    config: FleetConfig,
    supervisor: FleetSupervisor,
    shutdown_tx: mpsc::Sender<()>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl Fleet {
    pub fn new(config: FleetConfig) -> Self {
        let supervisor = RealSupervisor::new(config.restart_delay, TracingLogSink::new(), DotenvLoader::new());
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        Self {
            config,
            supervisor,
            shutdown_tx,
            shutdown_rx,
        }
    }

    /// Sender that stops `run` when signalled
    pub fn get_shutdown_sender(&self) -> mpsc::Sender<()> {
        self.shutdown_tx.clone()
    }

    pub fn supervisor(&self) -> &FleetSupervisor {
        &self.supervisor
    }

    /// Start every configured bot and supervise until shutdown
    ///
    /// Fails before anything is spawned if the configuration file is missing
    /// or the reporter cannot be built.
    pub async fn run(mut self) -> LauncherResult<()> {
        let specs = load_config(&self.config.config_path)?;
        service_info!(
            ServiceId::current(),
            path = %self.config.config_path.display(),
            bots = specs.len(),
            "📋 Loaded bot configuration"
        );

        let reporter = match &self.config.panel_url {
            Some(url) => {
                let client = HttpPanelClient::new(url.clone())?;
                let reporter_config = ReporterConfig {
                    host_id: self.config.host_id.clone(),
                    interval: self.config.interval,
                    check_before_send: self.config.check_before_send,
                };
                Some(StatusReporter::new(
                    self.supervisor.clone(),
                    SysinfoSampler::new(),
                    client,
                    reporter_config,
                )?)
            }
            None => {
                service_info!(ServiceId::current(), "📴 No panel URL configured, status reporting disabled");
                None
            }
        };

        let started = self.supervisor.start_all(specs).await;
        logging::log_success(ServiceId::current(), &format!("Launched {started} bot(s)"));

        let reporter_stop = reporter.map(|reporter| {
            let (stop_tx, stop_rx) = mpsc::channel(1);
            (stop_tx, tokio::spawn(reporter.run(stop_rx)))
        });

        // A dropped sender also means shutdown
        let _ = self.shutdown_rx.recv().await;

        if let Some((stop_tx, handle)) = reporter_stop {
            let _ = stop_tx.send(()).await;
            let _ = handle.await;
        }

        self.stop_bots().await;
        Ok(())
    }

    async fn stop_bots(&self) {
        let signalled = self.supervisor.shutdown_all().await;
        service_info!(ServiceId::current(), signalled, "🛑 Stopping bots");

        if self.supervisor.wait_idle(self.config.shutdown_grace).await {
            return;
        }

        let killed = self.supervisor.kill_remaining().await;
        service_warn!(ServiceId::current(), killed, "⚠️ Bots ignored SIGTERM, killed");
        if !self.supervisor.wait_idle(Duration::from_secs(2)).await {
            let remaining = self.supervisor.len().await;
            service_warn!(
                ServiceId::current(),
                remaining = remaining,
                "⚠️ Some bots did not exit"
            );
        }
    }
}
