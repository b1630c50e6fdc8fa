//! Main entry point for the launcher binary

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::signal;

use launcher::fleet::DEFAULT_SHUTDOWN_GRACE;
use launcher::{Fleet, FleetConfig, LauncherResult};
use shared::{logging, service_debug, ServiceId};

/// Supervises a fleet of bot processes and reports their status
#[derive(Parser)]
#[command(name = "launcher")]
#[command(about = "Runs bots from a config file, restarts them on crash and reports status to a panel")]
pub struct Args {
    /// Bot configuration file (one command per line)
    #[arg(long, default_value = "start.txt")]
    pub config: PathBuf,

    /// Panel base URL; status reporting is disabled when unset
    #[arg(long, env = "PANEL_URL")]
    pub panel_url: Option<String>,

    /// Host identifier reported to the panel (defaults to the hostname)
    #[arg(long, env = "HOST_ID")]
    pub host_id: Option<String>,

    /// Seconds between status reports
    #[arg(long, default_value = "10")]
    pub interval_secs: u64,

    /// Seconds to wait before restarting a crashed bot
    #[arg(long, default_value = "5")]
    pub restart_delay_secs: u64,

    /// Ask the panel whether anyone is watching before each report
    #[arg(long)]
    pub check_before_send: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

fn default_host_id() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "default-host".to_string())
}

#[tokio::main]
async fn main() -> LauncherResult<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    ServiceId::init_launcher();
    shared::logging::init_tracing(Some(&args.log_level));
    logging::log_startup(ServiceId::current(), "bot fleet launcher");

    let host_id = args.host_id.unwrap_or_else(default_host_id);
    service_debug!(ServiceId::current(), host_id = %host_id, "Using host identifier");

    let fleet = Fleet::new(FleetConfig {
        config_path: args.config,
        panel_url: args.panel_url,
        host_id,
        interval: Duration::from_secs(args.interval_secs),
        restart_delay: Duration::from_secs(args.restart_delay_secs),
        check_before_send: args.check_before_send,
        shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
    });

    let shutdown_sender = fleet.get_shutdown_sender();
    tokio::spawn(async move {
        wait_for_signal().await;
        let _ = shutdown_sender.send(()).await;
    });

    if let Err(e) = fleet.run().await {
        logging::log_error(ServiceId::current(), "Launcher", &e);
        return Err(e);
    }

    logging::log_success(ServiceId::current(), "Launcher stopped gracefully");
    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() {
    use signal::unix::{signal as unix_signal, SignalKind};

    let mut sigterm = match unix_signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(err) => {
            logging::log_error(ServiceId::current(), "SIGTERM handler", &err);
            let _ = signal::ctrl_c().await;
            logging::log_shutdown(ServiceId::current(), "Received Ctrl+C signal");
            return;
        }
    };

    tokio::select! {
        _ = signal::ctrl_c() => logging::log_shutdown(ServiceId::current(), "Received Ctrl+C signal"),
        _ = sigterm.recv() => logging::log_shutdown(ServiceId::current(), "Received SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match signal::ctrl_c().await {
        Ok(()) => logging::log_shutdown(ServiceId::current(), "Received Ctrl+C signal"),
        Err(err) => logging::log_error(ServiceId::current(), "Signal handling", &err),
    }
}
