//! Panel backend entry point

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use tokio::signal;

use panel::{PanelConfig, PanelError, PanelResult, PanelServer, PanelState};
use shared::{logging, service_info, ServiceId};

/// Status panel backend for the bot fleet
#[derive(Parser, Debug)]
#[command(name = "panel")]
#[command(about = "Aggregates bot status from launcher hosts")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// HTTP port
    #[arg(long, env = "PORT", default_value = "3000")]
    port: u16,

    /// Seconds without an update before a host is dropped
    #[arg(long, default_value = "600")]
    stale_after_secs: u64,

    /// Seconds a dashboard heartbeat keeps the panel active
    #[arg(long, default_value = "20")]
    heartbeat_window_secs: u64,

    /// Seconds reporters are told to sleep while nobody is watching
    #[arg(long, default_value = "300")]
    sleep_secs: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> PanelResult<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    ServiceId::init_panel();
    shared::logging::init_tracing(Some(&args.log_level));
    logging::log_startup(ServiceId::current(), "status panel");

    let bind_address: SocketAddr = format!("{}:{}", args.bind, args.port)
        .parse()
        .map_err(|e| PanelError::ServerStartup(format!("Invalid bind address: {}", e)))?;

    let config = PanelConfig {
        stale_after: Duration::from_secs(args.stale_after_secs),
        heartbeat_window: Duration::from_secs(args.heartbeat_window_secs),
        sleep_duration: Duration::from_secs(args.sleep_secs),
    };
    service_info!(
        ServiceId::current(),
        stale_after_secs = args.stale_after_secs,
        heartbeat_window_secs = args.heartbeat_window_secs,
        sleep_secs = args.sleep_secs,
        "⚙️ Panel configured"
    );

    let server = PanelServer::new(bind_address, PanelState::new(config));

    let shutdown_sender = server.get_shutdown_sender();
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                logging::log_shutdown(ServiceId::current(), "Received Ctrl+C signal");
                let _ = shutdown_sender.send(()).await;
            }
            Err(err) => {
                logging::log_error(ServiceId::current(), "Signal handling", &err);
            }
        }
    });

    server.run().await?;

    logging::log_success(ServiceId::current(), "Panel stopped gracefully");
    Ok(())
}
