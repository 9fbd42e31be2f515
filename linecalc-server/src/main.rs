// linecalc daemon: six independent UDP calculator services on one runtime.

mod config;
mod net;
mod runtime;
mod sinks;

use std::sync::Arc;

use linecalc_core::bandwidth::BwCalculator;
use linecalc_core::cost::CostCalculator;
use linecalc_core::erlang::ErlangCalculator;
use linecalc_core::plr::PlrCalculator;
use linecalc_core::report::ReportAggregator;
use linecalc_core::rt::RtCalculator;
use linecalc_core::{Calculator, CodecTable};

use crate::net::ServiceSocket;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> Result<(), Box<dyn std::error::Error>> {
    for arg in std::env::args().skip(1) {
        if arg == "--version" || arg == "-V" {
            println!("linecalc-server {}", VERSION);
            return Ok(());
        }
    }

    let cfg = config::load();
    init_tracing(&cfg)?;

    // One shared read-only load for RT and BW, before any loop starts.
    let codecs = Arc::new(match &cfg.codec_table {
        Some(path) => CodecTable::load(path)?,
        None => CodecTable::builtin(),
    });
    tracing::info!(codecs = codecs.len(), "codec table loaded");

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        spawn_service(&cfg, cfg.rt_port, RtCalculator::new(codecs.clone())).await?;
        spawn_service(&cfg, cfg.erlang_port, ErlangCalculator).await?;
        spawn_service(&cfg, cfg.bw_port, BwCalculator::new(codecs.clone())).await?;
        spawn_service(&cfg, cfg.cost_port, CostCalculator).await?;
        spawn_service(&cfg, cfg.plr_port, PlrCalculator).await?;
        spawn_service(
            &cfg,
            cfg.report_port,
            ReportAggregator::new(Arc::new(sinks::LogDeliverySink)),
        )
        .await?;
        shutdown_signal().await
    })?;
    Ok(())
}

async fn spawn_service<C: Calculator>(
    cfg: &config::Config,
    port: u16,
    calculator: C,
) -> std::io::Result<()> {
    let socket = ServiceSocket::bind(&cfg.bind_ip, port).await?;
    let max_in_flight = cfg.max_in_flight;
    tokio::spawn(async move {
        if let Err(e) = runtime::run_service(socket, Arc::new(calculator), max_in_flight).await {
            tracing::error!(service = C::ID, error = %e, "service loop terminated");
        }
    });
    Ok(())
}

fn init_tracing(cfg: &config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    match &cfg.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM (Unix). On shutdown, runtime and tasks exit;
/// systemd may restart if configured.
async fn shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
    }
    Ok(())
}
