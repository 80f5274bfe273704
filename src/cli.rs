//! CLI definitions and mode dispatch.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::client::ClientCycle;
use crate::config::{AppContext, FetchConf};
use crate::hosts::HostsFile;
use crate::merge::MergeStrategy;
use crate::scheduler::FetchTicker;
use crate::serve::http::ArtifactServer;
use crate::serve::ServerCycle;

#[derive(Parser)]
#[command(name = "hostfetch", version)]
#[command(about = "Keep the system hosts file in sync with fresh GitHub IPs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a published hosts payload and merge it into the system hosts file
    Client {
        /// Remote hosts source URL
        #[arg(short, long)]
        url: Option<String>,
        /// Fetch interval in minutes (seconds when HOSTFETCH_DEBUG is set)
        #[arg(short, long)]
        interval: Option<u64>,
        /// Merge strategy applied to the hosts file
        #[arg(short, long, value_enum)]
        strategy: Option<MergeStrategy>,
    },
    /// Resolve the domain list and publish artifacts over HTTP
    Server {
        /// Listen port for the artifact endpoint
        #[arg(short, long)]
        port: Option<u16>,
        /// Publish interval in minutes (seconds when HOSTFETCH_DEBUG is set)
        #[arg(short, long)]
        interval: Option<u64>,
    },
}

/// Startup mode, decided once; each case carries its own configuration.
pub enum Mode {
    Client {
        url: String,
        interval: u64,
        strategy: MergeStrategy,
    },
    Server {
        port: u16,
        interval: u64,
    },
}

/// Resolve CLI flags against the persisted config; flags win.
pub fn resolve_mode(cli: Cli, conf: &FetchConf) -> Result<Mode> {
    let mode = match cli.command {
        Commands::Client {
            url,
            interval,
            strategy,
        } => Mode::Client {
            url: url.unwrap_or_else(|| conf.client.url.clone()),
            interval: interval.unwrap_or(conf.client.interval),
            strategy: strategy.unwrap_or(conf.client.strategy),
        },
        Commands::Server { port, interval } => Mode::Server {
            port: port.unwrap_or(conf.server.port),
            interval: interval.unwrap_or(conf.server.interval),
        },
    };
    let interval = match &mode {
        Mode::Client { interval, .. } | Mode::Server { interval, .. } => *interval,
    };
    if interval < 1 {
        anyhow::bail!("fetch interval must be at least 1 minute");
    }
    Ok(mode)
}

/// Run CLI: parse, resolve mode, start the chosen loop.
pub fn run() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let ctx = AppContext::init()?;
    let conf = FetchConf::load(&ctx).unwrap_or_else(|e| {
        tracing::warn!("could not load conf.toml: {e:#}; using defaults");
        FetchConf::default()
    });
    let mode = resolve_mode(cli, &conf)?;

    let rt = tokio::runtime::Runtime::new()?;
    match mode {
        Mode::Client {
            url,
            interval,
            strategy,
        } => rt.block_on(run_client(&ctx, url, interval, strategy)),
        Mode::Server { port, interval } => rt.block_on(run_server(&ctx, port, interval)),
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run_client(
    ctx: &AppContext,
    url: String,
    interval: u64,
    strategy: MergeStrategy,
) -> Result<()> {
    let hosts = HostsFile::system();
    if !ctx.debug {
        hosts.check_rw_permission()?;
    }

    info!(
        url = %url,
        path = %hosts.path().display(),
        interval,
        "client mode: merging remote hosts on every cycle"
    );

    let ticker = FetchTicker::new(interval, ctx.debug);
    stop_on_ctrl_c(&ticker);
    ticker
        .run(Arc::new(ClientCycle::new(hosts, url, strategy)))
        .await;
    info!("stopped");
    Ok(())
}

async fn run_server(ctx: &AppContext, port: u16, interval: u64) -> Result<()> {
    let server = ArtifactServer::bind(
        SocketAddr::from(([0, 0, 0, 0], port)),
        ctx.exec_dir.clone(),
    )
    .await?;
    info!(addr = %server.local_addr()?, "artifact endpoint listening");
    tokio::spawn(server.run());

    let ticker = FetchTicker::new(interval, ctx.debug);
    stop_on_ctrl_c(&ticker);
    ticker.run(Arc::new(ServerCycle::new(ctx.clone()))).await;
    info!("stopped");
    Ok(())
}

fn stop_on_ctrl_c(ticker: &FetchTicker) {
    let stop = ticker.stopper();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.stop();
        }
    });
}
