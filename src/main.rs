use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use forza_telemetry::config::{DEFAULT_HTTP_PORT, DEFAULT_UDP_PORT};
use forza_telemetry::{Config, PacketFormat, RunSummary, Telemetry};

#[derive(Parser, Debug)]
#[command(name = "forza-telemetry")]
#[command(version)]
#[command(
    about = "Decode Forza 'Data Out' UDP telemetry and stream it to the console, CSV or HTTP.",
    long_about = None,
    after_help = "Examples:\n  forza-telemetry\n  forza-telemetry -z -c session.csv\n  forza-telemetry -q -s --http-addr 127.0.0.1:8080"
)]
struct Cli {
    /// Decode Forza Horizon packets instead of Motorsport
    #[arg(short = 'z', long)]
    horizon: bool,

    /// Custom packet format file (overrides --horizon)
    #[arg(long, value_name = "FILE")]
    schema: Option<PathBuf>,

    /// Log every published frame to a CSV file
    #[arg(short = 'c', long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Append every published snapshot to a JSON log file
    #[arg(short = 'j', long, value_name = "FILE")]
    json_log: Option<PathBuf>,

    /// Serve the latest frame as JSON over HTTP
    #[arg(short = 's', long)]
    serve: bool,

    /// Address for the HTTP server (implies --serve)
    #[arg(long, value_name = "ADDR")]
    http_addr: Option<SocketAddr>,

    /// Suppress the realtime console line
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Verbose logging
    #[arg(short = 'd', long)]
    debug: bool,

    /// UDP port the game sends to
    #[arg(short = 'u', long, default_value_t = DEFAULT_UDP_PORT)]
    port: u16,

    /// Local address to bind the UDP listener to
    #[arg(short = 'i', long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    ip: IpAddr,
}

impl Cli {
    fn into_config(self) -> Config {
        let http_addr = match (self.http_addr, self.serve) {
            (Some(addr), _) => Some(addr),
            (None, true) => Some(SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_HTTP_PORT))),
            (None, false) => None,
        };

        Config {
            format: if self.horizon { PacketFormat::Horizon } else { PacketFormat::Motorsport },
            schema_path: self.schema,
            udp_addr: SocketAddr::new(self.ip, self.port),
            console: !self.quiet,
            csv_path: self.csv,
            json_log_path: self.json_log,
            http_addr,
            debug: self.debug,
        }
    }
}

fn init_tracing(config: &Config) {
    let default_level = config.default_log_level();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .init();
}

/// Cancel `token` on Ctrl-C, or SIGTERM where available.
fn spawn_shutdown_listener(token: CancellationToken) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            match signal(SignalKind::terminate()) {
                Ok(mut terminate) => {
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {}
                        _ = terminate.recv() => {}
                    }
                }
                Err(err) => {
                    error!("Failed to install SIGTERM handler: {}", err);
                    let _ = tokio::signal::ctrl_c().await;
                }
            }
        }
        #[cfg(not(unix))]
        {
            let _ = tokio::signal::ctrl_c().await;
        }

        info!("Shutdown requested");
        token.cancel();
    });
}

async fn run(config: Config) -> Result<RunSummary> {
    let telemetry = Telemetry::start(config).await.context("failed to start telemetry listener")?;

    let cancel = CancellationToken::new();
    spawn_shutdown_listener(cancel.clone());

    telemetry.run(cancel).await.context("telemetry listener stopped with an error")
}

fn print_summary(summary: &RunSummary) {
    let stats = &summary.driver;
    println!(
        "Received {} datagrams: {} published, {} idle, {} malformed",
        stats.received, stats.published, stats.idle, stats.malformed
    );
    if let Some(session) = &summary.session {
        println!("{}", session);
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = Cli::parse().into_config();
    init_tracing(&config);

    match run(config).await {
        Ok(summary) => {
            print_summary(&summary);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {:#}", err);
            if let Some(telemetry_err) = err.downcast_ref::<forza_telemetry::TelemetryError>() {
                for hint in telemetry_err.recovery_suggestions() {
                    eprintln!("hint: {}", hint);
                }
            }
            ExitCode::FAILURE
        }
    }
}
