use std::path::PathBuf;
use std::process;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use metered_proxy::config::load_config;
use metered_proxy::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "metered-proxy")]
#[command(about = "Transparent reverse proxy with live traffic metrics", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "metered_proxy={},tower_http=warn",
                    config.observability.log_level
                ))
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // A panic in any task is an unrecoverable internal fault: exit non-zero
    // and leave the restart to the external supervisor.
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        default_panic(info);
        tracing::error!(panic = %info, "Internal fault, terminating");
        process::exit(1);
    }));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream_host = %config.upstream.host,
        upstream_port = config.upstream.port,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_ctrl_c();

    let server = HttpServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
