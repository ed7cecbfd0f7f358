use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use truenas_health_exporter::{config::Config, server};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, disable_version_flag = true)]
struct Args {
    /// Path to YAML configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Port to listen on (overrides config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Print version
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    version: Option<bool>,
}

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize tracing
    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let mut config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!(
                "Error loading configuration from {}: {}",
                args.config.display(),
                e
            );
            std::process::exit(1);
        }
    };
    info!("Loaded configuration from {}", args.config.display());

    // Override with CLI arguments if provided
    if let Some(port) = args.port {
        config.listen_port = port;
    }

    info!(
        "TrueNAS Exporter v{} listening on {}:{}",
        env!("CARGO_PKG_VERSION"),
        config.listen_addr,
        config.listen_port
    );
    info!(
        "Monitoring {} TrueNAS host(s): {}",
        config.targets.len(),
        config.target_names().join(", ")
    );

    // Start the metrics server
    if let Err(e) = server::start(config).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
