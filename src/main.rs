//! beachhead - minimal network presence agent.
//!
//! Serves a two-case ping/echo protocol over TCP and announces itself to
//! a discovery endpoint with periodic UDP beacons. Both loops run until
//! the process is killed; there is no shutdown path.

use anyhow::Result;
use clap::Parser;

use beachhead::beacon::Beacon;
use beachhead::config::{
    Config, DEFAULT_DISCOVERY_TARGET, DEFAULT_PORT, DEFAULT_PUBLIC_HOST,
};
use beachhead::{emitter, responder};

/// Minimal network presence agent: TCP ping/echo plus UDP beacons.
#[derive(Parser, Debug)]
#[command(name = "beachhead")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Port the responder binds
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// host:port the beacons are sent to
    #[arg(long, env = "DISCOVERY_TARGET", default_value = DEFAULT_DISCOVERY_TARGET)]
    discovery_target: String,

    /// Advertised host id (default: system hostname)
    #[arg(long, env = "HOST_ID")]
    host_id: Option<String>,

    /// Host label used in the advertised tcp:// address
    #[arg(long, env = "PUBLIC_HOST", default_value = DEFAULT_PUBLIC_HOST)]
    public_host: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::resolve(cli.port, cli.discovery_target, cli.host_id, cli.public_host);

    let beacon = Beacon::advertise(&config.host_id, &config.public_host, config.port);

    // Bind failure is the one fatal error: without the responder the
    // agent has nothing to advertise
    let listener = responder::bind(config.port).await?;
    tracing::info!("listening on tcp port {}", config.port);

    tokio::spawn(responder::serve(listener));
    tokio::spawn(emitter::run(config.discovery_target.clone(), beacon));
    tracing::info!(
        "sending beacons to {} every {}s",
        config.discovery_target,
        emitter::BEACON_INTERVAL.as_secs()
    );

    // Both loops run on their own tasks; the root task just parks
    std::future::pending::<()>().await;
    Ok(())
}
