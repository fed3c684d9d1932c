//! beachhead-probe - discovery-side companion for the beachhead agent.
//!
//! Listens for beacon datagrams on the discovery port, and for each new
//! tcp:// endpoint it sees, connects, sends `PING\n`, and prints what
//! comes back. Useful for checking that an agent is both beaconing and
//! answering.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};

use beachhead::beacon::{parse_tcp_endpoint, Beacon};

/// Listen for beachhead beacons and ping the endpoints they advertise.
#[derive(Parser, Debug)]
#[command(name = "beachhead-probe")]
#[command(version, about, long_about = None)]
struct Cli {
    /// UDP port to listen for beacons on
    #[arg(long, env = "BEACON_PORT", default_value_t = 53530)]
    port: u16,

    /// Exit after the first successfully probed beacon
    #[arg(long)]
    once: bool,
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

    let socket = UdpSocket::bind(("0.0.0.0", cli.port))
        .await
        .with_context(|| format!("failed to bind udp port {}", cli.port))?;
    tracing::info!("listening for beacons on udp://0.0.0.0:{}", cli.port);

    run(socket, cli.once).await
}

/// Receive beacons and probe their endpoints until killed, or in `once`
/// mode until one endpoint answers a ping.
///
/// A dead endpoint never ends the loop: the failure is logged, the
/// endpoint is released for a later retry, and listening continues.
async fn run(socket: UdpSocket, once: bool) -> Result<()> {
    // Endpoints with a probe connection currently open; repeated beacons
    // from a live peer are skipped instead of reconnected
    let active: Arc<Mutex<HashSet<String>>> = Arc::new(Mutex::new(HashSet::new()));

    let mut buf = [0u8; 2048];
    loop {
        let (n, from) = socket.recv_from(&mut buf).await?;

        // Malformed datagrams are dropped, not reported
        let Ok(beacon) = Beacon::decode(&buf[..n]) else {
            continue;
        };

        let id = format!("{}:{}", beacon.host_id, beacon.addr);
        {
            let mut active = active.lock().unwrap();
            if !active.insert(id.clone()) {
                continue;
            }
        }
        tracing::info!("beacon from {} ({}): {}", beacon.host_id, from, beacon.addr);

        if once {
            // One ping, one response, done
            match probe_once(&beacon.addr).await {
                Ok(reply) => {
                    println!("{}", reply);
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("probe error for {}: {}", beacon.addr, e);
                    active.lock().unwrap().remove(&id);
                    continue;
                }
            }
        }

        let active = active.clone();
        tokio::spawn(async move {
            if let Err(e) = probe(&beacon.addr).await {
                tracing::warn!("probe error for {}: {}", beacon.addr, e);
            }
            active.lock().unwrap().remove(&id);
        });
    }
}

/// Connect to a tcp:// endpoint and send `PING\n`.
async fn ping_endpoint(addr: &str) -> Result<TcpStream> {
    let (host, port) = parse_tcp_endpoint(addr)?;
    let mut conn = TcpStream::connect((host.as_str(), port))
        .await
        .with_context(|| format!("failed to connect to {}", addr))?;
    tracing::info!("connected tcp: {}", addr);
    conn.write_all(b"PING\n").await?;
    Ok(conn)
}

/// Ping an endpoint and return its first response.
async fn probe_once(addr: &str) -> Result<String> {
    let mut conn = ping_endpoint(addr).await?;
    let mut buf = [0u8; 4096];
    let n = conn.read(&mut buf).await?;
    Ok(String::from_utf8_lossy(&buf[..n]).trim_end().to_string())
}

/// Ping an endpoint and print responses until the peer closes.
async fn probe(addr: &str) -> Result<()> {
    let mut conn = ping_endpoint(addr).await?;

    let mut buf = [0u8; 4096];
    loop {
        let n = conn.read(&mut buf).await?;
        if n == 0 {
            tracing::info!("tcp closed: {}", addr);
            return Ok(());
        }
        println!("{}", String::from_utf8_lossy(&buf[..n]).trim_end());
    }
}
