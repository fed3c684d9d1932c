//! UDP beacon emitter.
//!
//! Encodes the beacon once and retransmits the same datagram to the
//! discovery target on a fixed interval, forever. Delivery is
//! best-effort: send errors are dropped on the floor, consistent with
//! the advisory ttl in the payload. Setup failures (target resolution,
//! socket bind) abort only this loop; the responder is unaffected.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::{lookup_host, UdpSocket};

use crate::beacon::Beacon;

/// Time between beacon transmissions.
pub const BEACON_INTERVAL: Duration = Duration::from_secs(3);

/// Send `beacon` to `target` every [`BEACON_INTERVAL`], forever.
///
/// Returns only if the target cannot be resolved or the send socket
/// cannot be created.
pub async fn run(target: String, beacon: Beacon) {
    let resolved: Option<SocketAddr> = match lookup_host(&target).await {
        Ok(mut addrs) => addrs.next(),
        Err(e) => {
            tracing::error!("beacon resolve error for {}: {}", target, e);
            return;
        }
    };
    let Some(dest) = resolved else {
        tracing::error!("beacon resolve error for {}: no addresses", target);
        return;
    };

    let socket = match UdpSocket::bind("0.0.0.0:0").await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("beacon socket error: {}", e);
            return;
        }
    };

    // Immutable payload, encoded once
    let encoded = beacon.encode();

    loop {
        let _ = socket.send_to(&encoded, dest).await;
        tokio::time::sleep(BEACON_INTERVAL).await;
    }
}
