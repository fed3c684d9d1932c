//! Beacon payload: the agent's self-description datagram.
//!
//! The beacon is a single compact JSON object, e.g.:
//!
//! ```json
//! {"hostId":"box1","addr":"tcp://beachhead:30018","proto":"tcp","versions":["v1"],"caps":["echo"],"ttl":8000}
//! ```
//!
//! It is built once at startup and retransmitted unchanged for the
//! lifetime of the process. The decode path is only used by the probe
//! binary; the agent itself never parses beacons.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Protocol version tags advertised in every beacon.
pub const VERSIONS: &[&str] = &["v1"];

/// Capability tags advertised in every beacon.
pub const CAPS: &[&str] = &["echo"];

/// Advisory staleness hint for beacon receivers. Not enforced here.
pub const TTL: u32 = 8000;

/// Self-description payload sent to the discovery endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beacon {
    pub host_id: String,
    pub addr: String,
    pub proto: String,
    pub versions: Vec<String>,
    pub caps: Vec<String>,
    pub ttl: u32,
}

/// Errors from decoding a beacon datagram or parsing its endpoint.
#[derive(Error, Debug)]
pub enum BeaconError {
    #[error("JSON parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unsupported scheme in endpoint: {0}")]
    UnsupportedScheme(String),

    #[error("Malformed endpoint: {0}")]
    MalformedEndpoint(String),
}

impl Beacon {
    /// Build the beacon advertised by this agent.
    ///
    /// `addr` becomes `tcp://<public_host>:<port>` and `proto` is the
    /// scheme extracted back out of that address.
    pub fn advertise(host_id: &str, public_host: &str, port: u16) -> Self {
        let addr = format!("tcp://{}:{}", public_host, port);
        let proto = addr
            .split_once("://")
            .map(|(scheme, _)| scheme.to_string())
            .unwrap_or_default();

        Self {
            host_id: host_id.to_string(),
            addr,
            proto,
            versions: VERSIONS.iter().map(|v| v.to_string()).collect(),
            caps: CAPS.iter().map(|c| c.to_string()).collect(),
            ttl: TTL,
        }
    }

    /// Encode as a compact JSON datagram.
    pub fn encode(&self) -> Vec<u8> {
        // Serializing a plain struct of strings and ints cannot fail
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Decode a received datagram.
    ///
    /// Rejects payloads missing any of the identity fields, matching the
    /// receiver-side codec this protocol was built against.
    pub fn decode(data: &[u8]) -> Result<Self, BeaconError> {
        let beacon: Beacon = serde_json::from_slice(data)?;

        if beacon.host_id.is_empty() {
            return Err(BeaconError::MissingField("hostId"));
        }
        if beacon.addr.is_empty() {
            return Err(BeaconError::MissingField("addr"));
        }
        if beacon.proto.is_empty() {
            return Err(BeaconError::MissingField("proto"));
        }

        Ok(beacon)
    }
}

/// Split a `tcp://host:port` endpoint into host and port parts.
pub fn parse_tcp_endpoint(addr: &str) -> Result<(String, u16), BeaconError> {
    let rest = match addr.split_once("://") {
        Some(("tcp", rest)) => rest,
        Some((scheme, _)) => return Err(BeaconError::UnsupportedScheme(scheme.to_string())),
        None => return Err(BeaconError::MalformedEndpoint(addr.to_string())),
    };

    let (host, port) = rest
        .rsplit_once(':')
        .ok_or_else(|| BeaconError::MalformedEndpoint(addr.to_string()))?;
    let port: u16 = port
        .parse()
        .map_err(|_| BeaconError::MalformedEndpoint(addr.to_string()))?;

    Ok((host.to_string(), port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advertise_fields() {
        let b = Beacon::advertise("box1", "beachhead", 30018);
        assert_eq!(b.addr, "tcp://beachhead:30018");
        assert_eq!(b.proto, "tcp");
        assert_eq!(b.versions, vec!["v1"]);
        assert_eq!(b.caps, vec!["echo"]);
        assert_eq!(b.ttl, 8000);
    }

    #[test]
    fn test_wire_field_names() {
        let b = Beacon::advertise("box1", "beachhead", 30018);
        let json: serde_json::Value = serde_json::from_slice(&b.encode()).unwrap();
        assert_eq!(json["hostId"], "box1");
        assert_eq!(json["addr"], "tcp://beachhead:30018");
        assert_eq!(json["proto"], "tcp");
        assert_eq!(json["versions"], serde_json::json!(["v1"]));
        assert_eq!(json["caps"], serde_json::json!(["echo"]));
        assert_eq!(json["ttl"], 8000);
    }

    #[test]
    fn test_decode_roundtrip() {
        let b = Beacon::advertise("box1", "beachhead", 30018);
        let decoded = Beacon::decode(&b.encode()).unwrap();
        assert_eq!(decoded.host_id, "box1");
        assert_eq!(decoded.addr, "tcp://beachhead:30018");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(Beacon::decode(b"not json").is_err());
    }

    #[test]
    fn test_decode_rejects_empty_identity() {
        let raw = br#"{"hostId":"","addr":"tcp://x:1","proto":"tcp","versions":[],"caps":[],"ttl":1}"#;
        assert!(matches!(
            Beacon::decode(raw),
            Err(BeaconError::MissingField("hostId"))
        ));
    }

    #[test]
    fn test_parse_tcp_endpoint() {
        let (host, port) = parse_tcp_endpoint("tcp://beachhead:30018").unwrap();
        assert_eq!(host, "beachhead");
        assert_eq!(port, 30018);
    }

    #[test]
    fn test_parse_rejects_other_schemes() {
        assert!(matches!(
            parse_tcp_endpoint("ws://beachhead:30018"),
            Err(BeaconError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn test_parse_rejects_missing_port() {
        assert!(parse_tcp_endpoint("tcp://beachhead").is_err());
        assert!(parse_tcp_endpoint("tcp://beachhead:notaport").is_err());
        assert!(parse_tcp_endpoint("beachhead:30018").is_err());
    }
}
