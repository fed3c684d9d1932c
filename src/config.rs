//! Agent configuration.
//!
//! Four values, each settable by flag or environment variable with a
//! literal default (see the CLI in main.rs). No validation beyond the
//! u16 port parse: a bad discovery target or public host only surfaces
//! later as a resolve/bind failure in the component that uses it.

/// Default port the responder binds.
pub const DEFAULT_PORT: u16 = 30018;

/// Default discovery endpoint beacons are sent to.
pub const DEFAULT_DISCOVERY_TARGET: &str = "host.docker.internal:53530";

/// Host id used when the system hostname cannot be read.
pub const FALLBACK_HOST_ID: &str = "go-beachhead";

/// Default host label advertised in the beacon `addr` field.
pub const DEFAULT_PUBLIC_HOST: &str = "beachhead";

/// Resolved agent configuration, immutable after startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub discovery_target: String,
    pub host_id: String,
    pub public_host: String,
}

impl Config {
    /// Build a config from CLI-resolved values, filling the host id from
    /// the system hostname when none was supplied.
    ///
    /// An empty host id counts as unset: `HOST_ID=""` in the environment
    /// reaches here as `Some("")`, and an empty `hostId` would be
    /// rejected by beacon receivers.
    pub fn resolve(
        port: u16,
        discovery_target: String,
        host_id: Option<String>,
        public_host: String,
    ) -> Self {
        Self {
            port,
            discovery_target,
            host_id: host_id
                .filter(|h| !h.is_empty())
                .unwrap_or_else(default_host_id),
            public_host,
        }
    }
}

/// System hostname, or the fixed fallback if it cannot be read.
pub fn default_host_id() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| FALLBACK_HOST_ID.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_keeps_explicit_host_id() {
        let config = Config::resolve(
            40000,
            "localhost:53530".to_string(),
            Some("box1".to_string()),
            "beachhead".to_string(),
        );
        assert_eq!(config.port, 40000);
        assert_eq!(config.host_id, "box1");
    }

    #[test]
    fn test_resolve_falls_back_to_hostname() {
        let config = Config::resolve(
            DEFAULT_PORT,
            DEFAULT_DISCOVERY_TARGET.to_string(),
            None,
            DEFAULT_PUBLIC_HOST.to_string(),
        );
        // Either the real hostname or the literal fallback, never empty
        assert!(!config.host_id.is_empty());
    }

    #[test]
    fn test_resolve_treats_empty_host_id_as_unset() {
        let config = Config::resolve(
            DEFAULT_PORT,
            DEFAULT_DISCOVERY_TARGET.to_string(),
            Some(String::new()),
            DEFAULT_PUBLIC_HOST.to_string(),
        );
        assert!(!config.host_id.is_empty());
    }

    #[test]
    fn test_default_host_id_not_empty() {
        assert!(!default_host_id().is_empty());
    }
}
