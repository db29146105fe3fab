//! `[serve]` section.
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"   # "0.0.0.0" to expose on the LAN
//! port = 5277
//! ```

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    pub interface: IpAddr,
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5277,
        }
    }
}

impl ServeConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.port == 0 {
            diag.error_with_hint(
                FieldPath::new("serve.port"),
                "port must not be 0",
                "pick a fixed port such as 5277",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_serve_config() {
        let config = test_parse_config("[serve]\ninterface = \"0.0.0.0\"\nport = 8080");
        assert_eq!(config.serve.interface, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.serve.port, 8080);
    }

    #[test]
    fn test_serve_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.serve.interface, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.serve.port, 5277);
    }

    #[test]
    fn test_serve_config_ipv6() {
        let config = test_parse_config("[serve]\ninterface = \"::1\"");
        assert_eq!(config.serve.interface, IpAddr::V6(Ipv6Addr::LOCALHOST));
    }

    #[test]
    fn test_serve_port_zero() {
        let config = test_parse_config("[serve]\nport = 0");
        let mut diag = ConfigDiagnostics::new();
        config.serve.validate(&mut diag);
        assert_eq!(diag.errors().len(), 1);
    }
}
