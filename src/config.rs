//! Runtime configuration read from environment variables.
//!
//! Every setting has a default, so the service runs without any
//! configuration. Unparsable values are logged and replaced by the default.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Default bind host (all interfaces).
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Default server port.
pub const DEFAULT_PORT: u16 = 5000;

/// Default data file, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "lucky_ip_data.json";

/// Default number of snapshots buffered per realtime client.
pub const DEFAULT_BROADCAST_CAPACITY: usize = 100;

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address to bind (`LUCKY_HOST`).
    pub host: IpAddr,
    /// Port to bind (`LUCKY_PORT`).
    pub port: u16,
    /// Rule data file (`LUCKY_DATA_FILE`).
    pub data_file: PathBuf,
    /// Broadcast buffer size (`LUCKY_BROADCAST_CAPACITY`).
    pub broadcast_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable
    /// name to its value.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_file = lookup("LUCKY_DATA_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_file);

        Self {
            host: parse_or(&lookup, "LUCKY_HOST", defaults.host),
            port: parse_or(&lookup, "LUCKY_PORT", defaults.port),
            data_file,
            broadcast_capacity: parse_or(&lookup, "LUCKY_BROADCAST_CAPACITY", defaults.broadcast_capacity)
                .max(1),
        }
    }

    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(
                    "Invalid value '{}' for {}, using default {}",
                    raw,
                    name,
                    default
                );
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);

        assert_eq!(config, Config::default());
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:5000");
        assert_eq!(config.data_file, PathBuf::from("lucky_ip_data.json"));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("LUCKY_HOST", "127.0.0.1"),
            ("LUCKY_PORT", "5001"),
            ("LUCKY_DATA_FILE", "/var/lib/lucky/rules.json"),
            ("LUCKY_BROADCAST_CAPACITY", "16"),
        ]);

        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:5001");
        assert_eq!(config.data_file, PathBuf::from("/var/lib/lucky/rules.json"));
        assert_eq!(config.broadcast_capacity, 16);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("LUCKY_HOST", "not-an-ip"),
            ("LUCKY_PORT", "99999"),
            ("LUCKY_DATA_FILE", "  "),
        ]);

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let config = config_from(&[("LUCKY_BROADCAST_CAPACITY", "0")]);
        assert_eq!(config.broadcast_capacity, 1);
    }
}
