use std::env;
use std::net::{IpAddr, SocketAddr};

use crate::services::metrics::PathLabel;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Environment configuration
/// Loads and validates environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub metrics_path_label: PathLabel,
    pub process_metrics: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8000,
            metrics_path_label: PathLabel::Template,
            process_metrics: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source; unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = parse_var(&lookup, "HOST", defaults.host, |v| {
            v.parse::<IpAddr>().map_err(|e| e.to_string())
        })?;

        let port = parse_var(&lookup, "PORT", defaults.port, |v| {
            v.parse::<u16>().map_err(|e| e.to_string())
        })?;

        let metrics_path_label =
            parse_var(&lookup, "METRICS_PATH_LABEL", defaults.metrics_path_label, |v| {
                v.parse::<PathLabel>().map_err(|e| e.to_string())
            })?;

        let process_metrics =
            parse_var(&lookup, "METRICS_PROCESS_COLLECTOR", defaults.process_metrics, parse_bool)?;

        Ok(Self {
            host,
            port,
            metrics_path_label,
            process_metrics,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_var<T, F, P>(lookup: &F, name: &'static str, default: T, parse: P) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Result<T, String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => parse(value.trim()).map_err(|reason| ConfigError::Invalid {
            name,
            value,
            reason,
        }),
    }
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err("expected true or false".to_string()),
    }
}
