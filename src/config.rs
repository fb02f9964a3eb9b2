use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

/// Lowest port a non-root user may bind.
pub const MIN_PORT: u16 = 1024;

/// Command line of the `docserve` binary.
#[derive(Debug, Parser)]
#[command(name = "docserve")]
#[command(about = "Serves files from the current directory over HTTP")]
pub struct Args {
    /// Port to listen on (1024..=65535)
    #[arg(value_parser = clap::value_parser!(u16).range(MIN_PORT as i64..))]
    pub port: u16,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Value of the `Server` response header.
    pub server_name: String,
    /// Ceiling on connections handled at once; 0 means unbounded.
    pub max_connections: usize,
    /// Serve at most one file body at a time across all connections.
    pub serialize_file_service: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory request targets are appended to.
    pub root: PathBuf,
    /// Document substituted for targets ending in `/`.
    pub index: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            server_name: "docserve".to_string(),
            max_connections: 1024,
            serialize_file_service: true,
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            index: "index.html".to_string(),
        }
    }
}

impl Config {
    /// Default configuration listening on all interfaces at `port`.
    pub fn for_port(port: u16) -> Self {
        let mut cfg = Self::default();
        cfg.server.listen_addr = format!("0.0.0.0:{}", port);
        cfg
    }

    /// Parses a YAML document; missing keys keep their defaults.
    pub fn from_yaml(src: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(src)?;
        Ok(cfg)
    }
}
