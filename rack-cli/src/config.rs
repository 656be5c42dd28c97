//! Configuration loading for rack-sim.
//!
//! Configuration is loaded from a TOML file (default: `rack-sim.toml`).
//! A missing default file means built-in defaults; every field is optional.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rack_client::{BackendMode, HostSettings, Timings};
use rack_core::{Topology, TopologyError, UnknownZonePolicy};
use rack_types::ServiceSpec;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "rack-sim.toml";

/// Root configuration for rack-sim.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Node → zone table.
    #[serde(default)]
    pub topology: TopologyConfig,
    /// Services checked for zone spread.
    #[serde(default)]
    pub services: ServicesConfig,
    /// Cluster conventions.
    #[serde(default)]
    pub cluster: ClusterConfig,
    /// Orchestrator host identity.
    #[serde(default)]
    pub host: HostConfig,
    /// Scenario timing.
    #[serde(default)]
    pub timing: TimingConfig,
    /// Failure backend.
    #[serde(default)]
    pub backend: BackendConfig,
    /// Health scoring.
    #[serde(default)]
    pub health: HealthConfig,
    /// Log sinks.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Topology configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TopologyConfig {
    /// Node → zone. Defaults to the 9-node, 3-rack lab when the section is absent.
    #[serde(default)]
    pub nodes: BTreeMap<String, String>,
    /// Optional file of `ZONE: node1, node2` lines merged into `nodes`.
    #[serde(default)]
    pub zone_file: Option<PathBuf>,
}

/// Critical services configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServicesConfig {
    /// Service names.
    #[serde(default = "default_critical_services")]
    pub critical: Vec<String>,
    /// Pod label holding the service name (default: `app`).
    #[serde(default = "default_label_key")]
    pub label_key: String,
}

/// Cluster conventions.
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterConfig {
    /// Node label holding the zone (default: `topology.kubernetes.io/zone`).
    #[serde(default = "default_zone_label")]
    pub zone_label: String,
}

/// Host identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HostConfig {
    /// Environment variable naming the current node (default: `NODE_NAME`).
    #[serde(default = "default_node_name_env")]
    pub node_name_env: String,
    /// Node to assume when neither hostname nor environment identify one.
    #[serde(default)]
    pub fallback_node: Option<String>,
}

/// Scenario timing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TimingConfig {
    /// Pause after each power call in seconds (default: 5).
    #[serde(default = "default_injection_delay")]
    pub injection_delay_secs: u64,
    /// Settle time before health checks in seconds (default: 60).
    #[serde(default = "default_stabilization")]
    pub stabilization_secs: u64,
    /// Time targets stay down in seconds (default: 10).
    #[serde(default = "default_downtime")]
    pub downtime_secs: u64,
    /// Simulated delay of the mock backend in seconds (default: 1).
    #[serde(default = "default_mock_delay")]
    pub mock_delay_secs: u64,
    /// Seed for target selection; random when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Failure backend configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendConfig {
    /// Backend mode (default: `auto`).
    #[serde(default)]
    pub mode: BackendMode,
    /// Host backend settings.
    #[serde(default)]
    pub host: HostSettings,
}

/// Health scoring configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthConfig {
    /// Whether the `unknown` zone bucket counts as a zone (default: `count`).
    #[serde(default)]
    pub unknown_zone: UnknownZonePolicy,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Directory for the log file; stdout only when unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    /// Log file name (default: `rack_resilience_simulation.log`).
    #[serde(default = "default_log_file")]
    pub file_name: String,
}

// Default value functions
fn default_critical_services() -> Vec<String> {
    ["etcd-sim", "postgres-sim", "redis-sim", "nginx-sim", "auth-sim"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_label_key() -> String {
    "app".to_string()
}

fn default_zone_label() -> String {
    "topology.kubernetes.io/zone".to_string()
}

fn default_node_name_env() -> String {
    "NODE_NAME".to_string()
}

fn default_injection_delay() -> u64 {
    5
}

fn default_stabilization() -> u64 {
    60
}

fn default_downtime() -> u64 {
    10
}

fn default_mock_delay() -> u64 {
    1
}

fn default_log_file() -> String {
    "rack_resilience_simulation.log".to_string()
}

fn default_nodes() -> BTreeMap<String, String> {
    [
        ("master-m001", "R1"),
        ("worker-w001", "R1"),
        ("worker-w002", "R1"),
        ("master-m002", "R2"),
        ("worker-w003", "R2"),
        ("worker-w004", "R2"),
        ("master-m003", "R3"),
        ("worker-w005", "R3"),
        ("worker-w006", "R3"),
    ]
    .iter()
    .map(|(node, zone)| (node.to_string(), zone.to_string()))
    .collect()
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            nodes: default_nodes(),
            zone_file: None,
        }
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            critical: default_critical_services(),
            label_key: default_label_key(),
        }
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            zone_label: default_zone_label(),
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            node_name_env: default_node_name_env(),
            fallback_node: None,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            injection_delay_secs: default_injection_delay(),
            stabilization_secs: default_stabilization(),
            downtime_secs: default_downtime(),
            mock_delay_secs: default_mock_delay(),
            seed: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_name: default_log_file(),
        }
    }
}

impl TimingConfig {
    /// Scenario timings.
    pub fn timings(&self) -> Timings {
        Timings {
            injection_delay: Duration::from_secs(self.injection_delay_secs),
            stabilization: Duration::from_secs(self.stabilization_secs),
            downtime: Duration::from_secs(self.downtime_secs),
        }
    }

    /// Delay of the mock backend.
    pub fn mock_delay(&self) -> Duration {
        Duration::from_secs(self.mock_delay_secs)
    }
}

impl ServicesConfig {
    /// Services with their label selectors.
    pub fn specs(&self) -> Vec<ServiceSpec> {
        self.critical
            .iter()
            .map(|name| ServiceSpec::labelled(&self.label_key, name))
            .collect()
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load from `path`, or from the default file if present, or defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply command-line overrides.
    pub fn with_overrides(
        mut self,
        stabilization_secs: Option<u64>,
        downtime_secs: Option<u64>,
        mock: bool,
    ) -> Self {
        if let Some(secs) = stabilization_secs {
            self.timing.stabilization_secs = secs;
        }
        if let Some(secs) = downtime_secs {
            self.timing.downtime_secs = secs;
        }
        if mock {
            self.backend.mode = BackendMode::Mock;
        }
        self
    }

    /// Build the topology from the node table and the optional zone file.
    pub fn topology(&self) -> Result<Topology, ConfigError> {
        let mut topology = Topology::from_pairs(
            self.topology
                .nodes
                .iter()
                .map(|(node, zone)| (node.as_str(), zone.as_str())),
        )?;

        if let Some(path) = &self.topology.zone_file {
            let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
                path: path.clone(),
                source: e,
            })?;
            topology.merge(Topology::parse_zone_file(&content)?)?;
        }
        Ok(topology)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse the configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
    /// The node → zone table is inconsistent.
    #[error("invalid topology: {0}")]
    Topology(#[from] TopologyError),
}
