//! Configuration file handling

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::paths::find_config;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the benchmark executable, relative to the working directory
    #[serde(default = "default_executable")]
    pub executable: PathBuf,

    /// Append-only log receiving every command line and its output
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Glob used when no pattern is given on the command line
    #[serde(default = "default_pattern")]
    pub default_pattern: String,

    /// Exit non-zero when at least one case fails
    #[serde(default)]
    pub fail_on_failure: bool,

    /// Values handed to the benchmark through its environment
    #[serde(default)]
    pub environment: EnvironmentConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            log_file: default_log_file(),
            default_pattern: default_pattern(),
            fail_on_failure: false,
            environment: EnvironmentConfig::default(),
        }
    }
}

fn default_executable() -> PathBuf {
    PathBuf::from("src/uperf")
}
fn default_log_file() -> PathBuf {
    PathBuf::from("log")
}
fn default_pattern() -> String {
    "tests/*xml".to_string()
}

/// Benchmark parameters exported to every invocation
///
/// Values are passed through verbatim; uperf profiles reference them as
/// `$h`, `$nthr` and so on.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EnvironmentConfig {
    /// Target host
    #[serde(default = "default_host")]
    pub h: String,
    #[serde(default = "default_host")]
    pub h1: String,
    #[serde(default = "default_host")]
    pub h2: String,
    #[serde(default = "default_host")]
    pub h3: String,
    #[serde(default = "default_host")]
    pub h4: String,

    /// Thread count
    #[serde(default = "default_nthr")]
    pub nthr: String,

    /// Connection count
    #[serde(default = "default_conn")]
    pub conn: String,

    /// Transport protocol
    #[serde(default = "default_proto")]
    pub proto: String,

    /// Iteration count
    #[serde(default = "default_iter")]
    pub iter: String,

    /// Payload size in bytes
    #[serde(default = "default_size")]
    pub size: String,

    /// Duration, e.g. "10s"
    #[serde(default = "default_duration")]
    pub t: String,

    /// Target operation rate
    #[serde(default = "default_rate")]
    pub rate: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            h: default_host(),
            h1: default_host(),
            h2: default_host(),
            h3: default_host(),
            h4: default_host(),
            nthr: default_nthr(),
            conn: default_conn(),
            proto: default_proto(),
            iter: default_iter(),
            size: default_size(),
            t: default_duration(),
            rate: default_rate(),
        }
    }
}

fn default_host() -> String {
    "frost".to_string()
}
fn default_nthr() -> String {
    "10".to_string()
}
fn default_conn() -> String {
    "10".to_string()
}
fn default_proto() -> String {
    "tcp".to_string()
}
fn default_iter() -> String {
    "100".to_string()
}
fn default_size() -> String {
    "1400".to_string()
}
fn default_duration() -> String {
    "10s".to_string()
}
fn default_rate() -> String {
    "1000".to_string()
}

impl Config {
    /// Load configuration for a run started in `dir`
    ///
    /// Returns default configuration if no config file exists
    pub fn load(dir: &Path) -> Result<Self> {
        match find_config(dir) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }
}
