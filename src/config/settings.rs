//! Application settings and configuration management

use crate::backend::BackendTarget;
use crate::error::{AppError, Result};
use crate::services::fanout::FailurePolicy;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Environment variable naming an alternative configuration file
pub const CONFIG_PATH_ENV: &str = "MESH_CONFIG";

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default = "default_routes")]
    pub routes: Vec<RouteConfig>,
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub fanout: FanoutConfig,
    #[serde(default)]
    pub workload: WorkloadConfig,
}

/// Which service this process runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceRole {
    #[default]
    Gateway,
    Cpu,
    Io,
    Mem,
    Net,
    Chain,
    Fanout,
}

impl ServiceRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceRole::Gateway => "gateway",
            ServiceRole::Cpu => "cpu",
            ServiceRole::Io => "io",
            ServiceRole::Mem => "mem",
            ServiceRole::Net => "net",
            ServiceRole::Chain => "chain",
            ServiceRole::Fanout => "fanout",
        }
    }

    /// Port the role listens on when none is configured
    pub fn default_port(&self) -> u16 {
        match self {
            ServiceRole::Gateway => 8080,
            ServiceRole::Cpu => 8081,
            ServiceRole::Io => 8082,
            ServiceRole::Mem => 8083,
            ServiceRole::Net => 8085,
            ServiceRole::Chain => 8086,
            ServiceRole::Fanout => 8087,
        }
    }
}

impl fmt::Display for ServiceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub role: ServiceRole,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
}

impl ServiceConfig {
    pub fn bind_port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.role.default_port())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.bind_port())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            role: ServiceRole::default(),
            host: default_host(),
            port: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

/// Outbound call settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Per-call timeout; unset leaves calls unbounded
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl ClientConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Name to base URL overrides applied before DNS addressing
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

/// One gateway route
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteConfig {
    pub path: String,
    pub target: BackendTarget,
}

impl RouteConfig {
    pub fn new(path: impl Into<String>, name: impl Into<String>, port: u16) -> Self {
        Self {
            path: path.into(),
            target: BackendTarget::new(name, port),
        }
    }
}

fn default_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig::new("/cpu", "svc-cpu", 8081),
        RouteConfig::new("/io", "svc-io", 8082),
        RouteConfig::new("/mem", "svc-mem", 8083),
        RouteConfig::new("/chain", "svc-chain", 8086),
        RouteConfig::new("/fanout", "svc-fanout", 8087),
    ]
}

/// Chain delegator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    pub target: BackendTarget,
    pub prefix: String,
    pub error_prefix: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            target: BackendTarget::new("svc-cpu", 8081),
            prefix: "Chain Complete. Downstream said: ".to_string(),
            error_prefix: "Error calling downstream: ".to_string(),
        }
    }
}

/// Fan-out coordinator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FanoutConfig {
    pub targets: Vec<BackendTarget>,
    pub failure_policy: FailurePolicy,
    pub acknowledgement: String,
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            targets: vec![
                BackendTarget::new("svc-cpu", 8081),
                BackendTarget::new("svc-io", 8082),
            ],
            failure_policy: FailurePolicy::default(),
            acknowledgement: "Fanout Complete.\n".to_string(),
        }
    }
}

/// Workload simulator configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkloadConfig {
    pub cpu: CpuWorkload,
    pub io: IoWorkload,
    pub mem: MemWorkload,
    pub net: NetWorkload,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CpuWorkload {
    /// Primes are counted below this bound
    pub limit: u64,
}

impl Default for CpuWorkload {
    fn default() -> Self {
        Self { limit: 100_000 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IoWorkload {
    pub path: String,
    pub size_mb: u64,
    /// fsync after every chunk
    pub sync: bool,
}

impl Default for IoWorkload {
    fn default() -> Self {
        Self {
            path: "/tmp/junk.dat".to_string(),
            size_mb: 100,
            sync: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MemWorkload {
    pub chunks: usize,
    pub chunk_mb: usize,
    pub pause_ms: u64,
}

impl Default for MemWorkload {
    fn default() -> Self {
        Self {
            chunks: 10,
            chunk_mb: 10,
            pause_ms: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetWorkload {
    pub url: String,
}

impl Default for NetWorkload {
    fn default() -> Self {
        Self {
            url: "https://www.google.com".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the configuration file and environment variables
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config/default.toml".to_string());
        Self::load_from_path(path)
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let path = path
            .to_str()
            .ok_or_else(|| AppError::invalid_config(format!("Non UTF-8 config path: {}", path.display())))?;

        let config = Config::builder()
            .set_default("service.host", "0.0.0.0")?
            .set_default("service.role", "gateway")?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            // Load from configuration file
            .add_source(File::with_name(path).required(false))
            // Override with environment variables (e.g. MESH__SERVICE__ROLE=chain)
            .add_source(
                Environment::with_prefix("MESH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.service.port == Some(0) {
            return Err(AppError::invalid_config("Service port cannot be 0"));
        }

        validate_routes(&self.routes)?;

        validate_target(&self.chain.target)?;

        if self.fanout.targets.is_empty() {
            return Err(AppError::invalid_config("Fan-out needs at least one target"));
        }
        for target in &self.fanout.targets {
            validate_target(target)?;
        }

        if self.workload.cpu.limit == 0 {
            return Err(AppError::invalid_config("workload.cpu.limit must be positive"));
        }
        if self.workload.io.size_mb == 0 || self.workload.io.path.is_empty() {
            return Err(AppError::invalid_config(
                "workload.io needs a path and a positive size_mb",
            ));
        }
        if self.workload.mem.chunks == 0 || self.workload.mem.chunk_mb == 0 {
            return Err(AppError::invalid_config(
                "workload.mem chunks and chunk_mb must be positive",
            ));
        }

        Ok(())
    }
}

pub(crate) fn validate_target(target: &BackendTarget) -> Result<()> {
    if target.name.is_empty() {
        return Err(AppError::invalid_config("Backend name cannot be empty"));
    }
    if target.port == 0 {
        return Err(AppError::invalid_config(format!(
            "Backend '{}' port cannot be 0",
            target.name
        )));
    }
    Ok(())
}

pub(crate) fn validate_routes(routes: &[RouteConfig]) -> Result<()> {
    if routes.is_empty() {
        return Err(AppError::invalid_config("Routing table cannot be empty"));
    }

    let mut seen = HashSet::new();
    for route in routes {
        if !route.path.starts_with('/') {
            return Err(AppError::invalid_config(format!(
                "Route path '{}' must start with '/'",
                route.path
            )));
        }
        if !seen.insert(route.path.as_str()) {
            return Err(AppError::invalid_config(format!(
                "Duplicate route path '{}'",
                route.path
            )));
        }
        validate_target(&route.target)?;
    }

    Ok(())
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            logging: LoggingConfig::default(),
            client: ClientConfig::default(),
            resolver: ResolverConfig::default(),
            routes: default_routes(),
            chain: ChainConfig::default(),
            fanout: FanoutConfig::default(),
            workload: WorkloadConfig::default(),
        }
    }
}
