// Configuration types
// Deserialized from the config file and `DEMO__*` environment variables

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub health: HealthConfig,
    pub demos: DemosConfig,
}

/// Listen address and runtime sizing
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads; CPU count when unset
    pub workers: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// `error`, `warn`, `info` or `debug`
    pub level: String,
    pub access_log: bool,
    /// `combined`, `common`, `json`, or a `$variable` pattern
    pub access_log_format: String,
    /// Append access and info lines here instead of stdout
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Append warnings and errors here instead of stderr
    #[serde(default)]
    pub error_log_file: Option<String>,
}

/// Connection timing, all in seconds
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Value of the `Server` response header
    pub server_name: String,
    pub enable_cors: bool,
    /// Largest accepted form submission, in bytes
    pub max_body_size: u64,
    /// Include diagnostic traces of unexpected faults in error documents
    #[serde(default)]
    pub expose_error_traces: bool,
}

/// Liveness and readiness probes
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HealthConfig {
    pub enabled: bool,
    pub liveness_path: String,
    pub readiness_path: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            liveness_path: "/healthz".to_string(),
            readiness_path: "/readyz".to_string(),
        }
    }
}

/// Demo behaviour knobs
#[derive(Debug, Deserialize, Clone)]
pub struct DemosConfig {
    /// Sleep inside loaders/actions to mimic database and API latency
    pub simulate_latency: bool,
    /// Base URL of the repository search API used by the client demo
    pub github_api_url: String,
    pub github_timeout_secs: u64,
}
