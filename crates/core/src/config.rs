use serde::Deserialize;

/// Root application configuration. Loaded from an optional TOML file and
/// environment variables with the prefix `DSP_LAUNCHER__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub dsp: DspApiConfig,
    #[serde(default)]
    pub reports: ReportPollConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

// ─── Advertising API ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct DspApiConfig {
    /// Token endpoint (full URL).
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    /// Base URL the endpoint paths are appended to. Point this at the
    /// header-injecting relay when running behind one.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_auth_url() -> String {
    "https://api.amazon.com/auth/o2/token".to_string()
}
fn default_api_base_url() -> String {
    "https://advertising-api.amazon.com".to_string()
}
fn default_request_timeout_ms() -> u64 {
    30_000
}

impl Default for DspApiConfig {
    fn default() -> Self {
        Self {
            auth_url: default_auth_url(),
            api_base_url: default_api_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

// ─── Report Polling ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct ReportPollConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Upper bound on a whole await-report operation when served over REST.
    #[serde(default = "default_report_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_poll_interval_ms() -> u64 { 5000 }
fn default_max_attempts() -> u32 { 30 }
fn default_report_request_timeout_secs() -> u64 { 180 }

impl Default for ReportPollConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            max_attempts: default_max_attempts(),
            request_timeout_secs: default_report_request_timeout_secs(),
        }
    }
}

// ─── Credentials ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub refresh_token: String,
}

impl CredentialsConfig {
    /// Names of the fields that are still empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.client_id.is_empty() {
            missing.push("client_id");
        }
        if self.client_secret.is_empty() {
            missing.push("client_secret");
        }
        if self.refresh_token.is_empty() {
            missing.push("refresh_token");
        }
        missing
    }
}

// Default functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    8080
}
fn default_metrics_port() -> u16 {
    9091
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            port: default_metrics_port(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            metrics: MetricsConfig::default(),
            dsp: DspApiConfig::default(),
            reports: ReportPollConfig::default(),
            credentials: CredentialsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional TOML file, then overlay
    /// environment variables.
    pub fn load_from(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(
                config::File::with_name(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("DSP_LAUNCHER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        config.try_deserialize()
    }
}
