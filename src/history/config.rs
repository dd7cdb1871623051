use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// 2025-01-01T00:00:00Z in epoch milliseconds.
pub const DEFAULT_START_DATE_MS: i64 = 1_735_689_600_000;
pub const DEFAULT_BATCH_SIZE: u32 = 100;
pub const DEFAULT_MAX_PAGES: u32 = 100;
pub const DEFAULT_OUTPUT_PATH: &str = "activities.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub url: String,
    pub username: String,
    pub password: String,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    pub start_date_ms: i64,
    pub batch_size: u32,
    pub max_pages: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            start_date_ms: DEFAULT_START_DATE_MS,
            batch_size: DEFAULT_BATCH_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HistoryConfig {
    pub endpoint: EndpointConfig,
    pub query: QueryConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialHistoryConfig {
    endpoint: Option<EndpointConfig>,
    query: Option<PartialQueryConfig>,
    output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialQueryConfig {
    start_date_ms: Option<i64>,
    batch_size: Option<u32>,
    max_pages: Option<u32>,
}

fn env_non_empty(var: &str) -> Option<String> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}

fn env_or_string(var: &str, fallback: &str) -> String {
    env_non_empty(var).unwrap_or_else(|| fallback.to_string())
}

fn env_or_parsed<T: std::str::FromStr>(var: &str, fallback: T) -> T {
    env_non_empty(var)
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(fallback)
}

fn validate(cfg: &HistoryConfig) -> Result<()> {
    let url = cfg.endpoint.url.trim();
    if url.is_empty() {
        return Err(anyhow!(
            "graphql endpoint url is not set; use ACTIVITY_HISTORY_URL or [endpoint].url"
        ));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(anyhow!(
            "invalid graphql endpoint url `{url}`: must start with http:// or https://"
        ));
    }
    if cfg.endpoint.username.trim().is_empty() {
        return Err(anyhow!(
            "endpoint username is not set; use ACTIVITY_HISTORY_USERNAME or [endpoint].username"
        ));
    }
    if cfg.endpoint.password.is_empty() {
        return Err(anyhow!(
            "endpoint password is not set; use ACTIVITY_HISTORY_PASSWORD or [endpoint].password"
        ));
    }
    if cfg.endpoint.request_timeout_secs == Some(0) {
        return Err(anyhow!("invalid request timeout: must be >= 1 second"));
    }
    if cfg.query.batch_size == 0 {
        return Err(anyhow!("invalid batch size: must be >= 1"));
    }
    if cfg.query.max_pages == 0 {
        return Err(anyhow!("invalid max pages: must be >= 1"));
    }
    if cfg.output.path.as_os_str().is_empty() {
        return Err(anyhow!("invalid output path: cannot be empty"));
    }
    Ok(())
}

fn resolve_config_path() -> Option<PathBuf> {
    if let Some(custom) = env_non_empty("ACTIVITY_HISTORY_CONFIG_PATH") {
        return Some(PathBuf::from(custom));
    }

    let home = dirs::home_dir()?;
    Some(home.join(".activity-history").join("config.toml"))
}

fn merge_toml(base: &mut HistoryConfig, raw: &str) -> Result<()> {
    let parsed: PartialHistoryConfig = toml::from_str(raw)?;
    if let Some(endpoint) = parsed.endpoint {
        base.endpoint = endpoint;
    }
    if let Some(query) = parsed.query {
        if let Some(start_date_ms) = query.start_date_ms {
            base.query.start_date_ms = start_date_ms;
        }
        if let Some(batch_size) = query.batch_size {
            base.query.batch_size = batch_size;
        }
        if let Some(max_pages) = query.max_pages {
            base.query.max_pages = max_pages;
        }
    }
    if let Some(output) = parsed.output {
        base.output = output;
    }
    Ok(())
}

fn merge_file_config(base: &mut HistoryConfig) -> Result<()> {
    let Some(path) = resolve_config_path() else {
        return Ok(());
    };
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(&path)?;
    merge_toml(base, &raw)
        .map_err(|err| anyhow!("failed to parse history config {}: {err}", path.display()))
}

pub fn load_config() -> Result<HistoryConfig> {
    let mut cfg = HistoryConfig::default();
    merge_file_config(&mut cfg)?;

    cfg.endpoint.url = env_or_string("ACTIVITY_HISTORY_URL", &cfg.endpoint.url);
    cfg.endpoint.username = env_or_string("ACTIVITY_HISTORY_USERNAME", &cfg.endpoint.username);
    // Passwords may legitimately contain surrounding spaces.
    if let Ok(password) = env::var("ACTIVITY_HISTORY_PASSWORD")
        && !password.is_empty()
    {
        cfg.endpoint.password = password;
    }
    if let Some(secs) = env_non_empty("ACTIVITY_HISTORY_TIMEOUT_SECS")
        .and_then(|v| v.parse::<u64>().ok())
    {
        cfg.endpoint.request_timeout_secs = Some(secs);
    }
    cfg.query.start_date_ms =
        env_or_parsed("ACTIVITY_HISTORY_START_DATE_MS", cfg.query.start_date_ms);
    cfg.query.batch_size = env_or_parsed("ACTIVITY_HISTORY_BATCH_SIZE", cfg.query.batch_size);
    cfg.query.max_pages = env_or_parsed("ACTIVITY_HISTORY_MAX_PAGES", cfg.query.max_pages);
    if let Some(output) = env_non_empty("ACTIVITY_HISTORY_OUTPUT") {
        cfg.output.path = PathBuf::from(output);
    }

    validate(&cfg)?;
    Ok(cfg)
}
