use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_DATA_DIR: &str = "data/history";
const DEFAULT_BASE_URL: &str = "https://www.sports-reference.com";
const DEFAULT_MIN_YEAR: u16 = 1869;
const DEFAULT_FULL_HISTORY_YEAR: u16 = 1960;
const DEFAULT_DELAY_MS: u64 = 3000;
const DEFAULT_JITTER_MS: u64 = 2000;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fixed pause plus a uniformly random extra between team requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayConfig {
    pub base: Duration,
    pub jitter: Duration,
}

impl DelayConfig {
    pub fn none() -> Self {
        Self {
            base: Duration::ZERO,
            jitter: Duration::ZERO,
        }
    }
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(DEFAULT_DELAY_MS),
            jitter: Duration::from_millis(DEFAULT_JITTER_MS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HistoryConfig {
    pub data_dir: PathBuf,
    pub base_url: String,
    /// Seasons older than this are ignored by the parser.
    pub min_year: u16,
    /// A stored document with any season before this year counts as complete.
    pub full_history_year: u16,
    pub delay: DelayConfig,
    pub request_timeout: Duration,
    pub registry_path: Option<PathBuf>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            base_url: DEFAULT_BASE_URL.to_string(),
            min_year: DEFAULT_MIN_YEAR,
            full_history_year: DEFAULT_FULL_HISTORY_YEAR,
            delay: DelayConfig::default(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            registry_path: None,
        }
    }
}

impl HistoryConfig {
    /// Reads `CFB_HISTORY_*` variables; unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(dir) = env_string("CFB_HISTORY_DATA_DIR") {
            cfg.data_dir = PathBuf::from(dir);
        }
        if let Some(url) = env_string("CFB_HISTORY_BASE_URL") {
            cfg.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(year) = env_parse::<u16>("CFB_HISTORY_MIN_YEAR") {
            cfg.min_year = year;
        }
        if let Some(year) = env_parse::<u16>("CFB_HISTORY_FULL_YEAR") {
            cfg.full_history_year = year;
        }
        if let Some(ms) = env_parse::<u64>("CFB_HISTORY_DELAY_MS") {
            cfg.delay.base = Duration::from_millis(ms);
        }
        if let Some(ms) = env_parse::<u64>("CFB_HISTORY_JITTER_MS") {
            cfg.delay.jitter = Duration::from_millis(ms);
        }
        if let Some(secs) = env_parse::<u64>("CFB_HISTORY_TIMEOUT_SECS") {
            cfg.request_timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(path) = env_string("CFB_HISTORY_REGISTRY") {
            cfg.registry_path = Some(PathBuf::from(path));
        }
        cfg
    }

    pub fn school_url(&self, external_id: &str) -> String {
        format!("{}/cfb/schools/{external_id}/index.html", self.base_url)
    }
}

/// Loads `.env.local` then `.env`; missing files are fine.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

fn env_string(key: &str) -> Option<String> {
    let raw = std::env::var(key).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_string(key)?.parse::<T>().ok()
}
