use cricket_api::client::DEFAULT_BASE_URL;
use cricket_api::graphql::DEFAULT_GRAPHQL_URL;
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_REFRESH_SECS: u64 = 30;

/// Settings read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: LevelFilter,
    pub api_url: String,
    pub graphql_url: String,
    pub refresh_interval: Duration,
    pub session_cookie: Option<String>,
    pub session_path: PathBuf,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: LevelFilter::Info,
            api_url: DEFAULT_BASE_URL.to_owned(),
            graphql_url: DEFAULT_GRAPHQL_URL.to_owned(),
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_SECS),
            session_cookie: None,
            session_path: session_path(),
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Blank values fall back to the defaults.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Self {
            log_level: var("CRICTUI_LOG_LEVEL")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.log_level),
            api_url: var("CRICTUI_API_URL").unwrap_or(defaults.api_url),
            graphql_url: var("CRICTUI_GRAPHQL_URL").unwrap_or(defaults.graphql_url),
            refresh_interval: var("CRICTUI_REFRESH_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.refresh_interval),
            session_cookie: var("CRICTUI_SESSION_COOKIE"),
            ..defaults
        }
    }
}

fn session_path() -> PathBuf {
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return PathBuf::from(config_dir).join("crictui").join("session.json");
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return PathBuf::from(home)
            .join(".config")
            .join("crictui")
            .join("session.json");
    }
    PathBuf::from("session.json")
}
