// ⚙️ Configuration - Environment settings and logging setup

use anyhow::{ensure, Context, Result};
use chrono::Duration;
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::LocalAuthSettings;
use crate::messages::Locale;
use crate::summary::DEFAULT_BUDGET_LIMIT;
use crate::table::DEFAULT_PAGE_SIZE;

/// Ten years; longer session lifetimes are rejected at startup
pub const MAX_SESSION_TTL_HOURS: i64 = 87_600;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    /// SQLite file for users and sessions
    pub db_path: PathBuf,
    pub addr: SocketAddr,
    /// Public origin used in confirmation links
    pub site_url: String,
    /// Directory with `income`/`expenses`/`categories` files; fixtures if unset
    pub data_dir: Option<PathBuf>,
    pub page_size: usize,
    /// Monthly spending limit for the budget card
    pub budget_limit: f64,
    pub session_ttl_hours: i64,
    pub locale: Locale,
    pub hash_rounds: u32,
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_path: PathBuf::from("budgify.db"),
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            site_url: "http://localhost:3000".to_string(),
            data_dir: None,
            page_size: DEFAULT_PAGE_SIZE,
            budget_limit: DEFAULT_BUDGET_LIMIT,
            session_ttl_hours: 168,
            locale: Locale::De,
            hash_rounds: 10_000,
            log_json: false,
        }
    }
}

fn parse<T>(key: &str, value: String) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("Invalid value for {}: {:?}", key, value))
}

impl Config {
    /// Read `BUDGIFY_*` variables from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(v) = lookup("BUDGIFY_DB_PATH") {
            config.db_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("BUDGIFY_ADDR") {
            config.addr = parse("BUDGIFY_ADDR", v)?;
        }
        if let Some(v) = lookup("BUDGIFY_SITE_URL").filter(|v| !v.trim().is_empty()) {
            config.site_url = v.trim().trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("BUDGIFY_DATA_DIR").filter(|v| !v.trim().is_empty()) {
            config.data_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("BUDGIFY_PAGE_SIZE") {
            config.page_size = parse::<usize>("BUDGIFY_PAGE_SIZE", v)?.max(1);
        }
        if let Some(v) = lookup("BUDGIFY_BUDGET_LIMIT") {
            let limit: f64 = parse("BUDGIFY_BUDGET_LIMIT", v)?;
            ensure!(
                limit.is_finite() && limit >= 0.0,
                "Invalid value for BUDGIFY_BUDGET_LIMIT: {} (expected a finite amount >= 0)",
                limit
            );
            config.budget_limit = limit;
        }
        if let Some(v) = lookup("BUDGIFY_SESSION_TTL_HOURS") {
            let hours: i64 = parse("BUDGIFY_SESSION_TTL_HOURS", v)?;
            ensure!(
                (1..=MAX_SESSION_TTL_HOURS).contains(&hours),
                "Invalid value for BUDGIFY_SESSION_TTL_HOURS: {} (expected 1..={})",
                hours,
                MAX_SESSION_TTL_HOURS
            );
            config.session_ttl_hours = hours;
        }
        if let Some(v) = lookup("BUDGIFY_LOCALE") {
            config.locale = parse("BUDGIFY_LOCALE", v)?;
        }
        if let Some(v) = lookup("BUDGIFY_HASH_ROUNDS") {
            config.hash_rounds = parse("BUDGIFY_HASH_ROUNDS", v)?;
        }
        if let Some(v) = lookup("BUDGIFY_LOG_JSON") {
            config.log_json = matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes");
        }

        Ok(config)
    }

    pub fn auth_settings(&self) -> LocalAuthSettings {
        let hours = self.session_ttl_hours.clamp(1, MAX_SESSION_TTL_HOURS);
        LocalAuthSettings {
            session_ttl: Duration::hours(hours),
            hash_rounds: self.hash_rounds.max(1),
            ..Default::default()
        }
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the `info` default.
///
/// Logs go to stderr so the terminal dashboard and `list` output stay clean.
pub fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
