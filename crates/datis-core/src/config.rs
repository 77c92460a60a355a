use std::{env, fs, path::Path};

use crate::{errors::Error, Result};

pub const DEFAULT_API_BASE_URL: &str = "https://datis.clowd.io/api";

/// Typed configuration, read from the environment (and an optional `.env`).
#[derive(Clone, Debug)]
pub struct Config {
    pub telegram_bot_token: String,

    // Upstream
    pub api_base_url: String,

    // Telegram limits
    pub telegram_message_limit: usize,
    pub telegram_safe_limit: usize,

    // Station picker
    pub stations_per_page: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).and_then(non_empty);

        let telegram_bot_token = get("TELEGRAM_BOT_TOKEN")
            .or_else(|| get("BOT_TOKEN"))
            .ok_or_else(|| {
                Error::Config("TELEGRAM_BOT_TOKEN environment variable is required".to_string())
            })?;

        let api_base_url = get("DATIS_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();
        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "DATIS_API_BASE_URL must be an http(s) URL, got {api_base_url:?}"
            )));
        }

        let telegram_message_limit = parse_usize(&get, "TELEGRAM_MESSAGE_LIMIT")?.unwrap_or(4096);
        let telegram_safe_limit = parse_usize(&get, "TELEGRAM_SAFE_LIMIT")?
            .unwrap_or(4000)
            .clamp(1, telegram_message_limit.max(1));

        // Keep full rows in a two-column grid.
        let stations_per_page = parse_usize(&get, "STATIONS_PER_PAGE")?
            .unwrap_or(20)
            .clamp(2, 90);
        let stations_per_page = stations_per_page + stations_per_page % 2;

        Ok(Self {
            telegram_bot_token,
            api_base_url,
            telegram_message_limit,
            telegram_safe_limit,
            stations_per_page,
        })
    }
}

fn parse_usize(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<usize>> {
    get(key)
        .map(|s| {
            s.trim()
                .parse::<usize>()
                .map_err(|e| Error::Config(format!("{key} must be a positive integer: {e}")))
        })
        .transpose()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
