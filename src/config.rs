//! Resolved runtime settings.
//!
//! [`Args`] is what the user typed; [`Settings`] is what the rest of the
//! crate consumes. Blank tokens count as absent, durations are typed.

use std::path::PathBuf;
use std::time::Duration;

use crate::Args;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_TICK: Duration = Duration::from_millis(500);
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base URL of the REST API, without the search path.
    pub api_url: String,
    pub token: Option<String>,
    /// Interval between simulated download steps.
    pub tick: Duration,
    /// Quiet period before an edited query is searched.
    pub debounce: Duration,
    pub timeout: Duration,
    pub log_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            tick: DEFAULT_TICK,
            debounce: DEFAULT_DEBOUNCE,
            timeout: DEFAULT_TIMEOUT,
            log_file: PathBuf::from("repo-downloader.log"),
        }
    }
}

impl From<&Args> for Settings {
    fn from(args: &Args) -> Self {
        let token = match &args.token {
            Some(t) if !t.trim().is_empty() => Some(t.trim().to_string()),
            _ => None,
        };

        Self {
            api_url: args.api_url.clone(),
            token,
            tick: Duration::from_millis(args.tick_ms),
            debounce: Duration::from_millis(args.debounce_ms),
            timeout: Duration::from_secs(args.timeout_secs),
            log_file: args.log_file.clone(),
        }
    }
}
