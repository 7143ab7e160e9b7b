use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Push credentials handed out by a desktop push distributor. When these
/// are not configured the terminal has no push capability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PushEndpointConfig {
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
}

const DEFAULT_POLL_SECS: u64 = 30;

/// Seconds between feed polls. Zero or anything unparsable falls back to
/// the default since the poll timer needs a non-zero period.
fn poll_interval(raw: Option<&str>) -> Duration {
    let secs = raw
        .and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_POLL_SECS);
    Duration::from_secs(secs)
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub base_url: String,
    pub state_path: PathBuf,
    pub poll_interval: Duration,
    pub icon: String,
    pub push_endpoint: Option<PushEndpointConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let host = "127.0.0.1";
        let port = "8765";
        let base_url = env::var("RELAY_URL").unwrap_or(format!("http://{}:{}", host, port));
        let state_path = env::var("RELAY_STATE_PATH").unwrap_or("./.pushrelay".to_string());
        let poll_interval = poll_interval(env::var("RELAY_POLL_SECS").ok().as_deref());
        let icon = env::var("RELAY_ICON").unwrap_or_else(|_| "/static/icon-192.svg".to_string());

        // All three must be present or push is unavailable
        let push_endpoint = match (
            env::var("RELAY_PUSH_ENDPOINT"),
            env::var("RELAY_PUSH_P256DH"),
            env::var("RELAY_PUSH_AUTH"),
        ) {
            (Ok(endpoint), Ok(p256dh), Ok(auth)) => Some(PushEndpointConfig {
                endpoint,
                p256dh,
                auth,
            }),
            _ => None,
        };

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            state_path: PathBuf::from(state_path),
            poll_interval,
            icon,
            push_endpoint,
        }
    }
}
