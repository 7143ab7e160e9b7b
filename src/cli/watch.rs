use anyhow::Result;
use std::sync::Arc;

use super::feed::print_feed;
use super::sessions::{print_directories, print_sessions};
use crate::api::{Session, Transport};
use crate::core::{AppConfig, RelayError};
use crate::feed::NotificationFeed;
use crate::push::{FilePushPlatform, PushPlatform, PushRegistrar};
use crate::sessions::SessionManager;

/// Everything the watch view shows, wired to one transport
pub struct Dashboard {
    pub registrar: PushRegistrar,
    pub feed: NotificationFeed,
    pub sessions: SessionManager,
}

impl Dashboard {
    /// Initializes push, loads directories and runs the first poll. Push
    /// problems end up in the registrar status and never stop the rest from
    /// loading. Load failures are logged by the components.
    pub async fn start(transport: Arc<dyn Transport>, platform: Arc<dyn PushPlatform>) -> Self {
        let dashboard = Self {
            registrar: PushRegistrar::new(Arc::clone(&transport), platform),
            feed: NotificationFeed::new(Arc::clone(&transport)),
            sessions: SessionManager::new(transport),
        };

        dashboard.registrar.initialize().await;
        let _ = dashboard.sessions.list_directories().await;
        dashboard.poll().await;
        dashboard
    }

    /// Refreshes the feed and the session list side by side
    pub async fn poll(&self) -> (Result<usize, RelayError>, Result<Vec<Session>, RelayError>) {
        tokio::join!(self.feed.refresh(), self.sessions.list_sessions())
    }

    fn print(&self, feed_loaded: bool, sessions_loaded: bool) {
        if feed_loaded {
            println!("== Notifications");
            print_feed(&self.feed.rows());
        }
        if sessions_loaded {
            println!("== Sessions");
            print_sessions(&self.sessions.state().sessions);
        }
    }
}

/// Loads everything once, then refreshes on a fixed interval until ctrl-c
pub async fn run(config: &AppConfig, transport: Arc<dyn Transport>) -> Result<()> {
    let platform = Arc::new(FilePushPlatform::new(
        config.push_endpoint.clone(),
        &config.state_path,
    ));
    let dashboard = Dashboard::start(transport, platform).await;

    println!("Push: {}", dashboard.registrar.state().status_text());
    println!("== Directories");
    print_directories(&dashboard.sessions.state().directories);
    dashboard.print(dashboard.feed.state().loaded, true);

    let mut interval = tokio::time::interval(config.poll_interval);
    // The first tick completes immediately and startup already polled
    interval.tick().await;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let (feed, sessions) = dashboard.poll().await;
                dashboard.print(feed.is_ok(), sessions.is_ok());
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("Stopping watch");
                break;
            }
        }
    }

    Ok(())
}
