//! Test utilities for integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;
use web_push::SubscriptionInfo;

use pushrelay::agent::{AgentPlatform, WindowClient};
use pushrelay::api::{ActionRequest, Directory, Notification, Session, Transport};
use pushrelay::core::RelayError;
use pushrelay::notify::NotificationOptions;
use pushrelay::push::{PushPlatform, SubscribeOptions};

/// A valid application server key (65 byte uncompressed point) in
/// URL-safe base64 without padding
pub const VAPID_PUBLIC_KEY: &str =
    "BAEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQEBAQE";

/// One recorded call against the fake transport
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    VapidPublicKey,
    Subscribe(String),
    Unsubscribe(String),
    TestNotify,
    Notifications,
    Respond(ActionRequest),
    Directories,
    Sessions,
    StartSession(String),
    KillSession(String),
}

impl Call {
    fn name(&self) -> &'static str {
        match self {
            Call::VapidPublicKey => "vapid_public_key",
            Call::Subscribe(_) => "subscribe",
            Call::Unsubscribe(_) => "unsubscribe",
            Call::TestNotify => "test_notify",
            Call::Notifications => "notifications",
            Call::Respond(_) => "respond",
            Call::Directories => "directories",
            Call::Sessions => "sessions",
            Call::StartSession(_) => "start_session",
            Call::KillSession(_) => "kill_session",
        }
    }
}

/// In-memory relay that records every call. Failures are configured per
/// operation name and returned as `RelayError::Server`.
pub struct FakeTransport {
    pub calls: Mutex<Vec<Call>>,
    pub notifications: Mutex<Vec<Notification>>,
    pub directories: Mutex<Vec<Directory>>,
    pub sessions: Mutex<Vec<Session>>,
    pub public_key: Mutex<String>,
    failures: Mutex<HashMap<&'static str, (u16, Option<String>)>>,
    gated: Mutex<Option<&'static str>>,
    gate: Notify,
}

impl Default for FakeTransport {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            notifications: Mutex::new(Vec::new()),
            directories: Mutex::new(Vec::new()),
            sessions: Mutex::new(Vec::new()),
            public_key: Mutex::new(VAPID_PUBLIC_KEY.to_string()),
            failures: Mutex::new(HashMap::new()),
            gated: Mutex::new(None),
            gate: Notify::new(),
        }
    }
}

impl FakeTransport {
    pub fn with_notifications(notifications: Vec<Notification>) -> Self {
        let transport = Self::default();
        *transport.notifications.lock().unwrap() = notifications;
        transport
    }

    pub fn fail(&self, operation: &'static str, status: u16, detail: Option<&str>) {
        self.failures
            .lock()
            .unwrap()
            .insert(operation, (status, detail.map(String::from)));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.name() == operation)
            .count()
    }

    /// Calls to `operation` wait until `release`
    pub fn hold(&self, operation: &'static str) {
        *self.gated.lock().unwrap() = Some(operation);
    }

    pub fn release(&self) {
        *self.gated.lock().unwrap() = None;
        self.gate.notify_one();
    }

    async fn record(&self, call: Call) -> Result<(), RelayError> {
        let name = call.name();
        self.calls.lock().unwrap().push(call);

        let held = *self.gated.lock().unwrap() == Some(name);
        if held {
            self.gate.notified().await;
        }

        match self.failures.lock().unwrap().get(name) {
            Some((status, detail)) => Err(RelayError::Server {
                status: *status,
                detail: detail.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn vapid_public_key(&self) -> Result<String, RelayError> {
        self.record(Call::VapidPublicKey).await?;
        Ok(self.public_key.lock().unwrap().clone())
    }

    async fn subscribe(&self, subscription: &SubscriptionInfo) -> Result<(), RelayError> {
        self.record(Call::Subscribe(subscription.endpoint.clone()))
            .await
    }

    async fn unsubscribe(&self, endpoint: &str) -> Result<(), RelayError> {
        self.record(Call::Unsubscribe(endpoint.to_string())).await
    }

    async fn test_notify(&self) -> Result<(), RelayError> {
        self.record(Call::TestNotify).await
    }

    async fn notifications(&self) -> Result<Vec<Notification>, RelayError> {
        self.record(Call::Notifications).await?;
        Ok(self.notifications.lock().unwrap().clone())
    }

    async fn respond(&self, request: &ActionRequest) -> Result<(), RelayError> {
        self.record(Call::Respond(request.clone())).await
    }

    async fn directories(&self) -> Result<Vec<Directory>, RelayError> {
        self.record(Call::Directories).await?;
        Ok(self.directories.lock().unwrap().clone())
    }

    async fn sessions(&self) -> Result<Vec<Session>, RelayError> {
        self.record(Call::Sessions).await?;
        Ok(self.sessions.lock().unwrap().clone())
    }

    async fn start_session(&self, path: &str) -> Result<(), RelayError> {
        self.record(Call::StartSession(path.to_string())).await
    }

    async fn kill_session(&self, name: &str) -> Result<(), RelayError> {
        self.record(Call::KillSession(name.to_string())).await
    }
}

/// Push platform kept entirely in memory
pub struct FakePushPlatform {
    pub supported: bool,
    pub fail_registration: bool,
    pub subscription: Mutex<Option<SubscriptionInfo>>,
    pub last_options: Mutex<Option<SubscribeOptions>>,
    pub cancelled: Mutex<Vec<String>>,
}

impl FakePushPlatform {
    pub fn supported() -> Self {
        Self {
            supported: true,
            fail_registration: false,
            subscription: Mutex::new(None),
            last_options: Mutex::new(None),
            cancelled: Mutex::new(Vec::new()),
        }
    }

    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::supported()
        }
    }

    pub fn broken() -> Self {
        Self {
            fail_registration: true,
            ..Self::supported()
        }
    }

    pub fn subscribed(endpoint: &str) -> Self {
        let platform = Self::supported();
        *platform.subscription.lock().unwrap() = Some(subscription(endpoint));
        platform
    }
}

pub fn subscription(endpoint: &str) -> SubscriptionInfo {
    SubscriptionInfo::new(endpoint, "test-p256dh-key", "test-auth-key")
}

#[async_trait]
impl PushPlatform for FakePushPlatform {
    fn supports_push(&self) -> bool {
        self.supported
    }

    async fn register_agent(&self) -> Result<(), RelayError> {
        if self.fail_registration {
            return Err(RelayError::Registration("script failed to load".to_string()));
        }
        Ok(())
    }

    async fn agent_ready(&self) -> Result<(), RelayError> {
        Ok(())
    }

    async fn subscription(&self) -> Result<Option<SubscriptionInfo>, RelayError> {
        Ok(self.subscription.lock().unwrap().clone())
    }

    async fn subscribe(&self, options: SubscribeOptions) -> Result<SubscriptionInfo, RelayError> {
        *self.last_options.lock().unwrap() = Some(options);
        let sub = subscription("https://push.example.com/new");
        *self.subscription.lock().unwrap() = Some(sub.clone());
        Ok(sub)
    }

    async fn cancel(&self, subscription: &SubscriptionInfo) -> Result<(), RelayError> {
        self.cancelled
            .lock()
            .unwrap()
            .push(subscription.endpoint.clone());
        *self.subscription.lock().unwrap() = None;
        Ok(())
    }
}

/// Everything the background agent did, in order
#[derive(Debug, Clone, PartialEq)]
pub enum AgentCall {
    SkipWaiting,
    ClaimClients,
    Show(String, NotificationOptions),
    Close(String),
    Focus(String),
    Open(String),
}

#[derive(Default)]
pub struct RecordingAgentPlatform {
    pub calls: Mutex<Vec<AgentCall>>,
    pub windows: Mutex<Vec<WindowClient>>,
}

impl RecordingAgentPlatform {
    pub fn calls(&self) -> Vec<AgentCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Notifications shown, as (title, options)
    pub fn shown(&self) -> Vec<(String, NotificationOptions)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                AgentCall::Show(title, options) => Some((title, options)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl AgentPlatform for RecordingAgentPlatform {
    async fn skip_waiting(&self) -> Result<(), RelayError> {
        self.calls.lock().unwrap().push(AgentCall::SkipWaiting);
        Ok(())
    }

    async fn claim_clients(&self) -> Result<(), RelayError> {
        self.calls.lock().unwrap().push(AgentCall::ClaimClients);
        Ok(())
    }

    async fn show_notification(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<(), RelayError> {
        self.calls
            .lock()
            .unwrap()
            .push(AgentCall::Show(title.to_string(), options.clone()));
        Ok(())
    }

    async fn close_notification(&self, tag: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(AgentCall::Close(tag.to_string()));
    }

    async fn window_clients(&self) -> Result<Vec<WindowClient>, RelayError> {
        Ok(self.windows.lock().unwrap().clone())
    }

    async fn focus(&self, client: &WindowClient) -> Result<(), RelayError> {
        self.calls
            .lock()
            .unwrap()
            .push(AgentCall::Focus(client.id.clone()));
        Ok(())
    }

    async fn open_window(&self, url: &str) -> Result<(), RelayError> {
        self.calls
            .lock()
            .unwrap()
            .push(AgentCall::Open(url.to_string()));
        Ok(())
    }
}

pub fn notification(id: &str, event_type: &str, tmux_pane: Option<&str>) -> Notification {
    Notification {
        id: id.to_string(),
        title: "Run tests?".to_string(),
        message: String::new(),
        timestamp: 1700000000.0,
        event_type: event_type.to_string(),
        tmux_pane: tmux_pane.map(String::from),
        responded: None,
        session_id: None,
    }
}
