//! Background agent registration and push subscription lifecycle

pub mod keys;
pub mod platform;

pub use keys::url_base64_to_bytes;
pub use platform::{FilePushPlatform, PushPlatform, SubscribeOptions};

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::api::Transport;
use crate::core::{RelayError, failure_detail};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushStatus {
    Unknown,
    /// Terminal: the platform cannot receive push
    Unsupported,
    /// Terminal for push only
    RegistrationFailed,
    Unsubscribed,
    Subscribed,
}

impl PushStatus {
    pub fn text(&self) -> &'static str {
        match self {
            PushStatus::Unknown => "Checking push support",
            PushStatus::Unsupported => "Push notifications not supported",
            PushStatus::RegistrationFailed => "Background agent registration failed",
            PushStatus::Unsubscribed => "Not subscribed",
            PushStatus::Subscribed => "Subscribed, notifications enabled",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegistrarState {
    pub status: PushStatus,
    pub toggle_enabled: bool,
    pub test_enabled: bool,
    /// Last failure, shown in place of the status text until the next
    /// successful operation
    pub error: Option<String>,
}

impl RegistrarState {
    pub fn status_text(&self) -> String {
        match &self.error {
            Some(error) => error.clone(),
            None => self.status.text().to_string(),
        }
    }
}

impl Default for RegistrarState {
    fn default() -> Self {
        Self {
            status: PushStatus::Unknown,
            toggle_enabled: false,
            test_enabled: true,
            error: None,
        }
    }
}

#[derive(Clone)]
pub struct PushRegistrar {
    transport: Arc<dyn Transport>,
    platform: Arc<dyn PushPlatform>,
    state: Arc<RwLock<RegistrarState>>,
}

impl PushRegistrar {
    pub fn new(transport: Arc<dyn Transport>, platform: Arc<dyn PushPlatform>) -> Self {
        Self {
            transport,
            platform,
            state: Arc::new(RwLock::new(RegistrarState::default())),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistrarState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistrarState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> RegistrarState {
        self.read().clone()
    }

    pub fn status(&self) -> PushStatus {
        self.read().status
    }

    /// Detects push support, registers the background agent and picks up any
    /// existing subscription. Never fails: push problems end up in the status
    /// so the rest of the client can keep loading.
    pub async fn initialize(&self) -> PushStatus {
        if !self.platform.supports_push() {
            tracing::warn!("Push notifications not supported on this platform");
            let mut state = self.write();
            state.status = PushStatus::Unsupported;
            state.toggle_enabled = false;
            return state.status;
        }

        let registered = match self.platform.register_agent().await {
            Ok(()) => self.platform.agent_ready().await,
            Err(err) => Err(err),
        };
        if let Err(err) = registered {
            tracing::error!("Background agent registration failed: {}", err);
            let mut state = self.write();
            state.status = PushStatus::RegistrationFailed;
            state.toggle_enabled = false;
            return state.status;
        }
        tracing::debug!("Background agent registered");

        let status = match self.platform.subscription().await {
            Ok(Some(_)) => PushStatus::Subscribed,
            Ok(None) => PushStatus::Unsubscribed,
            Err(err) => {
                tracing::warn!("Unable to read push subscription: {}", err);
                PushStatus::Unsubscribed
            }
        };

        let mut state = self.write();
        state.status = status;
        state.toggle_enabled = true;
        state.error = None;
        status
    }

    /// Subscribes at the platform and mirrors the subscription to the relay.
    /// On failure the status is left as it was.
    pub async fn subscribe(&self) -> Result<(), RelayError> {
        let public_key = self.transport.vapid_public_key().await?;
        let application_server_key = url_base64_to_bytes(&public_key)?;

        let subscription = self
            .platform
            .subscribe(SubscribeOptions {
                user_visible_only: true,
                application_server_key,
            })
            .await?;
        self.transport.subscribe(&subscription).await?;
        tracing::info!("Subscribed {}", subscription.endpoint);

        let mut state = self.write();
        state.status = PushStatus::Subscribed;
        state.error = None;
        Ok(())
    }

    /// Cancels the current subscription and tells the relay to forget its
    /// endpoint. Without a subscription this is a no-op.
    pub async fn unsubscribe(&self) -> Result<(), RelayError> {
        if let Some(subscription) = self.platform.subscription().await? {
            let endpoint = subscription.endpoint.clone();
            self.platform.cancel(&subscription).await?;
            self.transport.unsubscribe(&endpoint).await?;
            tracing::info!("Unsubscribed {}", endpoint);
        }

        let mut state = self.write();
        state.status = PushStatus::Unsubscribed;
        state.error = None;
        Ok(())
    }

    /// Flips the subscription. The toggle is disabled while the call is in
    /// flight so a second toggle is rejected with `Busy`. Platforms without
    /// push report why instead.
    pub async fn toggle(&self) -> Result<PushStatus, RelayError> {
        let status = {
            let mut state = self.write();
            match state.status {
                PushStatus::Unsupported => return Err(RelayError::Unsupported),
                PushStatus::RegistrationFailed => {
                    return Err(RelayError::Registration(
                        "background agent is not registered".to_string(),
                    ));
                }
                _ => {}
            }
            if !state.toggle_enabled {
                return Err(RelayError::Busy);
            }
            state.toggle_enabled = false;
            state.status
        };

        let result = match status {
            PushStatus::Subscribed => self.unsubscribe().await,
            PushStatus::Unsubscribed => self.subscribe().await,
            // Only reachable before initialize, which leaves the toggle disabled
            _ => Err(RelayError::Busy),
        };

        let mut state = self.write();
        state.toggle_enabled = true;
        match result {
            Ok(()) => Ok(state.status),
            Err(err) => {
                tracing::error!("Subscription toggle failed: {}", err);
                state.error = Some(format!("Failed: {}", failure_detail(&err)));
                Err(err)
            }
        }
    }

    /// Asks the relay to push a test notification to every subscriber
    pub async fn send_test_notification(&self) -> Result<(), RelayError> {
        {
            let mut state = self.write();
            if state.status != PushStatus::Subscribed {
                return Err(RelayError::NotSubscribed);
            }
            if !state.test_enabled {
                return Err(RelayError::Busy);
            }
            state.test_enabled = false;
        }

        let result = self.transport.test_notify().await;
        if let Err(err) = &result {
            tracing::error!("Test notification failed: {}", err);
        }

        self.write().test_enabled = true;
        result
    }
}
