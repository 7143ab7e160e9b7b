//! Push capability of the host platform

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use web_push::SubscriptionInfo;

use super::keys::validate_application_server_key;
use crate::core::{PushEndpointConfig, RelayError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeOptions {
    /// Every push must surface a notification the user can see
    pub user_visible_only: bool,
    pub application_server_key: Vec<u8>,
}

/// What the registrar needs from the platform. A browser exposes this as
/// the service worker container and its push manager.
#[async_trait]
pub trait PushPlatform: Send + Sync {
    /// Whether the platform can receive push at all
    fn supports_push(&self) -> bool;

    /// Registers the background agent
    async fn register_agent(&self) -> Result<(), RelayError>;

    /// Resolves once the registered agent is active
    async fn agent_ready(&self) -> Result<(), RelayError>;

    /// The current subscription, if one exists
    async fn subscription(&self) -> Result<Option<SubscriptionInfo>, RelayError>;

    async fn subscribe(&self, options: SubscribeOptions) -> Result<SubscriptionInfo, RelayError>;

    /// Cancels the subscription at the platform level
    async fn cancel(&self, subscription: &SubscriptionInfo) -> Result<(), RelayError>;
}

/// Push platform for the terminal. Credentials come from a desktop push
/// distributor and the active subscription is kept in the state directory.
#[derive(Debug, Clone)]
pub struct FilePushPlatform {
    endpoint: Option<PushEndpointConfig>,
    state_path: PathBuf,
    subscription_path: PathBuf,
}

impl FilePushPlatform {
    pub fn new(endpoint: Option<PushEndpointConfig>, state_path: &Path) -> Self {
        Self {
            endpoint,
            state_path: state_path.to_path_buf(),
            subscription_path: state_path.join("subscription.json"),
        }
    }

    async fn read_subscription(&self) -> Result<Option<SubscriptionInfo>, RelayError> {
        let exists = fs::try_exists(&self.subscription_path)
            .await
            .map_err(RelayError::platform)?;
        if !exists {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.subscription_path)
            .await
            .map_err(RelayError::platform)?;
        let subscription = serde_json::from_str(&raw).map_err(RelayError::platform)?;
        Ok(Some(subscription))
    }
}

#[async_trait]
impl PushPlatform for FilePushPlatform {
    fn supports_push(&self) -> bool {
        self.endpoint.is_some()
    }

    async fn register_agent(&self) -> Result<(), RelayError> {
        fs::create_dir_all(&self.state_path)
            .await
            .map_err(|e| RelayError::Registration(e.to_string()))
    }

    async fn agent_ready(&self) -> Result<(), RelayError> {
        let is_dir = fs::metadata(&self.state_path)
            .await
            .is_ok_and(|m| m.is_dir());
        if is_dir {
            Ok(())
        } else {
            Err(RelayError::Registration(format!(
                "{} is not a directory",
                self.state_path.display()
            )))
        }
    }

    async fn subscription(&self) -> Result<Option<SubscriptionInfo>, RelayError> {
        self.read_subscription().await
    }

    async fn subscribe(&self, options: SubscribeOptions) -> Result<SubscriptionInfo, RelayError> {
        let Some(endpoint) = &self.endpoint else {
            return Err(RelayError::Unsupported);
        };
        if !options.user_visible_only {
            return Err(RelayError::Platform(
                "silent push subscriptions are not allowed".to_string(),
            ));
        }
        validate_application_server_key(&options.application_server_key)?;

        let subscription = SubscriptionInfo::new(
            endpoint.endpoint.clone(),
            endpoint.p256dh.clone(),
            endpoint.auth.clone(),
        );
        let raw = serde_json::to_string_pretty(&subscription).map_err(RelayError::platform)?;
        fs::write(&self.subscription_path, raw)
            .await
            .map_err(RelayError::platform)?;
        tracing::debug!("Stored push subscription for {}", subscription.endpoint);

        Ok(subscription)
    }

    async fn cancel(&self, subscription: &SubscriptionInfo) -> Result<(), RelayError> {
        match self.read_subscription().await? {
            Some(current) if current.endpoint == subscription.endpoint => {
                fs::remove_file(&self.subscription_path)
                    .await
                    .map_err(RelayError::platform)
            }
            _ => Ok(()),
        }
    }
}
