//! Background agent: receives pushes, shows notifications and answers
//! action buttons straight from the background context.
//!
//! The agent keeps no state between events. Each handler resolves only once
//! every side effect it started has settled, so a host must keep the agent's
//! context alive until `handle` returns.

mod platform;

pub use platform::{AgentPlatform, TerminalAgentPlatform, WindowClient};

use std::sync::Arc;

use crate::api::{ActionRequest, ResponseKind, Transport};
use crate::core::{RelayError, failure_detail};
use crate::notify::{
    DEFAULT_TITLE, NotificationOptions, PushData, PushMessage, submit_action,
};

#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    Install,
    Activate,
    Push { payload: Option<Vec<u8>> },
    NotificationClick {
        tag: String,
        data: PushData,
        /// Identifier of the clicked button, `None` for a click on the body
        action: Option<String>,
    },
}

pub struct ServiceWorkerAgent {
    transport: Arc<dyn Transport>,
    platform: Arc<dyn AgentPlatform>,
    icon: String,
}

impl ServiceWorkerAgent {
    pub fn new(transport: Arc<dyn Transport>, platform: Arc<dyn AgentPlatform>, icon: &str) -> Self {
        Self {
            transport,
            platform,
            icon: icon.to_string(),
        }
    }

    pub async fn handle(&self, event: AgentEvent) -> Result<(), RelayError> {
        match event {
            AgentEvent::Install => self.platform.skip_waiting().await,
            AgentEvent::Activate => self.platform.claim_clients().await,
            AgentEvent::Push { payload } => self.on_push(payload.as_deref()).await,
            AgentEvent::NotificationClick { tag, data, action } => {
                self.on_notification_click(&tag, &data, action.as_deref())
                    .await
            }
        }
    }

    async fn on_push(&self, payload: Option<&[u8]>) -> Result<(), RelayError> {
        let message = PushMessage::parse(payload);
        let options = NotificationOptions::for_push(&message, &self.icon);
        tracing::debug!("Push received, showing {}", options.tag);
        self.platform
            .show_notification(&message.title, &options)
            .await
    }

    async fn on_notification_click(
        &self,
        tag: &str,
        data: &PushData,
        action: Option<&str>,
    ) -> Result<(), RelayError> {
        self.platform.close_notification(tag).await;

        let action = action.filter(|a| !a.is_empty());
        match (action, data.notification_id.as_deref()) {
            (Some(action), Some(notification_id)) => {
                self.respond_from_background(notification_id, action).await
            }
            _ => self.focus_or_open().await,
        }
    }

    /// Answers the prompt without any page open, then reports back with a
    /// notification of its own.
    async fn respond_from_background(
        &self,
        notification_id: &str,
        action: &str,
    ) -> Result<(), RelayError> {
        let result = match ResponseKind::from_action(action) {
            Some(ResponseKind::Approve) => {
                submit_action(self.transport.as_ref(), &ActionRequest::approve(notification_id))
                    .await
            }
            Some(ResponseKind::Reject) => {
                submit_action(self.transport.as_ref(), &ActionRequest::reject(notification_id))
                    .await
            }
            _ => Err(RelayError::NotActionable(notification_id.to_string())),
        };

        let options = match &result {
            Ok(outcome) => NotificationOptions::confirmation(&outcome.label(), &self.icon),
            Err(err) => {
                tracing::error!("Respond failed: {}", err);
                NotificationOptions::failure(&failure_detail(err), &self.icon)
            }
        };
        self.platform.show_notification(DEFAULT_TITLE, &options).await
    }

    async fn focus_or_open(&self) -> Result<(), RelayError> {
        let clients = self.platform.window_clients().await?;
        match clients.iter().find(|c| c.url.contains('/')) {
            Some(client) => self.platform.focus(client).await,
            None => self.platform.open_window("/").await,
        }
    }
}
