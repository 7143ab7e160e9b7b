//! Notification response protocol shared by the foreground feed and the
//! background agent.

pub mod models;
pub use models::*;

use crate::api::{ActionRequest, ResponseKind, Transport};
use crate::core::RelayError;

/// What the user sees once the server accepted a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Approved,
    Rejected,
    Sent(String),
}

impl ActionOutcome {
    pub fn label(&self) -> String {
        match self {
            ActionOutcome::Approved => "Approved".to_string(),
            ActionOutcome::Rejected => "Rejected".to_string(),
            ActionOutcome::Sent(text) => format!("Sent: {}", text),
        }
    }
}

/// Posts a single response to the relay. Sent at most once per decision:
/// nothing here retries.
pub async fn submit_action(
    transport: &dyn Transport,
    request: &ActionRequest,
) -> Result<ActionOutcome, RelayError> {
    tracing::info!(
        "Responding to notification {} with {:?}",
        request.notification_id,
        request.action
    );
    transport.respond(request).await?;

    let outcome = match request.action {
        ResponseKind::Approve => ActionOutcome::Approved,
        ResponseKind::Reject => ActionOutcome::Rejected,
        ResponseKind::Text => ActionOutcome::Sent(request.text.clone().unwrap_or_default()),
    };
    Ok(outcome)
}
