use chrono::{DateTime, Local};

use crate::api::Notification;

/// What a feed row offers the user. Exactly one per notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowActions {
    None,
    /// Terminal label once the notification is answered
    Responded(String),
    ApproveReject { enabled: bool },
    TextForm { enabled: bool },
    /// Inline error after a failed response. Controls stay disabled.
    Failed(String),
}

impl RowActions {
    /// Whether the row still accepts a response
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            RowActions::ApproveReject { enabled: true } | RowActions::TextForm { enabled: true }
        )
    }
}

/// Picks the controls for a freshly fetched notification
pub fn row_actions(notification: &Notification) -> RowActions {
    if let Some(label) = notification.responded.as_deref().filter(|r| !r.is_empty()) {
        RowActions::Responded(label.to_string())
    } else if notification.is_actionable() && notification.is_permission_prompt() {
        RowActions::ApproveReject { enabled: true }
    } else if notification.is_actionable() {
        RowActions::TextForm { enabled: true }
    } else {
        RowActions::None
    }
}

pub fn format_timestamp(timestamp: f64) -> String {
    let secs = timestamp.trunc() as i64;
    let nanos = (timestamp.fract() * 1e9) as u32;
    match DateTime::from_timestamp(secs, nanos) {
        Some(utc) => utc
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => String::new(),
    }
}
