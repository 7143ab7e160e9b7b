//! Public wire types for the relay API

use serde::{Deserialize, Serialize};

/// Interaction shape reserved for permission prompts
pub const PERMISSION_EVENT: &str = "Notification";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    // The relay server stores `time.time()` so this may be fractional
    #[serde(default)]
    pub timestamp: f64,
    #[serde(default)]
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmux_pane: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responded: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl Notification {
    /// Tied to a live session pane and still awaiting a decision
    pub fn is_actionable(&self) -> bool {
        let has_pane = self.tmux_pane.as_deref().is_some_and(|p| !p.is_empty());
        has_pane && !self.is_responded()
    }

    pub fn is_responded(&self) -> bool {
        self.responded.as_deref().is_some_and(|r| !r.is_empty())
    }

    pub fn is_permission_prompt(&self) -> bool {
        self.event_type == PERMISSION_EVENT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    Approve,
    Reject,
    Text,
}

impl ResponseKind {
    /// Parses the action identifier attached to a notification button
    pub fn from_action(action: &str) -> Option<Self> {
        match action {
            "approve" => Some(Self::Approve),
            "reject" => Some(Self::Reject),
            "text" => Some(Self::Text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub notification_id: String,
    pub action: ResponseKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ActionRequest {
    pub fn approve(notification_id: &str) -> Self {
        Self {
            notification_id: notification_id.to_string(),
            action: ResponseKind::Approve,
            text: None,
        }
    }

    pub fn reject(notification_id: &str) -> Self {
        Self {
            notification_id: notification_id.to_string(),
            action: ResponseKind::Reject,
            text: None,
        }
    }

    pub fn text(notification_id: &str, text: &str) -> Self {
        Self {
            notification_id: notification_id.to_string(),
            action: ResponseKind::Text,
            text: Some(text.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windows: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct VapidPublicKeyResponse {
    #[serde(rename = "publicKey")]
    pub public_key: String,
}

#[derive(Debug, Serialize)]
pub struct UnsubscribeRequest<'a> {
    pub endpoint: &'a str,
}

#[derive(Debug, Serialize)]
pub struct StartSessionRequest<'a> {
    pub path: &'a str,
}

#[derive(Debug, Serialize)]
pub struct KillSessionRequest<'a> {
    pub name: &'a str,
}

/// Error body for non-2xx responses. FastAPI validation errors put a list
/// in `detail` so only string details are surfaced.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn into_detail(self) -> Option<String> {
        match self.detail {
            Some(serde_json::Value::String(s)) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn notification(tmux_pane: Option<&str>, responded: Option<&str>) -> Notification {
        Notification {
            id: "1".to_string(),
            title: "Run tests?".to_string(),
            message: String::new(),
            timestamp: 1700000000.0,
            event_type: "Notification".to_string(),
            tmux_pane: tmux_pane.map(String::from),
            responded: responded.map(String::from),
            session_id: None,
        }
    }

    #[test]
    fn it_requires_a_pane_and_no_response_to_be_actionable() {
        assert!(notification(Some("%3"), None).is_actionable());
        assert!(!notification(None, None).is_actionable());
        assert!(!notification(Some(""), None).is_actionable());
        assert!(!notification(Some("%3"), Some("approve")).is_actionable());
    }

    #[test]
    fn it_parses_server_notifications() {
        let raw = json!([{
            "id": "a1b2c3",
            "title": "Claude Code",
            "message": "Needs permission",
            "timestamp": 1700000000.25,
            "event_type": "Notification",
            "tmux_pane": "%3",
            "session_id": "abc"
        }, {
            "id": "d4e5f6",
            "title": "Test Notification",
            "message": "If you see this, push notifications are working!",
            "event_type": "test",
            "timestamp": 1700000001
        }]);
        let parsed: Vec<Notification> = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].tmux_pane.as_deref(), Some("%3"));
        assert_eq!(parsed[0].session_id.as_deref(), Some("abc"));
        assert!(parsed[1].tmux_pane.is_none());
        assert_eq!(parsed[1].timestamp, 1700000001.0);
    }

    #[test]
    fn it_omits_text_unless_responding_with_text() {
        let approve = serde_json::to_value(ActionRequest::approve("1")).unwrap();
        assert_eq!(approve, json!({"notification_id": "1", "action": "approve"}));

        let text = serde_json::to_value(ActionRequest::text("1", "yes")).unwrap();
        assert_eq!(
            text,
            json!({"notification_id": "1", "action": "text", "text": "yes"})
        );
    }

    #[test]
    fn it_only_surfaces_string_details() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail": "nope"}"#).unwrap();
        assert_eq!(body.into_detail().as_deref(), Some("nope"));

        let body: ErrorBody =
            serde_json::from_str(r#"{"detail": [{"loc": ["body"], "msg": "bad"}]}"#).unwrap();
        assert!(body.into_detail().is_none());
    }
}
