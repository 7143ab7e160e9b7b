use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_TITLE: &str = "Claude Code";
pub const RESPONSE_TAG: &str = "claude-code-response";
pub const VIBRATE_PATTERN: [u32; 3] = [200, 100, 200];

/// Application specific data the relay attaches to each push. It rides
/// along on the displayed notification so click handlers can read it.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct PushData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub actionable: bool,
}

impl PushData {
    /// Pushes for the same logical event share a tag so they coalesce into
    /// one notification slot.
    pub fn tag(&self) -> String {
        let event_type = self
            .event_type
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or("notify");
        format!("claude-code-{}", event_type)
    }
}

/// Payload of a push message sent by the relay. A `null` field reads the
/// same as a missing one.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PushMessage {
    #[serde(default = "default_title", deserialize_with = "title_or_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: PushData,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn title_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let title = Option::<String>::deserialize(deserializer)?;
    Ok(title.filter(|t| !t.is_empty()).unwrap_or_else(default_title))
}

impl PushMessage {
    /// Parses a push payload. Anything that is not the JSON shape is shown
    /// as plain text under the default title.
    pub fn parse(payload: Option<&[u8]>) -> Self {
        let raw = payload.unwrap_or_default();
        match serde_json::from_slice::<PushMessage>(raw) {
            Ok(message) => message,
            Err(err) => {
                tracing::debug!("Push payload is not JSON, using text: {}", err);
                Self {
                    title: default_title(),
                    body: String::from_utf8_lossy(raw).into_owned(),
                    data: PushData::default(),
                }
            }
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
}

impl NotificationAction {
    pub fn new(action: &str, title: &str) -> Self {
        Self {
            action: action.to_string(),
            title: title.to_string(),
        }
    }
}

/// Options for a notification shown by the background agent
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationOptions {
    pub body: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vibrate: Vec<u32>,
    pub data: PushData,
    // When a tag is set, new notifications with the same tag replace the
    // one the user has not interacted with yet.
    pub tag: String,
    pub renotify: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<NotificationAction>,
    pub require_interaction: bool,
    pub silent: bool,
}

impl NotificationOptions {
    /// Builds the notification for an incoming push
    pub fn for_push(message: &PushMessage, icon: &str) -> Self {
        let mut options = Self {
            body: message.body.clone(),
            icon: icon.to_string(),
            badge: Some(icon.to_string()),
            vibrate: VIBRATE_PATTERN.to_vec(),
            data: message.data.clone(),
            tag: message.data.tag(),
            renotify: true,
            ..Default::default()
        };

        if message.data.actionable {
            options.actions = vec![
                NotificationAction::new("approve", "Approve"),
                NotificationAction::new("reject", "Reject"),
            ];
            // Stays on screen until the user interacts with it
            options.require_interaction = true;
        }

        options
    }

    /// Short-lived confirmation after a response went through
    pub fn confirmation(label: &str, icon: &str) -> Self {
        Self {
            body: label.to_string(),
            icon: icon.to_string(),
            tag: RESPONSE_TAG.to_string(),
            silent: true,
            ..Default::default()
        }
    }

    pub fn failure(detail: &str, icon: &str) -> Self {
        Self {
            body: format!("Failed to send response: {}", detail),
            icon: icon.to_string(),
            tag: RESPONSE_TAG.to_string(),
            ..Default::default()
        }
    }
}
