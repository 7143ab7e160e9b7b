use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::RelayError;
use crate::notify::NotificationOptions;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowClient {
    pub id: String,
    pub url: String,
}

/// Platform calls available to the background agent
#[async_trait]
pub trait AgentPlatform: Send + Sync {
    /// Activates this agent without waiting for the previous one to go idle
    async fn skip_waiting(&self) -> Result<(), RelayError>;

    /// Takes control of every open page without a reload
    async fn claim_clients(&self) -> Result<(), RelayError>;

    async fn show_notification(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<(), RelayError>;

    async fn close_notification(&self, tag: &str);

    /// Open windows, including ones this agent does not control yet
    async fn window_clients(&self) -> Result<Vec<WindowClient>, RelayError>;

    async fn focus(&self, client: &WindowClient) -> Result<(), RelayError>;

    async fn open_window(&self, url: &str) -> Result<(), RelayError>;
}

/// Shows notifications as lines on a writer (stdout by default). The
/// terminal has no windows so body clicks print the URL to open.
pub struct TerminalAgentPlatform {
    base_url: String,
    out: Mutex<Box<dyn Write + Send>>,
}

impl TerminalAgentPlatform {
    pub fn new(base_url: &str) -> Self {
        Self::with_writer(base_url, Box::new(std::io::stdout()))
    }

    pub fn with_writer(base_url: &str, out: Box<dyn Write + Send>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            out: Mutex::new(out),
        }
    }

    fn print(&self, line: &str) -> Result<(), RelayError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| RelayError::Platform("output poisoned".to_string()))?;
        writeln!(out, "{}", line).map_err(RelayError::platform)
    }
}

#[async_trait]
impl AgentPlatform for TerminalAgentPlatform {
    async fn skip_waiting(&self) -> Result<(), RelayError> {
        tracing::debug!("Agent installed, activating immediately");
        Ok(())
    }

    async fn claim_clients(&self) -> Result<(), RelayError> {
        tracing::debug!("Agent activated");
        Ok(())
    }

    async fn show_notification(
        &self,
        title: &str,
        options: &NotificationOptions,
    ) -> Result<(), RelayError> {
        let mut line = format!("[{}] {}: {}", options.tag, title, options.body);
        if !options.actions.is_empty() {
            let actions: Vec<String> = options
                .actions
                .iter()
                .map(|a| format!("{} ({})", a.title, a.action))
                .collect();
            line.push_str(&format!("  actions: {}", actions.join(", ")));
        }
        self.print(&line)
    }

    async fn close_notification(&self, tag: &str) {
        tracing::debug!("Closing notification {}", tag);
    }

    async fn window_clients(&self) -> Result<Vec<WindowClient>, RelayError> {
        Ok(Vec::new())
    }

    async fn focus(&self, client: &WindowClient) -> Result<(), RelayError> {
        self.print(&format!("Focus {}", client.url))
    }

    async fn open_window(&self, url: &str) -> Result<(), RelayError> {
        self.print(&format!("Open {}{}", self.base_url, url))
    }
}
