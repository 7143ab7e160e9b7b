use anyhow::Result;
use std::sync::Arc;

use crate::agent::{AgentEvent, ServiceWorkerAgent, TerminalAgentPlatform};
use crate::api::Transport;
use crate::core::AppConfig;
use crate::notify::PushMessage;

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum AgentEventKind {
    Install,
    Activate,
    Push,
    Click,
}

pub async fn run(
    config: &AppConfig,
    transport: Arc<dyn Transport>,
    kind: AgentEventKind,
    payload: Option<String>,
    action: Option<String>,
) -> Result<()> {
    let platform = Arc::new(TerminalAgentPlatform::new(&config.base_url));
    let agent = ServiceWorkerAgent::new(transport, platform, &config.icon);

    let event = match kind {
        AgentEventKind::Install => AgentEvent::Install,
        AgentEventKind::Activate => AgentEvent::Activate,
        AgentEventKind::Push => AgentEvent::Push {
            payload: payload.map(String::into_bytes),
        },
        AgentEventKind::Click => {
            // The clicked notification carries the data of the push that
            // created it
            let message = PushMessage::parse(payload.as_deref().map(str::as_bytes));
            AgentEvent::NotificationClick {
                tag: message.data.tag(),
                data: message.data,
                action,
            }
        }
    };

    agent.handle(event).await?;
    Ok(())
}
