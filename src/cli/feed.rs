use anyhow::{Result, anyhow};
use std::sync::Arc;

use crate::api::Transport;
use crate::feed::{Decision, FeedRow, NotificationFeed, RowActions};

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum ActionArg {
    Approve,
    Reject,
    Text,
}

fn describe_actions(actions: &RowActions) -> Option<String> {
    match actions {
        RowActions::None => None,
        RowActions::Responded(label) => Some(label.clone()),
        RowActions::ApproveReject { enabled: true } => Some("[approve] [reject]".to_string()),
        RowActions::TextForm { enabled: true } => Some("[text]".to_string()),
        RowActions::ApproveReject { enabled: false } | RowActions::TextForm { enabled: false } => {
            Some("(sending)".to_string())
        }
        RowActions::Failed(error) => Some(error.clone()),
    }
}

pub fn print_feed(rows: &[FeedRow]) {
    if rows.is_empty() {
        println!("No notifications yet");
        return;
    }

    for row in rows {
        let n = &row.notification;
        println!("{}  {}  {}", n.id, row.time(), n.title);
        if !n.message.is_empty() {
            println!("    {}", n.message);
        }
        if let Some(actions) = describe_actions(&row.actions) {
            println!("    {}", actions);
        }
    }
}

pub async fn run(transport: Arc<dyn Transport>) -> Result<()> {
    let feed = NotificationFeed::new(transport);
    feed.refresh().await?;
    print_feed(&feed.rows());
    Ok(())
}

pub async fn respond(
    transport: Arc<dyn Transport>,
    id: &str,
    action: ActionArg,
    text: Option<&str>,
) -> Result<()> {
    let feed = NotificationFeed::new(transport);
    feed.refresh().await?;

    let result = match action {
        ActionArg::Approve => feed.respond(id, Decision::Approve).await.map(Some),
        ActionArg::Reject => feed.respond(id, Decision::Reject).await.map(Some),
        ActionArg::Text => feed.respond_with_text(id, text.unwrap_or_default()).await,
    };

    match result {
        Ok(Some(outcome)) => {
            println!("{}", outcome.label());
            Ok(())
        }
        Ok(None) => Err(anyhow!("Nothing to send, text is empty")),
        Err(err) => {
            // The row carries the message shown to the user
            match feed.state().row(id).map(|r| r.actions.clone()) {
                Some(RowActions::Failed(message)) => Err(anyhow!(message)),
                _ => Err(err.into()),
            }
        }
    }
}
