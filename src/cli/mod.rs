use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod agent;
pub mod feed;
pub mod push;
pub mod sessions;
pub mod watch;

use crate::api::{HttpTransport, Transport};
use crate::core::AppConfig;
use agent::AgentEventKind;
use feed::ActionArg;

#[derive(Subcommand)]
enum Command {
    /// Show push subscription status
    Status {},
    /// Subscribe this terminal to push notifications
    Subscribe {},
    /// Remove the push subscription
    Unsubscribe {},
    /// Subscribe if unsubscribed, unsubscribe otherwise
    Toggle {},
    /// Ask the relay to send a test notification
    TestNotify {},
    /// Print the notification feed
    Feed {},
    /// Respond to a notification in the feed
    Respond {
        #[arg(long)]
        id: String,
        #[arg(long, value_enum)]
        action: ActionArg,
        /// Text to send when responding with `--action text`
        #[arg(long)]
        text: Option<String>,
    },
    /// Poll the feed and sessions until interrupted
    Watch {},
    /// List configured launch directories
    Directories {},
    /// List running sessions
    Sessions {},
    /// Start a session in a configured directory
    Start {
        #[arg(long)]
        path: String,
    },
    /// Kill a running session
    Kill {
        #[arg(long)]
        name: String,
        /// Skip the confirmation prompt
        #[arg(long, action, default_value = "false")]
        yes: bool,
    },
    /// Run the background agent for a single event
    Agent {
        #[arg(long, value_enum)]
        event: AgentEventKind,
        /// Push payload as sent by the relay
        #[arg(long)]
        payload: Option<String>,
        /// Button clicked on the notification, omit for a body click
        #[arg(long)]
        action: Option<String>,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    init_tracing();

    let config = AppConfig::default();
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(&config.base_url));

    // Handle each sub command
    match args.command {
        Some(Command::Status {}) => {
            push::status(&config, transport).await?;
        }
        Some(Command::Subscribe {}) => {
            push::subscribe(&config, transport).await?;
        }
        Some(Command::Unsubscribe {}) => {
            push::unsubscribe(&config, transport).await?;
        }
        Some(Command::Toggle {}) => {
            push::toggle(&config, transport).await?;
        }
        Some(Command::TestNotify {}) => {
            push::test_notify(&config, transport).await?;
        }
        Some(Command::Feed {}) => {
            feed::run(transport).await?;
        }
        Some(Command::Respond { id, action, text }) => {
            feed::respond(transport, &id, action, text.as_deref()).await?;
        }
        Some(Command::Watch {}) => {
            watch::run(&config, transport).await?;
        }
        Some(Command::Directories {}) => {
            sessions::directories(transport).await?;
        }
        Some(Command::Sessions {}) => {
            sessions::list(transport).await?;
        }
        Some(Command::Start { path }) => {
            sessions::start(transport, &path).await?;
        }
        Some(Command::Kill { name, yes }) => {
            sessions::kill(transport, &name, yes).await?;
        }
        Some(Command::Agent {
            event,
            payload,
            action,
        }) => {
            agent::run(&config, transport, event, payload, action).await?;
        }
        None => {}
    }

    Ok(())
}
