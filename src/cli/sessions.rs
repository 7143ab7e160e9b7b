use anyhow::{Result, anyhow};
use rustyline::DefaultEditor;
use std::sync::Arc;

use crate::api::{Directory, Session, Transport};
use crate::sessions::{AssumeYes, Confirm, KillOutcome, SessionManager};

/// Asks on the terminal, anything but yes declines
struct PromptConfirm;

impl Confirm for PromptConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        let Ok(mut rl) = DefaultEditor::new() else {
            return false;
        };
        match rl.readline(&format!("{} [y/N] ", prompt)) {
            Ok(line) => matches!(line.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

pub fn print_directories(directories: &[Directory]) {
    if directories.is_empty() {
        println!("No directories configured");
    }
    for d in directories {
        println!("{}  {}", d.name, d.path);
    }
}

pub fn print_sessions(sessions: &[Session]) {
    if sessions.is_empty() {
        println!("No active sessions");
    }
    for s in sessions {
        match s.windows {
            Some(windows) => println!("{}  {}  ({} windows)", s.name, s.path, windows),
            None => println!("{}  {}", s.name, s.path),
        }
    }
}

pub async fn directories(transport: Arc<dyn Transport>) -> Result<()> {
    let manager = SessionManager::new(transport);
    print_directories(&manager.list_directories().await?);
    Ok(())
}

pub async fn list(transport: Arc<dyn Transport>) -> Result<()> {
    let manager = SessionManager::new(transport);
    print_sessions(&manager.list_sessions().await?);
    Ok(())
}

pub async fn start(transport: Arc<dyn Transport>, path: &str) -> Result<()> {
    let manager = SessionManager::new(transport);
    if manager.start_session(path).await.is_err() {
        let alert = manager.state().alert.unwrap_or_default();
        return Err(anyhow!(alert));
    }
    print_sessions(&manager.state().sessions);
    Ok(())
}

pub async fn kill(transport: Arc<dyn Transport>, name: &str, yes: bool) -> Result<()> {
    let manager = SessionManager::new(transport);
    let confirm: &dyn Confirm = if yes { &AssumeYes } else { &PromptConfirm };

    match manager.kill_session(name, confirm).await {
        Ok(KillOutcome::Killed) => {
            print_sessions(&manager.state().sessions);
            Ok(())
        }
        Ok(KillOutcome::Declined) => {
            println!("Cancelled");
            Ok(())
        }
        Err(_) => Err(anyhow!(manager.state().alert.unwrap_or_default())),
    }
}
