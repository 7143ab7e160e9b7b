use anyhow::{Result, anyhow};
use std::sync::Arc;

use crate::api::Transport;
use crate::core::AppConfig;
use crate::push::{FilePushPlatform, PushRegistrar, PushStatus};

/// Builds a registrar on the terminal push platform and runs its
/// initialization
pub async fn registrar(config: &AppConfig, transport: Arc<dyn Transport>) -> PushRegistrar {
    let platform = FilePushPlatform::new(config.push_endpoint.clone(), &config.state_path);
    let registrar = PushRegistrar::new(transport, Arc::new(platform));
    registrar.initialize().await;
    registrar
}

fn ready(registrar: &PushRegistrar) -> Result<()> {
    match registrar.status() {
        PushStatus::Subscribed | PushStatus::Unsubscribed => Ok(()),
        other => Err(anyhow!(other.text())),
    }
}

pub async fn status(config: &AppConfig, transport: Arc<dyn Transport>) -> Result<()> {
    let registrar = registrar(config, transport).await;
    println!("{}", registrar.state().status_text());
    Ok(())
}

pub async fn subscribe(config: &AppConfig, transport: Arc<dyn Transport>) -> Result<()> {
    let registrar = registrar(config, transport).await;
    ready(&registrar)?;
    if registrar.status() == PushStatus::Subscribed {
        println!("Already subscribed");
        return Ok(());
    }
    registrar.subscribe().await?;
    println!("{}", registrar.state().status_text());
    Ok(())
}

pub async fn unsubscribe(config: &AppConfig, transport: Arc<dyn Transport>) -> Result<()> {
    let registrar = registrar(config, transport).await;
    ready(&registrar)?;
    registrar.unsubscribe().await?;
    println!("{}", registrar.state().status_text());
    Ok(())
}

pub async fn toggle(config: &AppConfig, transport: Arc<dyn Transport>) -> Result<()> {
    let registrar = registrar(config, transport).await;
    ready(&registrar)?;
    let result = registrar.toggle().await;
    println!("{}", registrar.state().status_text());
    result?;
    Ok(())
}

pub async fn test_notify(config: &AppConfig, transport: Arc<dyn Transport>) -> Result<()> {
    let registrar = registrar(config, transport).await;
    registrar.send_test_notification().await?;
    println!("Test notification sent");
    Ok(())
}
