//! HTTP implementation of the relay transport

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use web_push::SubscriptionInfo;

use super::public::{
    ActionRequest, Directory, ErrorBody, KillSessionRequest, Notification, Session,
    StartSessionRequest, UnsubscribeRequest, VapidPublicKeyResponse,
};
use super::transport::Transport;
use crate::core::RelayError;

#[derive(Clone, Debug)]
pub struct HttpTransport {
    base_url: String,
    client: Client,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RelayError> {
        let response = self.client.get(self.url(path)).send().await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), RelayError> {
        let response = self
            .client
            .post(self.url(path))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Turns a non-2xx response into `RelayError::Server`, keeping the server's
/// `detail` when the body has one.
async fn check_status(response: Response) -> Result<Response, RelayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let detail = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(ErrorBody::into_detail);
    tracing::debug!("Relay returned {}: {:?}", status, detail);

    Err(RelayError::Server {
        status: status.as_u16(),
        detail,
    })
}

#[async_trait]
impl Transport for HttpTransport {
    async fn vapid_public_key(&self) -> Result<String, RelayError> {
        let resp: VapidPublicKeyResponse = self.get_json("/api/vapid-public-key").await?;
        Ok(resp.public_key)
    }

    async fn subscribe(&self, subscription: &SubscriptionInfo) -> Result<(), RelayError> {
        self.post_json("/api/subscribe", subscription).await
    }

    async fn unsubscribe(&self, endpoint: &str) -> Result<(), RelayError> {
        self.post_json("/api/unsubscribe", &UnsubscribeRequest { endpoint })
            .await
    }

    async fn test_notify(&self) -> Result<(), RelayError> {
        let response = self.client.post(self.url("/api/test-notify")).send().await?;
        check_status(response).await?;
        Ok(())
    }

    async fn notifications(&self) -> Result<Vec<Notification>, RelayError> {
        self.get_json("/api/notifications").await
    }

    async fn respond(&self, request: &ActionRequest) -> Result<(), RelayError> {
        self.post_json("/api/respond", request).await
    }

    async fn directories(&self) -> Result<Vec<Directory>, RelayError> {
        self.get_json("/api/directories").await
    }

    async fn sessions(&self) -> Result<Vec<Session>, RelayError> {
        self.get_json("/api/sessions").await
    }

    async fn start_session(&self, path: &str) -> Result<(), RelayError> {
        self.post_json("/api/sessions", &StartSessionRequest { path })
            .await
    }

    async fn kill_session(&self, name: &str) -> Result<(), RelayError> {
        self.post_json("/api/sessions/kill", &KillSessionRequest { name })
            .await
    }
}
