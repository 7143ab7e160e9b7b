use async_trait::async_trait;
use web_push::SubscriptionInfo;

use super::public::{ActionRequest, Directory, Notification, Session};
use crate::core::RelayError;

/// The relay server's REST surface. Everything above this trait is
/// transport agnostic so tests can swap in a fake.
#[async_trait]
pub trait Transport: Send + Sync {
    /// `GET /api/vapid-public-key`
    async fn vapid_public_key(&self) -> Result<String, RelayError>;

    /// `POST /api/subscribe`
    async fn subscribe(&self, subscription: &SubscriptionInfo) -> Result<(), RelayError>;

    /// `POST /api/unsubscribe`
    async fn unsubscribe(&self, endpoint: &str) -> Result<(), RelayError>;

    /// `POST /api/test-notify`
    async fn test_notify(&self) -> Result<(), RelayError>;

    /// `GET /api/notifications`
    async fn notifications(&self) -> Result<Vec<Notification>, RelayError>;

    /// `POST /api/respond`
    async fn respond(&self, request: &ActionRequest) -> Result<(), RelayError>;

    /// `GET /api/directories`
    async fn directories(&self) -> Result<Vec<Directory>, RelayError>;

    /// `GET /api/sessions`
    async fn sessions(&self) -> Result<Vec<Session>, RelayError>;

    /// `POST /api/sessions`
    async fn start_session(&self, path: &str) -> Result<(), RelayError>;

    /// `POST /api/sessions/kill`
    async fn kill_session(&self, name: &str) -> Result<(), RelayError>;
}
