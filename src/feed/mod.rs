//! Polled notification feed and the responses sent from it

mod render;

pub use render::{RowActions, format_timestamp, row_actions};

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::api::{ActionRequest, Notification, ResponseKind, Transport};
use crate::core::{RelayError, failure_detail};
use crate::notify::{ActionOutcome, submit_action};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedRow {
    pub notification: Notification,
    pub actions: RowActions,
}

impl FeedRow {
    pub fn new(notification: Notification) -> Self {
        let actions = row_actions(&notification);
        Self {
            notification,
            actions,
        }
    }

    pub fn time(&self) -> String {
        format_timestamp(self.notification.timestamp)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeedState {
    /// Bumped on every refresh. Responses that finish after a newer
    /// refresh are not applied to the view.
    pub generation: u64,
    pub loaded: bool,
    pub rows: Vec<FeedRow>,
}

impl FeedState {
    pub fn row(&self, id: &str) -> Option<&FeedRow> {
        self.rows.iter().find(|r| r.notification.id == id)
    }
}

#[derive(Clone)]
pub struct NotificationFeed {
    transport: Arc<dyn Transport>,
    state: Arc<RwLock<FeedState>>,
}

impl NotificationFeed {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            state: Arc::new(RwLock::new(FeedState::default())),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, FeedState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, FeedState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> FeedState {
        self.read().clone()
    }

    pub fn rows(&self) -> Vec<FeedRow> {
        self.read().rows.clone()
    }

    /// Fetches the whole list and replaces the view. No merging: the last
    /// fetch to land wins.
    pub async fn refresh(&self) -> Result<usize, RelayError> {
        let notifications = self.transport.notifications().await.inspect_err(|err| {
            tracing::error!("Failed to load notifications: {}", err);
        })?;
        let rows: Vec<FeedRow> = notifications.into_iter().map(FeedRow::new).collect();
        let count = rows.len();

        let mut state = self.write();
        state.generation += 1;
        state.loaded = true;
        state.rows = rows;
        Ok(count)
    }

    /// Approves or rejects a permission prompt
    pub async fn respond(&self, id: &str, decision: Decision) -> Result<ActionOutcome, RelayError> {
        let request = match decision {
            Decision::Approve => ActionRequest::approve(id),
            Decision::Reject => ActionRequest::reject(id),
        };
        self.dispatch(request).await
    }

    /// Sends free text to the session. Blank text is dropped without a call
    /// and returns `None`.
    pub async fn respond_with_text(
        &self,
        id: &str,
        text: &str,
    ) -> Result<Option<ActionOutcome>, RelayError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        self.dispatch(ActionRequest::text(id, text)).await.map(Some)
    }

    async fn dispatch(&self, request: ActionRequest) -> Result<ActionOutcome, RelayError> {
        let id = request.notification_id.clone();

        // Lock the row's controls before anything goes out
        let generation = {
            let mut state = self.write();
            let generation = state.generation;
            let row = state
                .rows
                .iter_mut()
                .find(|r| r.notification.id == id)
                .ok_or_else(|| RelayError::NotActionable(id.clone()))?;
            let enabled = match (&mut row.actions, request.action) {
                (
                    RowActions::ApproveReject { enabled },
                    ResponseKind::Approve | ResponseKind::Reject,
                ) => enabled,
                (RowActions::TextForm { enabled }, ResponseKind::Text) => enabled,
                _ => return Err(RelayError::NotActionable(id)),
            };
            if !*enabled {
                return Err(RelayError::NotActionable(id));
            }
            *enabled = false;
            generation
        };

        let result = submit_action(self.transport.as_ref(), &request).await;
        if let Err(err) = &result {
            tracing::error!("Respond failed for {}: {}", id, err);
        }

        let mut state = self.write();
        if state.generation != generation {
            tracing::debug!("Feed refreshed while responding to {}, dropping result", id);
            return result;
        }
        if let Some(row) = state.rows.iter_mut().find(|r| r.notification.id == id) {
            row.actions = match &result {
                Ok(outcome) => RowActions::Responded(outcome.label()),
                Err(err) => RowActions::Failed(format!("Error: {}", failure_detail(err))),
            };
        }
        result
    }
}
