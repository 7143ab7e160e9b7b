mod client;
pub mod public;
mod transport;

pub use client::HttpTransport;
pub use public::{ActionRequest, Directory, Notification, ResponseKind, Session};
pub use transport::Transport;
