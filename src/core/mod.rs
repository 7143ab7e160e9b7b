pub mod config;
pub mod error;

pub use config::{AppConfig, PushEndpointConfig};
pub use error::{GENERIC_FAILURE, RelayError, failure_detail};
