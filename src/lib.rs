pub mod agent;
pub mod api;
pub mod cli;
pub mod core;
pub mod feed;
pub mod notify;
pub mod push;
pub mod sessions;
