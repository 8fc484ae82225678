//! Web UI module

pub mod handlers;
pub mod server;

pub use server::{AppState, ConfigSource, DeviceSource, WebServer};
