//! # Audio Control Server
//!
//! Local control-plane server that simulates management of audio hardware
//! devices. Device state is in-memory and mock-generated; the HTTP API lets
//! a client enumerate devices, read the audio configuration, and drive
//! simulated playback.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         HTTP clients                         │
//! └───────────────┬──────────────────────────────────────────────┘
//!                 │ GET /api/devices, /api/config, /api/status
//!                 │ POST /api/audio/play, static files
//!                 ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                  Web Server (ui::server)                     │
//! │        CORS layer · route table · static fallback            │
//! └──────┬──────────────────────┬──────────────────┬─────────────┘
//!        ▼                      ▼                  ▼
//! ┌──────────────┐     ┌────────────────┐   ┌──────────────┐
//! │DeviceRegistry│     │  ConfigStore   │   │ AudioEngine  │
//! │  (device)    │     │   (config)     │   │  (engine)    │
//! └──────┬───────┘     └───────┬────────┘   └──────────────┘
//!        │  status events      │  config events
//!        └─────────┬───────────┘
//!                  ▼
//!        ┌──────────────────┐
//!        │  ChangeNotifier  │──► listeners (logging, engine sync)
//!        │     (events)     │
//!        └──────────────────┘
//! ```

pub mod config;
pub mod device;
pub mod engine;
pub mod error;
pub mod events;
pub mod ui;

pub use error::{Error, Result};

/// Application-wide constants
pub mod constants {
    /// Default HTTP port for the control API and web UI
    pub const DEFAULT_HTTP_PORT: u16 = 7788;

    /// Default directory for static web assets
    pub const DEFAULT_STATIC_DIR: &str = "static";

    /// Default path of the persisted configuration file
    pub const DEFAULT_CONFIG_PATH: &str = "config.txt";

    /// Label of the built-in demo audio source
    pub const DEFAULT_AUDIO_FILE: &str = "T-Rex Roar (Default)";

    /// Number of bands in the simulated spectrum analyzer
    pub const SPECTRUM_BANDS: usize = 32;
}
