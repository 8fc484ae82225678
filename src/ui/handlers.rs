//! HTTP API handlers
//!
//! Component-unavailable conditions are soft errors by contract: the body
//! is `{"error": ...}` but the HTTP status stays 200. Only unmatched routes
//! produce a 404.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;

use crate::config::AudioConfig;
use crate::device::{AudioDevice, DeviceStatus, DeviceType};
use crate::ui::server::AppState;

/// Soft error body
#[derive(serde::Serialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    fn unavailable(component: &str) -> Json<ApiError> {
        Json(Self {
            error: format!("{component} not available"),
        })
    }
}

/// Device fields exposed on the wire
#[derive(serde::Serialize)]
pub struct DeviceSummary {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DeviceType,
    pub status: DeviceStatus,
}

impl From<AudioDevice> for DeviceSummary {
    fn from(device: AudioDevice) -> Self {
        Self {
            id: device.id,
            name: device.name,
            kind: device.kind,
            status: device.status,
        }
    }
}

#[derive(serde::Serialize)]
pub struct DevicesResponse {
    pub devices: Vec<DeviceSummary>,
}

#[derive(serde::Serialize)]
pub struct ConfigResponse {
    pub config: AudioConfig,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub server: &'static str,
    pub audio_engine: &'static str,
    pub device_manager: &'static str,
    pub config_manager: &'static str,
}

#[derive(serde::Serialize)]
pub struct StatusResponse {
    pub status: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct PlayResponse {
    pub result: &'static str,
    pub message: &'static str,
}

/// GET /api/devices
pub async fn get_devices(State(state): State<Arc<AppState>>) -> Response {
    match &state.devices {
        Some(registry) => {
            let devices = registry.devices().into_iter().map(DeviceSummary::from).collect();
            Json(DevicesResponse { devices }).into_response()
        }
        None => ApiError::unavailable("Device manager").into_response(),
    }
}

/// GET /api/config
pub async fn get_config(State(state): State<Arc<AppState>>) -> Response {
    match &state.config {
        Some(store) => Json(ConfigResponse {
            config: store.current_config(),
        })
        .into_response(),
        None => ApiError::unavailable("Config manager").into_response(),
    }
}

/// GET /api/status
///
/// A component reports `online` whenever its handle was injected; there is
/// no deeper health check behind these flags.
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    fn presence(present: bool) -> &'static str {
        if present {
            "online"
        } else {
            "offline"
        }
    }
    Json(StatusResponse {
        status: ComponentStatus {
            server: "online",
            audio_engine: presence(state.engine.is_some()),
            device_manager: presence(state.devices.is_some()),
            config_manager: presence(state.config.is_some()),
        },
    })
}

/// POST /api/audio/play
pub async fn play_audio(State(state): State<Arc<AppState>>) -> Response {
    match &state.engine {
        Some(engine) => {
            engine.play();
            Json(PlayResponse {
                result: "success",
                message: "Audio command processed",
            })
            .into_response()
        }
        None => ApiError::unavailable("Audio engine").into_response(),
    }
}

/// Final fallback when neither an API route nor a static file matched.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html("<h1>404 Not Found</h1>"))
}
