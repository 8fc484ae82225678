//! HTTP server wiring: routes, CORS, static files, shutdown

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::handler::HandlerWithoutStateExt;
use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::config::{AudioConfig, ConfigStore};
use crate::device::{AudioDevice, DeviceRegistry};
use crate::engine::AudioEngine;
use crate::ui::handlers;
use crate::Result;

/// Read access to the device set, as the router sees it.
pub trait DeviceSource: Send + Sync {
    fn devices(&self) -> Vec<AudioDevice>;
}

impl DeviceSource for DeviceRegistry {
    fn devices(&self) -> Vec<AudioDevice> {
        self.list()
    }
}

/// Read access to the configuration, as the router sees it.
pub trait ConfigSource: Send + Sync {
    fn current_config(&self) -> AudioConfig;
}

impl ConfigSource for ConfigStore {
    fn current_config(&self) -> AudioConfig {
        self.current()
    }
}

/// Components injected into the router at construction time.
///
/// Each handle is optional; a handler whose backing component was never
/// wired up answers with a soft JSON error instead of failing.
#[derive(Clone, Default)]
pub struct AppState {
    pub devices: Option<Arc<dyn DeviceSource>>,
    pub config: Option<Arc<dyn ConfigSource>>,
    pub engine: Option<Arc<AudioEngine>>,
}

pub struct WebServer {
    addr: SocketAddr,
    static_dir: PathBuf,
    state: AppState,
}

impl WebServer {
    pub fn new(port: u16, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], port)),
            static_dir: static_dir.into(),
            state: AppState::default(),
        }
    }

    pub fn with_device_source(mut self, devices: Arc<dyn DeviceSource>) -> Self {
        self.state.devices = Some(devices);
        self
    }

    pub fn with_config_source(mut self, config: Arc<dyn ConfigSource>) -> Self {
        self.state.config = Some(config);
        self
    }

    pub fn with_engine(mut self, engine: Arc<AudioEngine>) -> Self {
        self.state.engine = Some(engine);
        self
    }

    /// Build the router: exact-match API routes, then static files for
    /// unmatched paths (the root resolves to the index document), then an
    /// HTML 404. The CORS layer wraps every response, API and static alike.
    pub fn router(&self) -> Router {
        let static_files = ServeDir::new(&self.static_dir)
            .call_fallback_on_method_not_allowed(true)
            .not_found_service(handlers::not_found.into_service());

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

        Router::new()
            .route("/api/devices", get(handlers::get_devices))
            .route("/api/config", get(handlers::get_config))
            .route("/api/status", get(handlers::get_status))
            .route("/api/audio/play", post(handlers::play_audio))
            .fallback_service(static_files)
            .layer(cors)
            .with_state(Arc::new(self.state.clone()))
    }

    /// Bind and serve until `shutdown` resolves.
    ///
    /// Failing to bind the port is the one fatal startup error and is
    /// returned to the caller.
    pub async fn serve(self, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("Web server listening on {}", self.addr);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}
