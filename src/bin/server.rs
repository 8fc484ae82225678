//! Audio control server binary
//!
//! Wires the registry, configuration store, and simulated engine together
//! and serves the control API until Ctrl-C.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use audio_control_server::{
    config::ConfigStore,
    constants::{DEFAULT_HTTP_PORT, DEFAULT_STATIC_DIR},
    device::{DeviceRegistry, DeviceStatus},
    engine::AudioEngine,
    events::ChangeNotifier,
    ui::WebServer,
};

#[derive(Parser, Debug)]
#[command(name = "server", about = "Simulated audio device control-plane server")]
struct Cli {
    /// Server port
    #[arg(long, default_value_t = DEFAULT_HTTP_PORT)]
    port: u16,

    /// Static files directory
    #[arg(long, default_value = DEFAULT_STATIC_DIR)]
    static_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    tracing::info!("Starting audio control server");

    let notifier = Arc::new(ChangeNotifier::new());

    let config = Arc::new(ConfigStore::new(notifier.clone()));
    if let Err(e) = config.load() {
        tracing::warn!("Could not load config, using defaults: {e}");
    }

    let devices = Arc::new(DeviceRegistry::new(notifier.clone()));
    if let Err(e) = devices.scan() {
        tracing::warn!("Device scan failed, keeping seeded devices: {e}");
    }

    let engine = Arc::new(AudioEngine::new(config.current()));
    engine.load_file(config.current_audio_file());
    engine.set_active_device(devices.active_device());

    // Keep the persisted settings and the engine pointed at whichever
    // device holds the active slot, applying that device's saved profile
    // when it has one the hardware can run.
    {
        let config = config.clone();
        let devices = devices.clone();
        let engine = engine.clone();
        notifier.on_status_change(move |id, old, new| {
            tracing::info!("Device {id} status changed: {old} -> {new}");
            if new == DeviceStatus::Active {
                config.set_active_device(Some(id));
                engine.set_active_device(Some(id));
                if config.has_profile(id) {
                    let profile = config.profile(id);
                    match devices.get(id) {
                        Some(device) if device.capabilities.supports(&profile) => {
                            engine.set_config(profile);
                        }
                        _ => tracing::warn!(
                            "Profile for device {id} exceeds its capabilities, ignoring"
                        ),
                    }
                }
            } else if config.active_device() == Some(id) {
                config.set_active_device(None);
                engine.set_active_device(None);
            }
            Ok(())
        });
    }
    {
        let engine = engine.clone();
        notifier.on_config_change(move |cfg| {
            tracing::info!(
                "Audio configuration updated: {} Hz, {} samples, {} bits, {} channels",
                cfg.sample_rate,
                cfg.buffer_size,
                cfg.bit_depth,
                cfg.channels
            );
            engine.set_config(*cfg);
            Ok(())
        });
    }

    tracing::info!("Devices found: {}", devices.list().len());
    tracing::info!("Web interface: http://localhost:{}", cli.port);

    let server = WebServer::new(cli.port, &cli.static_dir)
        .with_device_source(devices.clone())
        .with_config_source(config.clone())
        .with_engine(engine);

    server.serve(shutdown_signal()).await?;

    if config.auto_save() {
        if let Err(e) = config.save() {
            tracing::warn!("Failed to save configuration: {e}");
        }
    }
    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
