//! Simulated audio engine
//!
//! Stands in for a real playback path: it tracks playback state and derives
//! plausible latency and spectrum figures from the active configuration.
//! Metrics are computed on read, so no background thread is needed.

use std::time::Instant;

use parking_lot::Mutex;

use crate::config::AudioConfig;
use crate::constants::{DEFAULT_AUDIO_FILE, SPECTRUM_BANDS};

/// Point-in-time performance figures reported by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct AudioMetrics {
    pub input_latency_ms: f64,
    pub output_latency_ms: f64,
    pub total_latency_ms: f64,
    pub spectrum: Vec<f32>,
    pub is_playing: bool,
}

struct EngineState {
    config: AudioConfig,
    playing: bool,
    active_device: Option<u32>,
    current_file: String,
}

pub struct AudioEngine {
    state: Mutex<EngineState>,
    started: Instant,
}

impl AudioEngine {
    pub fn new(config: AudioConfig) -> Self {
        tracing::info!(
            "Audio engine initialized: {} Hz, {} samples, {} bits",
            config.sample_rate,
            config.buffer_size,
            config.bit_depth
        );
        Self {
            state: Mutex::new(EngineState {
                config,
                playing: false,
                active_device: None,
                current_file: DEFAULT_AUDIO_FILE.to_string(),
            }),
            started: Instant::now(),
        }
    }

    pub fn config(&self) -> AudioConfig {
        self.state.lock().config
    }

    pub fn set_config(&self, config: AudioConfig) {
        self.state.lock().config = config;
    }

    /// Record the label of the audio source in use. Loading is simulated;
    /// there is no decoder behind this.
    pub fn load_file(&self, label: impl Into<String>) {
        let label = label.into();
        tracing::info!("Loading audio file: {label}");
        self.state.lock().current_file = label;
    }

    pub fn current_file(&self) -> String {
        self.state.lock().current_file.clone()
    }

    pub fn set_active_device(&self, device_id: Option<u32>) {
        self.state.lock().active_device = device_id;
    }

    pub fn active_device(&self) -> Option<u32> {
        self.state.lock().active_device
    }

    pub fn play(&self) {
        self.state.lock().playing = true;
        tracing::info!("Audio playback started");
    }

    pub fn pause(&self) {
        self.state.lock().playing = false;
    }

    pub fn stop(&self) {
        self.state.lock().playing = false;
        tracing::info!("Audio playback stopped");
    }

    pub fn is_playing(&self) -> bool {
        self.state.lock().playing
    }

    /// Current simulated metrics.
    ///
    /// Latency is one buffer per direction; the spectrum is a deterministic
    /// time-varying curve with more energy in the low bands while playing
    /// and a flat 0.1 floor when idle.
    pub fn metrics(&self) -> AudioMetrics {
        let state = self.state.lock();
        let buffer_ms = state.config.buffer_size as f64 / state.config.sample_rate as f64 * 1000.0;
        AudioMetrics {
            input_latency_ms: buffer_ms,
            output_latency_ms: buffer_ms,
            total_latency_ms: buffer_ms * 2.0,
            spectrum: spectrum(self.started.elapsed().as_secs_f32(), state.playing),
            is_playing: state.playing,
        }
    }
}

fn spectrum(elapsed_secs: f32, playing: bool) -> Vec<f32> {
    if !playing {
        return vec![0.1; SPECTRUM_BANDS];
    }
    (0..SPECTRUM_BANDS)
        .map(|band| {
            let base = (1.0 - band as f32 / SPECTRUM_BANDS as f32).max(0.1);
            let sweep = 0.5 + 0.5 * (elapsed_secs * 10.0 + band as f32 * 0.5).sin();
            base * sweep
        })
        .collect()
}
