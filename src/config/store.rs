//! Validated storage for the current configuration and device profiles

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::audio::AudioConfig;
use crate::config::persist;
use crate::constants::{DEFAULT_AUDIO_FILE, DEFAULT_CONFIG_PATH};
use crate::error::ConfigError;
use crate::events::ChangeNotifier;

/// Runtime settings the store persists alongside the audio configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemSettings {
    pub audio: AudioConfig,
    pub active_device_id: Option<u32>,
    pub current_audio_file: String,
    pub auto_save: bool,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            audio: AudioConfig::default(),
            active_device_id: None,
            current_audio_file: DEFAULT_AUDIO_FILE.to_string(),
            auto_save: true,
        }
    }
}

struct Inner {
    settings: SystemSettings,
    profiles: HashMap<u32, AudioConfig>,
}

/// Owns the current global configuration and per-device profiles.
///
/// All setters validate atomically: a rejected configuration leaves the
/// store untouched. Disk I/O happens on snapshots, outside the in-memory
/// lock.
pub struct ConfigStore {
    inner: RwLock<Inner>,
    notifier: Arc<ChangeNotifier>,
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(notifier: Arc<ChangeNotifier>) -> Self {
        Self::with_path(notifier, DEFAULT_CONFIG_PATH)
    }

    pub fn with_path(notifier: Arc<ChangeNotifier>, path: impl Into<PathBuf>) -> Self {
        Self {
            inner: RwLock::new(Inner {
                settings: SystemSettings::default(),
                profiles: HashMap::new(),
            }),
            notifier,
            path: path.into(),
        }
    }

    pub fn current(&self) -> AudioConfig {
        self.inner.read().settings.audio
    }

    /// Replace the current configuration after validating every field.
    ///
    /// On success a configuration-changed event carries the new config to
    /// all listeners; on failure the error lists the violated constraints
    /// and `current()` is unchanged.
    pub fn set_current(&self, config: AudioConfig) -> Result<(), ConfigError> {
        let violations = config.validate();
        if !violations.is_empty() {
            return Err(ConfigError::Invalid(violations));
        }
        self.inner.write().settings.audio = config;
        self.notifier.emit_config_change(&config);
        Ok(())
    }

    /// Store or overwrite the profile for `device_id`.
    ///
    /// The id does not have to be currently enumerated; profiles outlive
    /// device re-scans.
    pub fn save_profile(&self, device_id: u32, config: AudioConfig) -> Result<(), ConfigError> {
        let violations = config.validate();
        if !violations.is_empty() {
            return Err(ConfigError::Invalid(violations));
        }
        self.inner.write().profiles.insert(device_id, config);
        tracing::debug!("Profile saved for device {device_id}");
        Ok(())
    }

    /// Stored profile for `device_id`, or the default configuration.
    pub fn profile(&self, device_id: u32) -> AudioConfig {
        self.inner
            .read()
            .profiles
            .get(&device_id)
            .copied()
            .unwrap_or_default()
    }

    pub fn has_profile(&self, device_id: u32) -> bool {
        self.inner.read().profiles.contains_key(&device_id)
    }

    /// Idempotent: removing an absent profile is not an error.
    pub fn remove_profile(&self, device_id: u32) {
        self.inner.write().profiles.remove(&device_id);
    }

    pub fn active_device(&self) -> Option<u32> {
        self.inner.read().settings.active_device_id
    }

    pub fn set_active_device(&self, device_id: Option<u32>) {
        self.inner.write().settings.active_device_id = device_id;
    }

    pub fn current_audio_file(&self) -> String {
        self.inner.read().settings.current_audio_file.clone()
    }

    pub fn set_current_audio_file(&self, label: impl Into<String>) {
        self.inner.write().settings.current_audio_file = label.into();
    }

    pub fn auto_save(&self) -> bool {
        self.inner.read().settings.auto_save
    }

    pub fn set_auto_save(&self, enabled: bool) {
        self.inner.write().settings.auto_save = enabled;
    }

    /// Snapshot of all runtime settings.
    pub fn settings(&self) -> SystemSettings {
        self.inner.read().settings.clone()
    }

    /// Load persisted settings from the store's path.
    ///
    /// Missing files surface as an error for the caller to log; malformed
    /// lines, unparsable numbers and audio values that fail validation are
    /// treated as absent, so the store always ends up in a usable state.
    pub fn load(&self) -> Result<(), ConfigError> {
        let text = std::fs::read_to_string(&self.path)?;
        let parsed = persist::parse(&text);

        let mut audio = AudioConfig::default();
        if let Some(rate) = parsed.sample_rate {
            audio.sample_rate = rate;
        }
        if let Some(size) = parsed.buffer_size {
            audio.buffer_size = size;
        }
        if let Some(depth) = parsed.bit_depth {
            audio.bit_depth = depth;
        }
        if let Some(channels) = parsed.channels {
            audio.channels = channels;
        }
        if !audio.is_valid() {
            tracing::warn!("Persisted audio configuration is invalid, using defaults");
            audio = AudioConfig::default();
        }

        let mut inner = self.inner.write();
        inner.settings.audio = audio;
        if let Some(raw) = parsed.active_device_id {
            inner.settings.active_device_id = u32::try_from(raw).ok();
        }
        if let Some(label) = parsed.current_audio_file {
            inner.settings.current_audio_file = label;
        }
        Ok(())
    }

    /// Write the current settings to the store's path.
    pub fn save(&self) -> Result<(), ConfigError> {
        let snapshot = self.settings();
        let text = persist::render(
            &snapshot.audio,
            snapshot.active_device_id,
            &snapshot.current_audio_file,
        );
        std::fs::write(&self.path, text)?;
        tracing::info!("Configuration saved to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::audio::Violation;

    fn store() -> ConfigStore {
        ConfigStore::new(Arc::new(ChangeNotifier::new()))
    }

    #[test]
    fn rejected_configuration_leaves_store_unchanged() {
        let store = store();
        let bad = AudioConfig {
            sample_rate: 44_100,
            buffer_size: 300,
            bit_depth: 24,
            channels: 2,
        };
        let err = store.set_current(bad).unwrap_err();
        match err {
            ConfigError::Invalid(violations) => {
                assert_eq!(violations, vec![Violation::BufferSize(300)]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.current(), AudioConfig::default());
    }

    #[test]
    fn accepted_configuration_is_applied_and_announced() {
        let notifier = Arc::new(ChangeNotifier::new());
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = seen.clone();
        notifier.on_config_change(move |cfg| {
            sink.lock().push(*cfg);
            Ok(())
        });
        let store = ConfigStore::new(notifier);

        let cfg = AudioConfig {
            sample_rate: 96_000,
            buffer_size: 128,
            bit_depth: 32,
            channels: 2,
        };
        store.set_current(cfg).unwrap();
        assert_eq!(store.current(), cfg);
        assert_eq!(*seen.lock(), vec![cfg]);
    }

    #[test]
    fn profile_round_trip_and_default_fallback() {
        let store = store();
        let cfg = AudioConfig {
            sample_rate: 88_200,
            buffer_size: 1024,
            bit_depth: 16,
            channels: 6,
        };
        store.save_profile(7, cfg).unwrap();
        assert!(store.has_profile(7));
        assert_eq!(store.profile(7), cfg);
        // Profiles may reference devices that are not currently enumerated.
        assert!(!store.has_profile(8));
        assert_eq!(store.profile(8), AudioConfig::default());
    }

    #[test]
    fn invalid_profile_is_rejected() {
        let store = store();
        let bad = AudioConfig {
            channels: 12,
            ..AudioConfig::default()
        };
        assert!(store.save_profile(1, bad).is_err());
        assert!(!store.has_profile(1));
    }

    #[test]
    fn remove_profile_is_idempotent() {
        let store = store();
        store.save_profile(2, AudioConfig::default()).unwrap();
        store.remove_profile(2);
        assert!(!store.has_profile(2));
        store.remove_profile(2);
        assert!(!store.has_profile(2));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.txt");
        let cfg = AudioConfig {
            sample_rate: 192_000,
            buffer_size: 64,
            bit_depth: 32,
            channels: 8,
        };

        let store = ConfigStore::with_path(Arc::new(ChangeNotifier::new()), &path);
        store.set_current(cfg).unwrap();
        store.set_active_device(Some(3));
        store.set_current_audio_file("session.wav");
        store.save().unwrap();

        let fresh = ConfigStore::with_path(Arc::new(ChangeNotifier::new()), &path);
        fresh.load().unwrap();
        assert_eq!(fresh.current(), cfg);
        assert_eq!(fresh.active_device(), Some(3));
        assert_eq!(fresh.current_audio_file(), "session.wav");
    }

    #[test]
    fn missing_file_fails_softly_with_defaults_kept() {
        let dir = tempfile::tempdir().unwrap();
        let store =
            ConfigStore::with_path(Arc::new(ChangeNotifier::new()), dir.path().join("absent.txt"));
        assert!(store.load().is_err());
        assert_eq!(store.current(), AudioConfig::default());
        assert_eq!(store.active_device(), None);
    }

    #[test]
    fn invalid_persisted_values_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.txt");
        std::fs::write(
            &path,
            "sample_rate=123\nbuffer_size=300\ncurrent_audio_file=kept.wav\nactive_device_id=-1\n",
        )
        .unwrap();

        let store = ConfigStore::with_path(Arc::new(ChangeNotifier::new()), &path);
        store.load().unwrap();
        // Garbage audio values are treated as absent...
        assert_eq!(store.current(), AudioConfig::default());
        // ...while the unrelated settings still apply.
        assert_eq!(store.current_audio_file(), "kept.wav");
        assert_eq!(store.active_device(), None);
    }
}
