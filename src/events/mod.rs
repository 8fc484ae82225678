//! Change notification between state owners and their consumers
//!
//! The registry and the configuration store announce mutations through a
//! shared [`ChangeNotifier`] so they stay decoupled from the HTTP layer,
//! logging, or any future push channel. Delivery is synchronous, in
//! registration order, on the thread that performed the mutation. A failing
//! listener is logged and never blocks later listeners or rolls back the
//! already-applied change.

use parking_lot::RwLock;

use crate::config::AudioConfig;
use crate::device::DeviceStatus;

type StatusListener = Box<dyn Fn(u32, DeviceStatus, DeviceStatus) -> anyhow::Result<()> + Send + Sync>;
type ConfigListener = Box<dyn Fn(&AudioConfig) -> anyhow::Result<()> + Send + Sync>;

#[derive(Default)]
pub struct ChangeNotifier {
    status_listeners: RwLock<Vec<StatusListener>>,
    config_listeners: RwLock<Vec<ConfigListener>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for device status transitions
    /// `(device id, old status, new status)`.
    pub fn on_status_change<F>(&self, listener: F)
    where
        F: Fn(u32, DeviceStatus, DeviceStatus) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.status_listeners.write().push(Box::new(listener));
    }

    /// Register a listener for configuration changes.
    pub fn on_config_change<F>(&self, listener: F)
    where
        F: Fn(&AudioConfig) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.config_listeners.write().push(Box::new(listener));
    }

    pub fn emit_status_change(&self, id: u32, old: DeviceStatus, new: DeviceStatus) {
        tracing::debug!("Device {id} status changed: {old} -> {new}");
        for (index, listener) in self.status_listeners.read().iter().enumerate() {
            if let Err(error) = listener(id, old, new) {
                tracing::warn!("Status listener {index} failed: {error:#}");
            }
        }
    }

    pub fn emit_config_change(&self, config: &AudioConfig) {
        tracing::debug!(
            "Configuration changed: {} Hz, {} samples, {} bits, {} channels",
            config.sample_rate,
            config.buffer_size,
            config.bit_depth,
            config.channels
        );
        for (index, listener) in self.config_listeners.read().iter().enumerate() {
            if let Err(error) = listener(config) {
                tracing::warn!("Config listener {index} failed: {error:#}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn listeners_run_in_registration_order() {
        let notifier = ChangeNotifier::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let log = log.clone();
            notifier.on_status_change(move |_, _, _| {
                log.lock().push(name);
                Ok(())
            });
        }

        notifier.emit_status_change(1, DeviceStatus::Inactive, DeviceStatus::Active);
        assert_eq!(*log.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn failing_listener_does_not_stop_the_rest() {
        let notifier = ChangeNotifier::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let sink = log.clone();
        notifier.on_config_change(move |_| {
            sink.lock().push("before");
            Ok(())
        });
        notifier.on_config_change(|_| anyhow::bail!("listener exploded"));
        let sink = log.clone();
        notifier.on_config_change(move |_| {
            sink.lock().push("after");
            Ok(())
        });

        notifier.emit_config_change(&AudioConfig::default());
        assert_eq!(*log.lock(), vec!["before", "after"]);
    }

    #[test]
    fn emitting_with_no_listeners_is_fine() {
        let notifier = ChangeNotifier::new();
        notifier.emit_status_change(2, DeviceStatus::Active, DeviceStatus::Error);
        notifier.emit_config_change(&AudioConfig::default());
    }
}
