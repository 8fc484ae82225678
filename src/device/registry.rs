//! Device enumeration and status-transition enforcement

use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::audio::{MAX_BUFFER_SIZE, MIN_BUFFER_SIZE, SUPPORTED_BIT_DEPTHS, SUPPORTED_SAMPLE_RATES};
use crate::device::types::{AudioDevice, DeviceCapabilities, DeviceStatus, DeviceType};
use crate::error::DeviceError;
use crate::events::ChangeNotifier;

struct Inner {
    devices: Vec<AudioDevice>,
    active: Option<u32>,
}

/// Owns the set of known devices and the active-device pointer.
///
/// Mutations are serialized behind a write lock; reads see clone snapshots
/// in insertion order. Status-change events are collected inside the
/// critical section and delivered after the lock is released, so listeners
/// never run while the registry is locked.
pub struct DeviceRegistry {
    inner: RwLock<Inner>,
    notifier: Arc<ChangeNotifier>,
}

impl DeviceRegistry {
    pub fn new(notifier: Arc<ChangeNotifier>) -> Self {
        let devices = seed_devices();
        let active = active_of(&devices);
        Self {
            inner: RwLock::new(Inner { devices, active }),
            notifier,
        }
    }

    /// Re-enumerate devices and replace the current set.
    ///
    /// An enumeration that comes back empty keeps whatever the registry had
    /// (falling back to the seed list if it had nothing) and reports
    /// `ScanFailed` instead of leaving the registry empty.
    pub fn scan(&self) -> Result<Vec<AudioDevice>, DeviceError> {
        tracing::info!("Scanning for audio devices");
        let found = enumerate_devices();
        let installed = self.install(found)?;
        tracing::info!("Found {} audio devices", installed.len());
        Ok(installed)
    }

    fn install(&self, found: Vec<AudioDevice>) -> Result<Vec<AudioDevice>, DeviceError> {
        let mut inner = self.inner.write();
        if found.is_empty() {
            if inner.devices.is_empty() {
                inner.devices = seed_devices();
                inner.active = active_of(&inner.devices);
            }
            return Err(DeviceError::ScanFailed);
        }
        inner.active = active_of(&found);
        inner.devices = found.clone();
        Ok(found)
    }

    /// Snapshot of all devices in insertion order.
    pub fn list(&self) -> Vec<AudioDevice> {
        self.inner.read().devices.clone()
    }

    pub fn get(&self, id: u32) -> Option<AudioDevice> {
        self.inner.read().devices.iter().find(|d| d.id == id).cloned()
    }

    pub fn is_active(&self, id: u32) -> bool {
        self.inner.read().active == Some(id)
    }

    /// Id of the currently active device, if any.
    pub fn active_device(&self) -> Option<u32> {
        self.inner.read().active
    }

    /// Make `id` the single active device.
    ///
    /// The previously active device (if any) is demoted to `Inactive` in the
    /// same critical section, so no interleaving can observe two active
    /// devices. A `Disabled` target rejects the activation with its status
    /// unchanged.
    pub fn activate(&self, id: u32) -> Result<(), DeviceError> {
        let mut events = Vec::new();
        {
            let mut inner = self.inner.write();
            let status = inner
                .devices
                .iter()
                .find(|d| d.id == id)
                .map(|d| d.status)
                .ok_or(DeviceError::NotFound(id))?;
            if status == DeviceStatus::Disabled {
                return Err(DeviceError::InvalidTransition {
                    id,
                    status: DeviceStatus::Disabled,
                });
            }
            if let Some(prev) = inner.active.filter(|&prev| prev != id) {
                transition(&mut inner, prev, DeviceStatus::Inactive, &mut events);
            }
            transition(&mut inner, id, DeviceStatus::Active, &mut events);
            inner.active = Some(id);
        }
        self.dispatch(events);
        tracing::info!("Activated device {id}");
        Ok(())
    }

    /// Set `id` to `Inactive`, clearing the active pointer when it pointed
    /// at this device. A no-op on an already inactive device.
    pub fn deactivate(&self, id: u32) -> Result<(), DeviceError> {
        let mut events = Vec::new();
        {
            let mut inner = self.inner.write();
            if !inner.devices.iter().any(|d| d.id == id) {
                return Err(DeviceError::NotFound(id));
            }
            if inner.active == Some(id) {
                inner.active = None;
            }
            transition(&mut inner, id, DeviceStatus::Inactive, &mut events);
        }
        self.dispatch(events);
        Ok(())
    }

    /// Low-level status mutation used by the activation protocol and for
    /// forcing `Error`/`Disabled` states. Keeps the active pointer in step
    /// with statuses and emits an event only when the status actually
    /// changed.
    pub fn set_status(&self, id: u32, status: DeviceStatus) -> Result<(), DeviceError> {
        let mut events = Vec::new();
        {
            let mut inner = self.inner.write();
            if !inner.devices.iter().any(|d| d.id == id) {
                return Err(DeviceError::NotFound(id));
            }
            if status == DeviceStatus::Active {
                if let Some(prev) = inner.active.filter(|&prev| prev != id) {
                    transition(&mut inner, prev, DeviceStatus::Inactive, &mut events);
                }
                inner.active = Some(id);
            } else if inner.active == Some(id) {
                inner.active = None;
            }
            transition(&mut inner, id, status, &mut events);
        }
        self.dispatch(events);
        Ok(())
    }

    fn dispatch(&self, events: Vec<(u32, DeviceStatus, DeviceStatus)>) {
        for (id, old, new) in events {
            self.notifier.emit_status_change(id, old, new);
        }
    }
}

fn transition(
    inner: &mut Inner,
    id: u32,
    status: DeviceStatus,
    events: &mut Vec<(u32, DeviceStatus, DeviceStatus)>,
) {
    if let Some(device) = inner.devices.iter_mut().find(|d| d.id == id) {
        if device.status != status {
            events.push((id, device.status, status));
            device.status = status;
        }
    }
}

fn active_of(devices: &[AudioDevice]) -> Option<u32> {
    devices
        .iter()
        .find(|d| d.status == DeviceStatus::Active)
        .map(|d| d.id)
}

/// Simulated hardware enumeration. Stands in for a platform device scan and
/// always reports the same endpoints.
fn enumerate_devices() -> Vec<AudioDevice> {
    seed_devices()
}

fn seed_devices() -> Vec<AudioDevice> {
    vec![
        mock_device(1, "Generic HD Audio Device (WDM)", DeviceType::Wdm),
        mock_device(2, "Realtek ASIO (KS)", DeviceType::Ks),
        mock_device(3, "NVIDIA Broadcast (WASAPI)", DeviceType::Wasapi),
        mock_device(4, "Focusrite USB ASIO (WDM)", DeviceType::Wdm),
    ]
}

fn mock_device(id: u32, name: &str, kind: DeviceType) -> AudioDevice {
    // Device 1 boots active and device 2 boots disabled in the demo set.
    let status = match id {
        1 => DeviceStatus::Active,
        2 => DeviceStatus::Disabled,
        _ => DeviceStatus::Inactive,
    };
    AudioDevice {
        id,
        name: name.to_string(),
        kind,
        status,
        capabilities: DeviceCapabilities {
            max_sample_rate: 192_000,
            min_buffer_size: MIN_BUFFER_SIZE,
            max_buffer_size: MAX_BUFFER_SIZE,
            supported_sample_rates: SUPPORTED_SAMPLE_RATES.to_vec(),
            supported_bit_depths: SUPPORTED_BIT_DEPTHS.to_vec(),
            is_input: true,
            is_output: true,
        },
    }
}
