//! Device data model

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::AudioConfig;

/// Driver category of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceType {
    #[serde(rename = "WDM")]
    Wdm,
    #[serde(rename = "KS")]
    Ks,
    #[serde(rename = "WASAPI")]
    Wasapi,
    #[serde(rename = "ASIO")]
    Asio,
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceType::Wdm => "WDM",
            DeviceType::Ks => "KS",
            DeviceType::Wasapi => "WASAPI",
            DeviceType::Asio => "ASIO",
        };
        f.write_str(name)
    }
}

/// Lifecycle status of a device
///
/// At most one device is `Active` at any time; a `Disabled` device rejects
/// activation until its status is changed through the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceStatus {
    Active,
    Inactive,
    Disabled,
    Error,
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Format ranges a device claims to support
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCapabilities {
    pub max_sample_rate: u32,
    pub min_buffer_size: u32,
    pub max_buffer_size: u32,
    pub supported_sample_rates: Vec<u32>,
    pub supported_bit_depths: Vec<u16>,
    pub is_input: bool,
    pub is_output: bool,
}

impl DeviceCapabilities {
    /// Whether this device can run the given configuration.
    pub fn supports(&self, config: &AudioConfig) -> bool {
        self.supported_sample_rates.contains(&config.sample_rate)
            && config.buffer_size >= self.min_buffer_size
            && config.buffer_size <= self.max_buffer_size
            && self.supported_bit_depths.contains(&config.bit_depth)
    }
}

/// One simulated audio endpoint
///
/// Identity (`id`) is immutable after creation; status is mutated only
/// through the registry's activation protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioDevice {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DeviceType,
    pub status: DeviceStatus,
    pub capabilities: DeviceCapabilities,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps() -> DeviceCapabilities {
        DeviceCapabilities {
            max_sample_rate: 192_000,
            min_buffer_size: 64,
            max_buffer_size: 1024,
            supported_sample_rates: vec![44_100, 48_000],
            supported_bit_depths: vec![16, 24],
            is_input: true,
            is_output: true,
        }
    }

    #[test]
    fn capability_check_covers_all_fields() {
        let caps = caps();
        let ok = AudioConfig {
            sample_rate: 48_000,
            buffer_size: 256,
            bit_depth: 24,
            channels: 2,
        };
        assert!(caps.supports(&ok));

        assert!(!caps.supports(&AudioConfig {
            sample_rate: 96_000,
            ..ok
        }));
        assert!(!caps.supports(&AudioConfig {
            buffer_size: 2048,
            ..ok
        }));
        assert!(!caps.supports(&AudioConfig {
            buffer_size: 32,
            ..ok
        }));
        assert!(!caps.supports(&AudioConfig { bit_depth: 32, ..ok }));
    }

    #[test]
    fn wire_names_match_driver_conventions() {
        assert_eq!(
            serde_json::to_string(&DeviceType::Wasapi).unwrap(),
            "\"WASAPI\""
        );
        assert_eq!(
            serde_json::to_string(&DeviceStatus::Disabled).unwrap(),
            "\"Disabled\""
        );
        assert_eq!(DeviceType::Ks.to_string(), "KS");
        assert_eq!(DeviceStatus::Active.to_string(), "Active");
    }
}
