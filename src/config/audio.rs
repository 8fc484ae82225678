//! Audio configuration values and validation rules

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sample rates any simulated device accepts
pub const SUPPORTED_SAMPLE_RATES: [u32; 5] = [44_100, 48_000, 88_200, 96_000, 192_000];

/// Bit depths any simulated device accepts
pub const SUPPORTED_BIT_DEPTHS: [u16; 3] = [16, 24, 32];

pub const MIN_BUFFER_SIZE: u32 = 32;
pub const MAX_BUFFER_SIZE: u32 = 2048;
pub const MAX_CHANNELS: u16 = 8;

/// The sample format in effect, globally or per device profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioConfig {
    pub sample_rate: u32,
    pub buffer_size: u32,
    pub bit_depth: u16,
    pub channels: u16,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            buffer_size: 256,
            bit_depth: 24,
            channels: 2,
        }
    }
}

/// A configuration field failing its validation rule
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    #[error("sample rate {0} Hz is not supported")]
    SampleRate(u32),

    #[error("buffer size {0} must be a power of two between {MIN_BUFFER_SIZE} and {MAX_BUFFER_SIZE}")]
    BufferSize(u32),

    #[error("bit depth {0} is not supported")]
    BitDepth(u16),

    #[error("channel count {0} must be between 1 and {MAX_CHANNELS}")]
    Channels(u16),
}

impl AudioConfig {
    /// Check every field and return the full violation list.
    ///
    /// Pure: no side effects, usable standalone by tests and by the setters
    /// in the configuration store.
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        if !SUPPORTED_SAMPLE_RATES.contains(&self.sample_rate) {
            violations.push(Violation::SampleRate(self.sample_rate));
        }
        if self.buffer_size < MIN_BUFFER_SIZE
            || self.buffer_size > MAX_BUFFER_SIZE
            || !self.buffer_size.is_power_of_two()
        {
            violations.push(Violation::BufferSize(self.buffer_size));
        }
        if !SUPPORTED_BIT_DEPTHS.contains(&self.bit_depth) {
            violations.push(Violation::BitDepth(self.bit_depth));
        }
        if self.channels < 1 || self.channels > MAX_CHANNELS {
            violations.push(Violation::Channels(self.channels));
        }
        violations
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_config_is_valid() {
        assert!(AudioConfig::default().is_valid());
    }

    #[test]
    fn every_field_is_checked() {
        let cfg = AudioConfig {
            sample_rate: 22_050,
            buffer_size: 300,
            bit_depth: 8,
            channels: 0,
        };
        let violations = cfg.validate();
        assert_eq!(violations.len(), 4);
        assert!(violations.contains(&Violation::SampleRate(22_050)));
        assert!(violations.contains(&Violation::BufferSize(300)));
        assert!(violations.contains(&Violation::BitDepth(8)));
        assert!(violations.contains(&Violation::Channels(0)));
    }

    #[test]
    fn buffer_size_must_be_power_of_two_within_range() {
        let base = AudioConfig::default();
        for size in [32, 64, 512, 2048] {
            assert!(AudioConfig { buffer_size: size, ..base }.is_valid());
        }
        for size in [0, 16, 300, 4096] {
            assert_eq!(
                AudioConfig { buffer_size: size, ..base }.validate(),
                vec![Violation::BufferSize(size)]
            );
        }
    }

    #[test]
    fn nine_channels_is_out_of_range() {
        let cfg = AudioConfig {
            channels: 9,
            ..AudioConfig::default()
        };
        assert_eq!(cfg.validate(), vec![Violation::Channels(9)]);
    }

    proptest! {
        #[test]
        fn buffer_rule_matches_power_of_two_range(size in 0u32..8192) {
            let cfg = AudioConfig { buffer_size: size, ..AudioConfig::default() };
            let expected = (MIN_BUFFER_SIZE..=MAX_BUFFER_SIZE).contains(&size)
                && size.is_power_of_two();
            prop_assert_eq!(cfg.is_valid(), expected);
        }
    }
}
