//! Line-oriented `key=value` settings file format
//!
//! This exact format is part of the external contract (clients and tooling
//! read it), so it is rendered and parsed directly instead of going through
//! a serde format. `#` starts a comment line; unknown keys and malformed
//! lines are skipped; whitespace around keys and values is trimmed.

use crate::config::audio::AudioConfig;

/// Fields recovered from a persisted settings file. Absent or unparsable
/// values stay `None` and the caller falls back to defaults.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PersistedSettings {
    pub sample_rate: Option<u32>,
    pub buffer_size: Option<u32>,
    pub bit_depth: Option<u16>,
    pub channels: Option<u16>,
    /// Raw id from the file; `-1` encodes "no active device".
    pub active_device_id: Option<i64>,
    pub current_audio_file: Option<String>,
}

pub fn parse(text: &str) -> PersistedSettings {
    let mut settings = PersistedSettings::default();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        match key {
            "sample_rate" => settings.sample_rate = value.parse().ok(),
            "buffer_size" => settings.buffer_size = value.parse().ok(),
            "bit_depth" => settings.bit_depth = value.parse().ok(),
            "channels" => settings.channels = value.parse().ok(),
            "active_device_id" => settings.active_device_id = value.parse().ok(),
            "current_audio_file" => settings.current_audio_file = Some(value.to_string()),
            _ => {}
        }
    }
    settings
}

pub fn render(audio: &AudioConfig, active_device_id: Option<u32>, current_audio_file: &str) -> String {
    let active = active_device_id.map_or(-1, i64::from);
    format!(
        "# Audio control server configuration\n\
         # Generated automatically - do not edit while the server is running\n\
         \n\
         # Audio configuration\n\
         sample_rate={}\n\
         buffer_size={}\n\
         bit_depth={}\n\
         channels={}\n\
         \n\
         # System configuration\n\
         active_device_id={}\n\
         current_audio_file={}\n",
        audio.sample_rate, audio.buffer_size, audio.bit_depth, audio.channels, active, current_audio_file
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_then_parse_round_trips() {
        let audio = AudioConfig {
            sample_rate: 96_000,
            buffer_size: 512,
            bit_depth: 32,
            channels: 4,
        };
        let text = render(&audio, Some(3), "drums.wav");
        let parsed = parse(&text);
        assert_eq!(parsed.sample_rate, Some(96_000));
        assert_eq!(parsed.buffer_size, Some(512));
        assert_eq!(parsed.bit_depth, Some(32));
        assert_eq!(parsed.channels, Some(4));
        assert_eq!(parsed.active_device_id, Some(3));
        assert_eq!(parsed.current_audio_file.as_deref(), Some("drums.wav"));
    }

    #[test]
    fn no_active_device_serializes_as_minus_one() {
        let text = render(&AudioConfig::default(), None, "tone");
        assert!(text.contains("active_device_id=-1"));
        assert_eq!(parse(&text).active_device_id, Some(-1));
    }

    #[test]
    fn comments_blank_lines_and_whitespace_are_tolerated() {
        let parsed = parse(
            "# comment\n\
             \n\
             sample_rate = 44100 \n\
             \tbuffer_size\t=\t128\n\
             current_audio_file =  take 7.wav \n",
        );
        assert_eq!(parsed.sample_rate, Some(44_100));
        assert_eq!(parsed.buffer_size, Some(128));
        assert_eq!(parsed.current_audio_file.as_deref(), Some("take 7.wav"));
    }

    #[test]
    fn garbage_lines_and_values_are_skipped() {
        let parsed = parse(
            "not a key value line\n\
             sample_rate=many\n\
             bit_depth=24\n\
             mystery_key=5\n",
        );
        assert_eq!(parsed.sample_rate, None);
        assert_eq!(parsed.bit_depth, Some(24));
        assert_eq!(parsed, PersistedSettings { bit_depth: Some(24), ..Default::default() });
    }
}
