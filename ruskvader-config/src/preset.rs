//! Preset persistence.
//!
//! A preset is one JSON object whose field names (and their order on save)
//! are part of the format: `LagJitterMs` and `LagEnabled` carry the jitter
//! knobs under their historical names. Save writes the object
//! pretty-printed; load parses the whole file before anything is applied,
//! so a malformed preset leaves the live configuration untouched.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::PresetError;
use ruskvader_core::config::{clamp_percent, ImpairmentConfig};

/// On-disk impairment preset.
///
/// Fields absent from the file keep their zero defaults, mirroring how the
/// format has always been read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Preset {
    pub delay_ms: i64,
    pub drop_percent: i64,
    pub duplicate_percent: i64,
    pub throttle_kbps: i64,
    pub delay_enabled: bool,
    pub drop_enabled: bool,
    pub duplicate_enabled: bool,
    pub throttle_enabled: bool,
    pub lag_jitter_ms: i64,
    pub lag_enabled: bool,
}

impl Preset {
    /// Reads and parses a preset file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PresetError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Writes the preset pretty-printed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PresetError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Applies every field, toggles included, onto a live configuration.
    /// Out-of-range values are clamped, never rejected.
    pub fn apply_to(&self, config: &mut ImpairmentConfig) {
        config.delay_ms = self.delay_ms.max(0) as u64;
        config.drop_percent = clamp_percent(self.drop_percent);
        config.duplicate_percent = clamp_percent(self.duplicate_percent);
        config.throttle_kbps = self.throttle_kbps.max(0) as u64;
        config.jitter_ms = self.lag_jitter_ms.max(0) as u64;

        config.delay_enabled = self.delay_enabled;
        config.drop_enabled = self.drop_enabled;
        config.duplicate_enabled = self.duplicate_enabled;
        config.throttle_enabled = self.throttle_enabled;
        config.jitter_enabled = self.lag_enabled;
    }

    /// The configuration this preset describes, starting from defaults.
    pub fn to_config(&self) -> ImpairmentConfig {
        let mut config = ImpairmentConfig::default();
        self.apply_to(&mut config);
        config
    }
}

impl From<&ImpairmentConfig> for Preset {
    fn from(config: &ImpairmentConfig) -> Self {
        Self {
            delay_ms: config.delay_ms as i64,
            drop_percent: i64::from(config.drop_percent),
            duplicate_percent: i64::from(config.duplicate_percent),
            throttle_kbps: config.throttle_kbps as i64,
            delay_enabled: config.delay_enabled,
            drop_enabled: config.drop_enabled,
            duplicate_enabled: config.duplicate_enabled,
            throttle_enabled: config.throttle_enabled,
            lag_jitter_ms: config.jitter_ms as i64,
            lag_enabled: config.jitter_enabled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_config() -> ImpairmentConfig {
        ImpairmentConfig {
            drop_percent: 30,
            delay_ms: 250,
            jitter_ms: 40,
            duplicate_percent: 15,
            throttle_kbps: 512,
            drop_enabled: true,
            delay_enabled: true,
            jitter_enabled: false,
            duplicate_enabled: true,
            throttle_enabled: false,
        }
    }

    #[test]
    fn test_round_trip_reproduces_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adverse.json");

        let original = sample_config();
        Preset::from(&original).save(&path).unwrap();

        let loaded = Preset::load(&path).unwrap();
        assert_eq!(loaded.to_config(), original);
    }

    #[test]
    fn test_wire_format_field_names() {
        let json = serde_json::to_string_pretty(&Preset::from(&sample_config())).unwrap();
        for key in [
            "\"DelayMs\"",
            "\"DropPercent\"",
            "\"DuplicatePercent\"",
            "\"ThrottleKbps\"",
            "\"DelayEnabled\"",
            "\"DropEnabled\"",
            "\"DuplicateEnabled\"",
            "\"ThrottleEnabled\"",
            "\"LagJitterMs\"",
            "\"LagEnabled\"",
        ] {
            assert!(json.contains(key), "missing {key} in {json}");
        }
    }

    #[test]
    fn test_loads_externally_written_preset() {
        let preset: Preset = serde_json::from_str(
            r#"{ "DelayMs": 100, "DropPercent": 25, "DuplicatePercent": 0,
                 "ThrottleKbps": 256, "DelayEnabled": true, "DropEnabled": true,
                 "DuplicateEnabled": false, "ThrottleEnabled": true,
                 "LagJitterMs": 10, "LagEnabled": true }"#,
        )
        .unwrap();

        let config = preset.to_config();
        assert_eq!(config.delay_ms, 100);
        assert_eq!(config.drop_percent, 25);
        assert_eq!(config.throttle_kbps, 256);
        assert_eq!(config.jitter_ms, 10);
        assert!(config.jitter_enabled);
        assert!(!config.duplicate_enabled);
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let preset: Preset = serde_json::from_str(r#"{ "DelayMs": 80 }"#).unwrap();
        assert_eq!(preset.delay_ms, 80);
        assert_eq!(preset.drop_percent, 0);
        assert!(!preset.drop_enabled);
    }

    #[test]
    fn test_malformed_file_surfaces_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            Preset::load(&path),
            Err(PresetError::Malformed(_))
        ));
    }

    #[test]
    fn test_missing_file_surfaces_error() {
        assert!(matches!(
            Preset::load("/nonexistent/preset.json"),
            Err(PresetError::Io(_))
        ));
    }

    #[test]
    fn test_apply_clamps_out_of_range_values() {
        let preset = Preset {
            drop_percent: 250,
            duplicate_percent: -3,
            delay_ms: -100,
            throttle_kbps: -1,
            lag_jitter_ms: -7,
            ..Default::default()
        };
        let config = preset.to_config();
        assert_eq!(config.drop_percent, 100);
        assert_eq!(config.duplicate_percent, 0);
        assert_eq!(config.delay_ms, 0);
        assert_eq!(config.throttle_kbps, 0);
        assert_eq!(config.jitter_ms, 0);
    }

    proptest! {
        #[test]
        fn prop_round_trip_is_exact_for_valid_values(
            drop in 0u8..=100,
            duplicate in 0u8..=100,
            delay in 0u64..1_000_000,
            jitter in 0u64..1_000_000,
            kbps in 0u64..10_000_000,
            flags in proptest::array::uniform5(proptest::bool::ANY),
        ) {
            let original = ImpairmentConfig {
                drop_percent: drop,
                duplicate_percent: duplicate,
                delay_ms: delay,
                jitter_ms: jitter,
                throttle_kbps: kbps,
                drop_enabled: flags[0],
                delay_enabled: flags[1],
                jitter_enabled: flags[2],
                duplicate_enabled: flags[3],
                throttle_enabled: flags[4],
            };
            let text = serde_json::to_string_pretty(&Preset::from(&original)).unwrap();
            let reread: Preset = serde_json::from_str(&text).unwrap();
            prop_assert_eq!(reread.to_config(), original);
        }
    }
}
