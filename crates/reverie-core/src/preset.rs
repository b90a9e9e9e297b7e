//! Factory presets.
//!
//! Presets are plain TOML so they can be read and tweaked without a build
//! step; the factory bank is embedded at compile time and always available.
//!
//! ```toml
//! [[preset]]
//! name = "Hall"
//! description = "Large, smooth concert hall"
//! room_size = 0.85
//! damping = 0.35
//! wet = 0.4
//! dry = 0.5
//! width = 1.0
//! ```

use serde::{Deserialize, Serialize};

use reverie_dsp::ReverbParameters;

use crate::error::ConfigError;

/// One named parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Name shown in the editor.
    pub name: String,

    /// Optional one-line description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Room size.
    pub room_size: f32,
    /// Damping.
    pub damping: f32,
    /// Wet level.
    pub wet: f32,
    /// Dry level.
    pub dry: f32,
    /// Stereo width.
    pub width: f32,
    /// Freeze the tail.
    #[serde(default)]
    pub freeze: bool,
}

impl Preset {
    /// Capture a snapshot under a name.
    pub fn from_snapshot(name: impl Into<String>, params: &ReverbParameters) -> Self {
        Self {
            name: name.into(),
            description: None,
            room_size: params.room_size,
            damping: params.damping,
            wet: params.wet_level,
            dry: params.dry_level,
            width: params.width,
            freeze: params.freeze,
        }
    }

    /// The preset as an engine snapshot, clamped to the legal range.
    pub fn snapshot(&self) -> ReverbParameters {
        ReverbParameters {
            room_size: self.room_size,
            damping: self.damping,
            wet_level: self.wet,
            dry_level: self.dry,
            width: self.width,
            freeze: self.freeze,
        }
        .clamped()
    }
}

#[derive(Debug, Deserialize)]
struct PresetBank {
    #[serde(default)]
    preset: Vec<Preset>,
}

/// Parse a bank of `[[preset]]` tables.
pub fn parse_bank(toml_text: &str) -> Result<Vec<Preset>, ConfigError> {
    let bank: PresetBank = toml::from_str(toml_text)?;
    Ok(bank.preset)
}

/// The built-in presets.
pub fn factory_presets() -> Result<Vec<Preset>, ConfigError> {
    parse_bank(FACTORY_BANK)
}

/// Look a preset up by name (case-insensitive).
pub fn find<'a>(presets: &'a [Preset], name: &str) -> Result<&'a Preset, ConfigError> {
    presets
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| ConfigError::PresetNotFound(name.to_string()))
}

/// Embedded factory bank.
const FACTORY_BANK: &str = r#"
[[preset]]
name = "Init"
description = "Default settings"
room_size = 0.5
damping = 0.5
wet = 0.33
dry = 0.4
width = 1.0

[[preset]]
name = "Small Room"
description = "Tight, bright room for drums and guitars"
room_size = 0.3
damping = 0.2
wet = 0.25
dry = 0.5
width = 0.7

[[preset]]
name = "Hall"
description = "Large, smooth concert hall"
room_size = 0.85
damping = 0.35
wet = 0.4
dry = 0.5
width = 1.0

[[preset]]
name = "Dark Plate"
description = "Dense, heavily damped plate"
room_size = 0.7
damping = 0.8
wet = 0.45
dry = 0.45
width = 0.9

[[preset]]
name = "Frozen Pad"
description = "Infinite sustain; play a chord, then freeze"
room_size = 1.0
damping = 0.0
wet = 0.6
dry = 0.0
width = 1.0
freeze = true
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_bank_parses() {
        let presets = factory_presets().unwrap();
        assert_eq!(presets.len(), 5);
        assert!(presets.iter().all(|p| p.snapshot() == p.snapshot().clamped()));
    }

    #[test]
    fn init_matches_defaults() {
        let presets = factory_presets().unwrap();
        let init = find(&presets, "init").unwrap();
        assert_eq!(init.snapshot(), ReverbParameters::default());
    }

    #[test]
    fn freeze_defaults_to_off() {
        let presets = factory_presets().unwrap();
        assert!(!find(&presets, "Hall").unwrap().freeze);
        assert!(find(&presets, "Frozen Pad").unwrap().freeze);
    }

    #[test]
    fn missing_preset_reports_name() {
        let presets = factory_presets().unwrap();
        let err = find(&presets, "Cathedral").unwrap_err();
        assert!(matches!(err, ConfigError::PresetNotFound(ref n) if n == "Cathedral"));
    }

    #[test]
    fn snapshot_clamps_hand_edited_values() {
        let presets = parse_bank(
            r#"
            [[preset]]
            name = "Broken"
            room_size = 2.0
            damping = -1.0
            wet = 0.5
            dry = 0.5
            width = 0.5
            "#,
        )
        .unwrap();
        let snap = presets[0].snapshot();
        assert_eq!(snap.room_size, 1.0);
        assert_eq!(snap.damping, 0.0);
    }

    #[test]
    fn round_trip_through_toml() {
        let preset = Preset::from_snapshot("Mine", &ReverbParameters::default());
        let text = toml::to_string(&preset).unwrap();
        let back: Preset = toml::from_str(&text).unwrap();
        assert_eq!(back, preset);
    }

    #[test]
    fn malformed_bank_is_an_error() {
        assert!(matches!(
            parse_bank("[[preset]]\nname = 3"),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn empty_bank_is_empty() {
        assert!(parse_bank("").unwrap().is_empty());
    }
}
