//! Parameter identifiers, port layout and descriptors.
//!
//! The five controls share one numbering in both plugin formats. In the LV2
//! port space the four audio ports take indices 0..4 and the controls follow
//! at 4..9; the CLAP shell reuses 4..9 as its `clap_id`s so automation and
//! state agree across formats.

use std::ops::Range;

use reverie_dsp::ReverbParameters;

/// Number of continuous control parameters.
pub const PARAM_COUNT: usize = 5;

/// Audio port slots, below the control range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum AudioPort {
    /// Left input.
    In1 = 0,
    /// Right input.
    In2 = 1,
    /// Left output.
    Out1 = 2,
    /// Right output.
    Out2 = 3,
}

impl AudioPort {
    /// Port index.
    pub const fn index(self) -> u32 {
        self as u32
    }
}

/// Stable identifier of a control parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum ParamId {
    /// Wet (reverberated) level.
    Wet = 4,
    /// Dry (direct) level.
    Dry = 5,
    /// Room size.
    RoomSize = 6,
    /// High-frequency damping.
    Damping = 7,
    /// Stereo width.
    Width = 8,
}

impl ParamId {
    /// Every control parameter, in id order.
    pub const ALL: [ParamId; PARAM_COUNT] = [
        ParamId::Wet,
        ParamId::Dry,
        ParamId::RoomSize,
        ParamId::Damping,
        ParamId::Width,
    ];

    /// Half-open range of raw ids that are control parameters.
    pub const RANGE: Range<u32> = 4..9;

    /// Decode a raw id. Audio ports and unknown ids yield `None`.
    pub fn from_raw(raw: u32) -> Option<Self> {
        if !Self::RANGE.contains(&raw) {
            return None;
        }
        Self::from_index((raw - Self::RANGE.start) as usize)
    }

    /// Parameter at a dense `0..PARAM_COUNT` index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Raw id (also the LV2 port index and the CLAP param id).
    pub const fn raw(self) -> u32 {
        self as u32
    }

    /// Dense `0..PARAM_COUNT` index.
    pub const fn index(self) -> usize {
        (self as u32 - Self::RANGE.start) as usize
    }

    /// Static metadata for this parameter.
    pub fn descriptor(self) -> &'static ParamDescriptor {
        &DESCRIPTORS[self.index()]
    }

    /// Read this parameter's field from a snapshot.
    pub fn get(self, params: &ReverbParameters) -> f32 {
        match self {
            ParamId::Wet => params.wet_level,
            ParamId::Dry => params.dry_level,
            ParamId::RoomSize => params.room_size,
            ParamId::Damping => params.damping,
            ParamId::Width => params.width,
        }
    }

    /// Write this parameter's field in a snapshot, unvalidated.
    pub fn set(self, params: &mut ReverbParameters, value: f32) {
        let field = match self {
            ParamId::Wet => &mut params.wet_level,
            ParamId::Dry => &mut params.dry_level,
            ParamId::RoomSize => &mut params.room_size,
            ParamId::Damping => &mut params.damping,
            ParamId::Width => &mut params.width,
        };
        *field = value;
    }
}

/// Host-facing metadata for one control parameter.
///
/// Every control is normalized: range `[0.0, 1.0]`, displayed as a
/// percentage.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDescriptor {
    /// Which parameter this describes.
    pub id: ParamId,
    /// Host-visible name (e.g. "Room Size").
    pub name: &'static str,
    /// Label drawn under the editor knob (e.g. "Room size").
    pub label: &'static str,
    /// Machine key used in presets and config files (e.g. "room_size").
    pub key: &'static str,
    /// Host-visible group.
    pub group: &'static str,
    /// Value on a fresh instance.
    pub default: f32,
    /// Whether hosts may automate the parameter.
    pub automatable: bool,
}

impl ParamDescriptor {
    /// Lower bound.
    pub const MIN: f32 = 0.0;
    /// Upper bound.
    pub const MAX: f32 = 1.0;

    /// Clamp a value to the parameter range. NaN maps to the default.
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default
        } else {
            value.clamp(Self::MIN, Self::MAX)
        }
    }

    /// Format a value for display, e.g. `0.33` → `"33.0%"`.
    pub fn format_value(&self, value: f32) -> String {
        format!("{:.1}%", self.clamp(value) * 100.0)
    }

    /// Parse display text back into a value.
    ///
    /// Accepts a percentage (`"33%"`, `"33.0 %"`) or a bare normalized number
    /// (`"0.33"`). The result is clamped; unparseable or non-finite text
    /// yields `None`.
    pub fn parse_value(&self, text: &str) -> Option<f32> {
        let text = text.trim();
        let value = if let Some(percent) = text.strip_suffix('%') {
            percent.trim().parse::<f32>().ok()? / 100.0
        } else {
            text.parse::<f32>().ok()?
        };
        value.is_finite().then(|| self.clamp(value))
    }
}

static DESCRIPTORS: [ParamDescriptor; PARAM_COUNT] = [
    ParamDescriptor {
        id: ParamId::Wet,
        name: "Wet",
        label: "Wet level",
        key: "wet",
        group: "Reverb",
        default: 0.33,
        automatable: true,
    },
    ParamDescriptor {
        id: ParamId::Dry,
        name: "Dry",
        label: "Dry level",
        key: "dry",
        group: "Reverb",
        default: 0.4,
        automatable: true,
    },
    ParamDescriptor {
        id: ParamId::RoomSize,
        name: "Room Size",
        label: "Room size",
        key: "room_size",
        group: "Reverb",
        default: 0.5,
        automatable: true,
    },
    ParamDescriptor {
        id: ParamId::Damping,
        name: "Damping",
        label: "Damping",
        key: "damping",
        group: "Reverb",
        default: 0.5,
        automatable: true,
    },
    ParamDescriptor {
        id: ParamId::Width,
        name: "Width",
        label: "Width",
        key: "width",
        group: "Reverb",
        default: 1.0,
        automatable: true,
    },
];

/// All descriptors, in id order.
pub fn descriptors() -> &'static [ParamDescriptor] {
    &DESCRIPTORS
}
