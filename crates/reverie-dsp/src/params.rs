//! The reverb parameter snapshot.

/// Complete description of what the reverb should sound like.
///
/// Five continuous controls in `[0.0, 1.0]` plus the freeze flag. This is the
/// unit handed to [`ReverbEngine::set_parameters`](crate::ReverbEngine::set_parameters)
/// and the unit the plugins persist; it is always copied whole, never
/// updated field by field across threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbParameters {
    /// Room size, 0.0 = small, 1.0 = large (longer decay).
    pub room_size: f32,
    /// High-frequency damping, 0.0 = bright, 1.0 = dark.
    pub damping: f32,
    /// Wet (reverberated) level.
    pub wet_level: f32,
    /// Dry (direct) level.
    pub dry_level: f32,
    /// Stereo width of the wet signal, 0.0 = mono, 1.0 = full.
    pub width: f32,
    /// Infinite sustain: input is muted and the tail never decays.
    pub freeze: bool,
}

impl ReverbParameters {
    /// Return a copy with every continuous field clamped to `[0.0, 1.0]`.
    ///
    /// NaN is mapped to 0.0.
    pub fn clamped(self) -> Self {
        let clamp = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self {
            room_size: clamp(self.room_size),
            damping: clamp(self.damping),
            wet_level: clamp(self.wet_level),
            dry_level: clamp(self.dry_level),
            width: clamp(self.width),
            freeze: self.freeze,
        }
    }
}

impl Default for ReverbParameters {
    fn default() -> Self {
        Self {
            room_size: 0.5,
            damping: 0.5,
            wet_level: 0.33,
            dry_level: 0.4,
            width: 1.0,
            freeze: false,
        }
    }
}
