//! Small numeric helpers shared by the filters.

/// Flush denormal (subnormal) floats to zero.
///
/// Returns 0.0 for values whose magnitude is below 1e-20, well above where the
/// IEEE 754 subnormal range begins. Use this in feedback paths (comb filters,
/// allpass chains) where a decaying tail would otherwise crawl through
/// subnormals and stall the CPU.
///
/// Reference: IEEE 754-2008, Section 3.4 (Subnormal numbers)
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if libm::fabsf(x) < 1e-20 { 0.0 } else { x }
}

/// Scale a delay length tuned at `reference_rate` to `target_rate`.
///
/// Never returns less than one sample.
pub fn scale_delay(samples: usize, target_rate: f64, reference_rate: f64) -> usize {
    (libm::round(samples as f64 * target_rate / reference_rate) as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flush_denormal_zeroes_tiny_values() {
        assert_eq!(flush_denormal(1e-25), 0.0);
        assert_eq!(flush_denormal(-1e-25), 0.0);
        assert_eq!(flush_denormal(0.5), 0.5);
        assert_eq!(flush_denormal(-1e-10), -1e-10);
    }

    #[test]
    fn scale_delay_tracks_rate() {
        assert_eq!(scale_delay(1116, 44100.0, 44100.0), 1116);
        assert_eq!(scale_delay(1116, 88200.0, 44100.0), 2232);
        assert_eq!(scale_delay(1116, 48000.0, 44100.0), 1215);
    }

    #[test]
    fn scale_delay_never_zero() {
        assert_eq!(scale_delay(1, 100.0, 44100.0), 1);
        assert_eq!(scale_delay(0, 48000.0, 44100.0), 1);
    }
}
