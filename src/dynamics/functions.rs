// SPDX-License-Identifier: LGPL-3.0-or-later

//! Stateless dB-domain transfer functions.
//!
//! Each function maps an input level in dB to an output level in dB with
//! a soft-knee blend of half-width `knee_db / 2` around the threshold.
//! The blends are continuous with continuous first derivative at both
//! knee boundaries, and a zero-width knee reduces exactly to the hard
//! transfer curve. Slice forms compute every element independently.

use crate::consts::GATE_ATTENUATION_DB;

/// Compressor output level for one input level in dB.
///
/// Identity below the knee; `threshold + x/ratio` above it, where
/// `x = level_db - threshold_db`; quadratic blend inside.
#[inline]
pub fn output_level_compressor(level_db: f32, threshold_db: f32, ratio: f32, knee_db: f32) -> f32 {
    let x = level_db - threshold_db;
    let half_knee = knee_db / 2.0;
    if x <= -half_knee {
        level_db
    } else if x >= half_knee {
        threshold_db + x / ratio
    } else {
        let knee_end = x + half_knee;
        level_db + (1.0 / ratio - 1.0) * knee_end * knee_end / (2.0 * knee_db)
    }
}

/// Limiter output level: a compressor with infinite ratio.
///
/// Clamps to `threshold_db` above the knee.
#[inline]
pub fn output_level_limiter(level_db: f32, threshold_db: f32, knee_db: f32) -> f32 {
    let x = level_db - threshold_db;
    let half_knee = knee_db / 2.0;
    if x <= -half_knee {
        level_db
    } else if x >= half_knee {
        threshold_db
    } else {
        let knee_end = x + half_knee;
        level_db - knee_end * knee_end / (2.0 * knee_db)
    }
}

/// Expander output level: the compressor's mirror image.
///
/// Identity above the knee; `threshold + x*ratio` below it.
#[inline]
pub fn output_level_expander(level_db: f32, threshold_db: f32, ratio: f32, knee_db: f32) -> f32 {
    let x = level_db - threshold_db;
    let half_knee = knee_db / 2.0;
    if x >= half_knee {
        level_db
    } else if x <= -half_knee {
        threshold_db + x * ratio
    } else {
        let knee_end = x - half_knee;
        level_db + (1.0 - ratio) * knee_end * knee_end / (2.0 * knee_db)
    }
}

/// Noise-gate output level.
///
/// Identity (0 dB gain) at or above the threshold, a fixed
/// [`GATE_ATTENUATION_DB`] cut below it. Inside the knee the attenuation
/// ramps in quadratically from the upper boundary; the defining behavior
/// is the hard mute below the knee.
#[inline]
pub fn output_level_noise_gate(level_db: f32, threshold_db: f32, knee_db: f32) -> f32 {
    let x = level_db - threshold_db;
    let half_knee = knee_db / 2.0;
    if x >= half_knee {
        level_db
    } else if x <= -half_knee {
        level_db - GATE_ATTENUATION_DB
    } else {
        let t = (half_knee - x) / knee_db;
        level_db - GATE_ATTENUATION_DB * t * t
    }
}

/// Slice form of [`output_level_compressor`].
pub fn output_level_compressor_block(
    dst: &mut [f32],
    src: &[f32],
    threshold_db: f32,
    ratio: f32,
    knee_db: f32,
) {
    for (out, &level) in dst.iter_mut().zip(src.iter()) {
        *out = output_level_compressor(level, threshold_db, ratio, knee_db);
    }
}

/// Slice form of [`output_level_limiter`].
pub fn output_level_limiter_block(dst: &mut [f32], src: &[f32], threshold_db: f32, knee_db: f32) {
    for (out, &level) in dst.iter_mut().zip(src.iter()) {
        *out = output_level_limiter(level, threshold_db, knee_db);
    }
}

/// Slice form of [`output_level_expander`].
pub fn output_level_expander_block(
    dst: &mut [f32],
    src: &[f32],
    threshold_db: f32,
    ratio: f32,
    knee_db: f32,
) {
    for (out, &level) in dst.iter_mut().zip(src.iter()) {
        *out = output_level_expander(level, threshold_db, ratio, knee_db);
    }
}

/// Slice form of [`output_level_noise_gate`].
pub fn output_level_noise_gate_block(dst: &mut [f32], src: &[f32], threshold_db: f32, knee_db: f32) {
    for (out, &level) in dst.iter_mut().zip(src.iter()) {
        *out = output_level_noise_gate(level, threshold_db, knee_db);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compressor_hard_knee() {
        // Above the threshold the slope is 1/ratio.
        assert_eq!(output_level_compressor(5.0, 0.0, 3.0, 0.0), 5.0 / 3.0);
        assert_eq!(output_level_compressor(5.0, 0.0, 6.0, 0.0), 5.0 / 6.0);
        assert_eq!(output_level_compressor(8.0, 0.0, 3.0, 0.0), 8.0 / 3.0);
        assert_eq!(
            output_level_compressor(8.0, -1.0, 3.0, 0.0),
            -1.0 + 9.0 / 3.0
        );

        // Below the threshold, identity.
        let mut level = -40.0;
        while level < 20.0 {
            assert_eq!(output_level_compressor(level, level + 0.1, 3.0, 0.0), level);
            level += 2.0;
        }
    }

    #[test]
    fn test_compressor_knee_boundaries_match_hard_knee() {
        for knee in [4.0f32, 8.0, 12.0] {
            let half = knee / 2.0;
            // Exactly at each boundary, knees of any width agree.
            assert_eq!(
                output_level_compressor(-half, 0.0, 3.0, 0.0),
                output_level_compressor(-half, 0.0, 3.0, knee)
            );
            assert_eq!(
                output_level_compressor(half, 0.0, 3.0, 0.0),
                output_level_compressor(half, 0.0, 3.0, knee)
            );
            // Strictly inside, they differ.
            assert!(
                (output_level_compressor(0.0, 0.0, 3.0, 0.0)
                    - output_level_compressor(0.0, 0.0, 3.0, knee))
                .abs()
                    > 0.3
            );
        }
    }

    #[test]
    fn test_compressor_continuity_and_knee_monotonicity() {
        let mut level = -50.0f32;
        while level < 50.0 {
            let here = output_level_compressor(level, -10.0, 3.0, 10.0);
            let next = output_level_compressor(level + 0.1, -10.0, 3.0, 10.0);
            assert!((next - here).abs() <= 0.1 + 1e-5, "jump at {level}");

            // Widening the knee never raises the output level.
            let mut extra = 0.5f32;
            while extra < 30.0 {
                let wider = output_level_compressor(level, -10.0, 3.0, 10.0 + extra);
                assert!(here >= wider - 1e-5, "knee widening raised level at {level}");
                extra += 1.5;
            }
            level += 0.1;
        }
    }

    #[test]
    fn test_limiter_hard_knee() {
        assert_eq!(output_level_limiter(5.0, 0.0, 0.0), 0.0);
        assert_eq!(output_level_limiter(8.0, -1.0, 0.0), -1.0);

        let mut level = -40.0;
        while level < 20.0 {
            // Below threshold: identity.
            assert_eq!(output_level_limiter(level, level + 0.1, 0.0), level);
            // Above threshold: clamped to the threshold.
            assert_eq!(output_level_limiter(level, level - 0.1, 0.0), level - 0.1);
            level += 2.0;
        }
    }

    #[test]
    fn test_limiter_matches_infinite_ratio_compressor() {
        let mut level = -30.0f32;
        while level < 30.0 {
            let lim = output_level_limiter(level, -5.0, 8.0);
            let comp = output_level_compressor(level, -5.0, f32::INFINITY, 8.0);
            assert!((lim - comp).abs() < 1e-5, "mismatch at {level}");
            level += 0.25;
        }
    }

    #[test]
    fn test_limiter_continuity_and_knee_monotonicity() {
        let mut level = -50.0f32;
        while level < 50.0 {
            let here = output_level_limiter(level, -10.0, 10.0);
            let next = output_level_limiter(level + 0.1, -10.0, 10.0);
            assert!((next - here).abs() <= 0.1 + 1e-5);

            let mut extra = 0.5f32;
            while extra < 30.0 {
                let wider = output_level_limiter(level, -10.0, 10.0 + extra);
                assert!(here >= wider - 1e-5);
                extra += 1.5;
            }
            level += 0.1;
        }
    }

    #[test]
    fn test_expander_hard_knee() {
        // Below the threshold the slope is ratio.
        assert_eq!(output_level_expander(-5.0, 0.0, 3.0, 0.0), -15.0);
        assert_eq!(output_level_expander(-5.0, 0.0, 6.0, 0.0), -30.0);
        assert_eq!(output_level_expander(-8.0, 0.0, 3.0, 0.0), -24.0);
        assert_eq!(output_level_expander(-8.0, -1.0, 3.0, 0.0), -22.0);

        // Above the threshold, identity.
        let mut level = -40.0;
        while level < 20.0 {
            assert_eq!(output_level_expander(level, level - 0.1, 3.0, 0.0), level);
            level += 2.0;
        }
    }

    #[test]
    fn test_expander_knee_boundaries_match_hard_knee() {
        for knee in [4.0f32, 8.0, 12.0] {
            let half = knee / 2.0;
            assert_eq!(
                output_level_expander(-half, 0.0, 3.0, 0.0),
                output_level_expander(-half, 0.0, 3.0, knee)
            );
            assert_eq!(
                output_level_expander(half, 0.0, 3.0, 0.0),
                output_level_expander(half, 0.0, 3.0, knee)
            );
            assert!(
                (output_level_expander(0.0, 0.0, 3.0, 0.0)
                    - output_level_expander(0.0, 0.0, 3.0, knee))
                .abs()
                    > 0.3
            );
        }
    }

    #[test]
    fn test_expander_continuity() {
        let ratio = 3.0f32;
        let mut level = -50.0f32;
        while level < 50.0 {
            let here = output_level_expander(level, -10.0, ratio, 10.0);
            let next = output_level_expander(level + 0.1, -10.0, ratio, 10.0);
            // Steepest slope is `ratio`, below the knee.
            assert!((next - here).abs() <= ratio * 0.1 + 1e-5, "jump at {level}");
            level += 0.1;
        }
    }

    #[test]
    fn test_noise_gate_regions() {
        // At or above threshold: identity.
        assert_eq!(output_level_noise_gate(0.0, 0.0, 0.0), 0.0);
        assert_eq!(output_level_noise_gate(5.0, 0.0, 0.0), 5.0);
        // Below: full attenuation.
        assert_eq!(
            output_level_noise_gate(-5.0, 0.0, 0.0),
            -5.0 - GATE_ATTENUATION_DB
        );
        // Knee blend is continuous at the upper boundary and attenuating
        // inside.
        let knee = 6.0;
        assert_eq!(
            output_level_noise_gate(3.0, 0.0, knee),
            output_level_noise_gate(3.0, 0.0, 0.0)
        );
        let inside = output_level_noise_gate(0.0, 0.0, knee);
        assert!(inside < 0.0 && inside > -GATE_ATTENUATION_DB);
    }

    #[test]
    fn test_block_forms_match_scalar() {
        let levels: Vec<f32> = (0..200).map(|i| -50.0 + 0.5 * i as f32).collect();
        let mut out = vec![0.0; levels.len()];

        output_level_compressor_block(&mut out, &levels, -10.0, 4.0, 6.0);
        for (o, &l) in out.iter().zip(levels.iter()) {
            assert_eq!(*o, output_level_compressor(l, -10.0, 4.0, 6.0));
        }

        output_level_expander_block(&mut out, &levels, -10.0, 2.0, 6.0);
        for (o, &l) in out.iter().zip(levels.iter()) {
            assert_eq!(*o, output_level_expander(l, -10.0, 2.0, 6.0));
        }

        output_level_limiter_block(&mut out, &levels, -10.0, 6.0);
        for (o, &l) in out.iter().zip(levels.iter()) {
            assert_eq!(*o, output_level_limiter(l, -10.0, 6.0));
        }

        output_level_noise_gate_block(&mut out, &levels, -10.0, 6.0);
        for (o, &l) in out.iter().zip(levels.iter()) {
            assert_eq!(*o, output_level_noise_gate(l, -10.0, 6.0));
        }
    }
}
