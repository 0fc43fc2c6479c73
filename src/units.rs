// SPDX-License-Identifier: LGPL-3.0-or-later

//! Unit conversion functions.
//!
//! Conversions between decibels and linear amplitude/power ratios, and
//! between time and sample counts.

/// Convert decibels to linear gain (amplitude ratio).
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    (db * (std::f32::consts::LN_10 / 20.0)).exp()
}

/// Convert linear gain (amplitude ratio) to decibels.
#[inline]
pub fn gain_to_db(gain: f32) -> f32 {
    20.0 * gain.log10()
}

/// Convert decibels to power ratio.
#[inline]
pub fn db_to_power(db: f32) -> f32 {
    (db * (std::f32::consts::LN_10 / 10.0)).exp()
}

/// Convert power ratio to decibels.
#[inline]
pub fn power_to_db(pwr: f32) -> f32 {
    10.0 * pwr.log10()
}

/// Convert seconds to sample count.
#[inline]
pub fn seconds_to_samples(sr: f32, time: f32) -> f32 {
    time * sr
}

/// Convert sample count to seconds.
#[inline]
pub fn samples_to_seconds(sr: f32, samples: f32) -> f32 {
    samples / sr
}
