// SPDX-License-Identifier: LGPL-3.0-or-later

//! Level and gain constants.

/// Floor for envelope levels before dB conversion (-200 dB amplitude).
///
/// Keeps the dB domain finite on silence; well below any audible level.
pub const LEVEL_FLOOR_DB: f32 = -200.0;

/// Linear amplitude corresponding to [`LEVEL_FLOOR_DB`].
pub const LEVEL_FLOOR_AMP: f32 = 1e-10;

/// Attenuation applied by the noise gate below its threshold, in dB.
///
/// Deep enough that gated output is silence for any practical signal,
/// while keeping gain arithmetic finite.
pub const GATE_ATTENUATION_DB: f32 = 100.0;

/// 0 dB amplitude gain (unity).
pub const GAIN_AMP_0_DB: f32 = 1.0;

/// -6 dB amplitude gain (~0.5)
pub const GAIN_AMP_M_6_DB: f32 = 0.501_187_2;

/// -72 dB amplitude gain (~0.00025)
pub const GAIN_AMP_M_72_DB: f32 = 0.000_251_188_64;
