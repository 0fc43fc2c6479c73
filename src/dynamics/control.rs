// SPDX-License-Identifier: LGPL-3.0-or-later

//! Dynamic range control.
//!
//! A [`DynamicRangeControl`] combines internal envelope tracking, a
//! soft-knee transfer function, gain smoothing, and static input/output
//! gain into one block-streaming processor. All smoothing state lives in
//! per-sample recursive filters, so output does not depend on how a
//! continuous stream is chunked into blocks; the configured block size
//! only pre-sizes scratch buffers.
//!
//! Per sample: the input-gained signal feeds a per-channel RMS or peak
//! follower; the level in dB maps through the selected transfer curve to
//! a target gain; the gain is smoothed in the dB domain (attack toward
//! deeper reduction, release toward unity), converted to linear, and
//! applied together with the static output gain. The whole block's gain
//! is derived before any output sample is written, which makes in-place
//! operation exact.

use crate::block::Block;
use crate::consts::{GAIN_AMP_0_DB, LEVEL_FLOOR_AMP};
use crate::dynamics::functions::{
    output_level_compressor, output_level_expander, output_level_limiter,
    output_level_noise_gate,
};
use crate::envelope::detector::EnvelopeKind;
use crate::envelope::follower::{smoothing_coefficient, AttackReleaseFollower};
use crate::error::{Error, Result};
use crate::units::{db_to_gain, gain_to_db};

/// Transfer curve selected at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DynamicsType {
    /// Reduce level above the threshold by `1/ratio`.
    #[default]
    Compressor,
    /// Clamp level to the threshold (infinite-ratio compressor).
    Limiter,
    /// Reduce level below the threshold by `ratio`.
    Expander,
    /// Mute below the threshold.
    NoiseGate,
}

/// Cross-channel coupling of the control signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelLink {
    /// Each channel derives and applies its own gain.
    #[default]
    Independent,
    /// One shared gain from the loudest channel's level.
    Max,
    /// One shared gain from the mean channel level.
    Average,
}

/// Configuration for [`DynamicRangeControl`].
///
/// `ratio` applies to the compressor and expander only; the limiter
/// behaves as ratio → ∞ and the noise gate ignores it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicRangeControlParams {
    pub dynamics_type: DynamicsType,
    pub envelope_kind: EnvelopeKind,
    pub channel_link: ChannelLink,
    /// Transfer-curve threshold in dB.
    pub threshold_db: f32,
    /// Compression/expansion ratio, dimensionless, > 0.
    pub ratio: f32,
    /// Soft-knee width in dB, >= 0.
    pub knee_width_db: f32,
    /// Envelope and gain smoothing attack time in seconds, > 0.
    pub attack_s: f32,
    /// Envelope and gain smoothing release time in seconds, > 0.
    pub release_s: f32,
    /// Static gain applied before envelope tracking, in dB.
    pub input_gain_db: f32,
    /// Static gain applied after dynamics, in dB.
    pub output_gain_db: f32,
}

impl Default for DynamicRangeControlParams {
    fn default() -> Self {
        Self {
            dynamics_type: DynamicsType::Compressor,
            envelope_kind: EnvelopeKind::Rms,
            channel_link: ChannelLink::Independent,
            threshold_db: -10.0,
            ratio: 2.0,
            knee_width_db: 1.0,
            attack_s: 0.005,
            release_s: 0.050,
            input_gain_db: 0.0,
            output_gain_db: 0.0,
        }
    }
}

impl DynamicRangeControlParams {
    /// Gentle general-purpose compressor settings.
    pub fn reasonable_compressor() -> Self {
        Self {
            dynamics_type: DynamicsType::Compressor,
            envelope_kind: EnvelopeKind::Rms,
            channel_link: ChannelLink::Independent,
            threshold_db: -18.0,
            ratio: 3.0,
            knee_width_db: 6.0,
            attack_s: 0.003,
            release_s: 0.080,
            input_gain_db: 0.0,
            output_gain_db: 0.0,
        }
    }

    fn validate(&self) -> Result<()> {
        match self.dynamics_type {
            DynamicsType::Compressor | DynamicsType::Expander => {
                if !(self.ratio > 0.0) {
                    return Err(Error::InvalidParameter(
                        "ratio must be positive for compressor/expander",
                    ));
                }
            }
            DynamicsType::Limiter | DynamicsType::NoiseGate => {}
        }
        if !(self.knee_width_db >= 0.0) {
            return Err(Error::InvalidParameter("knee width must be non-negative"));
        }
        if !(self.attack_s > 0.0) {
            return Err(Error::InvalidTimeConstant(self.attack_s));
        }
        if !(self.release_s > 0.0) {
            return Err(Error::InvalidTimeConstant(self.release_s));
        }
        if !self.threshold_db.is_finite()
            || !self.input_gain_db.is_finite()
            || !self.output_gain_db.is_finite()
        {
            return Err(Error::InvalidParameter(
                "threshold and static gains must be finite",
            ));
        }
        Ok(())
    }
}

/// Streaming multi-channel dynamic range processor.
///
/// # Examples
/// ```
/// use drc_units::dynamics::{DynamicRangeControl, DynamicRangeControlParams};
/// use drc_units::Block;
///
/// let params = DynamicRangeControlParams::reasonable_compressor();
/// let mut drc = DynamicRangeControl::new(params);
/// drc.init(2, 256, 48000.0).unwrap();
///
/// let input = Block::from_fn(2, 256, |_, i| 0.5 * (0.05 * i as f32).sin());
/// let mut output = Block::new(0, 0);
/// drc.process_block(&input, &mut output).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct DynamicRangeControl {
    params: DynamicRangeControlParams,
    channels: usize,
    sample_rate: f32,
    input_gain: f32,
    output_gain: f32,
    envelope_followers: Vec<AttackReleaseFollower>,
    // Per channel; only index 0 is used in a linked configuration.
    gain_smoothers: Vec<AttackReleaseFollower>,
    gain_scratch: Vec<f32>,
    initialized: bool,
}

impl DynamicRangeControl {
    /// Create a controller with the given parameters. Call
    /// [`init`](Self::init) before processing.
    pub fn new(params: DynamicRangeControlParams) -> Self {
        Self {
            params,
            channels: 0,
            sample_rate: 0.0,
            input_gain: GAIN_AMP_0_DB,
            output_gain: GAIN_AMP_0_DB,
            envelope_followers: Vec::new(),
            gain_smoothers: Vec::new(),
            gain_scratch: Vec::new(),
            initialized: false,
        }
    }

    /// Configure shapes and reset all recursive state.
    ///
    /// `block_size` pre-sizes the internal gain scratch buffer; it never
    /// affects output. A larger block at process time grows the scratch.
    ///
    /// # Errors
    /// Rejects a zero channel count, a non-positive or non-finite sample
    /// rate, and parameter values outside their documented ranges.
    pub fn init(&mut self, channels: usize, block_size: usize, sample_rate_hz: f32) -> Result<()> {
        if channels == 0 {
            return Err(Error::InvalidChannelCount(channels));
        }
        if !(sample_rate_hz > 0.0) || !sample_rate_hz.is_finite() {
            return Err(Error::InvalidSampleRate(sample_rate_hz));
        }
        self.params.validate()?;

        self.channels = channels;
        self.sample_rate = sample_rate_hz;
        self.envelope_followers = vec![
            AttackReleaseFollower::from_times(
                sample_rate_hz,
                self.params.attack_s,
                self.params.release_s,
            );
            channels
        ];
        self.gain_smoothers = self.envelope_followers.clone();
        self.gain_scratch = vec![0.0; block_size];
        self.derive_static_gains();
        self.initialized = true;
        self.reset();
        Ok(())
    }

    /// Replace the parameters mid-stream, preserving all recursive state.
    ///
    /// Smoothing coefficients are re-derived in place so envelope and
    /// gain trajectories continue from their current values.
    pub fn set_params(&mut self, params: DynamicRangeControlParams) -> Result<()> {
        params.validate()?;
        self.params = params;
        if self.initialized {
            let tau_attack = smoothing_coefficient(self.sample_rate, self.params.attack_s);
            let tau_release = smoothing_coefficient(self.sample_rate, self.params.release_s);
            for f in self
                .envelope_followers
                .iter_mut()
                .chain(self.gain_smoothers.iter_mut())
            {
                f.set_coefficients(tau_attack, tau_release);
            }
            self.derive_static_gains();
        }
        Ok(())
    }

    /// Current parameters.
    pub fn params(&self) -> &DynamicRangeControlParams {
        &self.params
    }

    /// Resize the gain scratch buffer without touching recursive state,
    /// for callers that change their block size mid-stream.
    pub fn set_block_size(&mut self, frames: usize) {
        self.gain_scratch.resize(frames, 0.0);
    }

    /// Return envelope trackers and gain smoothers to their initial
    /// values, keeping the configuration. Processing identical input
    /// after a reset reproduces a from-scratch run.
    pub fn reset(&mut self) {
        for f in &mut self.envelope_followers {
            f.reset();
        }
        for f in &mut self.gain_smoothers {
            f.reset();
        }
    }

    fn derive_static_gains(&mut self) {
        self.input_gain = db_to_gain(self.params.input_gain_db);
        self.output_gain = db_to_gain(self.params.output_gain_db);
    }

    /// Process one block out of place; `output` is resized to the input
    /// shape.
    ///
    /// # Errors
    /// [`Error::NotInitialized`] before `init`;
    /// [`Error::ChannelMismatch`] when the input's channel count differs
    /// from the configuration. Neither mutates controller state.
    pub fn process_block(&mut self, input: &Block, output: &mut Block) -> Result<()> {
        self.check_input(input)?;
        output.copy_from(input);
        self.process_inner(output);
        Ok(())
    }

    /// Process one block in place. Produces results identical to
    /// [`process_block`](Self::process_block).
    ///
    /// # Errors
    /// Same conditions as [`process_block`](Self::process_block).
    pub fn process_block_in_place(&mut self, io: &mut Block) -> Result<()> {
        self.check_input(io)?;
        self.process_inner(io);
        Ok(())
    }

    fn check_input(&self, input: &Block) -> Result<()> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        if input.channels() != self.channels {
            return Err(Error::ChannelMismatch {
                expected: self.channels,
                got: input.channels(),
            });
        }
        Ok(())
    }

    fn process_inner(&mut self, io: &mut Block) {
        let frames = io.frames();
        if self.gain_scratch.len() < frames {
            self.gain_scratch.resize(frames, 0.0);
        }
        match self.params.channel_link {
            ChannelLink::Independent => self.process_independent(io),
            ChannelLink::Max | ChannelLink::Average => self.process_linked(io),
        }
    }

    fn process_independent(&mut self, io: &mut Block) {
        let frames = io.frames();
        for c in 0..self.channels {
            // Derive the whole channel's smoothed gain before writing any
            // output sample.
            for i in 0..frames {
                let x = io.sample(c, i) * self.input_gain;
                let level = track_level(
                    &mut self.envelope_followers[c],
                    self.params.envelope_kind,
                    x,
                );
                let target_db = self.target_gain_db(gain_to_db(level));
                self.gain_scratch[i] = self.gain_smoothers[c].step_inverted(target_db);
            }
            let gained = self.input_gain * self.output_gain;
            let row = io.channel_mut(c);
            for (s, &g_db) in row.iter_mut().zip(self.gain_scratch.iter()) {
                *s *= gained * db_to_gain(g_db);
            }
        }
    }

    fn process_linked(&mut self, io: &mut Block) {
        let frames = io.frames();
        for i in 0..frames {
            // The cross-channel reduction completes before the shared
            // gain is smoothed.
            let mut reduced = 0.0f32;
            for c in 0..self.channels {
                let x = io.sample(c, i) * self.input_gain;
                let level = track_level(
                    &mut self.envelope_followers[c],
                    self.params.envelope_kind,
                    x,
                );
                reduced = match self.params.channel_link {
                    ChannelLink::Max => reduced.max(level),
                    _ => reduced + level,
                };
            }
            if self.params.channel_link == ChannelLink::Average {
                reduced /= self.channels as f32;
            }
            let target_db = self.target_gain_db(gain_to_db(reduced.max(LEVEL_FLOOR_AMP)));
            self.gain_scratch[i] = self.gain_smoothers[0].step_inverted(target_db);
        }
        let gained = self.input_gain * self.output_gain;
        for c in 0..self.channels {
            let row = io.channel_mut(c);
            for (s, &g_db) in row.iter_mut().zip(self.gain_scratch.iter()) {
                *s *= gained * db_to_gain(g_db);
            }
        }
    }

    /// Target gain in dB for a level in dB, before smoothing.
    fn target_gain_db(&self, level_db: f32) -> f32 {
        let p = &self.params;
        let output_level_db = match p.dynamics_type {
            DynamicsType::Compressor => {
                output_level_compressor(level_db, p.threshold_db, p.ratio, p.knee_width_db)
            }
            DynamicsType::Limiter => {
                output_level_limiter(level_db, p.threshold_db, p.knee_width_db)
            }
            DynamicsType::Expander => {
                output_level_expander(level_db, p.threshold_db, p.ratio, p.knee_width_db)
            }
            DynamicsType::NoiseGate => {
                output_level_noise_gate(level_db, p.threshold_db, p.knee_width_db)
            }
        };
        output_level_db - level_db
    }
}

/// Advance one channel's envelope follower and return the linear level,
/// floored to keep the subsequent dB conversion finite.
#[inline]
fn track_level(follower: &mut AttackReleaseFollower, kind: EnvelopeKind, x: f32) -> f32 {
    let level = match kind {
        EnvelopeKind::Rms => follower.step(x * x).max(0.0).sqrt(),
        EnvelopeKind::Peak => follower.step(x.abs()),
    };
    level.max(LEVEL_FLOOR_AMP)
}
