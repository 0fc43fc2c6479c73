// SPDX-License-Identifier: LGPL-3.0-or-later

//! Block-streaming envelope detector.
//!
//! Estimates the per-channel magnitude (RMS or peak) of a continuous
//! sample stream. Each channel is optionally pre-filtered through an
//! owned biquad cascade, rectified (squared for RMS, absolute value for
//! peak), and smoothed with an asymmetric attack/release one-pole. The
//! smoothed estimate is emitted at a reduced rate: one output column per
//! `decimation_factor` input samples, with the phase carried across calls
//! so emission boundaries do not depend on how the stream is chunked.
//!
//! A block shorter than the remaining decimation period legitimately
//! emits zero columns; the estimate at the most recent emitted column
//! stays available through [`EnvelopeDetector::most_recent_envelope`].

use crate::block::Block;
use crate::envelope::follower::AttackReleaseFollower;
use crate::error::{Error, Result};
use crate::filters::biquad::{BiquadCascade, CascadeCoefficients};

/// Magnitude statistic tracked by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnvelopeKind {
    /// Root mean square: smooth the squared signal, emit its square root.
    #[default]
    Rms,
    /// Peak: smooth the rectified signal.
    Peak,
}

/// Streaming per-channel envelope detector with decimated output.
///
/// # Examples
/// ```
/// use drc_units::envelope::EnvelopeDetector;
/// use drc_units::Block;
///
/// let mut detector = EnvelopeDetector::new();
/// detector.init(1, 48000.0, 0.005, 0.050, None).unwrap();
///
/// let input = Block::from_fn(1, 4800, |_, i| (0.02 * i as f32).sin());
/// let mut envelope = Block::new(0, 0);
/// detector.process_block(&input, &mut envelope).unwrap();
/// assert!(envelope.frames() > 0);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeDetector {
    kind: EnvelopeKind,
    channels: usize,
    sample_rate: f32,
    attack_s: f32,
    release_s: f32,
    followers: Vec<AttackReleaseFollower>,
    prefilters: Vec<BiquadCascade>,
    decimation_factor: usize,
    decimation_phase: usize,
    most_recent: Vec<f32>,
    scratch: Vec<f32>,
    initialized: bool,
}

impl Default for EnvelopeDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvelopeDetector {
    /// Create an unconfigured detector. Call [`init`](Self::init) before
    /// processing.
    pub fn new() -> Self {
        Self {
            kind: EnvelopeKind::Rms,
            channels: 0,
            sample_rate: 0.0,
            attack_s: 0.0,
            release_s: 0.0,
            followers: Vec::new(),
            prefilters: Vec::new(),
            decimation_factor: 1,
            decimation_phase: 0,
            most_recent: Vec::new(),
            scratch: Vec::new(),
            initialized: false,
        }
    }

    /// Select the magnitude statistic. Takes effect at the next
    /// [`init`](Self::init).
    pub fn set_kind(&mut self, kind: EnvelopeKind) -> &mut Self {
        self.kind = kind;
        self
    }

    /// Configure the detector and reset all state.
    ///
    /// `attack_s` smooths rising magnitudes, `release_s` falling ones,
    /// both in seconds. When `prefilter` is given, each channel owns one
    /// stateful copy of the cascade. The output decimation period is a
    /// quarter of the faster time constant in samples (at least one).
    ///
    /// # Errors
    /// Rejects a zero channel count, a non-positive or non-finite sample
    /// rate, non-positive time constants, and an empty cascade.
    pub fn init(
        &mut self,
        channels: usize,
        sample_rate_hz: f32,
        attack_s: f32,
        release_s: f32,
        prefilter: Option<&CascadeCoefficients>,
    ) -> Result<()> {
        if channels == 0 {
            return Err(Error::InvalidChannelCount(channels));
        }
        if !(sample_rate_hz > 0.0) || !sample_rate_hz.is_finite() {
            return Err(Error::InvalidSampleRate(sample_rate_hz));
        }
        if !(attack_s > 0.0) {
            return Err(Error::InvalidTimeConstant(attack_s));
        }
        if !(release_s > 0.0) {
            return Err(Error::InvalidTimeConstant(release_s));
        }
        if let Some(coeffs) = prefilter {
            if coeffs.is_empty() {
                return Err(Error::EmptyCascade);
            }
        }

        self.channels = channels;
        self.sample_rate = sample_rate_hz;
        self.attack_s = attack_s;
        self.release_s = release_s;
        self.followers = vec![
            AttackReleaseFollower::from_times(sample_rate_hz, attack_s, release_s);
            channels
        ];
        self.prefilters = match prefilter {
            Some(coeffs) => vec![BiquadCascade::new(coeffs); channels],
            None => Vec::new(),
        };

        let faster = attack_s.min(release_s);
        self.decimation_factor = ((sample_rate_hz * faster / 4.0) as usize).max(1);
        self.decimation_phase = 0;
        self.most_recent = vec![0.0; channels];
        self.scratch = Vec::new();
        self.initialized = true;
        Ok(())
    }

    /// Return all recursive state (smoothers, pre-filters, decimation
    /// phase, cached envelope) to initial values, keeping the
    /// configuration.
    pub fn reset(&mut self) {
        for f in &mut self.followers {
            f.reset();
        }
        for p in &mut self.prefilters {
            p.reset();
        }
        self.decimation_phase = 0;
        self.most_recent.iter_mut().for_each(|v| *v = 0.0);
    }

    /// Number of input samples per emitted output column.
    pub fn decimation_factor(&self) -> usize {
        self.decimation_factor
    }

    /// The per-channel envelope at the most recently emitted column.
    ///
    /// Valid after the first successful [`process_block`]
    /// (zero until the first emission); a call that emits no columns
    /// leaves it bit-identical.
    ///
    /// [`process_block`]: Self::process_block
    pub fn most_recent_envelope(&self) -> &[f32] {
        &self.most_recent
    }

    /// Process one block of input, resizing `output` to
    /// `channels x emitted` where `emitted` is the number of decimated
    /// columns this call produced (possibly zero).
    ///
    /// # Errors
    /// [`Error::NotInitialized`] before `init`;
    /// [`Error::ChannelMismatch`] when the input's channel count differs
    /// from the configuration. Neither mutates detector state.
    pub fn process_block(&mut self, input: &Block, output: &mut Block) -> Result<()> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        if input.channels() != self.channels {
            return Err(Error::ChannelMismatch {
                expected: self.channels,
                got: input.channels(),
            });
        }

        let frames = input.frames();
        let factor = self.decimation_factor;
        let emitted = (self.decimation_phase + frames) / factor;
        output.resize(self.channels, emitted);

        self.scratch.resize(frames, 0.0);
        for c in 0..self.channels {
            if let Some(prefilter) = self.prefilters.get_mut(c) {
                prefilter.process(&mut self.scratch, input.channel(c));
            } else {
                self.scratch.copy_from_slice(input.channel(c));
            }

            let follower = &mut self.followers[c];
            let mut phase = self.decimation_phase;
            let mut column = 0;
            for &x in &self.scratch {
                let magnitude = match self.kind {
                    EnvelopeKind::Rms => x * x,
                    EnvelopeKind::Peak => x.abs(),
                };
                let smoothed = follower.step(magnitude);
                phase += 1;
                if phase == factor {
                    phase = 0;
                    let value = match self.kind {
                        EnvelopeKind::Rms => smoothed.max(0.0).sqrt(),
                        EnvelopeKind::Peak => smoothed,
                    };
                    output.set_sample(c, column, value);
                    self.most_recent[c] = value;
                    column += 1;
                }
            }
            debug_assert_eq!(column, emitted);
        }
        self.decimation_phase = (self.decimation_phase + frames) % factor;
        Ok(())
    }
}
