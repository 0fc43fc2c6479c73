// SPDX-License-Identifier: LGPL-3.0-or-later

//! Asymmetric attack/release one-pole smoother.
//!
//! The recursive update is `y += tau * (x - y)` with `tau` chosen per
//! sample: the attack coefficient when the input is rising above the
//! current estimate, the release coefficient when it is falling. Because
//! the state advances one sample at a time, output is independent of how
//! a stream is chunked into processing calls.

/// Per-sample smoothing coefficient for a time constant in seconds.
///
/// `1 - exp(-1 / (sr * tau))`; a non-positive or vanishing time constant
/// yields 1.0, which makes the smoother track its input exactly.
#[inline]
pub fn smoothing_coefficient(sample_rate: f32, time_s: f32) -> f32 {
    let samples = crate::units::seconds_to_samples(sample_rate, time_s);
    if samples <= 0.0 {
        return 1.0;
    }
    1.0 - (-1.0 / samples).exp()
}

/// One-channel asymmetric one-pole smoother.
#[derive(Debug, Clone, Copy)]
pub struct AttackReleaseFollower {
    tau_attack: f32,
    tau_release: f32,
    state: f32,
}

impl AttackReleaseFollower {
    /// Create a follower with the given coefficients and zero state.
    pub fn new(tau_attack: f32, tau_release: f32) -> Self {
        Self {
            tau_attack,
            tau_release,
            state: 0.0,
        }
    }

    /// Create a follower from time constants in seconds.
    pub fn from_times(sample_rate: f32, attack_s: f32, release_s: f32) -> Self {
        Self::new(
            smoothing_coefficient(sample_rate, attack_s),
            smoothing_coefficient(sample_rate, release_s),
        )
    }

    /// Replace the coefficients, keeping the current state.
    pub fn set_coefficients(&mut self, tau_attack: f32, tau_release: f32) {
        self.tau_attack = tau_attack;
        self.tau_release = tau_release;
    }

    /// Return the state to its initial value.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }

    /// Current smoothed estimate.
    #[inline]
    pub fn value(&self) -> f32 {
        self.state
    }

    /// Advance by one sample and return the new estimate.
    #[inline]
    pub fn step(&mut self, input: f32) -> f32 {
        let d = input - self.state;
        let tau = if d > 0.0 {
            self.tau_attack
        } else {
            self.tau_release
        };
        // A unit coefficient must track exactly; `state + 1.0 * d` is not
        // `input` in f32.
        if tau >= 1.0 {
            self.state = input;
        } else {
            self.state += tau * d;
        }
        self.state
    }

    /// Advance with attack engaged when the input is *below* the state.
    ///
    /// Gain smoothing uses this orientation: attack governs transitions
    /// toward deeper gain reduction (more negative dB), release governs
    /// recovery toward unity.
    #[inline]
    pub fn step_inverted(&mut self, input: f32) -> f32 {
        let d = input - self.state;
        let tau = if d < 0.0 {
            self.tau_attack
        } else {
            self.tau_release
        };
        if tau >= 1.0 {
            self.state = input;
        } else {
            self.state += tau * d;
        }
        self.state
    }
}
