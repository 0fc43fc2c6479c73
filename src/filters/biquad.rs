// SPDX-License-Identifier: LGPL-3.0-or-later

//! Biquad section and stateful cascade.
//!
//! Coefficients use the pre-negated convention: `a1` and `a2` carry the
//! opposite sign of the standard cookbook denominator, so the processing
//! loop accumulates with additions only:
//!
//! ```text
//! y    = b0*x + d0
//! d0   = b1*x + a1*y + d1
//! d1   = b2*x + a2*y
//! ```
//!
//! A [`BiquadCascade`] owns the delay memory for every section and keeps
//! it across calls, so a continuous stream may be filtered in arbitrarily
//! sized chunks. Coefficients can be replaced mid-stream without clearing
//! the sample history.

/// Coefficients for one second-order section (pre-negated `a1`, `a2`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl Default for BiquadCoefficients {
    /// Identity section: passes the signal unchanged.
    fn default() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
        }
    }
}

/// Coefficients for a cascade of second-order sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CascadeCoefficients {
    pub sections: Vec<BiquadCoefficients>,
}

impl CascadeCoefficients {
    /// Cascade with a single identity section.
    pub fn identity() -> Self {
        Self {
            sections: vec![BiquadCoefficients::default()],
        }
    }

    /// Number of sections in the cascade.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the cascade has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Append the sections of `other`, forming the product filter.
    pub fn append(&mut self, other: &CascadeCoefficients) {
        self.sections.extend_from_slice(&other.sections);
    }
}

/// Stateful cascaded biquad filter for one channel.
///
/// # Examples
/// ```
/// use drc_units::filters::{BiquadCascade, CascadeCoefficients};
///
/// // An identity cascade passes the signal through unchanged.
/// let mut cascade = BiquadCascade::new(&CascadeCoefficients::identity());
/// let mut out = [0.0f32; 3];
/// cascade.process(&mut out, &[0.5, -0.25, 1.0]);
/// assert_eq!(out, [0.5, -0.25, 1.0]);
/// ```
#[derive(Debug, Clone)]
pub struct BiquadCascade {
    coeffs: CascadeCoefficients,
    // Two delay slots per section.
    state: Vec<[f32; 2]>,
}

impl BiquadCascade {
    /// Create a cascade with cleared delay memory.
    pub fn new(coeffs: &CascadeCoefficients) -> Self {
        Self {
            coeffs: coeffs.clone(),
            state: vec![[0.0; 2]; coeffs.len()],
        }
    }

    /// Replace the coefficients without clearing the sample history.
    ///
    /// When the section count changes, state for new sections starts
    /// cleared and state for removed sections is dropped.
    pub fn set_coefficients(&mut self, coeffs: &CascadeCoefficients) {
        self.coeffs = coeffs.clone();
        self.state.resize(coeffs.len(), [0.0; 2]);
    }

    /// Clear all delay memory, keeping the coefficients.
    pub fn reset(&mut self) {
        for d in &mut self.state {
            *d = [0.0; 2];
        }
    }

    /// Filter `src` into `dst`, carrying state across calls.
    ///
    /// Processes `min(dst.len(), src.len())` samples.
    pub fn process(&mut self, dst: &mut [f32], src: &[f32]) {
        let n = dst.len().min(src.len());
        if n == 0 {
            return;
        }
        dst[..n].copy_from_slice(&src[..n]);
        self.process_inplace(&mut dst[..n]);
    }

    /// Filter `buf` in place, carrying state across calls.
    pub fn process_inplace(&mut self, buf: &mut [f32]) {
        for (c, d) in self.coeffs.sections.iter().zip(self.state.iter_mut()) {
            let (b0, b1, b2) = (c.b0, c.b1, c.b2);
            let (a1, a2) = (c.a1, c.a2);
            for s in buf.iter_mut() {
                let x = *s;
                let y = b0 * x + d[0];
                d[0] = b1 * x + a1 * y + d[1];
                d[1] = b2 * x + a2 * y;
                *s = y;
            }
        }
    }

    /// Filter a single sample, carrying state across calls.
    pub fn process_sample(&mut self, sample: f32) -> f32 {
        let mut x = sample;
        for (c, d) in self.coeffs.sections.iter().zip(self.state.iter_mut()) {
            let y = c.b0 * x + d[0];
            d[0] = c.b1 * x + c.a1 * y + d[1];
            d[1] = c.b2 * x + c.a2 * y;
            x = y;
        }
        x
    }
}
