// SPDX-License-Identifier: LGPL-3.0-or-later

//! Cascaded biquad filters.
//!
//! - **biquad**: the stateful cascade execution primitive consumed by the
//!   envelope detector as an opaque pre-filter
//! - **butterworth**: Butterworth lowpass/highpass/bandpass coefficient
//!   design producing cascade coefficients

pub mod biquad;
pub mod butterworth;

pub use biquad::{BiquadCascade, BiquadCoefficients, CascadeCoefficients};
