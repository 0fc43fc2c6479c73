// SPDX-License-Identifier: LGPL-3.0-or-later

//! Butterworth cascade coefficient design.
//!
//! Butterworth filters are maximally flat in the passband with a rolloff
//! of 20*N dB/decade for order N. The design decomposes an Nth-order
//! filter into cascaded second-order sections: N/2 biquads for even
//! orders, one first-order section plus (N-1)/2 biquads for odd orders.
//!
//! Analog prototype poles sit on the unit circle at
//! `s = -sin(theta) +/- j*cos(theta)` with `theta = pi*(2k+1)/(2N)`; the
//! cutoff is pre-warped and the sections are mapped to the z-plane with
//! the bilinear transform. A bandpass is formed as a highpass/lowpass
//! cascade of the same order per edge.
//!
//! Returned coefficients use the pre-negated `a1`/`a2` convention of
//! [`crate::filters::biquad`].

use std::f32::consts::PI;

use super::biquad::{BiquadCoefficients, CascadeCoefficients};
use crate::error::{Error, Result};

/// Maximum supported filter order per edge.
pub const MAX_ORDER: usize = 8;

fn check_design(order: usize, sample_rate: f32, cutoff: f32) -> Result<()> {
    if !(1..=MAX_ORDER).contains(&order) {
        return Err(Error::InvalidParameter("filter order must be in 1..=8"));
    }
    if !(sample_rate > 0.0) || !sample_rate.is_finite() {
        return Err(Error::InvalidSampleRate(sample_rate));
    }
    if !(cutoff > 0.0) || cutoff >= sample_rate / 2.0 {
        return Err(Error::InvalidParameter(
            "cutoff must be positive and below Nyquist",
        ));
    }
    Ok(())
}

/// First-order section from the bilinear transform of `wc/(s+wc)` (lowpass)
/// or `s/(s+wc)` (highpass). `wc` is the pre-warped cutoff.
fn first_order_section(wc: f32, highpass: bool) -> BiquadCoefficients {
    let k = 1.0 / (1.0 + wc);
    // a1_std = (wc - 1) / (1 + wc); pre-negated form below.
    let a1 = (1.0 - wc) * k;
    if highpass {
        BiquadCoefficients {
            b0: k,
            b1: -k,
            b2: 0.0,
            a1,
            a2: 0.0,
        }
    } else {
        BiquadCoefficients {
            b0: wc * k,
            b1: wc * k,
            b2: 0.0,
            a1,
            a2: 0.0,
        }
    }
}

/// Second-order section for the conjugate pole pair at angle `theta`.
fn second_order_section(wc: f32, theta: f32, highpass: bool) -> BiquadCoefficients {
    // Prototype: H(s) = 1 / (s^2 + 2*sin(theta)*s + 1), frequency-scaled
    // by wc, then bilinear-transformed.
    let wc2 = wc * wc;
    let two_sin_theta = 2.0 * theta.sin();
    let inv_d = 1.0 / (1.0 + two_sin_theta * wc + wc2);

    let a1_std = 2.0 * (wc2 - 1.0) * inv_d;
    let a2_std = (1.0 - two_sin_theta * wc + wc2) * inv_d;

    if highpass {
        BiquadCoefficients {
            b0: inv_d,
            b1: -2.0 * inv_d,
            b2: inv_d,
            a1: -a1_std,
            a2: -a2_std,
        }
    } else {
        BiquadCoefficients {
            b0: wc2 * inv_d,
            b1: 2.0 * wc2 * inv_d,
            b2: wc2 * inv_d,
            a1: -a1_std,
            a2: -a2_std,
        }
    }
}

fn design(order: usize, sample_rate: f32, cutoff: f32, highpass: bool) -> CascadeCoefficients {
    let wc = (PI * cutoff / sample_rate).tan();
    let mut sections = Vec::with_capacity(order.div_ceil(2));
    if order % 2 == 1 {
        sections.push(first_order_section(wc, highpass));
    }
    for k in 0..order / 2 {
        let theta = PI * (2 * k + 1) as f32 / (2 * order) as f32;
        sections.push(second_order_section(wc, theta, highpass));
    }
    CascadeCoefficients { sections }
}

/// Design an Nth-order Butterworth lowpass cascade.
pub fn lowpass(order: usize, sample_rate: f32, cutoff: f32) -> Result<CascadeCoefficients> {
    check_design(order, sample_rate, cutoff)?;
    Ok(design(order, sample_rate, cutoff, false))
}

/// Design an Nth-order Butterworth highpass cascade.
pub fn highpass(order: usize, sample_rate: f32, cutoff: f32) -> Result<CascadeCoefficients> {
    check_design(order, sample_rate, cutoff)?;
    Ok(design(order, sample_rate, cutoff, true))
}

/// Design a Butterworth bandpass cascade as highpass at `low_cutoff`
/// followed by lowpass at `high_cutoff`, each of the given order.
pub fn bandpass(
    order: usize,
    sample_rate: f32,
    low_cutoff: f32,
    high_cutoff: f32,
) -> Result<CascadeCoefficients> {
    if low_cutoff >= high_cutoff {
        return Err(Error::InvalidParameter(
            "bandpass low cutoff must be below high cutoff",
        ));
    }
    let mut coeffs = highpass(order, sample_rate, low_cutoff)?;
    coeffs.append(&lowpass(order, sample_rate, high_cutoff)?);
    Ok(coeffs)
}
