// SPDX-License-Identifier: LGPL-3.0-or-later

//! Envelope estimation.
//!
//! - **follower**: asymmetric attack/release one-pole smoother, the
//!   recursive core shared by the detector and the dynamic range control
//! - **detector**: block-streaming per-channel RMS/peak envelope detector
//!   with optional pre-filtering and decimated output

pub mod detector;
pub mod follower;

pub use detector::{EnvelopeDetector, EnvelopeKind};
pub use follower::AttackReleaseFollower;
