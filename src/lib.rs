// SPDX-License-Identifier: LGPL-3.0-or-later

//! # drc-units
//!
//! Streaming envelope detection and dynamic range control for
//! multi-channel audio.
//!
//! This crate provides stateful, block-streaming processors whose output
//! is independent of how the input stream is chunked into blocks:
//!
//! - **Envelope detection**: per-channel RMS or peak magnitude estimation
//!   with optional pre-filtering, asymmetric attack/release smoothing,
//!   and decimated output suitable for metering
//! - **Dynamic range control**: soft-knee compressor, limiter, expander,
//!   and noise gate with smoothed gain, static input/output gain, and
//!   optional linked-channel operation
//! - **Filters**: cascaded biquad execution primitive and Butterworth
//!   coefficient design, consumed by the detectors as pre-filters
//!
//! All processors are single-threaded and synchronous: `process_block` is
//! a pure function of (state, input block) that never blocks; scratch
//! buffers are pre-sized at `init` and grow only when a call presents a
//! larger block. Recoverable failures (for example
//! a channel-count mismatch) are reported through [`Error`] and leave the
//! processor usable for a subsequent correct call.

pub mod block;
pub mod consts;
pub mod dynamics;
pub mod envelope;
pub mod error;
pub mod filters;
pub mod units;

pub use block::Block;
pub use error::{Error, Result};
