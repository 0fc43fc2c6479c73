// SPDX-License-Identifier: LGPL-3.0-or-later

//! Error type shared by all processors.
//!
//! Configuration errors are reported by `init`; per-call errors are
//! reported by `process_block` without mutating processor state, so a
//! caller can recover by supplying corrected input.

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by processor configuration and block processing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// Channel count must be at least one.
    #[error("invalid channel count: {0}")]
    InvalidChannelCount(usize),

    /// Sample rate must be strictly positive and finite.
    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(f32),

    /// Attack and release time constants must be strictly positive.
    #[error("invalid time constant: {0} s")]
    InvalidTimeConstant(f32),

    /// A parameter violated its documented range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    /// A pre-filter cascade must contain at least one section.
    #[error("pre-filter cascade has no sections")]
    EmptyCascade,

    /// The input block's channel count does not match the configuration.
    #[error("channel count mismatch: configured {expected}, got {got}")]
    ChannelMismatch { expected: usize, got: usize },

    /// `process_block` was called before a successful `init`.
    #[error("processor is not initialized")]
    NotInitialized,
}
