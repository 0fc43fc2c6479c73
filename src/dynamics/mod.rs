// SPDX-License-Identifier: LGPL-3.0-or-later

//! Dynamic range processing.
//!
//! - **functions**: stateless dB-domain transfer curves for compression,
//!   limiting, expansion, and gating
//! - **control**: the streaming [`DynamicRangeControl`] processor built
//!   on those curves

pub mod control;
pub mod functions;

pub use control::{
    ChannelLink, DynamicRangeControl, DynamicRangeControlParams, DynamicsType,
};
pub use functions::{
    output_level_compressor, output_level_compressor_block, output_level_expander,
    output_level_expander_block, output_level_limiter, output_level_limiter_block,
    output_level_noise_gate, output_level_noise_gate_block,
};
