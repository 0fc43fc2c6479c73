// SPDX-License-Identifier: LGPL-3.0-or-later

//! Multi-channel sample buffer.
//!
//! A [`Block`] holds `channels x frames` samples in a single flat
//! allocation, row-major by channel, so each channel is a contiguous
//! slice. Processors resize output blocks as needed; resizing to a shape
//! with the same or smaller capacity does not reallocate.

/// A multi-channel block of samples, row-major by channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    channels: usize,
    frames: usize,
    data: Vec<f32>,
}

impl Block {
    /// Create a zero-filled block with the given shape.
    pub fn new(channels: usize, frames: usize) -> Self {
        Self {
            channels,
            frames,
            data: vec![0.0; channels * frames],
        }
    }

    /// Create a block by evaluating `f(channel, frame)` for every sample.
    pub fn from_fn(channels: usize, frames: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut block = Self::new(channels, frames);
        for c in 0..channels {
            let row = block.channel_mut(c);
            for (i, s) in row.iter_mut().enumerate() {
                *s = f(c, i);
            }
        }
        block
    }

    /// Number of channels.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of frames (samples per channel).
    #[inline]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Borrow one channel as a contiguous slice.
    #[inline]
    pub fn channel(&self, c: usize) -> &[f32] {
        &self.data[c * self.frames..(c + 1) * self.frames]
    }

    /// Mutably borrow one channel as a contiguous slice.
    #[inline]
    pub fn channel_mut(&mut self, c: usize) -> &mut [f32] {
        &mut self.data[c * self.frames..(c + 1) * self.frames]
    }

    /// Read a single sample.
    #[inline]
    pub fn sample(&self, c: usize, i: usize) -> f32 {
        self.data[c * self.frames + i]
    }

    /// Write a single sample.
    #[inline]
    pub fn set_sample(&mut self, c: usize, i: usize, value: f32) {
        self.data[c * self.frames + i] = value;
    }

    /// Reshape to `channels x frames`, zero-filling all samples.
    ///
    /// Keeps the existing allocation when capacity suffices.
    pub fn resize(&mut self, channels: usize, frames: usize) {
        self.channels = channels;
        self.frames = frames;
        self.data.clear();
        self.data.resize(channels * frames, 0.0);
    }

    /// Copy the contents of `other` into `self`, reshaping as needed.
    pub fn copy_from(&mut self, other: &Block) {
        self.channels = other.channels;
        self.frames = other.frames;
        self.data.clear();
        self.data.extend_from_slice(&other.data);
    }
}
