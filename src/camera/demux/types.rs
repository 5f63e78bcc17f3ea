//! Channel plane types

use std::sync::Arc;

/// Named color channel of a demultiplexed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    R,
    G1,
    G2,
    B,
}

/// A single channel plane.
///
/// The sample buffer is reference-counted so that strategies which replicate
/// a channel (mono replication, the shared green of packed RGB) alias one
/// allocation instead of copying it.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    /// Width of the plane in pixels
    pub width: usize,
    /// Height of the plane in pixels
    pub height: usize,
    /// Row-major sample data, `width * height` entries
    pub data: Arc<[f32]>,
}

impl Plane {
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            width,
            height,
            data: data.into(),
        }
    }

    /// Sample at `(row, col)`; panics on out-of-range indices.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.width + col]
    }

    /// Whether two planes alias the same underlying sample buffer.
    pub fn shares_backing(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

/// The four-plane result of demultiplexing one raw frame.
#[derive(Debug, Clone)]
pub struct ChannelPlaneSet {
    pub r: Plane,
    pub g1: Plane,
    pub g2: Plane,
    pub b: Plane,
}

impl ChannelPlaneSet {
    pub fn channel(&self, channel: Channel) -> &Plane {
        match channel {
            Channel::R => &self.r,
            Channel::G1 => &self.g1,
            Channel::G2 => &self.g2,
            Channel::B => &self.b,
        }
    }
}
