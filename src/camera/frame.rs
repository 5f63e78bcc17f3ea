//! Raw sensor frame type
//!
//! A captured frame is stored as a flat row-major sample buffer together with
//! its dimensions. Samples are `f32` rather than `u16` because frame
//! averaging produces non-integer per-pixel means; 16-bit sensor values are
//! represented exactly in `f32`.

/// A single raw frame as delivered by the acquisition controller.
///
/// Ephemeral: created per capture and owned by the caller until handed to the
/// channel demultiplexer.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame {
    /// Width of the frame in pixels
    pub width: usize,
    /// Height of the frame in pixels
    pub height: usize,
    /// Row-major sample data, `width * height` entries
    pub data: Vec<f32>,
}

impl RawFrame {
    /// Widen a driver buffer of 16-bit samples into a frame.
    pub fn from_u16_samples(width: usize, height: usize, samples: &[u16]) -> Self {
        debug_assert_eq!(samples.len(), width * height);
        Self {
            width,
            height,
            data: samples.iter().map(|&v| f32::from(v)).collect(),
        }
    }

    /// Element-wise arithmetic mean of a stack of equally sized driver
    /// buffers. Accumulates in `f64` before narrowing back to `f32`.
    pub fn mean_of_u16_stack(width: usize, height: usize, stack: &[Vec<u16>]) -> Self {
        debug_assert!(!stack.is_empty());
        let count = stack.len() as f64;
        let mut acc = vec![0.0f64; width * height];
        for buffer in stack {
            debug_assert_eq!(buffer.len(), width * height);
            for (slot, &sample) in acc.iter_mut().zip(buffer.iter()) {
                *slot += f64::from(sample);
            }
        }
        Self {
            width,
            height,
            data: acc.into_iter().map(|sum| (sum / count) as f32).collect(),
        }
    }

    /// Sample at `(row, col)`; panics on out-of-range indices.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.width + col]
    }

    /// Crop to the top-left `height x width` sub-rectangle.
    ///
    /// Used by the binning path: the driver still fills a full-resolution
    /// allocation, but only the top-left region is logically addressable.
    pub fn crop_top_left(self, height: usize, width: usize) -> Self {
        if height == self.height && width == self.width {
            return self;
        }
        let mut data = Vec::with_capacity(width * height);
        for row in 0..height {
            let start = row * self.width;
            data.extend_from_slice(&self.data[start..start + width]);
        }
        Self {
            width,
            height,
            data,
        }
    }
}
