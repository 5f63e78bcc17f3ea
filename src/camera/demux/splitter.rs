//! Channel splitting strategies
//!
//! Pure transformations from one raw frame into four named planes. Three
//! strategies exist, selected by [`PixelLayout`]; the acquisition controller
//! picks the layout from the sensor type and refuses to guess for
//! unclassified sensors.

use tracing::debug;

use crate::camera::common::error::{CameraError, Result};
use crate::camera::demux::types::{ChannelPlaneSet, Plane};
use crate::camera::frame::RawFrame;

/// How samples of a raw frame map onto color channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    /// Raw Bayer data, rows alternating `G1,R,G1,R,..` and `B,G2,B,G2,..`
    Bayer12,
    /// Pre-demosaiced interleaved triplets, 3 samples per pixel
    PackedRgb,
    /// Single-channel monochrome data
    Mono,
}

/// Split a raw frame into its (R, G1, G2, B) planes.
pub fn demultiplex(frame: &RawFrame, layout: PixelLayout) -> Result<ChannelPlaneSet> {
    debug!(
        width = frame.width,
        height = frame.height,
        ?layout,
        "demultiplexing frame"
    );
    match layout {
        PixelLayout::Bayer12 => split_bayer12(frame),
        PixelLayout::PackedRgb => split_packed_rgb(frame),
        PixelLayout::Mono => Ok(split_mono(frame)),
    }
}

/// Bayer unpack: subsample the color-filter-array pattern into four
/// quarter-size planes.
///
/// The sensor emits rows alternating between `G1,R,G1,R,..` and
/// `B,G2,B,G2,..`, so for each output row `i`: source row `2i` carries R on
/// even columns and G1 on odd columns, source row `2i+1` carries B on even
/// columns and G2 on odd columns. The stride/offset convention is the
/// physical CFA layout; changing it swaps channels.
pub fn split_bayer12(frame: &RawFrame) -> Result<ChannelPlaneSet> {
    check_geometry(frame, frame.width * frame.height)?;

    let out_h = frame.height / 2;
    let out_w = frame.width / 2;
    let mut r = Vec::with_capacity(out_h * out_w);
    let mut g1 = Vec::with_capacity(out_h * out_w);
    let mut g2 = Vec::with_capacity(out_h * out_w);
    let mut b = Vec::with_capacity(out_h * out_w);

    for i in 0..out_h {
        let row_rg1 = &frame.data[2 * i * frame.width..(2 * i + 1) * frame.width];
        let row_g2b = &frame.data[(2 * i + 1) * frame.width..(2 * i + 2) * frame.width];
        for j in 0..out_w {
            r.push(row_rg1[2 * j]);
            g1.push(row_rg1[2 * j + 1]);
            g2.push(row_g2b[2 * j]);
            b.push(row_g2b[2 * j + 1]);
        }
    }

    Ok(ChannelPlaneSet {
        r: Plane::new(out_w, out_h, r),
        g1: Plane::new(out_w, out_h, g1),
        g2: Plane::new(out_w, out_h, g2),
        b: Plane::new(out_w, out_h, b),
    })
}

/// Packed unpack: deinterleave 3-samples-per-pixel data.
///
/// Sample 0 of each triplet is R, sample 1 is green (exposed under both the
/// G1 and G2 names, backed by one shared plane), sample 2 is B. The frame's
/// `width`/`height` count pixels, so its data holds `3 * width * height`
/// samples.
pub fn split_packed_rgb(frame: &RawFrame) -> Result<ChannelPlaneSet> {
    check_geometry(frame, 3 * frame.width * frame.height)?;

    let pixels = frame.width * frame.height;
    let mut r = Vec::with_capacity(pixels);
    let mut g = Vec::with_capacity(pixels);
    let mut b = Vec::with_capacity(pixels);
    for triplet in frame.data.chunks_exact(3) {
        r.push(triplet[0]);
        g.push(triplet[1]);
        b.push(triplet[2]);
    }

    let green = Plane::new(frame.width, frame.height, g);
    Ok(ChannelPlaneSet {
        r: Plane::new(frame.width, frame.height, r),
        g1: green.clone(),
        g2: green,
        b: Plane::new(frame.width, frame.height, b),
    })
}

/// Mono replication: expose the single-channel input under all four names.
/// No computation, just aliasing.
pub fn split_mono(frame: &RawFrame) -> ChannelPlaneSet {
    let plane = Plane::new(frame.width, frame.height, frame.data.clone());
    ChannelPlaneSet {
        r: plane.clone(),
        g1: plane.clone(),
        g2: plane.clone(),
        b: plane,
    }
}

fn check_geometry(frame: &RawFrame, expected_samples: usize) -> Result<()> {
    if frame.data.len() != expected_samples {
        return Err(CameraError::InvalidFrameGeometry {
            width: frame.width,
            height: frame.height,
            samples: frame.data.len(),
        });
    }
    Ok(())
}
