//! Channel demultiplexing module
//!
//! Splits one raw sensor frame into separate per-color-channel planes.

mod splitter;
pub mod types;

pub use splitter::{PixelLayout, demultiplex, split_bayer12, split_mono, split_packed_rgb};
pub use types::{Channel, ChannelPlaneSet, Plane};
