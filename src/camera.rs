//! Camera control pipeline
//!
//! This module covers the device connection lifecycle, acquisition
//! configuration and the capture-and-demultiplex pipeline, with separate
//! submodules for the driver abstraction, frame acquisition and channel
//! splitting.

pub mod acquisition;
pub mod common;
pub mod demux;
pub mod driver;
pub mod frame;

#[cfg(test)]
mod tests;

pub use common::{CameraError, Result};

pub use acquisition::{AcquisitionController, CameraState, CaptureConfig, CaptureConfigBuilder};

pub use driver::{
    AutoFeature, BinningMode, BufferToken, CameraDriver, ColorMode, DisplayMode, DriverError,
    DriverResult, SensorInfo, SensorType, SimulatedDriver, TestPattern,
};

pub use demux::{Channel, ChannelPlaneSet, PixelLayout, Plane, demultiplex};

pub use frame::RawFrame;
