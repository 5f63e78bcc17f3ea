//! Frame acquisition module
//!
//! The acquisition controller owns the device handle and all capture
//! configuration, and sequences buffer allocation, exposure triggering,
//! optional frame averaging and the binning crop.

mod controller;
pub mod types;

pub use controller::AcquisitionController;
pub use types::{CameraState, CaptureConfig, CaptureConfigBuilder, DEFAULT_SETTLE_DELAY};
