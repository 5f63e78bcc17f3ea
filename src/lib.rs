//! USB machine-vision camera control
//!
//! Manages the device connection lifecycle, configures acquisition
//! parameters (exposure, pixel clock, gain, binning, frame averaging),
//! captures raw sensor frames and demultiplexes raw Bayer data into
//! per-channel (R, G1, G2, B) planes. The vendor SDK sits behind the
//! [`camera::CameraDriver`] trait; a deterministic simulated driver is
//! included for hardware-free use.

pub mod camera;
pub mod logger;

pub use camera::{
    AcquisitionController, CameraDriver, CameraError, CaptureConfig, ChannelPlaneSet, RawFrame,
    Result, SensorType, SimulatedDriver,
};
