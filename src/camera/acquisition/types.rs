//! Acquisition configuration and device state types

use std::time::Duration;

use crate::camera::driver::types::SensorType;

/// Default settling delay applied before every capture.
///
/// Exposure and gain changes only take effect at the next full frame
/// boundary, so every capture waits this long for the settings to stabilize.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(250);

/// Configuration for the acquisition controller
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Initial exposure time in microseconds
    pub exposure_time_us: f64,
    /// Sensor pixel clock in MHz
    pub pixel_clock_mhz: u32,
    /// Target frame rate hint in frames per second
    pub target_fps: f64,
    /// Number of exposures averaged per capture, at least 1
    pub frames_to_average: u32,
    /// Delay before every capture; lower it only in tests
    pub settle_delay: Duration,
    /// Bit depth of the allocated frame buffers
    pub bit_depth: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            exposure_time_us: 15_000.0,
            pixel_clock_mhz: 80,
            target_fps: 8.0,
            frames_to_average: 1,
            settle_delay: DEFAULT_SETTLE_DELAY,
            bit_depth: 16,
        }
    }
}

impl CaptureConfig {
    pub fn builder() -> CaptureConfigBuilder {
        CaptureConfigBuilder::default()
    }
}

/// Builder for CaptureConfig
#[derive(Default)]
pub struct CaptureConfigBuilder {
    exposure_time_us: Option<f64>,
    pixel_clock_mhz: Option<u32>,
    target_fps: Option<f64>,
    frames_to_average: Option<u32>,
    settle_delay: Option<Duration>,
    bit_depth: Option<u32>,
}

impl CaptureConfigBuilder {
    pub fn exposure_time_us(mut self, us: f64) -> Self {
        self.exposure_time_us = Some(us);
        self
    }

    pub fn pixel_clock_mhz(mut self, mhz: u32) -> Self {
        self.pixel_clock_mhz = Some(mhz);
        self
    }

    pub fn target_fps(mut self, fps: f64) -> Self {
        self.target_fps = Some(fps);
        self
    }

    pub fn frames_to_average(mut self, frames: u32) -> Self {
        self.frames_to_average = Some(frames.max(1));
        self
    }

    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = Some(delay);
        self
    }

    pub fn bit_depth(mut self, bits: u32) -> Self {
        self.bit_depth = Some(bits);
        self
    }

    pub fn build(self) -> CaptureConfig {
        let default = CaptureConfig::default();
        CaptureConfig {
            exposure_time_us: self.exposure_time_us.unwrap_or(default.exposure_time_us),
            pixel_clock_mhz: self.pixel_clock_mhz.unwrap_or(default.pixel_clock_mhz),
            target_fps: self.target_fps.unwrap_or(default.target_fps),
            frames_to_average: self.frames_to_average.unwrap_or(default.frames_to_average),
            settle_delay: self.settle_delay.unwrap_or(default.settle_delay),
            bit_depth: self.bit_depth.unwrap_or(default.bit_depth),
        }
    }
}

/// Mutable device state owned by the acquisition controller.
///
/// Invariant: `current_width`/`current_height` equal the sensor dimensions
/// while binning is disabled and their floor-halves while it is enabled.
#[derive(Debug, Clone)]
pub struct CameraState {
    pub connected: bool,
    pub exposure_time_us: f64,
    pub pixel_clock_mhz: u32,
    pub target_fps: f64,
    pub binning_enabled: bool,
    pub frames_to_average: u32,
    pub sensor_width: usize,
    pub sensor_height: usize,
    pub current_width: usize,
    pub current_height: usize,
    pub sensor_type: SensorType,
    pub bit_depth: u32,
}

impl CameraState {
    /// Disconnected state seeded from a configuration; sensor geometry is
    /// filled in at connect time from device-reported values.
    pub fn from_config(config: &CaptureConfig) -> Self {
        Self {
            connected: false,
            exposure_time_us: config.exposure_time_us,
            pixel_clock_mhz: config.pixel_clock_mhz,
            target_fps: config.target_fps,
            binning_enabled: false,
            frames_to_average: config.frames_to_average.max(1),
            sensor_width: 0,
            sensor_height: 0,
            current_width: 0,
            current_height: 0,
            sensor_type: SensorType::Unknown,
            bit_depth: config.bit_depth,
        }
    }
}
