//! Simulated camera driver
//!
//! A deterministic, in-memory [`CameraDriver`] implementation used by the
//! demo binary and for hardware-free runs. Frames are synthesized from a
//! configurable test pattern; configuration calls are recorded but otherwise
//! accepted unconditionally.

use std::collections::HashMap;

use tracing::debug;

use crate::camera::driver::interface::CameraDriver;
use crate::camera::driver::types::{
    AutoFeature, BinningMode, BufferToken, ColorMode, DisplayMode, DriverError, DriverResult,
    SensorInfo, SensorType,
};

/// Status code reported when a call arrives while the device is closed.
const STATUS_INVALID_HANDLE: i32 = -1;
/// Status code reported for an unknown buffer token.
const STATUS_NO_ACTIVE_IMG_MEM: i32 = -2;

/// Test pattern used to synthesize frame content.
#[derive(Debug, Clone, Copy)]
pub enum TestPattern {
    /// `(row + col) % 4096`, a diagonal 12-bit gradient
    Gradient,
    /// Every sample holds the given value
    Solid(u16),
}

/// Simulated device with a 2076x3088 color sensor by default.
pub struct SimulatedDriver {
    info: SensorInfo,
    pattern: TestPattern,
    open: bool,
    exposure_ms: f64,
    buffers: HashMap<u32, (usize, usize)>,
    next_buffer_id: u32,
    frames_triggered: u64,
}

impl Default for SimulatedDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedDriver {
    pub fn new() -> Self {
        Self {
            info: SensorInfo {
                name: "SIM-6400-C".to_string(),
                sensor_type: SensorType::Color,
                max_width: 3088,
                max_height: 2076,
                pixel_size_units: 345,
            },
            pattern: TestPattern::Gradient,
            open: false,
            exposure_ms: 15.0,
            buffers: HashMap::new(),
            next_buffer_id: 1,
            frames_triggered: 0,
        }
    }

    /// Replace the simulated sensor description.
    pub fn with_sensor(mut self, info: SensorInfo) -> Self {
        self.info = info;
        self
    }

    /// Select the synthesized frame content.
    pub fn with_pattern(mut self, pattern: TestPattern) -> Self {
        self.pattern = pattern;
        self
    }

    /// Number of exposures triggered so far.
    pub fn frames_triggered(&self) -> u64 {
        self.frames_triggered
    }

    fn require_open(&self) -> DriverResult<()> {
        if self.open {
            Ok(())
        } else {
            Err(DriverError::new(STATUS_INVALID_HANDLE))
        }
    }

    fn sample_at(&self, row: usize, col: usize) -> u16 {
        match self.pattern {
            TestPattern::Gradient => ((row + col) % 4096) as u16,
            TestPattern::Solid(value) => value,
        }
    }
}

impl CameraDriver for SimulatedDriver {
    fn open(&mut self) -> DriverResult<()> {
        self.open = true;
        debug!(sensor = %self.info.name, "simulated device opened");
        Ok(())
    }

    fn close(&mut self) -> DriverResult<()> {
        self.require_open()?;
        self.open = false;
        self.buffers.clear();
        Ok(())
    }

    fn sensor_info(&self) -> DriverResult<SensorInfo> {
        self.require_open()?;
        Ok(self.info.clone())
    }

    fn set_pixel_clock(&mut self, _mhz: u32) -> DriverResult<()> {
        self.require_open()
    }

    fn set_exposure_ms(&mut self, ms: f64) -> DriverResult<()> {
        self.require_open()?;
        self.exposure_ms = ms;
        Ok(())
    }

    fn exposure_ms(&self) -> DriverResult<f64> {
        self.require_open()?;
        Ok(self.exposure_ms)
    }

    fn exposure_range_ms(&self) -> DriverResult<(f64, f64)> {
        self.require_open()?;
        Ok((0.009, 2000.0))
    }

    fn set_binning(&mut self, _mode: BinningMode) -> DriverResult<()> {
        self.require_open()
    }

    fn set_auto_feature(&mut self, _feature: AutoFeature, _enabled: bool) -> DriverResult<()> {
        self.require_open()
    }

    fn set_hardware_gain(&mut self, _gain: u32) -> DriverResult<()> {
        self.require_open()
    }

    fn set_display_mode(&mut self, _mode: DisplayMode) -> DriverResult<()> {
        self.require_open()
    }

    fn set_color_mode(&mut self, _mode: ColorMode) -> DriverResult<()> {
        self.require_open()
    }

    fn allocate_buffer(
        &mut self,
        width: usize,
        height: usize,
        _bit_depth: u32,
    ) -> DriverResult<BufferToken> {
        self.require_open()?;
        let id = self.next_buffer_id;
        self.next_buffer_id += 1;
        self.buffers.insert(id, (width, height));
        Ok(BufferToken::new(id))
    }

    fn trigger_exposure_blocking(&mut self, buffer: &BufferToken) -> DriverResult<()> {
        self.require_open()?;
        if !self.buffers.contains_key(&buffer.id()) {
            return Err(DriverError::new(STATUS_NO_ACTIVE_IMG_MEM));
        }
        self.frames_triggered += 1;
        Ok(())
    }

    fn copy_buffer(&mut self, buffer: &BufferToken, dest: &mut [u16]) -> DriverResult<()> {
        self.require_open()?;
        let &(width, height) = self
            .buffers
            .get(&buffer.id())
            .ok_or(DriverError::new(STATUS_NO_ACTIVE_IMG_MEM))?;
        debug_assert_eq!(dest.len(), width * height);
        for row in 0..height {
            for col in 0..width {
                dest[row * width + col] = self.sample_at(row, col);
            }
        }
        Ok(())
    }

    fn free_buffer(&mut self, buffer: BufferToken) -> DriverResult<()> {
        self.require_open()?;
        self.buffers
            .remove(&buffer.id())
            .map(|_| ())
            .ok_or(DriverError::new(STATUS_NO_ACTIVE_IMG_MEM))
    }

    fn temperature_celsius(&self) -> DriverResult<f64> {
        self.require_open()?;
        Ok(38.5)
    }
}
