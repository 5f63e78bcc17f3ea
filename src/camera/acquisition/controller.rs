use std::thread;

use tracing::{debug, info, instrument, warn};

use crate::camera::acquisition::types::{CameraState, CaptureConfig};
use crate::camera::common::error::{CameraError, Result};
use crate::camera::demux::{self, ChannelPlaneSet, PixelLayout};
use crate::camera::driver::types::{
    AutoFeature, BinningMode, ColorMode, DisplayMode, DriverError, SensorInfo, SensorType,
};
use crate::camera::driver::{CameraDriver, SimulatedDriver};
use crate::camera::frame::RawFrame;

/// Divisor converting vendor pixel-size units into microns for color sensors.
const PIXEL_SIZE_DIVISOR_COLOR: f64 = 50.0;
/// Divisor converting vendor pixel-size units into microns for mono sensors.
const PIXEL_SIZE_DIVISOR_MONO: f64 = 100.0;

/// Owns one device handle and drives the capture sequence.
///
/// All device state lives on the instance; no process-wide globals, so one
/// controller per attached camera may coexist. The capture path is blocking
/// and non-reentrant: `&mut self` receivers serialize the buffer
/// allocate/trigger/copy/free sequence by construction.
pub struct AcquisitionController<D: CameraDriver> {
    driver: D,
    config: CaptureConfig,
    state: CameraState,
    sensor: Option<SensorInfo>,
}

impl AcquisitionController<SimulatedDriver> {
    /// Controller over the built-in simulated driver.
    pub fn new(config: CaptureConfig) -> Self {
        Self::with_driver(SimulatedDriver::new(), config)
    }
}

impl<D: CameraDriver> AcquisitionController<D> {
    pub fn with_driver(driver: D, config: CaptureConfig) -> Self {
        let state = CameraState::from_config(&config);
        Self {
            driver,
            config,
            state,
            sensor: None,
        }
    }

    /// Open the device, query the sensor and apply the baseline settings:
    /// pixel clock, DIB transfer, raw 12-bit pixel format, every automatic
    /// feature off, zero hardware gain.
    ///
    /// On any failure the device is left disconnected and the error is
    /// reported to the caller; whether to retry is the caller's decision.
    pub fn connect(&mut self) -> Result<()> {
        self.driver
            .open()
            .map_err(|e| CameraError::ConnectionFailure(format!("open failed: {e}")))?;

        let sensor = self
            .driver
            .sensor_info()
            .map_err(|e| CameraError::ConnectionFailure(format!("sensor query failed: {e}")))?;

        self.apply_baseline_settings()
            .map_err(|e| CameraError::ConnectionFailure(format!("baseline settings failed: {e}")))?;

        self.state.sensor_width = sensor.max_width;
        self.state.sensor_height = sensor.max_height;
        self.state.current_width = sensor.max_width;
        self.state.current_height = sensor.max_height;
        self.state.sensor_type = sensor.sensor_type;
        self.state.binning_enabled = false;
        self.state.connected = true;

        info!(
            sensor = %sensor.name,
            sensor_type = ?sensor.sensor_type,
            width = sensor.max_width,
            height = sensor.max_height,
            "camera connected"
        );
        self.sensor = Some(sensor);
        Ok(())
    }

    fn apply_baseline_settings(&mut self) -> std::result::Result<(), DriverError> {
        self.driver.set_pixel_clock(self.config.pixel_clock_mhz)?;
        self.driver.set_display_mode(DisplayMode::Dib)?;
        self.driver.set_color_mode(ColorMode::SensorRaw12)?;
        for feature in AutoFeature::ALL {
            self.driver.set_auto_feature(feature, false)?;
        }
        self.driver.set_hardware_gain(0)?;
        Ok(())
    }

    /// Release the device handle. Failure is reported, not fatal.
    pub fn disconnect(&mut self) -> Result<()> {
        self.driver
            .close()
            .map_err(|e| CameraError::DisconnectionFailure(format!("close failed: {e}")))?;
        self.state.connected = false;
        info!("camera disconnected");
        Ok(())
    }

    /// Capture one raw frame, averaging multiple exposures when configured.
    ///
    /// Every capture starts with the fixed settling delay so that exposure
    /// or gain changes made since the last frame have taken effect. The
    /// buffer is always allocated at full sensor dimensions; under binning
    /// the driver fills a binning-sized region and the logical addressable
    /// region is the top-left sub-rectangle, which is cropped out afterwards.
    #[instrument(skip(self), fields(frames = self.state.frames_to_average))]
    pub fn capture_raw(&mut self) -> Result<RawFrame> {
        self.require_connected()?;
        thread::sleep(self.config.settle_delay);

        let width = self.state.sensor_width;
        let height = self.state.sensor_height;
        let frames = self.state.frames_to_average;

        let frame = if frames == 1 {
            let samples = self.acquire_one(width, height)?;
            RawFrame::from_u16_samples(width, height, &samples)
        } else {
            debug!(frames, "averaging exposures");
            let mut stack = Vec::with_capacity(frames as usize);
            for _ in 0..frames {
                stack.push(self.acquire_one(width, height)?);
            }
            RawFrame::mean_of_u16_stack(width, height, &stack)
        };

        let frame = if self.state.binning_enabled {
            frame.crop_top_left(self.state.current_height, self.state.current_width)
        } else {
            frame
        };

        debug!(width = frame.width, height = frame.height, "frame captured");
        Ok(frame)
    }

    /// One allocate/trigger/copy/free cycle against the driver. The buffer is
    /// freed on the error paths too, before the failure is reported.
    fn acquire_one(&mut self, width: usize, height: usize) -> Result<Vec<u16>> {
        let buffer = self
            .driver
            .allocate_buffer(width, height, self.config.bit_depth)
            .map_err(device_command)?;

        let mut samples = vec![0u16; width * height];
        let exposure = self
            .driver
            .trigger_exposure_blocking(&buffer)
            .and_then(|()| self.driver.copy_buffer(&buffer, &mut samples));

        let freed = self.driver.free_buffer(buffer).map_err(device_command);
        exposure.map_err(device_command)?;
        freed?;
        Ok(samples)
    }

    /// Capture and demultiplex in one call.
    ///
    /// The layout is derived from the sensor type recorded at connect time;
    /// an unclassified sensor fails here rather than guessing a channel
    /// layout and silently corrupting color data.
    #[instrument(skip(self))]
    pub fn capture_planes(&mut self) -> Result<ChannelPlaneSet> {
        let layout = match self.state.sensor_type {
            SensorType::Color => PixelLayout::Bayer12,
            SensorType::Mono => PixelLayout::Mono,
            SensorType::Unknown => return Err(CameraError::UnrecognizedSensorType),
        };
        let frame = self.capture_raw()?;
        demux::demultiplex(&frame, layout)
    }

    /// Apply an exposure time in microseconds. The device quantizes the
    /// value, so the effective setting must be re-queried with
    /// [`exposure_time_us`](Self::exposure_time_us).
    pub fn set_exposure_time_us(&mut self, us: f64) -> Result<()> {
        self.driver
            .set_exposure_ms(us / 1000.0)
            .map_err(device_command)?;
        self.state.exposure_time_us = us;
        debug!(exposure_us = us, "exposure time applied");
        Ok(())
    }

    /// Effective exposure time in microseconds, as reported by the device.
    pub fn exposure_time_us(&self) -> Result<f64> {
        let ms = self.driver.exposure_ms().map_err(device_command)?;
        Ok(ms * 1000.0)
    }

    /// Supported exposure range in microseconds, `(min, max)`.
    pub fn exposure_range_us(&self) -> Result<(f64, f64)> {
        let (min_ms, max_ms) = self.driver.exposure_range_ms().map_err(device_command)?;
        Ok((min_ms * 1000.0, max_ms * 1000.0))
    }

    /// Try to enable or disable 2x2 hardware binning.
    ///
    /// Returns `true` only when the binning state actually changed.
    /// Requesting the state the device is already in returns `false` without
    /// touching the device; a failed device call leaves state and dimensions
    /// unchanged and also returns `false`.
    pub fn toggle_binning(&mut self, enable: bool) -> bool {
        match (enable, self.state.binning_enabled) {
            (true, false) => {
                if self.driver.set_binning(BinningMode::TwoByTwo).is_err() {
                    warn!("enabling binning rejected by device");
                    return false;
                }
                self.state.binning_enabled = true;
                self.state.current_width = self.state.sensor_width / 2;
                self.state.current_height = self.state.sensor_height / 2;
                info!(
                    width = self.state.current_width,
                    height = self.state.current_height,
                    "binning enabled"
                );
                true
            }
            (false, true) => {
                if self.driver.set_binning(BinningMode::Disabled).is_err() {
                    warn!("disabling binning rejected by device");
                    return false;
                }
                self.state.binning_enabled = false;
                self.state.current_width = self.state.sensor_width;
                self.state.current_height = self.state.sensor_height;
                info!("binning disabled");
                true
            }
            _ => false,
        }
    }

    /// Set the number of exposures averaged per capture; clamped to at
    /// least one.
    pub fn set_frames_to_average(&mut self, frames: u32) {
        self.state.frames_to_average = frames.max(1);
    }

    /// Physical pixel pitch in microns.
    ///
    /// The vendor reports the pitch in fixed-point units whose scale differs
    /// between color and mono sensors.
    pub fn pixel_size_microns(&self) -> Result<f64> {
        let divisor = match self.state.sensor_type {
            SensorType::Color => PIXEL_SIZE_DIVISOR_COLOR,
            SensorType::Mono => PIXEL_SIZE_DIVISOR_MONO,
            SensorType::Unknown => return Err(CameraError::UnrecognizedSensorType),
        };
        let units = self
            .sensor
            .as_ref()
            .map(|s| s.pixel_size_units)
            .unwrap_or(0);
        if units == 0 {
            return Err(CameraError::MissingCalibrationData);
        }
        Ok(f64::from(units) / divisor)
    }

    /// Logical output dimensions as `(height, width)`.
    ///
    /// For color sensors the Bayer unpack halves each axis again relative to
    /// the current capture dimensions.
    pub fn frame_dimensions(&self) -> Result<(usize, usize)> {
        match self.state.sensor_type {
            SensorType::Color => Ok((
                self.state.current_height / 2,
                self.state.current_width / 2,
            )),
            SensorType::Mono => Ok((self.state.current_height, self.state.current_width)),
            SensorType::Unknown => Err(CameraError::UnrecognizedSensorType),
        }
    }

    /// Internal device temperature in degrees Celsius.
    pub fn temperature_celsius(&self) -> Result<f64> {
        self.driver
            .temperature_celsius()
            .map_err(|e| CameraError::TemperatureReadFailure { code: e.code })
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    fn require_connected(&self) -> Result<()> {
        if self.state.connected {
            Ok(())
        } else {
            Err(CameraError::ConnectionFailure(
                "device is not connected".to_string(),
            ))
        }
    }
}

fn device_command(e: DriverError) -> CameraError {
    CameraError::DeviceCommandFailure { code: e.code }
}
