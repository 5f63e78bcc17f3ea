#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use crate::camera::acquisition::{AcquisitionController, CaptureConfig};
    use crate::camera::common::error::CameraError;
    use crate::camera::demux::{PixelLayout, demultiplex, split_packed_rgb};
    use crate::camera::driver::{
        AutoFeature, BinningMode, BufferToken, CameraDriver, ColorMode, DisplayMode, DriverError,
        DriverResult, SensorInfo, SensorType,
    };
    use crate::camera::frame::RawFrame;

    /// Frame content served by the mock driver, one entry per capture.
    enum MockFill {
        /// Constant-valued frames, value k for the k-th copy (cycled)
        Constant(Vec<u16>),
        /// Explicit full sample buffers
        Explicit(Vec<Vec<u16>>),
    }

    #[derive(Default)]
    struct MockCalls {
        allocations: Vec<(usize, usize, u32)>,
        frees: usize,
        triggers: usize,
        exposures_ms: Vec<f64>,
        pixel_clocks: Vec<u32>,
        auto_features: Vec<(AutoFeature, bool)>,
        gains: Vec<u32>,
        display_modes: Vec<DisplayMode>,
        color_modes: Vec<ColorMode>,
        binning: Vec<BinningMode>,
    }

    struct MockDriver {
        info: SensorInfo,
        fill: MockFill,
        fail_open: bool,
        fail_close: bool,
        fail_binning: bool,
        fail_trigger: bool,
        temperature: std::result::Result<f64, i32>,
        exposure_ms: f64,
        copies: usize,
        next_buffer_id: u32,
        buffers: HashMap<u32, (usize, usize)>,
        calls: Arc<Mutex<MockCalls>>,
    }

    impl MockDriver {
        fn new(sensor_type: SensorType, width: usize, height: usize) -> Self {
            Self {
                info: SensorInfo {
                    name: "MOCK-1".to_string(),
                    sensor_type,
                    max_width: width,
                    max_height: height,
                    pixel_size_units: 345,
                },
                fill: MockFill::Constant(vec![0]),
                fail_open: false,
                fail_close: false,
                fail_binning: false,
                fail_trigger: false,
                temperature: Ok(34.0),
                exposure_ms: 15.0,
                copies: 0,
                next_buffer_id: 1,
                buffers: HashMap::new(),
                calls: Arc::new(Mutex::new(MockCalls::default())),
            }
        }

        fn with_fill(mut self, fill: MockFill) -> Self {
            self.fill = fill;
            self
        }

        fn calls(&self) -> Arc<Mutex<MockCalls>> {
            Arc::clone(&self.calls)
        }

        fn fill_value(&self, dest: &mut [u16]) {
            match &self.fill {
                MockFill::Constant(values) => {
                    let value = values[self.copies % values.len()];
                    dest.fill(value);
                }
                MockFill::Explicit(frames) => {
                    let frame = &frames[self.copies % frames.len()];
                    dest.copy_from_slice(frame);
                }
            }
        }
    }

    impl CameraDriver for MockDriver {
        fn open(&mut self) -> DriverResult<()> {
            if self.fail_open {
                Err(DriverError::new(-101))
            } else {
                Ok(())
            }
        }

        fn close(&mut self) -> DriverResult<()> {
            if self.fail_close {
                Err(DriverError::new(-102))
            } else {
                Ok(())
            }
        }

        fn sensor_info(&self) -> DriverResult<SensorInfo> {
            Ok(self.info.clone())
        }

        fn set_pixel_clock(&mut self, mhz: u32) -> DriverResult<()> {
            self.calls.lock().unwrap().pixel_clocks.push(mhz);
            Ok(())
        }

        fn set_exposure_ms(&mut self, ms: f64) -> DriverResult<()> {
            self.calls.lock().unwrap().exposures_ms.push(ms);
            self.exposure_ms = ms;
            Ok(())
        }

        fn exposure_ms(&self) -> DriverResult<f64> {
            Ok(self.exposure_ms)
        }

        fn exposure_range_ms(&self) -> DriverResult<(f64, f64)> {
            Ok((0.05, 500.0))
        }

        fn set_binning(&mut self, mode: BinningMode) -> DriverResult<()> {
            if self.fail_binning {
                return Err(DriverError::new(-103));
            }
            self.calls.lock().unwrap().binning.push(mode);
            Ok(())
        }

        fn set_auto_feature(&mut self, feature: AutoFeature, enabled: bool) -> DriverResult<()> {
            self.calls.lock().unwrap().auto_features.push((feature, enabled));
            Ok(())
        }

        fn set_hardware_gain(&mut self, gain: u32) -> DriverResult<()> {
            self.calls.lock().unwrap().gains.push(gain);
            Ok(())
        }

        fn set_display_mode(&mut self, mode: DisplayMode) -> DriverResult<()> {
            self.calls.lock().unwrap().display_modes.push(mode);
            Ok(())
        }

        fn set_color_mode(&mut self, mode: ColorMode) -> DriverResult<()> {
            self.calls.lock().unwrap().color_modes.push(mode);
            Ok(())
        }

        fn allocate_buffer(
            &mut self,
            width: usize,
            height: usize,
            bit_depth: u32,
        ) -> DriverResult<BufferToken> {
            self.calls
                .lock()
                .unwrap()
                .allocations
                .push((width, height, bit_depth));
            let id = self.next_buffer_id;
            self.next_buffer_id += 1;
            self.buffers.insert(id, (width, height));
            Ok(BufferToken::new(id))
        }

        fn trigger_exposure_blocking(&mut self, buffer: &BufferToken) -> DriverResult<()> {
            assert!(self.buffers.contains_key(&buffer.id()), "trigger without buffer");
            if self.fail_trigger {
                return Err(DriverError::new(-104));
            }
            self.calls.lock().unwrap().triggers += 1;
            Ok(())
        }

        fn copy_buffer(&mut self, buffer: &BufferToken, dest: &mut [u16]) -> DriverResult<()> {
            let &(width, height) = self.buffers.get(&buffer.id()).expect("copy without buffer");
            assert_eq!(dest.len(), width * height);
            self.fill_value(dest);
            self.copies += 1;
            Ok(())
        }

        fn free_buffer(&mut self, buffer: BufferToken) -> DriverResult<()> {
            assert!(self.buffers.remove(&buffer.id()).is_some(), "double free");
            self.calls.lock().unwrap().frees += 1;
            Ok(())
        }

        fn temperature_celsius(&self) -> DriverResult<f64> {
            self.temperature.map_err(DriverError::new)
        }
    }

    fn test_config() -> CaptureConfig {
        CaptureConfig::builder()
            .settle_delay(Duration::ZERO)
            .build()
    }

    fn connected(driver: MockDriver) -> AcquisitionController<MockDriver> {
        let mut camera = AcquisitionController::with_driver(driver, test_config());
        camera.connect().expect("connect");
        camera
    }

    #[test]
    fn test_config_builder() {
        let config = CaptureConfig::builder()
            .exposure_time_us(5_000.0)
            .frames_to_average(0)
            .build();

        assert_eq!(config.exposure_time_us, 5_000.0);
        // below-minimum averaging counts are clamped to 1
        assert_eq!(config.frames_to_average, 1);
        assert_eq!(config.pixel_clock_mhz, 80);
        assert_eq!(config.settle_delay, Duration::from_millis(250));
    }

    #[test]
    fn test_connect_applies_baseline_settings() {
        let driver = MockDriver::new(SensorType::Color, 8, 6);
        let calls = driver.calls();
        let camera = connected(driver);

        let state = camera.state();
        assert!(state.connected);
        assert_eq!(state.sensor_width, 8);
        assert_eq!(state.sensor_height, 6);
        assert_eq!(state.current_width, 8);
        assert_eq!(state.current_height, 6);
        assert_eq!(state.sensor_type, SensorType::Color);

        let calls = calls.lock().unwrap();
        assert_eq!(calls.pixel_clocks, vec![80]);
        assert_eq!(calls.display_modes, vec![DisplayMode::Dib]);
        assert_eq!(calls.color_modes, vec![ColorMode::SensorRaw12]);
        assert_eq!(calls.gains, vec![0]);
        assert_eq!(calls.auto_features.len(), 6);
        assert!(calls.auto_features.iter().all(|&(_, enabled)| !enabled));
    }

    #[test]
    fn test_connect_failure_leaves_disconnected() {
        let mut driver = MockDriver::new(SensorType::Color, 4, 4);
        driver.fail_open = true;
        let mut camera = AcquisitionController::with_driver(driver, test_config());

        let result = camera.connect();
        assert!(matches!(result, Err(CameraError::ConnectionFailure(_))));
        assert!(!camera.state().connected);
    }

    #[test]
    fn test_disconnect_failure_reported() {
        let mut driver = MockDriver::new(SensorType::Mono, 4, 4);
        driver.fail_close = true;
        let mut camera = connected(driver);

        let result = camera.disconnect();
        assert!(matches!(result, Err(CameraError::DisconnectionFailure(_))));
    }

    #[test]
    fn test_bayer_scenario_4x4() {
        let raw: Vec<u16> = (1..=16).collect();
        let driver = MockDriver::new(SensorType::Color, 4, 4)
            .with_fill(MockFill::Explicit(vec![raw]));
        let mut camera = connected(driver);

        let planes = camera.capture_planes().expect("capture");
        for plane in [&planes.r, &planes.g1, &planes.g2, &planes.b] {
            assert_eq!((plane.height, plane.width), (2, 2));
        }
        assert_eq!(planes.r.data.as_ref(), &[1.0, 3.0, 9.0, 11.0]);
        assert_eq!(planes.g1.data.as_ref(), &[2.0, 4.0, 10.0, 12.0]);
        assert_eq!(planes.g2.data.as_ref(), &[5.0, 7.0, 13.0, 15.0]);
        assert_eq!(planes.b.data.as_ref(), &[6.0, 8.0, 14.0, 16.0]);
    }

    #[test]
    fn test_bayer_index_identities() {
        let (width, height) = (8, 6);
        let data: Vec<f32> = (0..width * height).map(|v| v as f32).collect();
        let frame = RawFrame {
            width,
            height,
            data,
        };

        let planes = demultiplex(&frame, PixelLayout::Bayer12).expect("demux");
        for i in 0..height / 2 {
            for j in 0..width / 2 {
                assert_eq!(planes.r.get(i, j), frame.get(2 * i, 2 * j));
                assert_eq!(planes.g1.get(i, j), frame.get(2 * i, 2 * j + 1));
                assert_eq!(planes.g2.get(i, j), frame.get(2 * i + 1, 2 * j));
                assert_eq!(planes.b.get(i, j), frame.get(2 * i + 1, 2 * j + 1));
            }
        }
    }

    #[test]
    fn test_mono_replication_aliases_input() {
        let raw: Vec<u16> = vec![7, 8, 9, 10];
        let driver = MockDriver::new(SensorType::Mono, 2, 2)
            .with_fill(MockFill::Explicit(vec![raw.clone()]));
        let mut camera = connected(driver);

        let planes = camera.capture_planes().expect("capture");
        let expected: Vec<f32> = raw.iter().map(|&v| f32::from(v)).collect();
        for plane in [&planes.r, &planes.g1, &planes.g2, &planes.b] {
            assert_eq!((plane.height, plane.width), (2, 2));
            assert_eq!(plane.data.as_ref(), expected.as_slice());
        }
        // one shared backing buffer, not four copies
        assert!(planes.r.shares_backing(&planes.g1));
        assert!(planes.r.shares_backing(&planes.g2));
        assert!(planes.r.shares_backing(&planes.b));
    }

    #[test]
    fn test_packed_rgb_split() {
        // two pixels: (1,2,3) and (4,5,6)
        let frame = RawFrame {
            width: 2,
            height: 1,
            data: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        };

        let planes = split_packed_rgb(&frame).expect("split");
        assert_eq!(planes.r.data.as_ref(), &[1.0, 4.0]);
        assert_eq!(planes.g1.data.as_ref(), &[2.0, 5.0]);
        assert_eq!(planes.b.data.as_ref(), &[3.0, 6.0]);
        // both green names reference one sample buffer
        assert!(planes.g1.shares_backing(&planes.g2));
        assert!(!planes.r.shares_backing(&planes.g1));
    }

    #[test]
    fn test_averaging_mean() {
        let driver = MockDriver::new(SensorType::Mono, 3, 2)
            .with_fill(MockFill::Constant(vec![10, 20, 30]));
        let calls = driver.calls();
        let mut camera = connected(driver);
        camera.set_frames_to_average(3);

        let frame = camera.capture_raw().expect("capture");
        assert!(frame.data.iter().all(|&v| v == 20.0));

        let calls = calls.lock().unwrap();
        assert_eq!(calls.triggers, 3);
        assert_eq!(calls.allocations.len(), 3);
        assert_eq!(calls.frees, 3);
    }

    #[test]
    fn test_binning_toggle_state_machine() {
        let driver = MockDriver::new(SensorType::Mono, 10, 6);
        let calls = driver.calls();
        let mut camera = connected(driver);

        // enabling when off halves the current dimensions
        assert!(camera.toggle_binning(true));
        assert!(camera.state().binning_enabled);
        assert_eq!(camera.state().current_width, 5);
        assert_eq!(camera.state().current_height, 3);

        // enabling again is a no-op signalled by false
        assert!(!camera.toggle_binning(true));
        assert_eq!(camera.state().current_width, 5);

        // disabling restores the full dimensions exactly
        assert!(camera.toggle_binning(false));
        assert!(!camera.state().binning_enabled);
        assert_eq!(camera.state().current_width, 10);
        assert_eq!(camera.state().current_height, 6);

        // disabling when already off is also a no-op
        assert!(!camera.toggle_binning(false));

        // only the two effective transitions reached the device
        assert_eq!(
            calls.lock().unwrap().binning,
            vec![BinningMode::TwoByTwo, BinningMode::Disabled]
        );
    }

    #[test]
    fn test_binning_device_failure_leaves_state() {
        let mut driver = MockDriver::new(SensorType::Mono, 10, 6);
        driver.fail_binning = true;
        let mut camera = connected(driver);

        assert!(!camera.toggle_binning(true));
        assert!(!camera.state().binning_enabled);
        assert_eq!(camera.state().current_width, 10);
        assert_eq!(camera.state().current_height, 6);
    }

    #[test]
    fn test_binning_capture_allocates_full_and_crops() {
        let raw: Vec<u16> = (1..=16).collect();
        let driver = MockDriver::new(SensorType::Mono, 4, 4)
            .with_fill(MockFill::Explicit(vec![raw]));
        let calls = driver.calls();
        let mut camera = connected(driver);
        assert!(camera.toggle_binning(true));

        let frame = camera.capture_raw().expect("capture");
        // allocation still happens at full sensor resolution
        assert_eq!(calls.lock().unwrap().allocations, vec![(4, 4, 16)]);
        // the logical frame is the top-left sub-rectangle
        assert_eq!((frame.height, frame.width), (2, 2));
        assert_eq!(frame.data, vec![1.0, 2.0, 5.0, 6.0]);
    }

    #[test]
    fn test_unknown_sensor_type_never_guesses() {
        let driver = MockDriver::new(SensorType::Unknown, 4, 4);
        let calls = driver.calls();
        let mut camera = connected(driver);

        assert!(matches!(
            camera.capture_planes(),
            Err(CameraError::UnrecognizedSensorType)
        ));
        // refused before any exposure was triggered
        assert_eq!(calls.lock().unwrap().triggers, 0);

        assert!(matches!(
            camera.pixel_size_microns(),
            Err(CameraError::UnrecognizedSensorType)
        ));
        assert!(matches!(
            camera.frame_dimensions(),
            Err(CameraError::UnrecognizedSensorType)
        ));
    }

    #[test]
    fn test_pixel_size_divisors() {
        let camera = connected(MockDriver::new(SensorType::Color, 4, 4));
        assert_eq!(camera.pixel_size_microns().expect("color"), 345.0 / 50.0);

        let camera = connected(MockDriver::new(SensorType::Mono, 4, 4));
        assert_eq!(camera.pixel_size_microns().expect("mono"), 345.0 / 100.0);
    }

    #[test]
    fn test_pixel_size_missing_calibration() {
        let mut driver = MockDriver::new(SensorType::Color, 4, 4);
        driver.info.pixel_size_units = 0;
        let camera = connected(driver);

        assert!(matches!(
            camera.pixel_size_microns(),
            Err(CameraError::MissingCalibrationData)
        ));
    }

    #[test]
    fn test_frame_dimensions_by_sensor_type() {
        let camera = connected(MockDriver::new(SensorType::Color, 8, 6));
        assert_eq!(camera.frame_dimensions().expect("color"), (3, 4));

        let camera = connected(MockDriver::new(SensorType::Mono, 8, 6));
        assert_eq!(camera.frame_dimensions().expect("mono"), (6, 8));
    }

    #[test]
    fn test_exposure_microsecond_conversion() {
        let driver = MockDriver::new(SensorType::Mono, 4, 4);
        let calls = driver.calls();
        let mut camera = connected(driver);

        camera.set_exposure_time_us(15_000.0).expect("set");
        // the device API takes milliseconds
        assert_eq!(calls.lock().unwrap().exposures_ms, vec![15.0]);
        assert_eq!(camera.exposure_time_us().expect("get"), 15_000.0);

        let (min_us, max_us) = camera.exposure_range_us().expect("range");
        assert_eq!(min_us, 50.0);
        assert_eq!(max_us, 500_000.0);
    }

    #[test]
    fn test_temperature_failure_code() {
        let mut driver = MockDriver::new(SensorType::Mono, 4, 4);
        driver.temperature = Err(-7);
        let camera = connected(driver);

        assert!(matches!(
            camera.temperature_celsius(),
            Err(CameraError::TemperatureReadFailure { code: -7 })
        ));

        let camera = connected(MockDriver::new(SensorType::Mono, 4, 4));
        assert_eq!(camera.temperature_celsius().expect("temperature"), 34.0);
    }

    #[test]
    fn test_capture_requires_connection() {
        let driver = MockDriver::new(SensorType::Mono, 4, 4);
        let mut camera = AcquisitionController::with_driver(driver, test_config());

        assert!(matches!(
            camera.capture_raw(),
            Err(CameraError::ConnectionFailure(_))
        ));
    }

    #[test]
    fn test_buffer_lifecycle_balanced() {
        let driver = MockDriver::new(SensorType::Mono, 4, 4);
        let calls = driver.calls();
        let mut camera = connected(driver);

        camera.capture_raw().expect("capture");
        let calls = calls.lock().unwrap();
        assert_eq!(calls.allocations.len(), 1);
        assert_eq!(calls.triggers, 1);
        assert_eq!(calls.frees, 1);
    }

    #[test]
    fn test_trigger_failure_still_frees_buffer() {
        let mut driver = MockDriver::new(SensorType::Mono, 4, 4);
        driver.fail_trigger = true;
        let calls = driver.calls();
        let mut camera = connected(driver);

        let result = camera.capture_raw();
        assert!(matches!(
            result,
            Err(CameraError::DeviceCommandFailure { code: -104 })
        ));
        let calls = calls.lock().unwrap();
        assert_eq!(calls.allocations.len(), 1);
        assert_eq!(calls.frees, 1);
    }

    #[test]
    fn test_demux_geometry_mismatch() {
        let frame = RawFrame {
            width: 4,
            height: 4,
            data: vec![0.0; 10],
        };
        assert!(matches!(
            demultiplex(&frame, PixelLayout::Bayer12),
            Err(CameraError::InvalidFrameGeometry { .. })
        ));
        assert!(matches!(
            demultiplex(&frame, PixelLayout::PackedRgb),
            Err(CameraError::InvalidFrameGeometry { .. })
        ));
    }
}
