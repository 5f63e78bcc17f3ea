use crate::camera::driver::types::{
    AutoFeature, BinningMode, BufferToken, ColorMode, DisplayMode, DriverResult, SensorInfo,
};

/// Minimal capability surface consumed from a vendor camera SDK.
///
/// One implementor per platform/vendor wraps the SDK's handle and translates
/// its calls; the acquisition controller depends only on this trait, which is
/// what makes a hardware-free simulated driver possible.
///
/// All methods block until the device has acted on the request. Errors carry
/// the raw vendor status code and are classified by the caller.
pub trait CameraDriver {
    /// Open the device and claim its handle.
    fn open(&mut self) -> DriverResult<()>;

    /// Release the device handle.
    fn close(&mut self) -> DriverResult<()>;

    /// Query the static sensor description. Valid only while open.
    fn sensor_info(&self) -> DriverResult<SensorInfo>;

    /// Set the sensor pixel clock in MHz.
    fn set_pixel_clock(&mut self, mhz: u32) -> DriverResult<()>;

    /// Set the exposure time in milliseconds. The device may quantize the
    /// value; read back with [`exposure_ms`](Self::exposure_ms).
    fn set_exposure_ms(&mut self, ms: f64) -> DriverResult<()>;

    /// Read the effective exposure time in milliseconds.
    fn exposure_ms(&self) -> DriverResult<f64>;

    /// Supported exposure range in milliseconds, `(min, max)`.
    fn exposure_range_ms(&self) -> DriverResult<(f64, f64)>;

    /// Switch the hardware binning mode.
    fn set_binning(&mut self, mode: BinningMode) -> DriverResult<()>;

    /// Enable or disable one of the automatic exposure/gain/WB features.
    fn set_auto_feature(&mut self, feature: AutoFeature, enabled: bool) -> DriverResult<()>;

    /// Set the master hardware gain (0 = no amplification).
    fn set_hardware_gain(&mut self, gain: u32) -> DriverResult<()>;

    /// Select the frame transfer mode.
    fn set_display_mode(&mut self, mode: DisplayMode) -> DriverResult<()>;

    /// Select the sensor pixel format.
    fn set_color_mode(&mut self, mode: ColorMode) -> DriverResult<()>;

    /// Allocate a device frame buffer of the given geometry.
    fn allocate_buffer(
        &mut self,
        width: usize,
        height: usize,
        bit_depth: u32,
    ) -> DriverResult<BufferToken>;

    /// Trigger one exposure into the buffer and block until it completes.
    fn trigger_exposure_blocking(&mut self, buffer: &BufferToken) -> DriverResult<()>;

    /// Copy the buffer contents into host memory. `dest` must hold exactly
    /// the allocated `width * height` samples.
    fn copy_buffer(&mut self, buffer: &BufferToken, dest: &mut [u16]) -> DriverResult<()>;

    /// Release a device frame buffer.
    fn free_buffer(&mut self, buffer: BufferToken) -> DriverResult<()>;

    /// Read the internal device temperature in degrees Celsius.
    fn temperature_celsius(&self) -> DriverResult<f64>;
}
