//! Driver-level data types
//!
//! Plain data exchanged with a [`CameraDriver`](super::CameraDriver)
//! implementation. Everything here is vendor-neutral; a driver adapter maps
//! its SDK structures into these types once, at the boundary.

use std::fmt;

/// Sensor color architecture, reported by the driver adapter at connect time.
///
/// The adapter is responsible for classifying the sensor (e.g. from a model
/// name suffix); downstream code only ever sees this tag and never re-parses
/// strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SensorType {
    /// Bayer color-filter-array sensor
    Color,
    /// Monochrome sensor
    Mono,
    /// Could not be classified; capture and geometry queries will fail
    #[default]
    Unknown,
}

/// Static sensor description queried from the device after opening it.
#[derive(Debug, Clone)]
pub struct SensorInfo {
    /// Vendor model name, informational only
    pub name: String,
    /// Color architecture tag
    pub sensor_type: SensorType,
    /// Full sensor width in pixels
    pub max_width: usize,
    /// Full sensor height in pixels
    pub max_height: usize,
    /// Physical pixel pitch in vendor units (hundredths of a micron);
    /// zero means the device carries no calibration data
    pub pixel_size_units: u32,
}

/// Automatic exposure/gain/white-balance features that are disabled as part
/// of the baseline settings applied on connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoFeature {
    Gain,
    SensorGain,
    Shutter,
    SensorShutter,
    WhiteBalance,
    SensorWhiteBalance,
}

impl AutoFeature {
    /// All features, in the order they are switched off during connect.
    pub const ALL: [Self; 6] = [
        Self::Gain,
        Self::SensorGain,
        Self::Shutter,
        Self::SensorShutter,
        Self::WhiteBalance,
        Self::SensorWhiteBalance,
    ];
}

/// Frame transfer mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Device-independent bitmap transfer into host memory
    Dib,
}

/// Pixel data format produced by the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Unprocessed 12-bit Bayer data, one sample per photosite
    SensorRaw12,
}

/// Hardware binning mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinningMode {
    /// Binning off, full resolution
    Disabled,
    /// 2x horizontal + 2x vertical binning
    TwoByTwo,
}

/// Opaque handle to a device-side frame buffer.
///
/// Obtained from [`CameraDriver::allocate_buffer`](super::CameraDriver::allocate_buffer)
/// and consumed by `free_buffer`; at most one buffer is in flight per device.
#[derive(Debug, PartialEq, Eq)]
pub struct BufferToken {
    pub(crate) id: u32,
}

impl BufferToken {
    pub fn new(id: u32) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

/// A failed driver call, carrying the vendor's numeric status code.
///
/// Translated into a `CameraError` kind at the controller boundary; the code
/// itself is preserved for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverError {
    pub code: i32,
}

impl DriverError {
    pub fn new(code: i32) -> Self {
        Self { code }
    }
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "driver status code {}", self.code)
    }
}

impl std::error::Error for DriverError {}

pub type DriverResult<T> = std::result::Result<T, DriverError>;
