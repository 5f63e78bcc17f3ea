use thiserror::Error;

#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Failed to connect to the camera: {0}")]
    ConnectionFailure(String),

    #[error("Failed to disconnect from the camera: {0}")]
    DisconnectionFailure(String),

    #[error("Sensor type not recognized (neither color nor monochrome)")]
    UnrecognizedSensorType,

    #[error("Pixel size could not be queried from the camera")]
    MissingCalibrationData,

    #[error("Device command failed with driver status code {code}")]
    DeviceCommandFailure { code: i32 },

    #[error("Temperature readout failed with driver status code {code}")]
    TemperatureReadFailure { code: i32 },

    #[error("Invalid frame geometry: width={width}, height={height}, samples={samples}")]
    InvalidFrameGeometry {
        width: usize,
        height: usize,
        samples: usize,
    },
}

pub type Result<T> = std::result::Result<T, CameraError>;
