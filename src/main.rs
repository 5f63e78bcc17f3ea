use std::time::Duration;

use mvcam_capture_rs::camera::{AcquisitionController, CaptureConfig};
use mvcam_capture_rs::logger;

use anyhow::Context;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    logger::init();

    info!("Starting mvcam_capture...");

    let config = CaptureConfig::builder()
        .exposure_time_us(15_000.0)
        .frames_to_average(1)
        .settle_delay(Duration::from_millis(250))
        .build();
    let mut camera = AcquisitionController::new(config);

    camera.connect().context("camera connection failed")?;

    info!("Exposure: {:.1} us", camera.exposure_time_us()?);
    info!("Pixel size: {:.2} um", camera.pixel_size_microns()?);
    let (height, width) = camera.frame_dimensions()?;
    info!("Output plane dimensions: {height}x{width}");

    match camera.capture_planes() {
        Ok(planes) => info!(
            "Captured planes: R {}x{}, first sample {:.1}",
            planes.r.height,
            planes.r.width,
            planes.r.get(0, 0)
        ),
        Err(e) => error!("Capture failed: {e}"),
    }

    if let Err(e) = camera.disconnect() {
        error!("Disconnect failed: {e}");
    }

    Ok(())
}
