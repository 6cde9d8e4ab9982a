use super::CaptureSource;
use anyhow::{Context, Result};
use image::RgbImage;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraIndex, ControlValueSetter, KnownCameraControl, RequestedFormat, RequestedFormatType,
    Resolution,
};
use nokhwa::Camera;

pub struct WebcamCapture {
    camera: Camera,
}

impl WebcamCapture {
    /// Open a webcam and start streaming.
    ///
    /// `brightness` is applied once after opening; devices that refuse the
    /// control keep their own setting.
    pub fn new(device_index: u32, width: u32, height: u32, brightness: Option<i64>) -> Result<Self> {
        tracing::info!(
            "Initializing webcam {} at {}x{}",
            device_index,
            width,
            height
        );

        let index = CameraIndex::Index(device_index);
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::HighestResolution(
            Resolution::new(width, height),
        ));

        let mut camera = Camera::new(index, requested).context("Failed to open camera")?;

        if let Some(value) = brightness {
            match camera.set_camera_control(
                KnownCameraControl::Brightness,
                ControlValueSetter::Integer(value),
            ) {
                Ok(()) => tracing::info!("Brightness set to {}", value),
                Err(e) => tracing::warn!("Camera refused brightness {}: {}", value, e),
            }
        }

        camera
            .open_stream()
            .context("Failed to open camera stream")?;

        let actual = camera.resolution();
        tracing::info!(
            "Webcam initialized at {}x{}",
            actual.width(),
            actual.height()
        );

        Ok(Self { camera })
    }
}

impl CaptureSource for WebcamCapture {
    fn capture_frame(&mut self) -> Result<RgbImage> {
        let frame = self
            .camera
            .frame()
            .context("Failed to capture frame")?;

        let decoded = frame
            .decode_image::<RgbFormat>()
            .context("Failed to decode frame")?;

        Ok(decoded)
    }

    fn resolution(&self) -> (u32, u32) {
        let resolution = self.camera.resolution();
        (resolution.width(), resolution.height())
    }

    fn is_open(&self) -> bool {
        self.camera.is_stream_open()
    }
}
