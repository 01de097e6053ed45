// Opens a webcam and hands out RGB frames, mirrored so that moving the marker
// to the right moves the brush to the right on screen.

use crate::error::Error;

use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

use image::{RgbImage, imageops};

// A small wrapper around nokhwa::Camera so the main loops stay clean.
pub struct CameraCapture {
    cam: Camera,
    width: u32,
    height: u32,
    mirror: bool,
}

impl CameraCapture {
    /// Open camera `index` near the requested resolution and start streaming.
    pub fn new(index: u32, width: u32, height: u32, mirror: bool) -> Result<Self, Error> {
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,                // target FPS
        );

        // Ask for RGB frames, taking the format closest to our request.
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;

        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        // The actual stream might choose a slightly different resolution.
        let actual = cam.resolution();
        tracing::info!(
            index,
            width = actual.width(),
            height = actual.height(),
            "camera stream opened"
        );

        Ok(Self {
            cam,
            width: actual.width(),
            height: actual.height(),
            mirror,
        })
    }

    /// Block until the next frame arrives and decode it to RGB.
    pub fn next_frame(&mut self) -> Result<RgbImage, Error> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CameraFrame(format!("Fetch frame: {e}")))?;

        let decoded = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CameraFrame(format!("Decode RGB: {e}")))?;

        // nokhwa may link a different `image` release; move the raw bytes over.
        let (w, h) = decoded.dimensions();
        if (w, h) != (self.width, self.height) {
            return Err(Error::DimensionMismatch {
                expected: (self.width, self.height),
                actual: (w, h),
            });
        }
        let mut rgb = RgbImage::from_raw(w, h, decoded.into_raw())
            .ok_or_else(|| Error::CameraFrame("Decode RGB: short buffer".into()))?;
        if self.mirror {
            imageops::flip_horizontal_in_place(&mut rgb);
        }
        Ok(rgb)
    }

    /// Report the actual resolution the camera is delivering.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
