// Opens the default camera and converts frames into a buffer suitable for the window.
// Visual expectation: when main.rs calls `next_frame()`, you get a mirrored
// Vec<u32> at exactly the requested size, each pixel 0x00RRGGBB.

use crate::error::{Error, Result};
use crate::types::FrameBuffer;
use crate::vision::mirror_horizontal;

use log::{info, warn};
// Bring in nokhwa types for camera control.
use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{
        CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
    },
};

// `image` does the resize when the device won't give us the size we asked for.
use image::{RgbImage, imageops::{self, FilterType}};

// A small wrapper around nokhwa::Camera so our main loop stays clean.
pub struct CameraCapture {
    cam: Camera,
    width: u32,   // size handed to the game (the requested one)
    height: u32,
}

impl CameraCapture {
    /// Open camera `index` asking for `width × height`. Whatever the device
    /// actually streams is resized to that on every frame.
    pub fn new(index: u32, width: u32, height: u32) -> Result<Self> {
        let idx = CameraIndex::Index(index);

        let fmt = CameraFormat::new(
            Resolution::new(width, height),
            FrameFormat::YUYV, // uncompressed; cheap to convert to RGB
            30,                // target FPS
        );
        let req = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(fmt));

        let mut cam = Camera::new(idx, req)
            .map_err(|e| Error::CameraInit(format!("Create camera: {e}")))?;
        cam.open_stream()
            .map_err(|e| Error::CameraInit(format!("Open stream: {e}")))?;

        let actual = cam.resolution();
        if (actual.width(), actual.height()) != (width, height) {
            warn!(
                "camera streams {}x{}, frames will be resized to {width}x{height}",
                actual.width(),
                actual.height()
            );
        } else {
            info!("camera {index} streaming {width}x{height}");
        }

        Ok(Self { cam, width, height })
    }

    /// Grab one frame (blocks until the camera has one), resize if needed,
    /// mirror it, and pack as 0x00RRGGBB.
    pub fn next_frame(&mut self) -> Result<FrameBuffer> {
        let frame = self
            .cam
            .frame()
            .map_err(|e| Error::CaptureFailure(format!("Fetch frame: {e}")))?;

        let decoded = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| Error::CaptureFailure(format!("Decode RGB: {e}")))?;
        let (dw, dh) = decoded.dimensions();
        let mut rgb_img = RgbImage::from_raw(dw, dh, decoded.into_raw()).ok_or_else(|| {
            Error::CaptureFailure(format!("Decode RGB: short buffer for {dw}x{dh}"))
        })?;

        if rgb_img.dimensions() != (self.width, self.height) {
            rgb_img = imageops::resize(&rgb_img, self.width, self.height, FilterType::Triangle);
        }

        let (w, h) = rgb_img.dimensions();
        let mut out = Vec::with_capacity((w as usize) * (h as usize));
        for pixel in rgb_img.pixels() {
            let r = pixel[0] as u32;
            let g = pixel[1] as u32;
            let b = pixel[2] as u32;
            out.push((r << 16) | (g << 8) | b);
        }

        let mut fb = FrameBuffer {
            width: w as usize,
            height: h as usize,
            pixels: out,
        };
        mirror_horizontal(&mut fb);
        Ok(fb)
    }

    /// The frame size `next_frame` delivers.
    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
