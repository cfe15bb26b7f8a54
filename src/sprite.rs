// The falling icon: a small RGB picture plus which of its pixels are solid.
// Visual: only the solid pixels get drawn over the camera image, and only the
// solid pixels can be "touched" by your hand.
use std::path::Path;

use image::{GenericImageView, RgbImage, imageops::FilterType};
use log::info;

use crate::error::{Error, Result};
use crate::vision::luma;

pub const ICON_PATH: &str = "logo.png";

/// Pixels with intensity at or below this are treated as transparent.
pub const OPAQUE_CUTOFF: u8 = 1;

#[derive(Clone, Debug)]
pub struct Sprite {
    pub size: usize,       // square: size x size
    pub pixels: Vec<u32>,  // 0x00RRGGBB
    pub opaque: Vec<bool>, // true where the icon is solid
}

impl Sprite {
    /// Load an image file and scale it to `size × size`.
    pub fn load(path: impl AsRef<Path>, size: u32) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::AssetNotFound(path.to_path_buf()));
        }
        let img = image::open(path)
            .map_err(|e| Error::AssetDecode(format!("{}: {e}", path.display())))?;
        let rgb = img.resize_exact(size, size, FilterType::Triangle).to_rgb8();
        let (w, h) = (img.width(), img.height());
        info!("loaded icon {} ({w}x{h} → {size}x{size})", path.display());
        Ok(Self::from_rgb(&rgb))
    }

    /// Build from an already-sized square RGB image.
    pub fn from_rgb(img: &RgbImage) -> Self {
        let size = img.width().min(img.height()) as usize;
        let mut pixels = Vec::with_capacity(size * size);
        for y in 0..size as u32 {
            for x in 0..size as u32 {
                let p = img.get_pixel(x, y);
                pixels.push(((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32);
            }
        }
        Self::with_derived_mask(size, pixels)
    }

    /// Build from `size * size` packed pixels; the opaque mask is derived from
    /// intensity.
    pub fn from_pixels(size: usize, pixels: Vec<u32>) -> Result<Self> {
        Error::check_len((size, size), pixels.len())?;
        Ok(Self::with_derived_mask(size, pixels))
    }

    fn with_derived_mask(size: usize, pixels: Vec<u32>) -> Self {
        let opaque = pixels
            .iter()
            .map(|&px| luma(px).round() as u8 > OPAQUE_CUTOFF)
            .collect();
        Self { size, pixels, opaque }
    }

    /// A fully opaque square of one color.
    pub fn solid(size: usize, color: u32) -> Self {
        Self { size, pixels: vec![color; size * size], opaque: vec![true; size * size] }
    }

    #[inline]
    pub fn is_opaque(&self, x: usize, y: usize) -> bool {
        self.opaque[y * self.size + x]
    }
}
