// Frame preprocessing around the background model.
// Visual expectation: the color camera frame is shrunk, turned gray and softened
// before the estimator sees it; the resulting motion mask is blown back up to
// full size so it lines up with what you see on screen.
use crate::background::BackgroundEstimator;
use crate::error::{Error, Result};
use crate::types::{ForegroundMask, FrameBuffer, GrayFrame};
use log::info;

/// Binomial approximation of a 5-tap Gaussian (sums to 16).
const GAUSS5: [u32; 5] = [1, 4, 6, 4, 1];

/// Perceptual luminance of a 0x00RRGGBB pixel (ITU-R BT.601 weights).
#[inline]
pub fn luma(px: u32) -> f32 {
    let r = ((px >> 16) & 0xFF) as f32;
    let g = ((px >> 8) & 0xFF) as f32;
    let b = (px & 0xFF) as f32;
    0.299 * r + 0.587 * g + 0.114 * b
}

/// Mirror the frame left↔right in place.
/// Visual: moving your right hand moves the hand on the right of the screen.
pub fn mirror_horizontal(fb: &mut FrameBuffer) {
    let w = fb.width;
    if w == 0 {
        return;
    }
    for row in fb.pixels.chunks_exact_mut(w) {
        row.reverse();
    }
}

/// Grayscale + shrink by an integer factor, averaging each `scale × scale` block.
/// Leftover columns/rows that don't fill a whole block are dropped.
pub fn downscale_gray_into(src: &FrameBuffer, scale: usize, dst: &mut GrayFrame) -> Result<()> {
    if scale == 0 {
        return Err(Error::InvalidConfiguration("downscale factor must be at least 1".into()));
    }
    Error::check_dims((src.width / scale, src.height / scale), dst.dims())?;

    let area = (scale * scale) as f32;
    for dy in 0..dst.height {
        for dx in 0..dst.width {
            let mut sum = 0.0f32;
            for sy in dy * scale..(dy + 1) * scale {
                let row_ofs = sy * src.width;
                for sx in dx * scale..(dx + 1) * scale {
                    sum += luma(src.pixels[row_ofs + sx]);
                }
            }
            dst.set(dx, dy, (sum / area).round().clamp(0.0, 255.0) as u8);
        }
    }
    Ok(())
}

/// Index into `0..n` mirrored about the edge pixel without repeating it
/// (`-1 -> 1`, `n -> n - 2`).
#[inline]
fn reflect_101(i: i32, n: i32) -> i32 {
    if n == 1 {
        return 0;
    }
    if i < 0 {
        -i
    } else if i >= n {
        2 * n - 2 - i
    } else {
        i
    }
}

/// 5x5 Gaussian blur as two separable passes; borders are reflected (`dcb|abcd|cba`).
/// `tmp` holds the horizontal pass at 16x precision so rounding happens once.
pub fn gaussian_blur_5x5(src: &GrayFrame, tmp: &mut Vec<u16>, dst: &mut GrayFrame) -> Result<()> {
    Error::check_dims(src.dims(), dst.dims())?;
    let w = src.width as i32;
    let h = src.height as i32;
    tmp.resize(src.pixels.len(), 0);

    /* ---- Pass 1: Horizontal (src → tmp) ---- */
    for y in 0..h {
        let row_ofs = (y * w) as usize;
        for x in 0..w {
            let mut acc = 0u32;
            for (k, &wt) in GAUSS5.iter().enumerate() {
                let xs = reflect_101(x + k as i32 - 2, w) as usize;
                acc += wt * src.pixels[row_ofs + xs] as u32;
            }
            tmp[row_ofs + x as usize] = acc as u16; // at most 255 * 16
        }
    }

    /* ---- Pass 2: Vertical (tmp → dst) ---- */
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0u32;
            for (k, &wt) in GAUSS5.iter().enumerate() {
                let ys = reflect_101(y + k as i32 - 2, h);
                acc += wt * tmp[(ys * w + x) as usize] as u32;
            }
            // acc is value * 256; add half for round-to-nearest
            dst.pixels[(y * w + x) as usize] = ((acc + 128) >> 8).min(255) as u8;
        }
    }
    Ok(())
}

/// Nearest-neighbour enlarge by an integer factor.
pub fn upscale_mask(src: &ForegroundMask, factor: usize) -> ForegroundMask {
    let (w, h) = (src.width * factor, src.height * factor);
    let mut out = ForegroundMask::new(w, h);
    for y in 0..h {
        let sy = y / factor;
        for x in 0..w {
            if src.cells[sy * src.width + x / factor] {
                out.set(x, y, true);
            }
        }
    }
    out
}

/// Full motion pipeline: color frame in, full-resolution foreground mask out.
pub struct MotionDetector {
    scale: usize,
    frame_dims: (usize, usize),
    estimator: BackgroundEstimator,
    small: GrayFrame,    // downscaled gray frame (scratch)
    blurred: GrayFrame,  // denoised gray frame, what the estimator sees
    blur_tmp: Vec<u16>,
}

impl MotionDetector {
    /// `width × height` is the camera frame size; the estimator runs at `1/scale` of it.
    pub fn new(width: usize, height: usize, scale: usize, window_size: usize) -> Result<Self> {
        if scale == 0 {
            return Err(Error::InvalidConfiguration("downscale factor must be at least 1".into()));
        }
        let (sw, sh) = (width / scale, height / scale);
        let estimator = BackgroundEstimator::new(sw, sh, window_size)?;
        info!(
            "motion detector: {width}x{height} frames, estimator at {sw}x{sh}, window {window_size}"
        );

        Ok(Self {
            scale,
            frame_dims: (width, height),
            estimator,
            small: GrayFrame::new(sw, sh),
            blurred: GrayFrame::new(sw, sh),
            blur_tmp: Vec::with_capacity(sw * sh),
        })
    }

    /// Process one camera frame. The returned mask is `(width/scale)*scale` by
    /// `(height/scale)*scale`, i.e. the frame size when it divides evenly.
    pub fn apply(&mut self, frame: &FrameBuffer) -> Result<ForegroundMask> {
        Error::check_dims(self.frame_dims, frame.dims())?;
        Error::check_len(self.frame_dims, frame.pixels.len())?;
        downscale_gray_into(frame, self.scale, &mut self.small)?;
        gaussian_blur_5x5(&self.small, &mut self.blur_tmp, &mut self.blurred)?;
        let small_mask = self.estimator.observe(&self.blurred)?;
        Ok(upscale_mask(&small_mask, self.scale))
    }

}
