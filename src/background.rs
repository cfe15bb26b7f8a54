// Rolling background model.
// Visual expectation: after the first few frames, anything that stays still
// melts into the background, and only things that move (your hand) light up
// in the foreground mask.
//
// The last N frames live in one flat ring buffer; the per-pixel mean is kept
// alongside and updated in O(1) per pixel once the window is full.

use crate::error::{Error, Result};
use crate::types::{ForegroundMask, GrayFrame};
use log::{debug, info};

/// A pixel is foreground when it differs from the background by more than this (0..255 scale).
pub const FOREGROUND_THRESHOLD: u8 = 15;

/// Steady-state ticks between exact recomputations of the mean (bounds f32 drift).
pub const RESYNC_INTERVAL: u64 = 4096;

pub struct BackgroundEstimator {
    width: usize,
    height: usize,
    capacity: usize,       // window length N
    slots: Vec<u8>,        // capacity * width * height samples, one frame per slot
    head: usize,           // slot index of the oldest frame
    len: usize,            // frames currently held (<= capacity)
    mean: Vec<f32>,        // running mean of the held frames
    threshold: u8,
    steady_ticks: u64,     // ticks since the last exact recompute (steady state only)
}

impl BackgroundEstimator {
    /// Allocate a zeroed mean and an empty window of `window_size` frames.
    pub fn new(width: usize, height: usize, window_size: usize) -> Result<Self> {
        Self::with_threshold(width, height, window_size, FOREGROUND_THRESHOLD)
    }

    pub fn with_threshold(
        width: usize,
        height: usize,
        window_size: usize,
        threshold: u8,
    ) -> Result<Self> {
        if window_size == 0 {
            return Err(Error::InvalidConfiguration("window size must be at least 1".into()));
        }
        if width == 0 || height == 0 {
            return Err(Error::InvalidConfiguration(format!(
                "frame dimensions must be positive, got {width}x{height}"
            )));
        }

        let area = width * height;
        debug!(
            "background estimator: {width}x{height}, window {window_size}, threshold {threshold}"
        );
        Ok(Self {
            width,
            height,
            capacity: window_size,
            slots: vec![0u8; window_size * area],
            head: 0,
            len: 0,
            mean: vec![0.0; area],
            threshold,
            steady_ticks: 0,
        })
    }

    /// Feed one frame and get the foreground mask for it.
    ///
    /// The frame is folded into the window first; the mask is then computed
    /// against the updated mean (same order during warm-up and steady state).
    pub fn observe(&mut self, frame: &GrayFrame) -> Result<ForegroundMask> {
        Error::check_dims((self.width, self.height), frame.dims())?;
        Error::check_len((self.width, self.height), frame.pixels.len())?;

        if self.len < self.capacity {
            self.push_warmup(frame);
            if self.len == self.capacity {
                info!("background model warm ({} frames)", self.capacity);
            }
        } else {
            self.push_steady(frame);
        }

        Ok(self.foreground_of(frame))
    }

    // Warm-up path: append and take the exact average of what we hold.
    fn push_warmup(&mut self, frame: &GrayFrame) {
        let slot = (self.head + self.len) % self.capacity;
        self.slot_mut(slot).copy_from_slice(&frame.pixels);
        self.len += 1;
        self.recompute_mean();
    }

    // Steady-state path: overwrite the oldest slot and shift the mean by
    // (new - old) / N at every pixel.
    fn push_steady(&mut self, frame: &GrayFrame) {
        let area = self.width * self.height;
        let n = self.capacity as f32;
        let start = self.head * area;
        let oldest = &mut self.slots[start..start + area];

        let samples = self.mean.iter_mut().zip(oldest.iter_mut()).zip(frame.pixels.iter());
        for ((m, old), &new) in samples {
            *m -= *old as f32 / n;
            *m += new as f32 / n;
            *old = new;
        }
        self.head = (self.head + 1) % self.capacity;

        self.steady_ticks += 1;
        if self.steady_ticks >= RESYNC_INTERVAL {
            self.recompute_mean();
            debug!("background mean resynced after {RESYNC_INTERVAL} ticks");
        }
    }

    /// Exact average of the frames currently in the window.
    pub fn exact_mean(&self) -> Vec<f32> {
        let area = self.width * self.height;
        let mut acc = vec![0.0f32; area];
        if self.len == 0 {
            return acc;
        }
        for i in 0..self.len {
            let slot = (self.head + i) % self.capacity;
            for (a, &v) in acc.iter_mut().zip(self.slot(slot)) {
                *a += v as f32;
            }
        }
        let n = self.len as f32;
        for a in &mut acc {
            *a /= n;
        }
        acc
    }

    fn recompute_mean(&mut self) {
        self.mean = self.exact_mean();
        self.steady_ticks = 0;
    }

    // |frame - round(mean)| > threshold, per pixel.
    fn foreground_of(&self, frame: &GrayFrame) -> ForegroundMask {
        let cells = frame
            .pixels
            .iter()
            .zip(self.mean.iter())
            .map(|(&px, &m)| px.abs_diff(mean_to_u8(m)) > self.threshold)
            .collect();
        ForegroundMask { width: self.width, height: self.height, cells }
    }

    /// The background estimate as an image (mean rounded into 0..=255).
    pub fn background(&self) -> GrayFrame {
        GrayFrame {
            width: self.width,
            height: self.height,
            pixels: self.mean.iter().map(|&m| mean_to_u8(m)).collect(),
        }
    }

    /// Drop the window and zero the mean; the next frames warm up again.
    pub fn reset(&mut self) {
        self.head = 0;
        self.len = 0;
        self.steady_ticks = 0;
        self.mean.iter_mut().for_each(|m| *m = 0.0);
    }

    pub fn mean(&self) -> &[f32] {
        &self.mean
    }

    /// Frames currently held.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True once the window holds `capacity` frames.
    pub fn is_warm(&self) -> bool {
        self.len == self.capacity
    }

    fn slot(&self, idx: usize) -> &[u8] {
        let area = self.width * self.height;
        &self.slots[idx * area..(idx + 1) * area]
    }

    fn slot_mut(&mut self, idx: usize) -> &mut [u8] {
        let area = self.width * self.height;
        &mut self.slots[idx * area..(idx + 1) * area]
    }
}

#[inline]
fn mean_to_u8(m: f32) -> u8 {
    m.round().clamp(0.0, 255.0) as u8
}
