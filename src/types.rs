// Grids that flow through one tick: color frame in, gray frame to the estimator,
// foreground mask out to the game.

#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the frame is on screen (pixels)
    pub height: usize,     // how tall the frame is on screen (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A frame filled with one color.
    pub fn filled(width: usize, height: usize, color: u32) -> Self {
        Self { width, height, pixels: vec![color; width * height] }
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

/// 8-bit intensity grid, row-major. This is what the background estimator consumes.
#[derive(Clone, Debug, PartialEq)]
pub struct GrayFrame {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,   // length = width * height
}

impl GrayFrame {
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0)
    }

    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self { width, height, pixels: vec![value; width * height] }
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: u8) {
        self.pixels[y * self.width + x] = v;
    }
}

/// Binary motion mask: `true` = foreground (something moved here).
#[derive(Clone, Debug, PartialEq)]
pub struct ForegroundMask {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<bool>,
}

impl ForegroundMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, false)
    }

    pub fn filled(width: usize, height: usize, value: bool) -> Self {
        Self { width, height, cells: vec![value; width * height] }
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Out-of-range coordinates read as background, so callers can probe
    /// footprints that hang over the edge.
    #[inline]
    pub fn is_foreground(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: bool) {
        self.cells[y * self.width + x] = v;
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}
