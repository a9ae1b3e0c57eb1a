//! Bar-chart rendering of the 24-hour history
//!
//! One pixel column per bucket: a grey pressure bar growing up from the
//! bottom edge, a constant guide line at standard pressure, and blue rain
//! marks sitting two rows above the bottom edge.

use std::ops::Range;

use crate::history::History;

/// Pressure mapped to a zero-height bar (hPa)
pub const PRESSURE_MIN: i32 = 900;

/// Standard atmospheric pressure, drawn as the guide line (hPa)
pub const PRESSURE_NORMAL: i32 = 1013;

/// Pixels per hPa above `PRESSURE_MIN`
pub const PRESSURE_SCALE: f64 = 0.6;

pub const MAX_PRESSURE_BAR: usize = 35;

/// Pixels per mm of forecast rain
pub const RAIN_SCALE: f64 = 100.0;

pub const MAX_RAIN_BAR: usize = 30;

const RAIN_BASELINE: usize = 2;
const NO_DATA_TICK: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub mod palette {
    use super::Rgb;

    pub const BACKGROUND: Rgb = Rgb(255, 255, 255);
    pub const PRESSURE_BAR: Rgb = Rgb(200, 200, 200);
    pub const NO_DATA: Rgb = Rgb(150, 150, 150);
    pub const REFERENCE_LINE: Rgb = Rgb(150, 150, 150);
    pub const RAIN: Rgb = Rgb(0, 0, 200);
}

/// Dense row-major RGB image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn filled(width: usize, height: usize, color: Rgb) -> Self {
        let data = [color.0, color.1, color.2].repeat(width * height);
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Color at column `x`, row `y` (row 0 is the top edge)
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y * self.width + x) * 3;
        Some(Rgb(
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ))
    }

    /// Raw RGB bytes, three per pixel
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Encode as a binary PPM (P6) image
    pub fn to_ppm(&self) -> Vec<u8> {
        let mut out = format!("P6\n{} {}\n255\n", self.width, self.height).into_bytes();
        out.extend_from_slice(&self.data);
        out
    }

    fn put(&mut self, x: usize, y: usize, color: Rgb) {
        if x >= self.width || y >= self.height {
            return;
        }
        let offset = (y * self.width + x) * 3;
        self.data[offset..offset + 3].copy_from_slice(&[color.0, color.1, color.2]);
    }

    fn fill_rows(&mut self, x: usize, rows: Range<usize>, color: Rgb) {
        for y in rows {
            self.put(x, y, color);
        }
    }
}

/// Round a scaled value to whole pixels, clamped to `[0, max]`
fn scaled_height(value: f64, max: usize) -> usize {
    let rounded = value.round();
    if rounded.is_nan() || rounded <= 0.0 {
        return 0;
    }
    (rounded as usize).min(max)
}

/// Render the history as a `width` x `height` bar chart.
///
/// Column `p` shows bucket `p`; columns past the last bucket keep the
/// background. Never fails: heights are clamped to the canvas.
/// On canvases shorter than 68 rows the standard-pressure guide lands on
/// the top row (row 0).
pub fn render(history: &History, width: usize, height: usize) -> PixelBuffer {
    let mut frame = PixelBuffer::filled(width, height, palette::BACKGROUND);
    if width == 0 || height == 0 {
        return frame;
    }
    let columns = width.min(history.bucket_count());

    for (x, &hpa) in history.pressure().iter().take(columns).enumerate() {
        if hpa == 0 {
            frame.fill_rows(x, height.saturating_sub(NO_DATA_TICK)..height, palette::NO_DATA);
            continue;
        }
        let above_min = f64::from(hpa) - f64::from(PRESSURE_MIN);
        let bar = scaled_height(PRESSURE_SCALE * above_min, MAX_PRESSURE_BAR).min(height);
        frame.fill_rows(x, height - bar..height, palette::PRESSURE_BAR);
    }

    let normal = f64::from(PRESSURE_NORMAL - PRESSURE_MIN);
    let reference = scaled_height(PRESSURE_SCALE * normal, height).max(1);
    let row = height - reference;
    for x in 0..width {
        frame.put(x, row, palette::REFERENCE_LINE);
    }

    let baseline = height.saturating_sub(RAIN_BASELINE);
    for (x, &mm) in history.rain().iter().take(columns).enumerate() {
        if mm == 0.0 {
            continue;
        }
        let mark = scaled_height(RAIN_SCALE * mm, MAX_RAIN_BAR);
        frame.fill_rows(x, baseline.saturating_sub(mark)..baseline, palette::RAIN);
    }

    frame
}
