//! Canny edge detection on a working frame.

use image::imageops::colorops::grayscale;
use imageproc::edges::canny;

use crate::error::{Error, Result};
use crate::frame::{EdgeMap, WorkingFrame};

pub const DEFAULT_THRESHOLDS: (f32, f32) = (180.0, 60.0);

/// Hysteresis thresholds for the edge detector, always stored with `low <= high`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EdgeThresholds {
    low: f32,
    high: f32,
}

impl EdgeThresholds {
    /// Accepts the two thresholds in either order, the smaller becomes the low threshold.
    pub fn from_pair(a: f32, b: f32) -> Result<EdgeThresholds> {
        if !a.is_finite() || !b.is_finite() || a < 0.0 || b < 0.0 {
            return Err(Error::InvalidThresholds(a, b));
        }
        Ok(EdgeThresholds {
            low: a.min(b),
            high: a.max(b),
        })
    }

    pub fn low(&self) -> f32 {
        self.low
    }

    pub fn high(&self) -> f32 {
        self.high
    }
}

impl Default for EdgeThresholds {
    fn default() -> Self {
        EdgeThresholds {
            low: DEFAULT_THRESHOLDS.1,
            high: DEFAULT_THRESHOLDS.0,
        }
    }
}

/// Run Canny on the luma of `frame`, the result has the frame's dimensions.
pub fn detect_edges(frame: &WorkingFrame, thresholds: &EdgeThresholds) -> EdgeMap {
    let gray = grayscale(&frame.image);
    EdgeMap::from_gray(canny(&gray, thresholds.low, thresholds.high))
}
