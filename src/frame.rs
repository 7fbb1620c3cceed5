//! Raster types passed between the loop stages.
//!
//! - `SourceImage`: decoded once, never mutated.
//! - `WorkingFrame`: the per-iteration copy that is handed to edge detection.
//! - `EdgeMap`: single channel output of edge detection.
//! - `DisplayFrame`: bytes in the layout a display expects.

use std::path::Path;

use image::{GrayImage, Rgb, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The decoded image, loaded once at startup.
#[derive(Clone, Debug)]
pub struct SourceImage {
    image: RgbImage,
}

impl SourceImage {
    /// Decode the image at `path` into 8-bit RGB.
    pub fn open(path: &Path) -> Result<SourceImage> {
        let image = image::open(path)
            .map_err(|source| Error::Load {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgb8();
        Ok(SourceImage { image })
    }

    pub fn from_rgb(image: RgbImage) -> SourceImage {
        SourceImage { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Bit-for-bit copy for a single iteration.
    pub fn working_copy(&self) -> WorkingFrame {
        WorkingFrame {
            image: self.image.clone(),
        }
    }
}

/// Per-iteration copy of the source, exclusively owned by that iteration.
#[derive(Clone, Debug)]
pub struct WorkingFrame {
    pub(crate) image: RgbImage,
}

impl WorkingFrame {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }
}

/// Single-channel intensity buffer with the dimensions of the frame it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeMap {
    pub(crate) image: GrayImage,
}

impl EdgeMap {
    pub fn from_gray(image: GrayImage) -> EdgeMap {
        EdgeMap { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &GrayImage {
        &self.image
    }

    /// Number of non-zero pixels.
    pub fn edge_count(&self) -> usize {
        self.image.as_raw().iter().filter(|v| **v != 0).count()
    }
}

/// Pixel layouts a display may require.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    Grayscale,
    Rgb888,
    Bgr888,
    /// 5-6-5 packed, little endian.
    Rgb565,
}

impl PixelFormat {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelFormat::Grayscale => 1,
            PixelFormat::Rgb888 | PixelFormat::Bgr888 => 3,
            PixelFormat::Rgb565 => 2,
        }
    }
}

impl Default for PixelFormat {
    fn default() -> Self {
        PixelFormat::Rgb888
    }
}

/// A tightly packed frame ready to be presented.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayFrame {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl DisplayFrame {
    /// Wrap raw bytes, the length must match the dimensions and format.
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<DisplayFrame> {
        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if data.len() != expected {
            return Err(Error::Conversion(format!(
                "{width}x{height} {format:?} frame needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(DisplayFrame {
            width,
            height,
            format,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Bytes in a single row.
    pub fn stride(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }

    /// Decode back into 8-bit RGB, whatever the native format.
    pub fn to_rgb_image(&self) -> RgbImage {
        let bpp = self.format.bytes_per_pixel();
        let format = self.format;
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let offset = (y as usize * self.width as usize + x as usize) * bpp;
            let px = &self.data[offset..offset + bpp];
            match format {
                PixelFormat::Grayscale => Rgb([px[0], px[0], px[0]]),
                PixelFormat::Rgb888 => Rgb([px[0], px[1], px[2]]),
                PixelFormat::Bgr888 => Rgb([px[2], px[1], px[0]]),
                PixelFormat::Rgb565 => {
                    let v = u16::from_le_bytes([px[0], px[1]]);
                    let r = ((v >> 11) & 0x1f) as u8;
                    let g = ((v >> 5) & 0x3f) as u8;
                    let b = (v & 0x1f) as u8;
                    // Replicate the high bits into the low bits so 0x1f maps to 255.
                    Rgb([(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)])
                }
            }
        })
    }
}
