//! Re-encoding of an `EdgeMap` into the layout a display wants.

use crate::error::Result;
use crate::frame::{DisplayFrame, EdgeMap, PixelFormat};

/// Pack an intensity into 5-6-5, little endian.
fn gray_to_rgb565(v: u8) -> [u8; 2] {
    let r = (v >> 3) as u16;
    let g = (v >> 2) as u16;
    let b = (v >> 3) as u16;
    ((r << 11) | (g << 5) | b).to_le_bytes()
}

/// Convert the edge map into a `DisplayFrame` of the requested format.
pub fn to_display_frame(edges: &EdgeMap, format: PixelFormat) -> Result<DisplayFrame> {
    let raw = edges.image().as_raw();
    let mut data: Vec<u8> = Vec::with_capacity(raw.len() * format.bytes_per_pixel());
    match format {
        PixelFormat::Grayscale => data.extend_from_slice(raw),
        // Gray has identical channels, so the channel order does not matter.
        PixelFormat::Rgb888 | PixelFormat::Bgr888 => {
            for v in raw.iter() {
                data.extend_from_slice(&[*v, *v, *v]);
            }
        }
        PixelFormat::Rgb565 => {
            for v in raw.iter() {
                data.extend_from_slice(&gray_to_rgb565(*v));
            }
        }
    }
    DisplayFrame::new(edges.width(), edges.height(), format, data)
}
