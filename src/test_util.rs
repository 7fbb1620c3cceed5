use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use std::path::PathBuf;

use crate::frame::SourceImage;

/// A white rectangle on black, inset by `margin` on every side.
pub fn square_on_black(width: u32, height: u32, margin: u32) -> RgbImage {
    let mut image = RgbImage::new(width, height);
    draw_filled_rect_mut(
        &mut image,
        Rect::at(margin as i32, margin as i32).of_size(width - 2 * margin, height - 2 * margin),
        Rgb([255u8, 255u8, 255u8]),
    );
    image
}

/// Square source image of `size` with a centered square on it.
pub fn source_square(size: u32) -> SourceImage {
    SourceImage::from_rgb(square_on_black(size, size, size / 4))
}

/// Fresh path in the temp directory, anything already there is removed.
pub fn scratch_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("edge_show_{}_{name}", std::process::id()));
    if path.is_dir() {
        let _ = std::fs::remove_dir_all(&path);
    } else if path.exists() {
        let _ = std::fs::remove_file(&path);
    }
    path
}
