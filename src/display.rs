//! Display backends.
//!
//! - `ImageSequenceDisplay`: frames become png files in a directory.
//! - `FramebufferDisplay`: frames are blitted into a raw framebuffer device or file.
//! - `HeadlessDisplay`: frames are counted and dropped.

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::config::DisplayConfig;
use crate::error::{Error, Result};
use crate::frame::{DisplayFrame, PixelFormat};
use crate::interface::Display;

/// Writes every frame as a png into a directory.
#[derive(Debug)]
pub struct ImageSequenceDisplay {
    directory: PathBuf,
    format: PixelFormat,
    overwrite: bool,
    shown: u64,
}

impl ImageSequenceDisplay {
    /// Creates the directory if needed. With `overwrite` only `latest.png` is kept.
    pub fn open(directory: &Path, format: PixelFormat, overwrite: bool) -> Result<ImageSequenceDisplay> {
        std::fs::create_dir_all(directory)?;
        Ok(ImageSequenceDisplay {
            directory: directory.to_path_buf(),
            format,
            overwrite,
            shown: 0,
        })
    }

    fn frame_path(&self, index: u64) -> PathBuf {
        if self.overwrite {
            self.directory.join("latest.png")
        } else {
            self.directory.join(format!("frame_{index:06}.png"))
        }
    }
}

impl Display for ImageSequenceDisplay {
    fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    fn show(&mut self, frame: &DisplayFrame) -> Result<()> {
        let path = self.frame_path(self.shown);
        frame.to_rgb_image().save(&path)?;
        log::debug!("wrote frame {} to {}", self.shown, path.display());
        self.shown += 1;
        Ok(())
    }
}

/// Raw framebuffer, frames are drawn at the top left and clipped to its size.
#[derive(Debug)]
pub struct FramebufferDisplay {
    file: File,
    width: u32,
    height: u32,
    format: PixelFormat,
    canvas: Vec<u8>,
}

impl FramebufferDisplay {
    pub fn open(path: &Path, width: u32, height: u32, format: PixelFormat) -> Result<FramebufferDisplay> {
        if width == 0 || height == 0 {
            return Err(Error::Display(format!(
                "framebuffer {} has no area ({width}x{height})",
                path.display()
            )));
        }
        let file = OpenOptions::new()
            .write(true)
            .create(!path.starts_with("/dev"))
            .open(path)
            .map_err(|e| Error::Display(format!("unable to open {}: {e}", path.display())))?;
        let canvas = vec![0u8; width as usize * height as usize * format.bytes_per_pixel()];
        Ok(FramebufferDisplay {
            file,
            width,
            height,
            format,
            canvas,
        })
    }

    /// Copy the frame into the canvas, clearing what the frame does not cover.
    fn blit(&mut self, frame: &DisplayFrame) {
        let bpp = self.format.bytes_per_pixel();
        let canvas_stride = self.width as usize * bpp;
        let copy_width = std::cmp::min(self.width, frame.width()) as usize * bpp;
        let copy_rows = std::cmp::min(self.height, frame.height()) as usize;

        self.canvas.iter_mut().for_each(|v| *v = 0);
        let src_stride = frame.stride();
        for y in 0..copy_rows {
            let src = &frame.data()[y * src_stride..y * src_stride + copy_width];
            self.canvas[y * canvas_stride..y * canvas_stride + copy_width].copy_from_slice(src);
        }
    }
}

impl Display for FramebufferDisplay {
    fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    fn show(&mut self, frame: &DisplayFrame) -> Result<()> {
        if frame.format() != self.format {
            return Err(Error::Display(format!(
                "framebuffer expects {:?}, got {:?}",
                self.format,
                frame.format()
            )));
        }
        self.blit(frame);
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&self.canvas)?;
        self.file.flush()?;
        Ok(())
    }
}

/// Accepts frames without presenting them.
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    format: PixelFormat,
    shown: u64,
}

impl HeadlessDisplay {
    pub fn new(format: PixelFormat) -> HeadlessDisplay {
        HeadlessDisplay { format, shown: 0 }
    }
}

impl Drop for HeadlessDisplay {
    fn drop(&mut self) {
        log::info!("headless display accepted {} frames", self.shown);
    }
}

impl Display for HeadlessDisplay {
    fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    fn show(&mut self, frame: &DisplayFrame) -> Result<()> {
        log::trace!("headless frame {}x{}", frame.width(), frame.height());
        self.shown += 1;
        Ok(())
    }
}

/// Construct the backend selected in the config.
pub fn open_display(config: &DisplayConfig) -> Result<Box<dyn Display>> {
    let display: Box<dyn Display> = match config {
        DisplayConfig::ImageSequence {
            directory,
            format,
            overwrite,
        } => {
            log::info!("writing frames to {}", directory.display());
            Box::new(ImageSequenceDisplay::open(directory, *format, *overwrite)?)
        }
        DisplayConfig::Framebuffer {
            path,
            width,
            height,
            format,
        } => {
            log::info!("framebuffer {} at {width}x{height} {format:?}", path.display());
            Box::new(FramebufferDisplay::open(path, *width, *height, *format)?)
        }
        DisplayConfig::Headless { format } => {
            log::info!("headless display");
            Box::new(HeadlessDisplay::new(*format))
        }
    };
    Ok(display)
}
