use std::time::Instant;

use crate::error::Result;
use crate::frame::{DisplayFrame, PixelFormat};

/// Something frames can be presented on.
pub trait Display {
    /// The layout `show` expects, frames are converted to this before presenting.
    fn pixel_format(&self) -> PixelFormat;
    /// Present a frame, may block until the device accepted it.
    fn show(&mut self, frame: &DisplayFrame) -> Result<()>;
}

impl<D: Display + ?Sized> Display for Box<D> {
    fn pixel_format(&self) -> PixelFormat {
        (**self).pixel_format()
    }
    fn show(&mut self, frame: &DisplayFrame) -> Result<()> {
        (**self).show(frame)
    }
}

/// Monotonic millisecond time source.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Clock counting milliseconds since its construction.
#[derive(Debug, Copy, Clone)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> MonotonicClock {
        MonotonicClock {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        MonotonicClock::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
