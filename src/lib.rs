// Loads an image once, then keeps running it through Canny edge detection and
// presenting the result, timing the edge and conversion steps of every frame.

pub mod config;
pub mod convert;
pub mod display;
pub mod edges;
pub mod error;
pub mod exit;
pub mod frame;
pub mod frame_loop;

mod interface;
pub use interface::*;

// Synthetic images for the tests, and for the benchmark through the test_util feature.
#[cfg(any(test, feature = "test_util"))]
pub mod test_util;

pub use error::{Error, Result};

use config::Config;
use exit::ExitFlag;
use frame::SourceImage;
use frame_loop::{LoopSettings, LoopSummary};

/// Load the image, open the display and run the loop until `exit` is requested.
///
/// The image is loaded before the display is opened, so a bad image path never touches the
/// display.
pub fn run(config: &Config, exit: &ExitFlag) -> Result<LoopSummary> {
    let thresholds = config.edge_thresholds()?;
    let source = SourceImage::open(&config.image)?;
    log::info!(
        "loaded {} ({}x{})",
        config.image.display(),
        source.width(),
        source.height()
    );

    let mut display = display::open_display(&config.display)?;
    let settings = LoopSettings {
        thresholds,
        max_frames: config.max_frames,
    };

    let stdout = std::io::stdout();
    let mut report = stdout.lock();
    frame_loop::run_frame_loop(
        &source,
        &mut display,
        &MonotonicClock::new(),
        exit,
        &settings,
        &mut report,
    )
}
