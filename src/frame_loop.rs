//! The copy, edge detect, convert, report, present loop.

use std::fmt;
use std::io::Write;

use crate::convert::to_display_frame;
use crate::edges::{detect_edges, EdgeThresholds};
use crate::error::{Error, Result};
use crate::exit::ExitFlag;
use crate::frame::SourceImage;
use crate::interface::{Clock, Display};

/// Durations measured in a single iteration.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FrameTiming {
    pub edge_ms: u64,
    pub convert_ms: u64,
}

impl fmt::Display for FrameTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "edge time: {}ms, convert time: {}ms",
            self.edge_ms, self.convert_ms
        )
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct LoopSettings {
    pub thresholds: EdgeThresholds,
    pub max_frames: Option<u64>,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct LoopSummary {
    pub frames: u64,
}

/// One iteration; reports the timing line to `report` before presenting.
pub fn process_frame<D, C, W>(
    source: &SourceImage,
    display: &mut D,
    clock: &C,
    thresholds: &EdgeThresholds,
    report: &mut W,
) -> Result<FrameTiming>
where
    D: Display + ?Sized,
    C: Clock + ?Sized,
    W: Write + ?Sized,
{
    let frame = source.working_copy();

    let t0 = clock.now_ms();
    let edges = detect_edges(&frame, thresholds);
    let edge_ms = clock.now_ms().saturating_sub(t0);

    let t1 = clock.now_ms();
    let shown = to_display_frame(&edges, display.pixel_format())?;
    let convert_ms = clock.now_ms().saturating_sub(t1);

    let timing = FrameTiming {
        edge_ms,
        convert_ms,
    };
    writeln!(report, "{timing}").map_err(Error::Report)?;
    log::trace!("{} edge pixels", edges.edge_count());
    display.show(&shown)?;
    Ok(timing)
}

/// Process frames until `exit` is requested, the flag is checked before every frame.
pub fn run_frame_loop<D, C, W>(
    source: &SourceImage,
    display: &mut D,
    clock: &C,
    exit: &ExitFlag,
    settings: &LoopSettings,
    report: &mut W,
) -> Result<LoopSummary>
where
    D: Display + ?Sized,
    C: Clock + ?Sized,
    W: Write + ?Sized,
{
    let mut summary = LoopSummary::default();
    loop {
        if let Some(max) = settings.max_frames {
            if summary.frames >= max {
                exit.request();
            }
        }
        if exit.is_requested() {
            break;
        }

        let timing = process_frame(source, display, clock, &settings.thresholds, report)?;
        summary.frames += 1;
        log::debug!("frame {}: {timing:?}", summary.frames);
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{DisplayFrame, PixelFormat};
    use crate::test_util;
    use std::cell::Cell;

    /// Display that keeps the dimensions of every frame it was shown.
    struct RecordingDisplay {
        format: PixelFormat,
        shown: Vec<(u32, u32, usize)>,
        exit_after: Option<(usize, ExitFlag)>,
        fail: bool,
    }

    impl RecordingDisplay {
        fn new(format: PixelFormat) -> Self {
            RecordingDisplay {
                format,
                shown: vec![],
                exit_after: None,
                fail: false,
            }
        }
    }

    impl Display for RecordingDisplay {
        fn pixel_format(&self) -> PixelFormat {
            self.format
        }
        fn show(&mut self, frame: &DisplayFrame) -> Result<()> {
            if self.fail {
                return Err(Error::Display("device unavailable".to_owned()));
            }
            self.shown
                .push((frame.width(), frame.height(), frame.data().len()));
            if let Some((n, flag)) = &self.exit_after {
                if self.shown.len() == *n {
                    flag.request();
                }
            }
            Ok(())
        }
    }

    /// Clock advancing by a fixed step on every read.
    struct SteppingClock {
        now: Cell<u64>,
        step: u64,
    }

    impl Clock for SteppingClock {
        fn now_ms(&self) -> u64 {
            let v = self.now.get();
            self.now.set(v + self.step);
            v
        }
    }

    fn report_numbers(line: &str) -> Vec<u64> {
        line.split(|c: char| !c.is_ascii_digit())
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<u64>().expect("digits"))
            .collect()
    }

    #[test]
    fn test_single_iteration_128() {
        let _ = env_logger::builder().is_test(true).try_init();
        let source = test_util::source_square(128);
        let mut display = RecordingDisplay::new(PixelFormat::Rgb888);
        let clock = SteppingClock {
            now: Cell::new(0),
            step: 3,
        };
        let exit = ExitFlag::new();
        let settings = LoopSettings {
            max_frames: Some(1),
            ..Default::default()
        };
        let mut report: Vec<u8> = vec![];

        let summary = run_frame_loop(&source, &mut display, &clock, &exit, &settings, &mut report)
            .expect("loop runs");
        assert_eq!(summary.frames, 1);
        assert_eq!(display.shown, vec![(128, 128, 128 * 128 * 3)]);

        let report = String::from_utf8(report).expect("utf8");
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0], "edge time: 3ms, convert time: 3ms");
        assert_eq!(report_numbers(lines[0]), vec![3, 3]);
    }

    #[test]
    fn test_real_clock_reports_once_per_frame() {
        let source = test_util::source_square(64);
        let mut display = RecordingDisplay::new(PixelFormat::Rgb565);
        let clock = crate::interface::MonotonicClock::new();
        let exit = ExitFlag::new();
        let settings = LoopSettings {
            max_frames: Some(4),
            ..Default::default()
        };
        let mut report: Vec<u8> = vec![];

        let summary = run_frame_loop(&source, &mut display, &clock, &exit, &settings, &mut report)
            .expect("loop runs");
        assert_eq!(summary.frames, 4);
        assert_eq!(display.shown.len(), 4);
        let report = String::from_utf8(report).expect("utf8");
        assert_eq!(report.lines().count(), 4);
        for line in report.lines() {
            assert!(line.starts_with("edge time: "));
            assert_eq!(report_numbers(line).len(), 2);
        }
    }

    #[test]
    fn test_exit_before_start() {
        let source = test_util::source_square(32);
        let mut display = RecordingDisplay::new(PixelFormat::Grayscale);
        let exit = ExitFlag::new();
        exit.request();
        let mut report: Vec<u8> = vec![];

        let summary = run_frame_loop(
            &source,
            &mut display,
            &crate::interface::MonotonicClock::new(),
            &exit,
            &LoopSettings::default(),
            &mut report,
        )
        .expect("loop runs");
        assert_eq!(summary.frames, 0);
        assert!(display.shown.is_empty());
        assert!(report.is_empty());
    }

    #[test]
    fn test_zero_frame_limit_runs_nothing() {
        let source = test_util::source_square(32);
        let mut display = RecordingDisplay::new(PixelFormat::Grayscale);
        let exit = ExitFlag::new();
        let settings = LoopSettings {
            max_frames: Some(0),
            ..Default::default()
        };
        let mut report: Vec<u8> = vec![];

        let summary = run_frame_loop(
            &source,
            &mut display,
            &crate::interface::MonotonicClock::new(),
            &exit,
            &settings,
            &mut report,
        )
        .expect("loop runs");
        assert_eq!(summary.frames, 0);
        assert!(display.shown.is_empty());
        assert!(report.is_empty());
        assert!(exit.is_requested());
    }

    #[test]
    fn test_exit_during_frame_stops_after_it() {
        let source = test_util::source_square(32);
        let exit = ExitFlag::new();
        let mut display = RecordingDisplay::new(PixelFormat::Grayscale);
        display.exit_after = Some((3, exit.clone()));
        let mut report: Vec<u8> = vec![];

        let summary = run_frame_loop(
            &source,
            &mut display,
            &crate::interface::MonotonicClock::new(),
            &exit,
            &LoopSettings::default(),
            &mut report,
        )
        .expect("loop runs");
        assert_eq!(summary.frames, 3);
        assert_eq!(display.shown.len(), 3);
    }

    #[test]
    fn test_display_failure_propagates() {
        let source = test_util::source_square(32);
        let mut display = RecordingDisplay::new(PixelFormat::Grayscale);
        display.fail = true;
        let mut report: Vec<u8> = vec![];

        let res = run_frame_loop(
            &source,
            &mut display,
            &crate::interface::MonotonicClock::new(),
            &ExitFlag::new(),
            &LoopSettings::default(),
            &mut report,
        );
        assert!(matches!(res, Err(Error::Display(_))));
        // The report of the failing frame was written, nothing after it.
        assert_eq!(String::from_utf8(report).expect("utf8").lines().count(), 1);
    }

    #[test]
    fn test_timing_saturates() {
        // A clock going backwards must not produce a negative or wrapped duration.
        struct Backwards(Cell<u64>);
        impl Clock for Backwards {
            fn now_ms(&self) -> u64 {
                let v = self.0.get();
                self.0.set(v.saturating_sub(5));
                v
            }
        }
        let source = test_util::source_square(16);
        let mut display = RecordingDisplay::new(PixelFormat::Grayscale);
        let mut report: Vec<u8> = vec![];
        let timing = process_frame(
            &source,
            &mut display,
            &Backwards(Cell::new(100)),
            &EdgeThresholds::default(),
            &mut report,
        )
        .expect("frame processes");
        assert_eq!(timing, FrameTiming::default());
    }
}
