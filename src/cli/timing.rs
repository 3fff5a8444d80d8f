//! Elapsed-time and peak-memory reporting for user actions
//!
//! Peak memory comes from the `peak_alloc` counters, which only move when the
//! binary registers `PeakAlloc` as its global allocator. Elsewhere (library
//! users, unit tests) the report shows 0.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use peak_alloc::PeakAlloc;
use tracing::debug;

use crate::cli::console::Console;
use crate::cli::error::CliResult;
use crate::cli::output;

const MIB: f64 = 1024.0 * 1024.0;

pub struct Stopwatch {
    label: String,
    start: Instant,
    baseline: usize,
}

impl Stopwatch {
    /// Start timing and reset the allocator's peak to the current usage.
    pub fn start(label: impl Into<String>) -> Self {
        PeakAlloc.reset_peak_usage();
        Self {
            label: label.into(),
            start: Instant::now(),
            baseline: PeakAlloc.current_usage(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Bytes allocated at the peak since `start`, above the starting usage.
    pub fn peak_bytes(&self) -> usize {
        PeakAlloc.peak_usage().saturating_sub(self.baseline)
    }

    pub fn report(&self, out: &mut dyn Write) -> io::Result<()> {
        let secs = self.elapsed().as_secs_f64();
        let peak = self.peak_bytes();
        debug!(label = %self.label, secs, peak, "action finished");
        output::detail(out, &format!("{} took {:.4} s", self.label, secs))?;
        output::detail(out, &format!("peak memory {:.3} MiB", peak as f64 / MIB))
    }
}

/// Run `f` and, when `enabled`, report how long it took and its peak memory.
///
/// The report is printed whether or not the action failed. An action error
/// takes precedence over a failed report.
pub fn timed<'a, T>(
    enabled: bool,
    console: &mut Console<'a>,
    label: &str,
    f: impl FnOnce(&mut Console<'a>) -> CliResult<T>,
) -> CliResult<T> {
    let watch = Stopwatch::start(label);
    let result = f(console);
    if enabled {
        if let Err(e) = watch.report(console.out()) {
            return result.and(Err(e.into()));
        }
    }
    result
}
