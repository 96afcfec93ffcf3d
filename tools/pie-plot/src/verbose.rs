//! Progress output on stderr.
//!
//! `-q` silences everything but errors and the requested data, `-v` adds a
//! line per load stage. Data written to stdout is never interleaved.

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Instant;

const QUIET: u8 = 0;
const NORMAL: u8 = 1;
const VERBOSE: u8 = 2;

static LEVEL: AtomicU8 = AtomicU8::new(NORMAL);

/// Set the output level from the `-q` / `-v` flags.
pub fn init(quiet: bool, verbose: bool) {
    let level = match (quiet, verbose) {
        (true, _) => QUIET,
        (false, true) => VERBOSE,
        (false, false) => NORMAL,
    };
    LEVEL.store(level, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
    LEVEL.load(Ordering::Relaxed) == VERBOSE
}

pub fn is_quiet() -> bool {
    LEVEL.load(Ordering::Relaxed) == QUIET
}

/// Print only with `-v`.
macro_rules! vprintln {
    ($($arg:tt)*) => {
        if $crate::verbose::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

pub(crate) use vprintln;

/// Print unless `-q` is given.
///
/// ```ignore
/// dprintln!("Loading {}...", path.display());
/// ```
macro_rules! dprintln {
    ($($arg:tt)*) => {
        if !$crate::verbose::is_quiet() {
            eprintln!($($arg)*);
        }
    };
}

pub(crate) use dprintln;

/// One step of loading a result file.
///
/// [`Stage::done`] reports how much the step produced and how long it took,
/// e.g. `  decode: 3 records in 1.2ms`. A stage that fails with `?` before
/// `done` prints nothing, so the error is the last line shown.
pub struct Stage {
    label: &'static str,
    start: Instant,
}

impl Stage {
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }

    /// Finish the stage, having produced `count` `unit`s.
    pub fn done(self, count: usize, unit: &str) {
        vprintln!("  {}: {count} {unit} in {:.1?}", self.label, self.start.elapsed());
    }
}
