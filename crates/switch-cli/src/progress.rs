//! Console rendering of mirror progress

use std::io::{self, Write};

use switch_mirror::{CopyProgress, ProgressSink};

/// Rewrites one console line with the current percentage.
#[derive(Debug, Default)]
pub struct ConsoleProgress {
    printed: bool,
}

impl ProgressSink for ConsoleProgress {
    fn report(&mut self, progress: &CopyProgress) {
        let mut out = io::stdout().lock();
        // Progress output is best effort.
        let _ = write!(out, "\r{}% downloaded", progress.percent());
        let _ = out.flush();
        self.printed = true;
    }

    fn finish(&mut self) {
        if self.printed {
            println!();
            self.printed = false;
        }
    }
}
