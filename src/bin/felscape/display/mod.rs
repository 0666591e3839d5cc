mod banner;
mod error;
mod progress;
mod tables;

pub use banner::{banner_for_help, print_banner};
pub use error::print_error;
pub use progress::{PipelineStage, Progress};
pub use tables::{print_landscape_summary, print_sample_summary};

use crate::cli::IoOptions;

/// What a run prints to stderr besides errors and log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// Banner, stage spinner and summary tables.
    Rich,
    /// Log records only.
    Plain,
}

impl Output {
    /// Rich output needs a terminal on stderr and no `--quiet`.
    pub fn for_run(io: &IoOptions) -> Self {
        Self::choose(io.quiet, crate::io::stderr_is_tty())
    }

    fn choose(quiet: bool, stderr_is_tty: bool) -> Self {
        if stderr_is_tty && !quiet {
            Self::Rich
        } else {
            Self::Plain
        }
    }

    pub fn is_rich(self) -> bool {
        self == Self::Rich
    }
}
