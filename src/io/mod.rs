//! Reading collective-variable samples from text.
//!
//! The accepted layout is the two-column projection written by GROMACS
//! (`gmx anaeig -2d`) and most plain-text exports: one `x y` pair per line,
//! whitespace separated. Lines starting with `#` or `@` are metadata and are
//! skipped, as are blank lines and trailing comments.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub mod error;

mod xvg;

pub use error::Error;

use crate::model::sample::SampleSet;

/// Reads every sample pair from `reader`.
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails and [`Error::Parse`] with the
/// 1-based line number for any malformed data row.
pub fn read_samples<R: BufRead>(reader: R) -> Result<SampleSet, Error> {
    xvg::read(reader)
}

/// Opens `path` and reads every sample pair from it.
pub fn read_samples_from_path(path: impl AsRef<Path>) -> Result<SampleSet, Error> {
    let file = File::open(path.as_ref())?;
    read_samples(BufReader::new(file))
}
