use std::io::{self, IsTerminal};
use std::path::Path;

use felscape::io::{read_samples, read_samples_from_path};
use felscape::{InputFormatError, SampleSet};

/// Returns `true` if stderr is a terminal (interactive).
pub fn stderr_is_tty() -> bool {
    io::stderr().is_terminal()
}

/// Returns `true` if stdin is a terminal (interactive).
pub fn stdin_is_tty() -> bool {
    io::stdin().is_terminal()
}

/// Reads the sample file at `path`, or stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<SampleSet, InputFormatError> {
    match path {
        Some(path) => read_samples_from_path(path),
        None => read_samples(io::stdin().lock()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_a_typed_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_input(Some(&dir.path().join("absent.xvg"))).unwrap_err();
        assert!(matches!(
            err,
            InputFormatError::Io { ref source } if source.kind() == io::ErrorKind::NotFound
        ));
    }

    #[test]
    fn reads_a_sample_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("proj.xvg");
        std::fs::write(&path, "@ legend \"PC\"\n0.5 1.5\n-0.5 2.5\n").unwrap();
        let samples = read_input(Some(&path)).unwrap();
        assert_eq!(samples.len(), 2);
    }
}
