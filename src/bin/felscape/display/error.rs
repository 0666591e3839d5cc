use std::io::{self, Write};

use anyhow::Error;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    let msg = err.to_string();
    for line in wrap(&msg, 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 59) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    if let Some(hints) = HintCollector::collect(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn new() -> Self {
        Self {
            hints: Vec::new(),
            has_typed_hints: false,
        }
    }

    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self::new();

        collector.collect_input_hints(err);
        collector.collect_domain_hints(err);
        collector.collect_render_hints(err);

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        if collector.hints.is_empty() {
            None
        } else {
            Some(collector.hints)
        }
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_input_hints(&mut self, err: &Error) {
        use felscape::InputFormatError;

        let Some(input_err) = err.downcast_ref::<InputFormatError>() else {
            return;
        };

        self.mark_typed();

        match input_err {
            InputFormatError::Io { source } => {
                self.collect_std_io_hints(source);
            }

            InputFormatError::Parse { line, .. } => {
                self.add(format!("Inspect the input around line {}", line));
                self.add("Each data line needs exactly two numbers: PC1 and PC2");
                self.add("Lines starting with '#' or '@' are treated as comments");
            }
        }
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the file exists");
            }

            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
                self.add("Ensure you have read/write access as needed");
            }

            ErrorKind::InvalidData => {
                self.add("File contains invalid or corrupt data");
                self.add("Sample files must be UTF-8 text");
            }

            ErrorKind::WriteZero | ErrorKind::StorageFull => {
                self.add("Failed to write data (disk full?)");
                self.add("Check available disk space");
            }

            _ => {
                self.add("I/O operation failed");
                self.add("Check file path, permissions, and disk space");
            }
        }
    }

    fn collect_domain_hints(&mut self, err: &Error) {
        use felscape::DomainError;

        let Some(domain_err) = err.downcast_ref::<DomainError>() else {
            return;
        };

        self.mark_typed();

        match domain_err {
            DomainError::ConfigParse(_) => {
                self.add("Configuration file has invalid TOML syntax or an unknown key");
                self.add("Keys match the long option names with '_' for '-'");
            }

            DomainError::InvalidParameter { name, .. } => {
                self.add(format!("Adjust '{}' in the configuration or on the command line", name));
            }

            DomainError::TooFewSamples { .. } => {
                self.add("Density estimation needs at least two sample pairs");
                self.add("Verify the input is not empty or fully commented out");
            }

            DomainError::CoincidentSamples { .. } | DomainError::ZeroVariance { .. } => {
                self.add("The samples do not spread over both collective variables");
                self.add("Check that the two columns are the intended projections");
            }

            DomainError::SingularCovariance { .. } => {
                self.add("The samples lie on a straight line");
                self.add("A 2D kernel needs samples that span a plane");
            }

            DomainError::InvalidDensity { .. } | DomainError::EmptyDensity { .. } => {
                self.add("The estimated density underflowed on the whole grid");
                self.add("Try a larger --bandwidth or fewer --bins");
            }
        }
    }

    fn collect_render_hints(&mut self, err: &Error) {
        use felscape::RenderError;

        let Some(render_err) = err.downcast_ref::<RenderError>() else {
            return;
        };

        self.mark_typed();

        match render_err {
            RenderError::Stage { source, .. } | RenderError::Publish { source, .. } => {
                self.add("The image could not be written next to the output path");
                self.collect_std_io_hints(source);
            }

            RenderError::Drawing(msg) => {
                if msg.to_lowercase().contains("font") {
                    self.add("No usable system font was found for text");
                    self.add("Install a sans-serif font or pass --no-labels");
                } else {
                    self.add("Drawing the figure failed");
                    self.add("Try a lower --dpi");
                }
            }

            RenderError::UnsupportedFormat { .. } => {
                self.add("Supported output formats: png, jpg, jpeg, bmp");
            }

            RenderError::InvalidConfig(_) => {
                self.add("Increase --dpi or --bins so the figure has room to draw");
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("terminal") || msg.contains("stdin") || msg.contains("tty") {
            self.add("Input appears to be from a terminal");
            self.add("Pass the sample file as INPUT or pipe data to stdin");
            return;
        }

        if msg.contains("no such file") || msg.contains("not found") {
            self.add("Check that the file path is correct");
            self.add("Verify the file exists and is readable");
            return;
        }

        if msg.contains("permission denied") {
            self.add("Check file permissions with `ls -la`");
            self.add("Ensure you have the required access rights");
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    let mut text = String::new();

    text.push_str(&err.to_string());

    let mut source = err.source();
    while let Some(cause) = source {
        text.push('\n');
        text.push_str(&cause.to_string());
        source = cause.source();
    }

    text.to_lowercase()
}
