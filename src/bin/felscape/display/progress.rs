use std::io::{self, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

use super::Output;

const SPINNER_TEMPLATE: &str = "  {spinner:.cyan} {msg}";
const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Stages of one landscape run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    ReadSamples,
    BuildLandscape,
    RenderFigure,
}

impl PipelineStage {
    pub const ALL: [PipelineStage; 3] = [
        PipelineStage::ReadSamples,
        PipelineStage::BuildLandscape,
        PipelineStage::RenderFigure,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PipelineStage::ReadSamples => "Reading samples",
            PipelineStage::BuildLandscape => "Estimating free-energy landscape",
            PipelineStage::RenderFigure => "Rendering figure",
        }
    }

    /// One-based position within the run.
    pub fn number(self) -> usize {
        self as usize + 1
    }

    fn heading(self) -> String {
        format!("[{}/{}] {}", self.number(), Self::ALL.len(), self.label())
    }
}

/// Terminal spinner for the running stage; finished stages stay on screen
/// with their timing and details.
pub struct StageSpinner {
    bar: Option<ProgressBar>,
    run_start: Instant,
    stage_start: Instant,
}

impl StageSpinner {
    fn new() -> Self {
        let now = Instant::now();
        Self {
            bar: None,
            run_start: now,
            stage_start: now,
        }
    }

    fn clear(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    fn begin(&mut self, stage: PipelineStage) {
        self.clear();
        self.stage_start = Instant::now();

        let style = ProgressStyle::default_spinner()
            .template(SPINNER_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars(TICK_CHARS);

        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(80));
        bar.set_message(format!("{}...", stage.heading()));
        self.bar = Some(bar);
    }

    fn complete(&mut self, stage: PipelineStage, details: &[String]) {
        self.clear();

        let mut stderr = io::stderr().lock();
        let _ = writeln!(
            stderr,
            "  \x1b[32m✓\x1b[0m {:<44} {:>5.1}s",
            stage.heading(),
            self.stage_start.elapsed().as_secs_f64()
        );
        for detail in details {
            let _ = writeln!(stderr, "      \x1b[2m·\x1b[0m {detail}");
        }
    }

    fn finish(mut self, written: &Path) {
        self.clear();

        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr);
        let _ = writeln!(
            stderr,
            "  \x1b[2m╺━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━╸\x1b[0m"
        );
        let _ = writeln!(stderr);
        let _ = writeln!(
            stderr,
            "  \x1b[32m✓\x1b[0m Wrote {:<38} {:>10}",
            written.display(),
            format!("{:.2}s", self.run_start.elapsed().as_secs_f64())
        );
        let _ = writeln!(stderr);
    }
}

/// Stage reporting for a run: a spinner on a terminal, log records otherwise.
pub enum Progress {
    Spinner(StageSpinner),
    Log,
}

impl Progress {
    pub fn new(output: Output) -> Self {
        match output {
            Output::Rich => Self::Spinner(StageSpinner::new()),
            Output::Plain => Self::Log,
        }
    }

    pub fn begin(&mut self, stage: PipelineStage) {
        match self {
            Self::Spinner(s) => s.begin(stage),
            Self::Log => log::debug!("{}", stage.heading()),
        }
    }

    pub fn complete(&mut self, stage: PipelineStage, details: &[String]) {
        match self {
            Self::Spinner(s) => s.complete(stage, details),
            Self::Log => log::info!("{}: {}", stage.label(), details.join("; ")),
        }
    }

    pub fn finish(self, written: &Path) {
        match self {
            Self::Spinner(s) => s.finish(written),
            Self::Log => log::info!("wrote {}", written.display()),
        }
    }
}
