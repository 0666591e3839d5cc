use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use felscape::{ImageFormat, Landscape, RenderConfig, RenderMode, build_landscape, render_to_file};

use crate::cli::IoOptions;
use crate::display::{
    Output, PipelineStage, Progress, print_landscape_summary, print_sample_summary,
};
use crate::io::{read_input, stdin_is_tty};

pub fn run_plot(
    mode: RenderMode,
    io: &IoOptions,
    config: &RenderConfig,
    output: Output,
) -> Result<()> {
    if io.input.is_none() && stdin_is_tty() {
        bail!(
            "No input file specified and stdin is a terminal.\n\nUsage: felscape {} <INPUT> or pipe samples via stdin.",
            command_name(mode)
        );
    }

    let target = resolve_output(mode, io, config);
    let format = ImageFormat::from_path(&target)?;

    let mut progress = Progress::new(output);

    progress.begin(PipelineStage::ReadSamples);
    let samples = read_input(io.input.as_deref()).context("Failed to read samples")?;
    progress.complete(
        PipelineStage::ReadSamples,
        &[format!(
            "Parse {} sample pairs from {}",
            samples.len(),
            source_name(io.input.as_deref())
        )],
    );

    if output.is_rich() {
        print_sample_summary(&samples);
    }

    progress.begin(PipelineStage::BuildLandscape);
    let landscape =
        build_landscape(&samples, config).context("Failed to build the free-energy landscape")?;
    progress.complete(
        PipelineStage::BuildLandscape,
        &landscape_details(&landscape, config, samples.len()),
    );

    if output.is_rich() {
        print_landscape_summary(&landscape, config);
    }

    progress.begin(PipelineStage::RenderFigure);
    let renderer = mode.renderer(config);
    render_to_file(renderer.as_ref(), &landscape, &target)
        .with_context(|| format!("Failed to render {}", target.display()))?;
    let (width, height) = renderer.pixel_size();
    progress.complete(
        PipelineStage::RenderFigure,
        &[
            format!("Draw {mode} ({width} × {height} px at {} dpi)", config.dpi),
            format!("Write {format} → {}", file_name(&target)),
        ],
    );

    progress.finish(&target);

    Ok(())
}

/// Stage details read back from a finished landscape.
fn landscape_details(landscape: &Landscape, config: &RenderConfig, samples: usize) -> Vec<String> {
    let (nx, ny) = landscape.grid.shape();
    let energy = &landscape.energy;
    vec![
        format!(
            "Gaussian KDE (bandwidth {}, factor {:.4})",
            config.bandwidth,
            config.bandwidth.factor(samples)
        ),
        format!("Evaluate on {nx} × {ny} grid"),
        format!("ΔG = −kT·ln(ρ/ρmax) at {} K", config.temperature),
        format!(
            "Clip to [0, {}] kJ/mol ({} of {} cells saturated)",
            energy.z_max(),
            energy.saturated_count(),
            nx * ny
        ),
    ]
}

fn resolve_output(mode: RenderMode, io: &IoOptions, config: &RenderConfig) -> PathBuf {
    io.output
        .clone()
        .unwrap_or_else(|| PathBuf::from(mode.default_file_name(config.z_max)))
}

fn command_name(mode: RenderMode) -> &'static str {
    match mode {
        RenderMode::Flat => "2d",
        RenderMode::Surface => "3d",
    }
}

fn source_name(path: Option<&Path>) -> String {
    path.map(file_name).unwrap_or_else(|| "stdin".to_string())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn io_options(input: PathBuf, output: PathBuf) -> IoOptions {
        IoOptions {
            input: Some(input),
            output: Some(output),
            config: None,
            quiet: true,
            verbose: 0,
        }
    }

    fn quiet() -> Output {
        Output::Plain
    }

    fn small_config() -> RenderConfig {
        RenderConfig {
            bins: 16,
            dpi: 20,
            labels: false,
            ..Default::default()
        }
    }

    fn write_samples(dir: &Path) -> PathBuf {
        let path = dir.join("proj.xvg");
        fs::write(
            &path,
            "# projection\n@ title \"PC1 vs PC2\"\n0.0 0.0\n0.1 0.05\n-0.05 0.1\n1.0 1.0\n1.1 0.95\n0.95 1.1\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn writes_both_figures() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_samples(dir.path());
        let figures = [
            (RenderMode::Flat, "flat.png"),
            (RenderMode::Surface, "surface.bmp"),
        ];
        for (mode, name) in figures {
            let output = dir.path().join(name);
            let io = io_options(input.clone(), output.clone());
            run_plot(mode, &io, &small_config(), quiet()).unwrap();
            assert!(fs::metadata(&output).unwrap().len() > 0);
        }
    }

    #[test]
    fn unsupported_extension_fails_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let io = io_options(dir.path().join("missing.xvg"), dir.path().join("fel.gif"));
        let err = run_plot(RenderMode::Flat, &io, &small_config(), quiet()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<felscape::RenderError>(),
            Some(felscape::RenderError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn degenerate_samples_leave_no_image() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("flat.dat");
        fs::write(&input, "1.0 2.0\n1.0 2.0\n1.0 2.0\n").unwrap();
        let output = dir.path().join("fel.png");
        let io = io_options(input, output.clone());
        let err = run_plot(RenderMode::Flat, &io, &small_config(), quiet()).unwrap_err();
        assert!(err.downcast_ref::<felscape::DomainError>().is_some());
        assert!(!output.exists());
    }

    #[test]
    fn missing_input_keeps_its_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let io = io_options(dir.path().join("absent.xvg"), dir.path().join("fel.png"));
        let err = run_plot(RenderMode::Surface, &io, &small_config(), quiet()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<felscape::InputFormatError>(),
            Some(felscape::InputFormatError::Io { source }) if source.kind() == std::io::ErrorKind::NotFound
        ));
        assert!(!dir.path().join("fel.png").exists());
    }

    #[test]
    fn landscape_details_describe_the_grid_and_ceiling() {
        let dir = tempfile::tempdir().unwrap();
        let samples = read_input(Some(&write_samples(dir.path()))).unwrap();
        let config = small_config();
        let landscape = build_landscape(&samples, &config).unwrap();
        let details = landscape_details(&landscape, &config, samples.len());
        assert_eq!(details.len(), 4);
        assert_eq!(details[1], "Evaluate on 16 × 16 grid");
        assert!(details[3].starts_with("Clip to [0, 12] kJ/mol ("));
        assert!(details[3].ends_with(" of 256 cells saturated)"));
    }

    #[test]
    fn default_output_name_follows_the_ceiling() {
        let io = IoOptions {
            input: None,
            output: None,
            config: None,
            quiet: true,
            verbose: 0,
        };
        let config = RenderConfig {
            z_max: 15.0,
            ..Default::default()
        };
        assert_eq!(
            resolve_output(RenderMode::Surface, &io, &config),
            PathBuf::from("FEL_3D_with_base2D_DG_0_15.png")
        );
    }
}
