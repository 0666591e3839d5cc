use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use felscape::RenderConfig;

use crate::cli::{Command, ContourOptions, SharedArgs, ViewOptions};

/// Layers the run configuration: defaults, then `--config`, then flags.
pub fn build_render_config(command: &Command) -> Result<RenderConfig> {
    let shared = command.shared();
    let mut config = match &shared.io.config {
        Some(path) => load_config_file(path)?,
        None => RenderConfig::default(),
    };

    apply_shared(&mut config, shared);
    match command {
        Command::Flat(args) => apply_contours(&mut config, &args.contours),
        Command::Surface(args) => apply_view(&mut config, &args.view),
    }

    config.validate().context("Invalid settings")?;
    Ok(config)
}

fn load_config_file(path: &Path) -> Result<RenderConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    RenderConfig::from_toml_str(&text)
        .with_context(|| format!("Invalid configuration file: {}", path.display()))
}

fn apply_shared(config: &mut RenderConfig, args: &SharedArgs) {
    let landscape = &args.landscape;
    if let Some(t) = landscape.temperature {
        config.temperature = t;
    }
    if let Some(bins) = landscape.bins {
        config.bins = bins;
    }
    if let Some(bw) = landscape.bandwidth {
        config.bandwidth = bw;
    }
    if let Some(z) = landscape.z_max {
        config.z_max = z;
    }

    let figure = &args.figure;
    if let Some(cmap) = figure.colormap {
        config.colormap = cmap.into();
    }
    if let Some(policy) = figure.over_range {
        config.over_range = policy.into();
    }
    if let Some(dpi) = figure.dpi {
        config.dpi = dpi;
    }
    if let Some(label) = &figure.x_label {
        config.x_label = label.clone();
    }
    if let Some(label) = &figure.y_label {
        config.y_label = label.clone();
    }
    if figure.no_labels {
        config.labels = false;
    }
}

fn apply_contours(config: &mut RenderConfig, opts: &ContourOptions) {
    if let Some(step) = opts.contour_step {
        config.contour_step = step;
        config.contours = true;
    }
    if opts.no_contours {
        config.contours = false;
    }
}

fn apply_view(config: &mut RenderConfig, opts: &ViewOptions) {
    if let Some(elevation) = opts.elevation {
        config.view.elevation = elevation;
    }
    if let Some(azimuth) = opts.azimuth {
        config.view.azimuth = azimuth;
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;
    use felscape::{Colormap, OverRange};

    use super::*;
    use crate::cli::Cli;

    fn parse(args: &[&str]) -> Command {
        Cli::try_parse_from(args).unwrap().command
    }

    #[test]
    fn defaults_without_flags() {
        let config = build_render_config(&parse(&["felscape", "2d"])).unwrap();
        assert_eq!(config, RenderConfig::default());
    }

    #[test]
    fn flags_override_the_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "z_max = 20.0\nbins = 64\ncolormap = \"viridis\"").unwrap();
        let path = file.path().to_str().unwrap();

        let command = parse(&[
            "felscape",
            "3d",
            "--config",
            path,
            "--z-max",
            "15",
            "--over-range",
            "flag",
            "--azimuth",
            "-120",
        ]);
        let config = build_render_config(&command).unwrap();
        assert_eq!(config.z_max, 15.0);
        assert_eq!(config.bins, 64);
        assert_eq!(config.colormap, Colormap::Viridis);
        assert_eq!(config.over_range, OverRange::Flag);
        assert_eq!(config.view.azimuth, -120.0);
        assert_eq!(config.view.elevation, 28.0);
    }

    #[test]
    fn no_contours_turns_isolines_off() {
        let config = build_render_config(&parse(&["felscape", "2d", "--no-contours"])).unwrap();
        assert!(!config.contours);
    }

    #[test]
    fn invalid_values_are_rejected_before_running() {
        let err = build_render_config(&parse(&["felscape", "2d", "-T", "0"])).unwrap_err();
        assert!(err.downcast_ref::<felscape::DomainError>().is_some());
    }

    #[test]
    fn missing_config_file_is_reported() {
        let command = parse(&["felscape", "2d", "--config", "/nonexistent/fel.toml"]);
        let err = build_render_config(&command).unwrap_err();
        assert!(err.to_string().contains("Failed to read configuration file"));
    }
}
