use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "felscape",
    about = "Free-energy landscapes from two-dimensional projections",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Draw a 2D ΔG heatmap with isocontours
    #[command(name = "2d", visible_alias = "flat")]
    Flat(FlatArgs),

    /// Draw a 3D ΔG surface over a filled contour floor
    #[command(name = "3d", visible_alias = "surface")]
    Surface(SurfaceArgs),
}

impl Command {
    pub fn shared(&self) -> &SharedArgs {
        match self {
            Command::Flat(args) => &args.shared,
            Command::Surface(args) => &args.shared,
        }
    }
}

#[derive(Args)]
pub struct FlatArgs {
    #[command(flatten)]
    pub shared: SharedArgs,

    #[command(flatten)]
    pub contours: ContourOptions,
}

#[derive(Args)]
pub struct SurfaceArgs {
    #[command(flatten)]
    pub shared: SharedArgs,

    #[command(flatten)]
    pub view: ViewOptions,
}

/// Options shared by both figures.
#[derive(Args)]
pub struct SharedArgs {
    #[command(flatten)]
    pub io: IoOptions,

    #[command(flatten)]
    pub landscape: LandscapeOptions,

    #[command(flatten)]
    pub figure: FigureOptions,
}

/// I/O options shared by all commands.
#[derive(Args)]
pub struct IoOptions {
    /// Two-column sample file, e.g. a GROMACS .xvg projection (stdin if omitted)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Output image (.png, .jpg, .bmp); defaults to FEL_<mode>_DG_0_<zmax>.png
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// TOML configuration file; command-line options take precedence
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Density estimation and free-energy options.
#[derive(Args)]
#[command(next_help_heading = "Landscape")]
pub struct LandscapeOptions {
    /// Temperature in K
    #[arg(short = 'T', long, value_name = "K")]
    pub temperature: Option<f64>,

    /// Grid resolution per axis
    #[arg(short, long, value_name = "N")]
    pub bins: Option<usize>,

    /// KDE bandwidth: a covariance factor, 'scott' or 'silverman'
    #[arg(long, value_name = "BW")]
    pub bandwidth: Option<felscape::Bandwidth>,

    /// Display ceiling for ΔG in kJ/mol
    #[arg(short = 'z', long = "z-max", value_name = "KJ")]
    pub z_max: Option<f64>,
}

/// Figure appearance options.
#[derive(Args)]
#[command(next_help_heading = "Figure")]
pub struct FigureOptions {
    /// Color scheme
    #[arg(long, value_name = "NAME")]
    pub colormap: Option<ColormapArg>,

    /// Coloring of cells whose ΔG exceeds the ceiling
    #[arg(long = "over-range", value_name = "POLICY")]
    pub over_range: Option<OverRangeArg>,

    /// Raster resolution
    #[arg(long, value_name = "DPI")]
    pub dpi: Option<u32>,

    /// Label of the first collective variable
    #[arg(long = "x-label", value_name = "TEXT")]
    pub x_label: Option<String>,

    /// Label of the second collective variable
    #[arg(long = "y-label", value_name = "TEXT")]
    pub y_label: Option<String>,

    /// Omit titles, axis labels and tick text (no system fonts needed)
    #[arg(long = "no-labels")]
    pub no_labels: bool,
}

/// Isocontour options (2d only).
#[derive(Args)]
#[command(next_help_heading = "Contours")]
pub struct ContourOptions {
    /// Isoline spacing in kJ/mol
    #[arg(long = "contour-step", value_name = "KJ", conflicts_with = "no_contours")]
    pub contour_step: Option<f64>,

    /// Draw the heatmap without isolines
    #[arg(long = "no-contours")]
    pub no_contours: bool,
}

/// Camera options (3d only).
#[derive(Args)]
#[command(next_help_heading = "View")]
pub struct ViewOptions {
    /// Camera elevation in degrees
    #[arg(long, value_name = "DEG", allow_hyphen_values = true)]
    pub elevation: Option<f64>,

    /// Camera azimuth in degrees
    #[arg(long, value_name = "DEG", allow_hyphen_values = true)]
    pub azimuth: Option<f64>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ColormapArg {
    Jet,
    Turbo,
    Viridis,
    Plasma,
    Inferno,
    Magma,
    Cividis,
}

impl From<ColormapArg> for felscape::Colormap {
    fn from(arg: ColormapArg) -> Self {
        match arg {
            ColormapArg::Jet => Self::Jet,
            ColormapArg::Turbo => Self::Turbo,
            ColormapArg::Viridis => Self::Viridis,
            ColormapArg::Plasma => Self::Plasma,
            ColormapArg::Inferno => Self::Inferno,
            ColormapArg::Magma => Self::Magma,
            ColormapArg::Cividis => Self::Cividis,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OverRangeArg {
    /// Saturated cells take the top colormap color
    Clip,
    /// Saturated cells are painted in the over-range color
    Flag,
}

impl From<OverRangeArg> for felscape::OverRange {
    fn from(arg: OverRangeArg) -> Self {
        match arg {
            OverRangeArg::Clip => Self::Clip,
            OverRangeArg::Flag => Self::Flag,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn negative_view_angles_parse() {
        let cli = Cli::try_parse_from([
            "felscape",
            "3d",
            "proj.xvg",
            "--elevation",
            "-10",
            "--azimuth",
            "-60",
        ])
        .unwrap();
        let Command::Surface(args) = cli.command else {
            panic!("expected the 3d command");
        };
        assert_eq!(args.view.elevation, Some(-10.0));
        assert_eq!(args.view.azimuth, Some(-60.0));
    }

    #[test]
    fn bandwidth_accepts_rules_and_factors() {
        let cli =
            Cli::try_parse_from(["felscape", "2d", "--bandwidth", "silverman", "-vv"]).unwrap();
        let shared = cli.command.shared();
        assert_eq!(
            shared.landscape.bandwidth,
            Some(felscape::Bandwidth::Rule(felscape::BandwidthRule::Silverman))
        );
        assert_eq!(shared.io.verbose, 2);
        assert!(Cli::try_parse_from(["felscape", "2d", "--bandwidth", "wide"]).is_err());
    }

    #[test]
    fn contour_step_conflicts_with_no_contours() {
        let result = Cli::try_parse_from([
            "felscape",
            "2d",
            "--contour-step",
            "1",
            "--no-contours",
        ]);
        assert!(result.is_err());
    }
}
