//! Raster rendering of free-energy landscapes.
//!
//! Two interchangeable [`Renderer`]s share one colormap and colorbar:
//! [`HeatmapRenderer`] draws the flat 2D map with isocontours, and
//! [`SurfaceRenderer`] draws the 3D surface over a filled contour floor.
//! [`render_to_file`] publishes the image atomically; [`render_to_buffer`]
//! keeps it in memory.

mod colorbar;
mod colormap;
mod contour;
mod error;
mod flat;
mod surface;

use std::fmt;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

pub use colormap::{ColorScale, OVER_COLOR, sample as sample_colormap};
pub use contour::{BandPolygon, Segment, band_levels, fill_bands, line_levels, march_squares};
pub use error::Error;
pub use flat::HeatmapRenderer;
pub use surface::SurfaceRenderer;

use crate::landscape::{Landscape, RenderConfig};

/// Drawing surface handed to renderers.
pub type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

const COLORBAR_LABEL: &str = "ΔG (kJ/mol)";

/// Draws a landscape figure.
pub trait Renderer {
    /// Figure size in inches.
    fn figure_size(&self) -> (f64, f64);

    /// Raster resolution in dots per inch.
    fn dpi(&self) -> u32;

    /// Draws the whole figure onto `root`.
    fn draw(&self, root: &Canvas<'_>, landscape: &Landscape) -> Result<(), Error>;

    /// Figure size in pixels.
    fn pixel_size(&self) -> (u32, u32) {
        let (w, h) = self.figure_size();
        let dpi = f64::from(self.dpi());
        ((w * dpi).round() as u32, (h * dpi).round() as u32)
    }
}

/// Which figure to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// 2D heatmap with isocontours.
    Flat,
    /// 3D surface over a contour floor.
    Surface,
}

impl RenderMode {
    pub fn renderer(self, config: &RenderConfig) -> Box<dyn Renderer> {
        match self {
            RenderMode::Flat => Box::new(HeatmapRenderer::new(config)),
            RenderMode::Surface => Box::new(SurfaceRenderer::new(config)),
        }
    }

    /// Output name used when none is given, e.g. `FEL_2D_only_DG_0_12.png`.
    pub fn default_file_name(self, z_max: f64) -> String {
        match self {
            RenderMode::Flat => format!("FEL_2D_only_DG_0_{z_max}.png"),
            RenderMode::Surface => format!("FEL_3D_with_base2D_DG_0_{z_max}.png"),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Flat => write!(f, "2D heatmap"),
            RenderMode::Surface => write!(f, "3D surface"),
        }
    }
}

/// Raster formats that can be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Bmp,
}

impl ImageFormat {
    /// Infers the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
            "bmp" => Ok(ImageFormat::Bmp),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            ImageFormat::Png => ".png",
            ImageFormat::Jpeg => ".jpg",
            ImageFormat::Bmp => ".bmp",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Png => write!(f, "PNG"),
            ImageFormat::Jpeg => write!(f, "JPEG"),
            ImageFormat::Bmp => write!(f, "BMP"),
        }
    }
}

/// RGB pixels of a rendered figure, row-major, 3 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Raster {
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8) {
        let k = 3 * (y as usize * self.width as usize + x as usize);
        (self.pixels[k], self.pixels[k + 1], self.pixels[k + 2])
    }

    pub fn count_color(&self, (r, g, b): (u8, u8, u8)) -> usize {
        self.pixels
            .chunks_exact(3)
            .filter(|p| p[0] == r && p[1] == g && p[2] == b)
            .count()
    }
}

/// Renders the figure into memory.
pub fn render_to_buffer(renderer: &dyn Renderer, landscape: &Landscape) -> Result<Raster, Error> {
    let (width, height) = checked_size(renderer)?;
    let mut pixels = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        renderer.draw(&root, landscape)?;
        root.present()?;
    }
    Ok(Raster {
        width,
        height,
        pixels,
    })
}

/// Renders the figure and publishes it at `path`.
///
/// The image is written to a temporary file in the destination directory
/// and renamed into place once complete, so `path` either holds the full
/// image or is left untouched.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] for an unknown extension,
/// [`Error::Stage`] when the temporary file cannot be created,
/// [`Error::Drawing`] when rendering or encoding fails and
/// [`Error::Publish`] when the final rename fails.
pub fn render_to_file(
    renderer: &dyn Renderer,
    landscape: &Landscape,
    path: &Path,
) -> Result<(), Error> {
    let format = ImageFormat::from_path(path)?;
    let size = checked_size(renderer)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staged = tempfile::Builder::new()
        .prefix(".felscape-")
        .suffix(format.suffix())
        .tempfile_in(dir)
        .map_err(|source| Error::Stage {
            path: path.to_path_buf(),
            source,
        })?;

    {
        let root = BitMapBackend::new(staged.path(), size).into_drawing_area();
        renderer.draw(&root, landscape)?;
        root.present()?;
    }

    staged.persist(path).map_err(|e| Error::Publish {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    log::info!(
        "wrote {}×{} {format} image to {}",
        size.0,
        size.1,
        path.display()
    );
    Ok(())
}

fn checked_size(renderer: &dyn Renderer) -> Result<(u32, u32), Error> {
    let (w, h) = renderer.pixel_size();
    if w < 32 || h < 32 {
        return Err(Error::InvalidConfig(format!(
            "figure of {w}×{h} pixels is too small"
        )));
    }
    Ok((w, h))
}

/// Converts typographic points to pixels at a given resolution.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Points {
    dpi: f64,
}

impl Points {
    pub(crate) fn new(dpi: u32) -> Self {
        Self {
            dpi: f64::from(dpi),
        }
    }

    /// Whole pixels for `pt` points, at least one.
    pub(crate) fn px(&self, pt: f64) -> i32 {
        (pt * self.dpi / 72.0).round().max(1.0) as i32
    }

    /// Font size in pixels for `pt` points.
    pub(crate) fn font(&self, pt: f64) -> f64 {
        pt * self.dpi / 72.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landscape::{OverRange, build_landscape};
    use crate::model::sample::SampleSet;

    fn config(over_range: OverRange) -> RenderConfig {
        RenderConfig {
            bins: 24,
            dpi: 20,
            labels: false,
            over_range,
            ..Default::default()
        }
    }

    fn landscape(config: &RenderConfig) -> Landscape {
        let samples = SampleSet::from(vec![
            (0.0, 0.0),
            (0.1, 0.05),
            (-0.05, 0.1),
            (0.05, -0.1),
            (1.0, 1.0),
            (1.1, 0.95),
            (0.95, 1.1),
            (1.05, 1.05),
        ]);
        build_landscape(&samples, config).unwrap()
    }

    #[test]
    fn default_file_names_carry_the_ceiling() {
        assert_eq!(
            RenderMode::Flat.default_file_name(12.0),
            "FEL_2D_only_DG_0_12.png"
        );
        assert_eq!(
            RenderMode::Surface.default_file_name(12.5),
            "FEL_3D_with_base2D_DG_0_12.5.png"
        );
    }

    #[test]
    fn image_format_follows_extension() {
        assert_eq!(
            ImageFormat::from_path(Path::new("out/fel.PNG")).unwrap(),
            ImageFormat::Png
        );
        assert_eq!(
            ImageFormat::from_path(Path::new("fel.jpeg")).unwrap(),
            ImageFormat::Jpeg
        );
        assert!(matches!(
            ImageFormat::from_path(Path::new("fel.svg")),
            Err(Error::UnsupportedFormat { extension }) if extension == "svg"
        ));
        assert!(ImageFormat::from_path(Path::new("fel")).is_err());
    }

    #[test]
    fn pixel_size_scales_with_dpi() {
        let config = RenderConfig {
            dpi: 100,
            ..Default::default()
        };
        assert_eq!(RenderMode::Flat.renderer(&config).pixel_size(), (600, 560));
        assert_eq!(RenderMode::Surface.renderer(&config).pixel_size(), (720, 620));
    }

    #[test]
    fn rendering_is_repeatable() {
        let config = config(OverRange::Clip);
        let landscape = landscape(&config);
        let dir = tempfile::tempdir().unwrap();
        for mode in [RenderMode::Flat, RenderMode::Surface] {
            let renderer = mode.renderer(&config);
            let first = dir.path().join(format!("first-{}.png", mode as u8));
            let second = dir.path().join(format!("second-{}.png", mode as u8));
            render_to_file(renderer.as_ref(), &landscape, &first).unwrap();
            render_to_file(renderer.as_ref(), &landscape, &second).unwrap();
            assert_eq!(
                std::fs::read(&first).unwrap(),
                std::fs::read(&second).unwrap(),
                "{mode} image differs between runs"
            );

            let raster = render_to_buffer(renderer.as_ref(), &landscape).unwrap();
            assert_eq!((raster.width, raster.height), renderer.pixel_size());
            assert_eq!(raster.pixel(0, 0), (255, 255, 255));
        }
    }

    #[test]
    fn single_bin_landscapes_render_in_both_modes() {
        let config = RenderConfig {
            bins: 1,
            ..config(OverRange::Flag)
        };
        let landscape = landscape(&config);
        assert_eq!(landscape.energy.shape(), (1, 1));
        for mode in [RenderMode::Flat, RenderMode::Surface] {
            let raster = render_to_buffer(mode.renderer(&config).as_ref(), &landscape)
                .unwrap_or_else(|e| panic!("{mode} failed with one bin: {e}"));
            assert_eq!((raster.width, raster.height), mode.renderer(&config).pixel_size());
        }
    }

    #[test]
    fn flag_mode_paints_saturated_cells() {
        let clip_config = config(OverRange::Clip);
        let flag_config = config(OverRange::Flag);
        let landscape = landscape(&clip_config);
        assert!(landscape.energy.saturated_count() > 0);

        let red = (OVER_COLOR.0, OVER_COLOR.1, OVER_COLOR.2);
        let clip = render_to_buffer(RenderMode::Flat.renderer(&clip_config).as_ref(), &landscape)
            .unwrap()
            .count_color(red);
        let flag = render_to_buffer(RenderMode::Flat.renderer(&flag_config).as_ref(), &landscape)
            .unwrap()
            .count_color(red);
        assert!(flag > clip, "flag={flag} clip={clip}");
    }

    #[test]
    fn render_to_file_writes_png_atomically() {
        let config = config(OverRange::Clip);
        let landscape = landscape(&config);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fel.png");

        render_to_file(RenderMode::Flat.renderer(&config).as_ref(), &landscape, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let entries: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("fel.png")]);
    }

    #[test]
    fn render_to_file_reports_missing_directory() {
        let config = config(OverRange::Clip);
        let landscape = landscape(&config);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("fel.png");

        let err = render_to_file(RenderMode::Surface.renderer(&config).as_ref(), &landscape, &path)
            .unwrap_err();
        assert!(matches!(err, Error::Stage { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn unsupported_extension_leaves_nothing_behind() {
        let config = config(OverRange::Clip);
        let landscape = landscape(&config);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fel.gif");

        let err = render_to_file(RenderMode::Flat.renderer(&config).as_ref(), &landscape, &path)
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn undersized_figures_are_rejected() {
        let tiny = RenderConfig {
            dpi: 4,
            labels: false,
            ..Default::default()
        };
        let landscape = landscape(&config(OverRange::Clip));
        assert!(matches!(
            render_to_buffer(RenderMode::Flat.renderer(&tiny).as_ref(), &landscape),
            Err(Error::InvalidConfig(_))
        ));
    }
}
