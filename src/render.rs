//! Line-chart rendering with `plotters`.

use std::fs;
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::info;

use crate::config::DiagramConfig;
use crate::error::{DiagramError, Result};
use crate::table::Table;
use crate::window::{Unit, Window};

/// Pixel size of every chart.
pub const CHART_SIZE: (u32, u32) = (1024, 768);
/// Upper bound on major ticks along the y axis.
pub const MAX_Y_TICKS: usize = 20;

const X_DESC: &str = "Buffer Size";

/// Backend family selected from the output extension.
///
/// SVG carries its text as markup. Raster formats rasterise glyphs from
/// system fonts and are only available with the `system-fonts` feature.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ImageFormat {
    /// Vector output through the SVG backend.
    Svg,
    /// Raster output; the encoder is picked from the extension.
    #[cfg(feature = "system-fonts")]
    Bitmap,
}

impl ImageFormat {
    /// Maps a file extension (case-insensitive) to a backend.
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "svg" => Ok(ImageFormat::Svg),
            #[cfg(feature = "system-fonts")]
            "png" | "jpg" | "jpeg" | "bmp" => Ok(ImageFormat::Bitmap),
            _ => Err(DiagramError::UnsupportedFormat(ext.to_string())),
        }
    }
}

/// Writes charts for one benchmark into one directory.
#[derive(Debug)]
pub struct Renderer<'a> {
    bench: &'a str,
    outdir: &'a Path,
    extension: &'a str,
    image: ImageFormat,
}

impl<'a> Renderer<'a> {
    /// Validates the configured image format.
    pub fn new(config: &'a DiagramConfig) -> Result<Self> {
        Ok(Self {
            bench: &config.bench,
            outdir: &config.outdir,
            extension: &config.format,
            image: ImageFormat::from_extension(&config.format)?,
        })
    }

    /// `<outdir>/<bench>_<window>.<format>`
    pub fn output_path(&self, window: &str) -> PathBuf {
        self.outdir
            .join(format!("{}_{window}.{}", self.bench, self.extension))
    }

    /// Draws every window of `table` and returns the written paths.
    pub fn render_windows(&self, table: &Table, windows: &[Window]) -> Result<Vec<PathBuf>> {
        windows
            .iter()
            .map(|window| {
                let rows = table.slice(window.rows.clone());
                self.make_figure(&rows, window.name, window.unit.as_str())
            })
            .collect()
    }

    /// Draws `table` as one chart titled `<bench>_<window>`, in `unit`.
    ///
    /// The unit is checked before anything touches the filesystem. The output
    /// directory is created if needed and an existing file is overwritten.
    pub fn make_figure(&self, table: &Table, window: &str, unit: &str) -> Result<PathBuf> {
        let unit: Unit = unit.parse()?;
        fs::create_dir_all(self.outdir).map_err(|source| DiagramError::CreateOutputDir {
            path: self.outdir.to_path_buf(),
            source,
        })?;

        let title = format!("{}_{window}", self.bench);
        let path = self.output_path(window);
        let table = table.scaled(unit.divisor());
        let drawn = match self.image {
            ImageFormat::Svg => {
                let root = SVGBackend::new(&path, CHART_SIZE).into_drawing_area();
                draw_chart(root, &table, &title, unit).map_err(|err| err.to_string())
            }
            #[cfg(feature = "system-fonts")]
            ImageFormat::Bitmap => {
                let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
                draw_chart(root, &table, &title, unit).map_err(|err| err.to_string())
            }
        };
        drawn.map_err(|message| DiagramError::render(&path, message))?;

        info!(path = %path.display(), rows = table.row_count(), %unit, "wrote diagram");
        Ok(path)
    }
}

fn y_range(table: &Table) -> std::ops::Range<f64> {
    match table.value_range() {
        None => 0.0..1.0,
        Some((lo, hi)) if lo == hi => (lo - 1.0)..(hi + 1.0),
        Some((lo, hi)) => {
            let pad = (hi - lo) * 0.05;
            (lo - pad)..(hi + pad)
        }
    }
}

fn draw_chart<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    table: &Table,
    title: &str,
    unit: Unit,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let labels = table.rows();
    let x_max = labels.len().saturating_sub(1).max(1) as i32;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(80)
        .build_cartesian_2d(0i32..x_max, y_range(table))?;

    let x_formatter = |x: &i32| {
        usize::try_from(*x)
            .ok()
            .and_then(|idx| labels.get(idx))
            .cloned()
            .unwrap_or_default()
    };
    chart
        .configure_mesh()
        .x_labels(labels.len().max(2))
        .x_label_formatter(&x_formatter)
        .y_labels(MAX_Y_TICKS)
        .x_desc(X_DESC)
        .y_desc(format!("Measurement ({unit})"))
        .draw()?;

    for (idx, column) in table.columns().iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        chart
            .draw_series(LineSeries::new(
                column
                    .values
                    .iter()
                    .enumerate()
                    .map(|(x, y)| (x as i32, *y)),
                color.stroke_width(2),
            ))?
            .label(column.name.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
