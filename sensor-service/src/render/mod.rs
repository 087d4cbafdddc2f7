use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use plotters::{coord::Shift, prelude::*};

use crate::{config::ChartConfig, transform::ChartSeries};

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("font error: {0}")]
    Font(String),
    #[error("chart drawing failed: {0}")]
    Draw(String),
    #[error("chart file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("render task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Turns a chart series into an encoded image.
#[async_trait::async_trait]
pub trait ChartRenderer: Send + Sync {
    /// Returns PNG bytes.
    async fn render(&self, series: &ChartSeries, y_label: &str) -> Result<Vec<u8>, RenderError>;
}

/// Line plot on the plotters bitmap backend.
#[derive(Debug, Clone)]
pub struct PlottersRenderer {
    width: u32,
    height: u32,
    x_label: String,
    with_text: bool,
}

/// Family name the configured font is registered under.
const FONT_FAMILY: &str = "sans-serif";

/// Common locations of a plain sans TTF font, checked when none is configured.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

pub fn discover_system_font() -> Option<PathBuf> {
    SYSTEM_FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

impl PlottersRenderer {
    /// A configured font must load; otherwise a system font is used when one is found.
    pub fn new(cfg: &ChartConfig) -> Result<Self, RenderError> {
        let with_text = if let Some(path) = &cfg.font_path {
            register_font_file(path)?;
            true
        } else if let Some(path) = discover_system_font() {
            match register_font_file(&path) {
                Ok(()) => {
                    tracing::info!(font = %path.display(), "using system font for chart text");
                    true
                }
                Err(e) => {
                    tracing::warn!(error = %e, "system font unusable, charts are rendered without text");
                    false
                }
            }
        } else {
            tracing::warn!("no chart font configured or found, charts are rendered without text");
            false
        };

        Ok(Self {
            width: cfg.width,
            height: cfg.height,
            x_label: cfg.x_label.clone(),
            with_text,
        })
    }
}

fn register_font_file(path: &Path) -> Result<(), RenderError> {
    let bytes = std::fs::read(path)
        .map_err(|e| RenderError::Font(format!("failed to read {}: {e}", path.display())))?;

    // plotters keeps registered fonts for the life of the process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    plotters::style::register_font(FONT_FAMILY, plotters::style::FontStyle::Normal, bytes)
        .map_err(|_| RenderError::Font(format!("{} is not a usable TTF font", path.display())))
}

#[async_trait::async_trait]
impl ChartRenderer for PlottersRenderer {
    async fn render(&self, series: &ChartSeries, y_label: &str) -> Result<Vec<u8>, RenderError> {
        let renderer = self.clone();
        let series = series.clone();
        let y_label = y_label.to_string();

        // plotters is synchronous and writes through a file path.
        tokio::task::spawn_blocking(move || renderer.draw_png(&series, &y_label)).await?
    }
}

impl PlottersRenderer {
    fn draw_png(&self, series: &ChartSeries, y_label: &str) -> Result<Vec<u8>, RenderError> {
        let file = tempfile::Builder::new()
            .prefix("sensor-chart-")
            .suffix(".png")
            .tempfile()?;

        self.draw_to(file.path(), series, y_label)?;
        Ok(std::fs::read(file.path())?)
    }

    fn draw_to(&self, path: &Path, series: &ChartSeries, y_label: &str) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        self.draw_on(&root, series, y_label)
    }

    fn draw_on<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        series: &ChartSeries,
        y_label: &str,
    ) -> Result<(), RenderError> {
        root.fill(&WHITE).map_err(draw_err)?;

        let x_max = series.len().saturating_sub(1).max(1);
        let (y_min, y_max) = y_range(&series.values);

        let mut builder = ChartBuilder::on(root);
        builder.margin(15);
        if self.with_text {
            builder.x_label_area_size(110).y_label_area_size(60);
        }
        let mut chart = builder
            .build_cartesian_2d(0..x_max, y_min..y_max)
            .map_err(draw_err)?;

        if self.with_text {
            let labels = &series.labels;
            chart
                .configure_mesh()
                .x_desc(self.x_label.as_str())
                .y_desc(y_label)
                .x_labels(labels.len().clamp(2, 12))
                .x_label_formatter(&|x: &usize| labels.get(*x).cloned().unwrap_or_default())
                .x_label_style(
                    (FONT_FAMILY, 11)
                        .into_font()
                        .transform(FontTransform::Rotate90),
                )
                .y_label_style((FONT_FAMILY, 12).into_font())
                .draw()
                .map_err(draw_err)?;
        } else {
            // Mesh and axes drawn as plain paths; label areas need a font.
            let grid = ShapeStyle::from(&RGBColor(220, 220, 220)).stroke_width(1);
            let axis = ShapeStyle::from(&BLACK).stroke_width(1);

            let steps = 5;
            chart
                .draw_series((1..steps).map(|k| {
                    let y = y_min + (y_max - y_min) * k as f64 / steps as f64;
                    PathElement::new(vec![(0, y), (x_max, y)], grid)
                }))
                .map_err(draw_err)?;
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(0, y_max), (0, y_min), (x_max, y_min)],
                    axis,
                )))
                .map_err(draw_err)?;
        }

        chart
            .draw_series(LineSeries::new(
                series.values.iter().enumerate().map(|(i, &v)| (i, v)),
                ShapeStyle::from(&BLUE).stroke_width(2),
            ))
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        Ok(())
    }
}

fn draw_err(e: impl std::fmt::Display) -> RenderError {
    RenderError::Draw(e.to_string())
}

/// Y axis bounds with 10% padding; flat or empty data still gets a visible band.
fn y_range(values: &[f64]) -> (f64, f64) {
    let bounds = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        });

    let Some((min, max)) = bounds else {
        return (0.0, 1.0);
    };
    if max - min < f64::EPSILON {
        return (min - 1.0, max + 1.0);
    }

    let padding = (max - min) * 0.1;
    (min - padding, max + padding)
}

/// `data:` URL for a PNG, as served in `plot_url`.
pub fn data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}
