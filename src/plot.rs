//! Figures of fitted curves and their training data, rendered to SVG with `plotters`.
//!
//! A [Figure] only collects labelled series; nothing is drawn until [Figure::save_svg].

use std::{ops::Range, path::Path};

use itertools::{Itertools, MinMaxResult};
use ndarray::ArrayView1;
use plotters::prelude::*;

const COLORS: [RGBColor; 6] = [BLUE, RED, GREEN, MAGENTA, CYAN, BLACK];
const DEFAULT_SIZE: (u32, u32) = (800, 600);

/// Error occurring while building or rendering a figure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlotError {
    #[error("series `{label}` has {xs} x values but {ys} y values")]
    LengthMismatch { label: String, xs: usize, ys: usize },

    #[error("figure has no data to draw")]
    Empty,

    #[error("error drawing plot: {0}")]
    Draw(String),
}

fn draw_error(err: impl std::fmt::Display) -> PlotError {
    PlotError::Draw(err.to_string())
}

/// How the points of a series are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    /// Points connected in order
    Line,
    /// Unconnected markers
    Scatter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub label: String,
    pub kind: SeriesKind,
    pub points: Vec<(f64, f64)>,
}

/// A 2d chart made of labelled line and scatter series, with the legend in the lower left.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    title: String,
    size: (u32, u32),
    series: Vec<Series>,
}

impl Figure {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            size: DEFAULT_SIZE,
            series: Vec::new(),
        }
    }

    /// Size of the rendered image in pixels
    pub fn with_size(mut self, size: (u32, u32)) -> Self {
        self.size = size;
        self
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    fn push(
        &mut self,
        kind: SeriesKind,
        xs: ArrayView1<f64>,
        ys: ArrayView1<f64>,
        label: &str,
    ) -> Result<&mut Self, PlotError> {
        if xs.len() != ys.len() {
            return Err(PlotError::LengthMismatch {
                label: label.to_string(),
                xs: xs.len(),
                ys: ys.len(),
            });
        }
        self.series.push(Series {
            label: label.to_string(),
            kind,
            points: xs.iter().copied().zip(ys.iter().copied()).collect(),
        });
        Ok(self)
    }

    /// Add a line through the points `(xs[i], ys[i])`
    ///
    /// # Errors
    /// [PlotError::LengthMismatch] if `xs` and `ys` differ in length.
    pub fn plot(
        &mut self,
        xs: ArrayView1<f64>,
        ys: ArrayView1<f64>,
        label: &str,
    ) -> Result<&mut Self, PlotError> {
        self.push(SeriesKind::Line, xs, ys, label)
    }

    /// Add markers at the points `(xs[i], ys[i])`
    ///
    /// # Errors
    /// [PlotError::LengthMismatch] if `xs` and `ys` differ in length.
    pub fn scatter(
        &mut self,
        xs: ArrayView1<f64>,
        ys: ArrayView1<f64>,
        label: &str,
    ) -> Result<&mut Self, PlotError> {
        self.push(SeriesKind::Scatter, xs, ys, label)
    }

    fn range(&self, coord: impl Fn(&(f64, f64)) -> f64) -> Option<Range<f64>> {
        let values = self
            .series
            .iter()
            .flat_map(|series| series.points.iter().map(&coord))
            .filter(|v| v.is_finite());
        let (min, max) = match values.minmax() {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(v) => (v, v),
            MinMaxResult::MinMax(min, max) => (min, max),
        };
        // pad by 5% so no point sits on the frame; degenerate ranges get a unit width
        let pad = if max > min { 0.05 * (max - min) } else { 0.5 };
        Some(min - pad..max + pad)
    }

    /// Range of all finite x values, padded by 5%
    pub fn x_range(&self) -> Option<Range<f64>> {
        self.range(|p| p.0)
    }

    /// Range of all finite y values, padded by 5%
    pub fn y_range(&self) -> Option<Range<f64>> {
        self.range(|p| p.1)
    }

    /// Render the figure as SVG to `path`.
    ///
    /// # Errors
    /// [PlotError::Empty] if there's no finite point to draw; [PlotError::Draw] if plotters
    /// fails, e.g. because `path` can't be written.
    pub fn save_svg(&self, path: impl AsRef<Path>) -> Result<(), PlotError> {
        let (x_range, y_range) = self
            .x_range()
            .zip(self.y_range())
            .ok_or(PlotError::Empty)?;
        log::debug!(
            "rendering {} series to {}",
            self.series.len(),
            path.as_ref().display()
        );

        let root = SVGBackend::new(path.as_ref(), self.size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.title, ("sans-serif", 24).into_font())
            .margin(5)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(x_range, y_range)
            .map_err(draw_error)?;
        chart.configure_mesh().draw().map_err(draw_error)?;

        for (series, color) in self.series.iter().zip(COLORS.iter().cycle()) {
            let points = series.points.iter().copied();
            match series.kind {
                SeriesKind::Line => {
                    let style = color.stroke_width(2);
                    chart
                        .draw_series(LineSeries::new(points, style))
                        .map_err(draw_error)?
                        .label(series.label.as_str())
                        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
                }
                SeriesKind::Scatter => {
                    let style = color.filled();
                    chart
                        .draw_series(points.map(|point| Circle::new(point, 3, style)))
                        .map_err(draw_error)?
                        .label(series.label.as_str())
                        .legend(move |(x, y)| Circle::new((x + 10, y), 3, style));
                }
            }
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .position(SeriesLabelPosition::LowerLeft)
            .draw()
            .map_err(draw_error)?;

        root.present().map_err(draw_error)?;
        Ok(())
    }
}
