//! Drawing of the visualizer figure with plotters: title band, mesh, zero
//! lines, one line per visible curve, legend and the hover tooltip.
use crate::error::PlotError;
use crate::numerical::series::{CurveKind, SeriesSet};
use crate::plotting::config::{CurveSelection, PlotConfig};
use crate::plotting::plot_state::HoverAnnotation;
use crate::plotting::view::ViewWindow;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

/// Everything one frame of the figure depends on.
pub struct Figure<'a> {
    pub config: &'a PlotConfig,
    pub series: &'a SeriesSet,
    pub selection: CurveSelection,
    pub view: ViewWindow,
    /// number of leading samples drawn of every curve
    pub visible_len: usize,
    pub hover: Option<&'a HoverAnnotation>,
}

fn render_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Render(e.to_string())
}

pub fn draw_figure<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    figure: &Figure,
) -> Result<(), PlotError> {
    let config = figure.config;
    let view = figure.view;
    root.fill(&WHITE).map_err(render_err)?;

    let (title_band, body) = root.split_vertically(config.title_height);
    let title_style = TextStyle::from(("sans-serif", 24).into_font())
        .pos(Pos::new(HPos::Center, VPos::Center));
    title_band
        .draw_text(
            &config.title,
            &title_style,
            (config.width as i32 / 2, config.title_height as i32 / 2),
        )
        .map_err(render_err)?;

    let mut chart = ChartBuilder::on(&body)
        .margin(config.margin)
        .x_label_area_size(config.x_label_area)
        .y_label_area_size(config.y_label_area)
        .build_cartesian_2d(view.x_min..view.x_max, view.y_min..view.y_max)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc("x")
        .y_desc("y")
        .draw()
        .map_err(render_err)?;

    let axis_color = config.axis_color.to_rgb();
    if view.y_min <= 0.0 && view.y_max >= 0.0 {
        chart
            .draw_series(LineSeries::new(vec![(view.x_min, 0.0), (view.x_max, 0.0)], &axis_color))
            .map_err(render_err)?;
    }
    if view.x_min <= 0.0 && view.x_max >= 0.0 {
        chart
            .draw_series(LineSeries::new(vec![(0.0, view.y_min), (0.0, view.y_max)], &axis_color))
            .map_err(render_err)?;
    }

    let series = figure.series;
    let mut labelled = 0;
    for (kind, values) in series.curves().filter(|(kind, _)| figure.selection.shows(*kind)) {
        let points: Vec<(f64, f64)> = series
            .x
            .iter()
            .zip(values.iter())
            .take(figure.visible_len)
            .map(|(&x, &y)| (x, y))
            .collect();
        if points.len() < 2 {
            continue;
        }
        let color = config.color_of(kind);
        let style = color.stroke_width(2);
        // solid function, dashed derivatives, dotted integral
        let anno = match kind {
            CurveKind::Function => chart.draw_series(LineSeries::new(points, style)),
            CurveKind::Derivative(_) => chart.draw_series(DashedLineSeries::new(points, 10, 6, style)),
            CurveKind::Integral => chart.draw_series(DashedLineSeries::new(points, 2, 4, style)),
        }
        .map_err(render_err)?;
        anno.label(kind.to_string())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        labelled += 1;
    }

    if let Some(hover) = figure.hover {
        let color = config.color_of(hover.curve);
        chart
            .draw_series(std::iter::once(
                EmptyElement::at((hover.x, hover.y))
                    + Circle::new((0, 0), 4, color.filled())
                    + Text::new(hover.text(), (8, -18), ("sans-serif", 14).into_font()),
            ))
            .map_err(render_err)?;
    }

    if labelled > 0 {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(render_err)?;
    }
    root.present().map_err(render_err)?;
    Ok(())
}

/// The figure as an RGB buffer of `width * height * 3` bytes.
pub fn render_rgb(figure: &Figure) -> Result<Vec<u8>, PlotError> {
    let (width, height) = (figure.config.width, figure.config.height);
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw_figure(root, figure)?;
    }
    Ok(buffer)
}

/// Image formats the bitmap encoder writes, chosen by extension.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext.to_lowercase().as_str(), "png" | "jpg" | "jpeg"))
        .unwrap_or(false)
}

/// Renders the figure into `path` as PNG or JPEG.
pub fn save_figure(figure: &Figure, path: &Path) -> Result<(), PlotError> {
    if !is_supported_image(path) {
        return Err(PlotError::Export {
            path: path.to_path_buf(),
            message: "unsupported image format, expected .png, .jpg or .jpeg".to_string(),
        });
    }
    let root = BitMapBackend::new(path, (figure.config.width, figure.config.height))
        .into_drawing_area();
    draw_figure(root, figure).map_err(|e| PlotError::Export {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    log::info!("plot saved to {}", path.display());
    Ok(())
}
