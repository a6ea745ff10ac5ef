//! Chart renderers.
//!
//! Both back-ends draw the same plotters chart; they differ only in the
//! drawing backend and in how the result is packaged.

use crate::model::ChartModel;
use crate::types::{ChartMode, ChartStyle, OutputFormat, RenderBackend, RenderedChart};
use epicurve_common::{format_iso_date, EpiError, Result};
use image::{codecs::png::PngEncoder, ColorType, ImageEncoder};
use plotters::coord::ranged1d::{AsRangedCoord, ValueFormatter};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fmt::Write as _;
use std::ops::Range;
use tracing::{info, instrument, warn};

/// Share of a day slot covered by the bars of all countries.
const BAR_SLOT: f64 = 0.8;

/// Trait for turning a chart model into an encoded chart.
pub trait ChartRenderer {
    /// Renders the model with the given style.
    fn render(&self, model: &ChartModel, style: &ChartStyle) -> Result<RenderedChart>;

    /// Format of the rendered bytes.
    fn format(&self) -> OutputFormat;

    /// Back-end name.
    fn name(&self) -> &'static str;
}

/// Returns the renderer for a back-end.
pub fn renderer_for(backend: RenderBackend) -> Box<dyn ChartRenderer> {
    match backend {
        RenderBackend::Bitmap => Box::new(BitmapRenderer),
        RenderBackend::Html => Box::new(HtmlRenderer),
    }
}

/// A drawn point in backend pixels with its hover text.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HoverTarget {
    position: (i32, i32),
    text: String,
}

fn draw_chart<DB>(root: &DrawingArea<DB, Shift>, model: &ChartModel, style: &ChartStyle) -> Result<Vec<HoverTarget>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&style.background)?;
    if model.is_empty() {
        warn!(title = %model.labels.title, "Nothing to plot, drawing empty axes");
    }

    let (x_lo, x_hi) = model.x_bounds();
    let (y_lo, y_hi) = model.y_bounds();
    if model.log_scale {
        draw_on(root, model, style, x_lo..x_hi, (y_lo..y_hi).log_scale(), (y_lo, y_hi))
    } else {
        draw_on(root, model, style, x_lo..x_hi, y_lo..y_hi, (y_lo, y_hi))
    }
}

fn draw_on<DB, Y>(
    root: &DrawingArea<DB, Shift>,
    model: &ChartModel,
    style: &ChartStyle,
    x_range: Range<f64>,
    y_range: Y,
    (y_lo, y_hi): (f64, f64),
) -> Result<Vec<HoverTarget>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    Y: AsRangedCoord<Value = f64>,
    Y::CoordDescType: ValueFormatter<f64>,
{
    let mut chart = ChartBuilder::on(root)
        .caption(&model.labels.title, ("sans-serif", style.title_font_size))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(90)
        .build_cartesian_2d(x_range, y_range)?;

    let x_axis = model.x_axis;
    let x_formatter = move |x: &f64| x_axis.tick_label(*x);
    let mut mesh = chart.configure_mesh();
    mesh.x_desc(model.labels.x.as_str())
        .y_desc(model.labels.y.as_str())
        .x_label_formatter(&x_formatter);
    if !style.show_grid {
        mesh.disable_mesh();
    }
    mesh.draw()?;

    let mut targets = Vec::new();
    let bar_width = BAR_SLOT / model.traces.len().max(1) as f64;
    let bar_base = if model.log_scale { y_lo } else { 0.0_f64.max(y_lo) };

    for (idx, trace) in model.traces.iter().enumerate() {
        let color = trace.color;
        match model.mode {
            ChartMode::Line => {
                chart
                    .draw_series(LineSeries::new(
                        trace.points.iter().map(|p| (p.x, p.y)),
                        color.stroke_width(2),
                    ))?
                    .label(trace.label.clone())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
                chart.draw_series(
                    trace
                        .points
                        .iter()
                        .map(|p| Circle::new((p.x, p.y), 3, color.filled())),
                )?;
            }
            ChartMode::Bar => {
                let offset = -BAR_SLOT / 2.0 + bar_width * idx as f64;
                chart
                    .draw_series(trace.points.iter().map(|p| {
                        Rectangle::new(
                            [(p.x + offset, bar_base), (p.x + offset + bar_width, p.y)],
                            color.filled(),
                        )
                    }))?
                    .label(trace.label.clone())
                    .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
            }
        }

        for point in &trace.points {
            let x = match model.mode {
                ChartMode::Line => point.x,
                ChartMode::Bar => point.x + bar_width.mul_add(idx as f64 + 0.5, -BAR_SLOT / 2.0),
            };
            targets.push(HoverTarget {
                position: chart.backend_coord(&(x, point.y)),
                text: format!(
                    "{}\nDay {} ({})\n{}: {}",
                    trace.country,
                    point.day,
                    format_iso_date(point.date),
                    model.labels.y,
                    point.y
                ),
            });
        }
    }

    for marker in &model.annotations {
        let color = marker.color;
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(marker.x, y_lo), (marker.x, y_hi)],
                color.stroke_width(1),
            )))?
            .label(marker.label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x + 10, y - 6), (x + 10, y + 6)], color.stroke_width(2)));
        if let Some(y) = marker.y {
            chart.draw_series(std::iter::once(Cross::new((marker.x, y), 7, color.stroke_width(2))))?;
            targets.push(HoverTarget {
                position: chart.backend_coord(&(marker.x, y)),
                text: marker.label.clone(),
            });
        }
    }

    if !model.traces.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    Ok(targets)
}

/// Renders PNG images through the plotters bitmap backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapRenderer;

impl ChartRenderer for BitmapRenderer {
    #[instrument(skip_all, fields(title = %model.labels.title))]
    fn render(&self, model: &ChartModel, style: &ChartStyle) -> Result<RenderedChart> {
        let (width, height) = (style.width, style.height);
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            draw_chart(&root, model, style)?;
            root.present()?;
        }

        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(&buffer, width, height, ColorType::Rgb8)
            .map_err(|err| EpiError::graph_with_source("PNG encoding failed", err))?;

        info!(bytes = png.len(), width, height, "Rendered bitmap chart");
        Ok(RenderedChart {
            format: OutputFormat::Png,
            bytes: png,
        })
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Png
    }

    fn name(&self) -> &'static str {
        RenderBackend::Bitmap.name()
    }
}

/// Renders a standalone HTML page around an SVG chart. Every plotted point
/// carries hover text.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    fn hover_layer(targets: &[HoverTarget]) -> String {
        let mut layer = String::from("<g class=\"hover\">\n");
        for target in targets {
            let _ = writeln!(
                layer,
                "<circle class=\"hover-target\" cx=\"{}\" cy=\"{}\" r=\"6\" fill=\"transparent\"><title>{}</title></circle>",
                target.position.0,
                target.position.1,
                html_escape::encode_text(&target.text)
            );
        }
        layer.push_str("</g>\n");
        layer
    }

    fn page(title: &str, svg: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n\
             <style>body {{ margin: 0; font-family: sans-serif; }} .hover-target:hover {{ stroke: #333; }}</style>\n\
             </head>\n<body>\n{}\n</body>\n</html>\n",
            html_escape::encode_text(title),
            svg
        )
    }
}

impl ChartRenderer for HtmlRenderer {
    #[instrument(skip_all, fields(title = %model.labels.title))]
    fn render(&self, model: &ChartModel, style: &ChartStyle) -> Result<RenderedChart> {
        let mut svg = String::new();
        let targets = {
            let root = SVGBackend::with_string(&mut svg, (style.width, style.height)).into_drawing_area();
            let targets = draw_chart(&root, model, style)?;
            root.present()?;
            targets
        };

        let layer = Self::hover_layer(&targets);
        match svg.rfind("</svg>") {
            Some(end) => svg.insert_str(end, &layer),
            None => return Err(EpiError::graph("SVG backend produced no closing tag")),
        }

        let page = Self::page(&model.labels.title, &svg);
        info!(bytes = page.len(), hover_points = targets.len(), "Rendered HTML chart");
        Ok(RenderedChart {
            format: OutputFormat::Html,
            bytes: page.into_bytes(),
        })
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Html
    }

    fn name(&self) -> &'static str {
        RenderBackend::Html.name()
    }
}
