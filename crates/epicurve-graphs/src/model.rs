//! Back-end independent description of a chart.
//!
//! The model copies plotted values out of the processed series as they are;
//! renderers only position and style them.

use crate::labels::{ChartLabels, ColorAssignment};
use crate::types::ChartMode;
use chrono::NaiveDate;
use epicurve_common::format_iso_date;
use epicurve_series::{CountryAnnotation, CountrySeries, DailyRecord, Indicator, QuarantineAnnotation, SeriesMap, SeriesRequest};
use plotters::style::RGBColor;
use tracing::debug;

/// What the horizontal axis counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XAxis {
    /// Days since each country's day zero.
    Day,
    /// Calendar dates, as days since `origin`.
    Date { origin: NaiveDate },
}

impl XAxis {
    fn position(self, day: usize, date: NaiveDate) -> f64 {
        match self {
            XAxis::Day => day as f64,
            XAxis::Date { origin } => (date - origin).num_days() as f64,
        }
    }

    /// Tick text for an axis position.
    pub fn tick_label(self, x: f64) -> String {
        match self {
            XAxis::Day => format!("{x:.0}"),
            XAxis::Date { origin } => {
                format_iso_date(origin + chrono::Duration::days(x.round() as i64))
            }
        }
    }
}

/// Options that do not come from the series request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartView {
    pub log_scale: bool,
    pub mode: ChartMode,
    /// Data date shown in the title.
    pub as_of: NaiveDate,
}

/// One plotted value.
#[derive(Debug, Clone, PartialEq)]
pub struct TracePoint {
    pub x: f64,
    pub y: f64,
    pub day: usize,
    pub date: NaiveDate,
}

/// The plotted values of one country.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub country: String,
    pub color: RGBColor,
    pub label: String,
    pub points: Vec<TracePoint>,
}

/// A quarantine onset drawn as a vertical marker.
#[derive(Debug, Clone, PartialEq)]
pub struct QuarantineMarker {
    pub country: String,
    pub color: RGBColor,
    pub label: String,
    pub x: f64,
    /// Plotted value on the quarantine day, if it is drawable.
    pub y: Option<f64>,
    pub day: usize,
    pub date: NaiveDate,
}

/// Everything a renderer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub labels: ChartLabels,
    pub log_scale: bool,
    pub mode: ChartMode,
    pub x_axis: XAxis,
    pub traces: Vec<Trace>,
    pub annotations: Vec<QuarantineMarker>,
}

impl ChartModel {
    /// Builds the model from restricted series and their annotations.
    ///
    /// Empty series produce no trace. Missing, NaN or infinite values are
    /// skipped, and so are non-positive values on a log scale.
    pub fn build(
        series: &SeriesMap,
        annotations: &[CountryAnnotation],
        colors: &ColorAssignment,
        request: &SeriesRequest,
        view: ChartView,
    ) -> Self {
        let labels = ChartLabels::for_request(request, view.log_scale, view.as_of);
        let x_axis = match request.indicator {
            Indicator::Date => XAxis::Date {
                origin: series
                    .iter()
                    .filter_map(|s| s.records.first().map(|r| r.date))
                    .min()
                    .unwrap_or(view.as_of),
            },
            Indicator::Metric(_) => XAxis::Day,
        };
        let fallback_color = ColorAssignment::new(series.iter().map(|s| s.country.as_str()), &[]);
        let color_of = |country: &str| {
            colors
                .get(country)
                .or_else(|| fallback_color.get(country))
                .unwrap_or(RGBColor(0, 0, 0))
        };

        let plotted = |record: &DailyRecord| -> Option<f64> {
            let y = if request.display_mode.is_derived() {
                record.derived?
            } else {
                record.value(request.show)
            };
            let drawable = y.is_finite() && (!view.log_scale || y > 0.0);
            drawable.then_some(y)
        };

        let traces: Vec<Trace> = series
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| Trace {
                country: s.country.clone(),
                color: color_of(&s.country),
                label: trace_label(s),
                points: s
                    .records
                    .iter()
                    .filter_map(|record| {
                        plotted(record).map(|y| TracePoint {
                            x: x_axis.position(record.day, record.date),
                            y,
                            day: record.day,
                            date: record.date,
                        })
                    })
                    .collect(),
            })
            .collect();

        let markers: Vec<QuarantineMarker> = annotations
            .iter()
            .filter_map(|annotation| match &annotation.annotation {
                QuarantineAnnotation::Marked { day, date, record } => Some(QuarantineMarker {
                    country: annotation.country.clone(),
                    color: color_of(&annotation.country),
                    label: format!(
                        "{} quarantine on day {} ({})",
                        annotation.country,
                        day,
                        format_iso_date(*date)
                    ),
                    x: x_axis.position(*day, *date),
                    y: plotted(record),
                    day: *day,
                    date: *date,
                }),
                _ => None,
            })
            .collect();

        debug!(
            traces = traces.len(),
            markers = markers.len(),
            skipped = series.len() - traces.len(),
            "Chart model built"
        );

        Self {
            labels,
            log_scale: view.log_scale,
            mode: view.mode,
            x_axis,
            traces,
            annotations: markers,
        }
    }

    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.traces.iter().all(|trace| trace.points.is_empty())
    }

    /// Horizontal extent of points and markers, padded.
    pub fn x_bounds(&self) -> (f64, f64) {
        let xs = self
            .traces
            .iter()
            .flat_map(|t| t.points.iter().map(|p| p.x))
            .chain(self.annotations.iter().map(|m| m.x));
        let (lo, hi) = extent(xs).unwrap_or((0.0, 1.0));
        let pad = if self.mode == ChartMode::Bar { 1.0 } else { ((hi - lo) * 0.02).max(0.5) };
        (lo - pad, hi + pad)
    }

    /// Vertical extent of the points, padded. Always positive on a log scale.
    pub fn y_bounds(&self) -> (f64, f64) {
        let ys = self.traces.iter().flat_map(|t| t.points.iter().map(|p| p.y));
        match (extent(ys), self.log_scale) {
            (Some((lo, hi)), true) => (lo / 2.0, hi * 2.0),
            (None, true) => (1.0, 10.0),
            (Some((lo, hi)), false) => {
                let lo = lo.min(0.0);
                let hi = hi.max(0.0);
                let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
                (if lo < 0.0 { lo - pad } else { 0.0 }, hi + pad)
            }
            (None, false) => (0.0, 1.0),
        }
    }
}

fn trace_label(series: &CountrySeries) -> String {
    match series.day_zero {
        Some(day_zero) => format!("{} day 0: {}", series.country, format_iso_date(day_zero)),
        None => series.country.clone(),
    }
}

fn extent(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}
