//! # epicurve graphs
//!
//! Chart model and plotters based renderers for day-zero aligned epidemic
//! series: PNG images through the bitmap backend and standalone HTML pages
//! with hover text through the SVG backend.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod labels;
pub mod model;
pub mod renderer;
pub mod types;

pub use labels::{ChartLabels, ColorAssignment};
pub use model::{ChartModel, ChartView, QuarantineMarker, Trace, TracePoint, XAxis};
pub use renderer::{renderer_for, BitmapRenderer, ChartRenderer, HtmlRenderer};
pub use types::{parse_color, ChartMode, ChartStyle, ColorScheme, OutputFormat, RenderBackend, RenderedChart};
