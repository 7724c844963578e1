//! Chart model and rendering.
//!
//! Commands describe a chart as a [`Figure`] of stacked panels. A
//! [`Renderer`] turns the figure into a file; [`SvgRenderer`] draws it with
//! plotters.

pub mod config;
pub mod model;
pub mod render;

// Re-export main types
pub use config::{load_chart_config, ChartConfig, Rgb};
pub use model::{BarGroup, BoxStats, Figure, Line, LineStyle, Panel, Plot};
pub use render::{Renderer, SvgRenderer};
