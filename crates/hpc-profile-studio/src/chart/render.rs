//! SVG rendering of chart figures with plotters.
//!
//! Panels are stacked vertically and share the figure width. Category axes
//! put category `i` at x = i. A logarithmic panel plots `log10(y)` and
//! labels ticks with the real magnitude; values that are not positive
//! cannot be shown on it and are dropped.

use super::config::{ChartConfig, Rgb};
use super::model::{BarGroup, BoxStats, Figure, Line, LineStyle, Panel, Plot};
use crate::output::{calculate_file_size, prepare_output_path};
use crate::utils::error::ChartError;
use log::{debug, info};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

type DrawResult<T = ()> = Result<T, Box<dyn Error>>;
type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;
type Chart<'a, 'b> = ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

const FONT: &str = "sans-serif";
const BAR_SPAN: f64 = 0.8;
const BOX_HALF_WIDTH: f64 = 0.25;

/// Turns a figure into an output file
pub trait Renderer {
    fn render(&self, figure: &Figure, output: &Path) -> Result<(), ChartError>;
}

/// Plotters SVG renderer
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    config: ChartConfig,
}

impl Renderer for SvgRenderer {
    /// Render `figure` as an SVG file
    ///
    /// # Errors
    /// * `ChartError::EmptyData` - no panel has anything to draw
    /// * `ChartError::Output` - output path invalid or not creatable
    /// * `ChartError::RenderFailed` - plotters failed to draw or write
    fn render(&self, figure: &Figure, output: &Path) -> Result<(), ChartError> {
        if figure.is_empty() {
            return Err(ChartError::EmptyData(format!(
                "no data for {}",
                output.display()
            )));
        }

        prepare_output_path(output)?;
        info!(
            "Rendering {} panel(s) to {}",
            figure.panels.len(),
            output.display()
        );

        self.draw(figure, output)
            .map_err(|e| ChartError::RenderFailed(e.to_string()))?;

        info!(
            "SVG written successfully ({} bytes)",
            calculate_file_size(output)
        );
        Ok(())
    }
}

impl SvgRenderer {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    fn draw(&self, figure: &Figure, output: &Path) -> DrawResult {
        let root = SVGBackend::new(output, (self.config.width, self.config.height))
            .into_drawing_area();
        root.fill(&WHITE)?;

        let root = match &figure.title {
            Some(title) => root.titled(title, (FONT, f64::from(self.config.title_font_size)))?,
            None => root,
        };

        let areas = root.split_evenly((figure.panels.len().max(1), 1));
        for (panel, area) in figure.panels.iter().zip(areas.iter()) {
            debug!("Drawing panel {:?}", panel.title);
            self.draw_panel(area, panel)?;
        }

        root.present()?;
        Ok(())
    }

    fn draw_panel(&self, area: &Area<'_>, panel: &Panel) -> DrawResult {
        match &panel.plot {
            Plot::Bars { categories, groups } => self.draw_bars(area, panel, categories, groups),
            Plot::StackedBars { categories, groups } => {
                self.draw_stacked(area, panel, categories, groups)
            }
            Plot::Boxes { categories, boxes } => self.draw_boxes(area, panel, categories, boxes),
            Plot::Lines { x_ticks, lines } => {
                self.draw_lines(area, panel, x_ticks.as_deref(), lines)
            }
        }
    }

    fn build<'a, 'b>(
        &self,
        area: &'a Area<'b>,
        panel: &Panel,
        x: (f64, f64),
        y: (f64, f64),
    ) -> DrawResult<Chart<'a, 'b>> {
        let mut builder = ChartBuilder::on(area);
        builder
            .margin(10)
            .x_label_area_size(45)
            .y_label_area_size(70);
        if let Some(title) = &panel.title {
            builder.caption(title, (FONT, f64::from(self.config.label_font_size + 4)));
        }
        Ok(builder.build_cartesian_2d(x.0..x.1, y.0..y.1)?)
    }

    fn draw_mesh(
        &self,
        chart: &mut Chart<'_, '_>,
        panel: &Panel,
        x_labels: usize,
        x_format: &dyn Fn(&f64) -> String,
    ) -> DrawResult {
        let log_format = |v: &f64| format_log_tick(*v);
        let linear_format = |v: &f64| format_tick(*v);
        let y_format: &dyn Fn(&f64) -> String = if panel.log_y {
            &log_format
        } else {
            &linear_format
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(panel.x_label.as_str())
            .y_desc(panel.y_label.as_str())
            .label_style((FONT, f64::from(self.config.label_font_size)))
            .x_labels(x_labels)
            .x_label_formatter(x_format)
            .y_label_formatter(y_format)
            .draw()?;
        Ok(())
    }

    fn draw_legend<'a, 'b: 'a>(&self, chart: &mut Chart<'a, 'b>) -> DrawResult {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font((FONT, f64::from(self.config.label_font_size)))
            .draw()?;
        Ok(())
    }

    fn color(&self, explicit: Option<Rgb>, index: usize) -> RGBColor {
        let Rgb(r, g, b) = explicit.unwrap_or_else(|| self.config.color(index));
        RGBColor(r, g, b)
    }

    fn draw_bars(
        &self,
        area: &Area<'_>,
        panel: &Panel,
        categories: &[String],
        groups: &[BarGroup],
    ) -> DrawResult {
        let values = groups.iter().flat_map(|g| g.values.iter().copied());
        let y = y_bounds(panel, values, true);
        let x = category_range(categories.len());
        let mut chart = self.build(area, panel, x, y)?;

        let format = |v: &f64| category_label(categories, *v);
        self.draw_mesh(&mut chart, panel, categories.len() + 1, &format)?;

        let base = if panel.log_y { y.0 } else { 0.0 };
        let width = BAR_SPAN / groups.len().max(1) as f64;

        for (g, group) in groups.iter().enumerate() {
            let color = self.color(group.color, g);
            let bars: Vec<_> = group
                .values
                .iter()
                .enumerate()
                .take(categories.len())
                .filter_map(|(i, v)| {
                    let top = scale_y(panel.log_y, *v)?;
                    let left = i as f64 - BAR_SPAN / 2.0 + width * g as f64;
                    Some(Rectangle::new(
                        [(left, base), (left + width, top)],
                        color.filled(),
                    ))
                })
                .collect();

            chart
                .draw_series(bars)?
                .label(group.label.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        self.draw_legend(&mut chart)
    }

    fn draw_stacked(
        &self,
        area: &Area<'_>,
        panel: &Panel,
        categories: &[String],
        groups: &[BarGroup],
    ) -> DrawResult {
        let tops = stack_tops(categories.len(), groups);
        let y = y_bounds(panel, tops.iter().flatten().copied(), true);
        let x = category_range(categories.len());
        let mut chart = self.build(area, panel, x, y)?;

        let format = |v: &f64| category_label(categories, *v);
        self.draw_mesh(&mut chart, panel, categories.len() + 1, &format)?;

        let half = BAR_SPAN / 2.0;
        for (g, group) in groups.iter().enumerate() {
            let color = self.color(group.color, g);
            let segments: Vec<_> = (0..categories.len())
                .filter_map(|i| {
                    let below = if g == 0 { 0.0 } else { tops[g - 1][i] };
                    let top = scale_y(panel.log_y, tops[g][i])?;
                    let bottom = scale_y(panel.log_y, below).unwrap_or(y.0).max(y.0);
                    Some(Rectangle::new(
                        [(i as f64 - half, bottom), (i as f64 + half, top)],
                        color.filled(),
                    ))
                })
                .collect();

            chart
                .draw_series(segments)?
                .label(group.label.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
        }

        self.draw_legend(&mut chart)
    }

    fn draw_boxes(
        &self,
        area: &Area<'_>,
        panel: &Panel,
        categories: &[String],
        boxes: &[BoxStats],
    ) -> DrawResult {
        let y = y_bounds(panel, boxes.iter().flat_map(|b| b.values()), false);
        let x = category_range(categories.len());
        let mut chart = self.build(area, panel, x, y)?;

        let format = |v: &f64| category_label(categories, *v);
        self.draw_mesh(&mut chart, panel, categories.len() + 1, &format)?;

        let outline = self.color(None, 1);
        let median_color = self.color(None, 0);
        let log = panel.log_y;

        for (i, stats) in boxes.iter().enumerate() {
            let c = i as f64;
            let (Some(lw), Some(q1), Some(med), Some(q3), Some(uw)) = (
                scale_y(log, stats.lower_whisker),
                scale_y(log, stats.q1),
                scale_y(log, stats.median),
                scale_y(log, stats.q3),
                scale_y(log, stats.upper_whisker),
            ) else {
                debug!("Box {} has non-positive values on a log axis", i);
                continue;
            };

            chart.draw_series(std::iter::once(Rectangle::new(
                [(c - BOX_HALF_WIDTH, q1), (c + BOX_HALF_WIDTH, q3)],
                outline.stroke_width(1),
            )))?;

            let cap = BOX_HALF_WIDTH / 2.0;
            let whiskers = vec![
                PathElement::new(vec![(c, q3), (c, uw)], outline.stroke_width(1)),
                PathElement::new(vec![(c, q1), (c, lw)], outline.stroke_width(1)),
                PathElement::new(vec![(c - cap, uw), (c + cap, uw)], outline.stroke_width(1)),
                PathElement::new(vec![(c - cap, lw), (c + cap, lw)], outline.stroke_width(1)),
            ];
            chart.draw_series(whiskers)?;

            chart.draw_series(std::iter::once(PathElement::new(
                vec![(c - BOX_HALF_WIDTH, med), (c + BOX_HALF_WIDTH, med)],
                median_color.stroke_width(2),
            )))?;

            chart.draw_series(
                stats
                    .outliers
                    .iter()
                    .filter_map(|o| scale_y(log, *o))
                    .map(|o| Circle::new((c, o), 3, BLACK.stroke_width(1))),
            )?;
        }

        Ok(())
    }

    fn draw_lines(
        &self,
        area: &Area<'_>,
        panel: &Panel,
        x_ticks: Option<&[String]>,
        lines: &[Line],
    ) -> DrawResult {
        let scaled: Vec<Vec<(f64, f64)>> = lines
            .iter()
            .map(|line| {
                line.points
                    .iter()
                    .filter(|(x, _)| x.is_finite())
                    .filter_map(|(x, y)| Some((*x, scale_y(panel.log_y, *y)?)))
                    .collect()
            })
            .collect();

        let x = match (panel.x_range, x_ticks) {
            (Some(range), _) => widen(range.0, range.1),
            (None, Some(ticks)) => category_range(ticks.len()),
            (None, None) => bounds(scaled.iter().flatten().map(|(x, _)| *x))
                .map(|(lo, hi)| widen(lo, hi))
                .unwrap_or((0.0, 1.0)),
        };
        let y = match panel.y_range {
            Some(_) => y_bounds(panel, std::iter::empty(), false),
            None => padded(bounds(scaled.iter().flatten().map(|(_, y)| *y)), panel.log_y, false),
        };
        let mut chart = self.build(area, panel, x, y)?;

        let category_format = |v: &f64| x_ticks.map(|t| category_label(t, *v)).unwrap_or_default();
        let numeric_format = |v: &f64| format_tick(*v);
        match x_ticks {
            Some(ticks) => self.draw_mesh(&mut chart, panel, ticks.len() + 1, &category_format)?,
            None => self.draw_mesh(&mut chart, panel, 10, &numeric_format)?,
        }

        let mut labelled = false;
        for (i, (line, points)) in lines.iter().zip(scaled).enumerate() {
            let color = self.color(line.color, i);

            let anno = match line.style {
                LineStyle::Solid => {
                    chart.draw_series(LineSeries::new(points, color.stroke_width(1)))?
                }
                LineStyle::Thick => {
                    chart.draw_series(LineSeries::new(points, color.stroke_width(3)))?
                }
                LineStyle::Dashed => chart.draw_series(DashedLineSeries::new(
                    points,
                    10,
                    6,
                    color.stroke_width(1),
                ))?,
                LineStyle::Markers => chart.draw_series(
                    points
                        .into_iter()
                        .map(|p| Circle::new(p, 4, color.filled())),
                )?,
            };

            if let Some(label) = &line.label {
                labelled = true;
                anno.label(label.as_str()).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
            }
        }

        if labelled {
            self.draw_legend(&mut chart)?;
        }
        Ok(())
    }
}

/// Value as drawn on a linear or logarithmic axis
fn scale_y(log: bool, value: f64) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    if log {
        (value > 0.0).then(|| value.log10())
    } else {
        Some(value)
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

fn widen(lo: f64, hi: f64) -> (f64, f64) {
    if hi > lo {
        (lo, hi)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}

/// Axis range around already-scaled values
fn padded(range: Option<(f64, f64)>, log: bool, from_zero: bool) -> (f64, f64) {
    let Some((mut lo, mut hi)) = range else {
        return (0.0, 1.0);
    };

    if log {
        let (lo, hi) = (lo.floor(), hi.ceil());
        return if hi > lo { (lo, hi) } else { (lo, lo + 1.0) };
    }

    if from_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
    if !(from_zero && lo == 0.0) {
        lo -= pad;
    }
    hi += pad;
    (lo, hi)
}

/// Y range of a panel, honouring a fixed range when one is set
fn y_bounds(panel: &Panel, values: impl Iterator<Item = f64>, from_zero: bool) -> (f64, f64) {
    if let Some((lo, hi)) = panel.y_range {
        let scaled = (scale_y(panel.log_y, lo), scale_y(panel.log_y, hi));
        if let (Some(lo), Some(hi)) = scaled {
            return widen(lo, hi);
        }
    }

    let scaled = values.filter_map(|v| scale_y(panel.log_y, v));
    padded(bounds(scaled), panel.log_y, from_zero)
}

fn category_range(count: usize) -> (f64, f64) {
    (-0.5, count.max(1) as f64 - 0.5)
}

/// Running tops of stacked segments, `[group][category]`
fn stack_tops(categories: usize, groups: &[BarGroup]) -> Vec<Vec<f64>> {
    let mut running = vec![0.0; categories];
    groups
        .iter()
        .map(|group| {
            for (i, top) in running.iter_mut().enumerate() {
                let v = group.values.get(i).copied().unwrap_or(0.0);
                if v.is_finite() {
                    *top += v;
                }
            }
            running.clone()
        })
        .collect()
}

fn category_label(categories: &[String], position: f64) -> String {
    let index = position.round();
    if (position - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    categories.get(index as usize).cloned().unwrap_or_default()
}

fn format_tick(value: f64) -> String {
    if value.abs() >= 1e5 || (value != 0.0 && value.abs() < 1e-3) {
        format!("{:.1e}", value)
    } else if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn format_log_tick(exponent: f64) -> String {
    if exponent.fract() == 0.0 {
        format!("1e{:.0}", exponent)
    } else {
        format!("{:.2e}", 10f64.powf(exponent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn categories(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_scale_y() {
        assert_eq!(scale_y(false, -2.0), Some(-2.0));
        assert_eq!(scale_y(true, 100.0), Some(2.0));
        assert_eq!(scale_y(true, 0.0), None);
        assert_eq!(scale_y(false, f64::NAN), None);
    }

    #[test]
    fn test_category_label() {
        let cats = categories(&["1", "2", "4"]);
        assert_eq!(category_label(&cats, 0.0), "1");
        assert_eq!(category_label(&cats, 2.0), "4");
        assert_eq!(category_label(&cats, 0.5), "");
        assert_eq!(category_label(&cats, 3.0), "");
        assert_eq!(category_label(&cats, -1.0), "");
    }

    #[test]
    fn test_stack_tops() {
        let groups = vec![
            BarGroup::new("a", vec![1.0, 2.0]),
            BarGroup::new("b", vec![3.0]),
        ];
        assert_eq!(stack_tops(2, &groups), vec![vec![1.0, 2.0], vec![4.0, 2.0]]);
    }

    #[test]
    fn test_padded_ranges() {
        assert_eq!(padded(None, false, true), (0.0, 1.0));
        assert_eq!(padded(Some((0.3, 2.5)), true, false), (0.0, 3.0));
        assert_eq!(padded(Some((2.0, 2.0)), true, false), (2.0, 3.0));
        let (lo, hi) = padded(Some((10.0, 20.0)), false, true);
        assert_eq!(lo, 0.0);
        assert_eq!(hi, 21.0);
    }

    #[test]
    fn test_tick_formats() {
        assert_eq!(format_tick(5.0), "5");
        assert_eq!(format_tick(2.5), "2.50");
        assert_eq!(format_log_tick(3.0), "1e3");
    }

    #[test]
    fn test_render_empty_figure_is_error() {
        let dir = tempdir().unwrap();
        let result = SvgRenderer::default().render(&Figure::new(), &dir.path().join("x.svg"));
        assert!(matches!(result, Err(ChartError::EmptyData(_))));
    }

    #[test]
    fn test_render_bar_figure() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("nested").join("bars.svg");

        let figure = Figure::new().with_title("Runtime").with_panel(
            Panel::new(Plot::Bars {
                categories: categories(&["1", "2"]),
                groups: vec![BarGroup::new("io", vec![10.0, 5.0])],
            })
            .with_labels("Number of Processes", "Time (s)"),
        );

        SvgRenderer::default().render(&figure, &output).unwrap();

        let svg = std::fs::read_to_string(&output).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Runtime"));
    }
}
