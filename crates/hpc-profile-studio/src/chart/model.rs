//! Renderer-independent chart description.

use super::config::Rgb;

/// A chart made of one or more panels stacked top to bottom
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Figure {
    pub title: Option<String>,
    pub panels: Vec<Panel>,
}

impl Figure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the title only when one is given
    pub fn with_optional_title(mut self, title: Option<String>) -> Self {
        if title.is_some() {
            self.title = title;
        }
        self
    }

    pub fn with_panel(mut self, panel: Panel) -> Self {
        self.panels.push(panel);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.panels.iter().all(|p| p.plot.is_empty())
    }
}

/// One set of axes
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,
    /// Logarithmic y axis
    pub log_y: bool,
    pub x_range: Option<(f64, f64)>,
    pub y_range: Option<(f64, f64)>,
    pub plot: Plot,
}

impl Panel {
    pub fn new(plot: Plot) -> Self {
        Self {
            title: None,
            x_label: String::new(),
            y_label: String::new(),
            log_y: false,
            x_range: None,
            y_range: None,
            plot,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_labels(mut self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self
    }

    pub fn with_log_y(mut self, log_y: bool) -> Self {
        self.log_y = log_y;
        self
    }

    pub fn with_x_range(mut self, range: Option<(f64, f64)>) -> Self {
        self.x_range = range;
        self
    }

    pub fn with_y_range(mut self, range: Option<(f64, f64)>) -> Self {
        self.y_range = range;
        self
    }
}

/// What a panel shows
#[derive(Debug, Clone, PartialEq)]
pub enum Plot {
    /// Bars of every group side by side within each category
    Bars {
        categories: Vec<String>,
        groups: Vec<BarGroup>,
    },
    /// Bars of every group stacked in order within each category
    StackedBars {
        categories: Vec<String>,
        groups: Vec<BarGroup>,
    },
    /// One box per category
    Boxes {
        categories: Vec<String>,
        boxes: Vec<BoxStats>,
    },
    /// Lines over a numeric x axis, optionally labelled at integer positions
    Lines {
        x_ticks: Option<Vec<String>>,
        lines: Vec<Line>,
    },
}

impl Plot {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Bars { categories, groups } | Self::StackedBars { categories, groups } => {
                categories.is_empty() || groups.is_empty()
            }
            Self::Boxes { boxes, .. } => boxes.is_empty(),
            Self::Lines { lines, .. } => lines.iter().all(|l| l.points.is_empty()),
        }
    }
}

/// One legend entry of a bar chart, with a value per category
#[derive(Debug, Clone, PartialEq)]
pub struct BarGroup {
    pub label: String,
    pub values: Vec<f64>,
    pub color: Option<Rgb>,
}

impl BarGroup {
    pub fn new(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values,
            color: None,
        }
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    #[default]
    Solid,
    Thick,
    Dashed,
    /// Points only
    Markers,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub label: Option<String>,
    pub points: Vec<(f64, f64)>,
    pub style: LineStyle,
    pub color: Option<Rgb>,
}

impl Line {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self {
            label: None,
            points,
            style: LineStyle::Solid,
            color: None,
        }
    }

    /// Points at x = 0, 1, 2, ...
    pub fn indexed(values: &[f64]) -> Self {
        Self::new(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (i as f64, *v))
                .collect(),
        )
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }
}

/// Five-number summary of a sample set plus the points beyond the whiskers
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Summarize `samples`
    ///
    /// Quartiles interpolate linearly between order statistics. Whiskers end
    /// at the most extreme samples within 1.5 IQR of the box; samples beyond
    /// them are outliers. Non-finite samples are ignored. `None` when no
    /// finite sample remains.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let low = q1 - 1.5 * iqr;
        let high = q3 + 1.5 * iqr;

        let (inside, outliers): (Vec<f64>, Vec<f64>) =
            sorted.iter().partition(|v| **v >= low && **v <= high);
        let lower_whisker = inside.first().copied().unwrap_or(q1);
        let upper_whisker = inside.last().copied().unwrap_or(q3);

        Some(Self {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }

    /// Every value drawn for this box
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        [
            self.lower_whisker,
            self.q1,
            self.median,
            self.q3,
            self.upper_whisker,
        ]
        .into_iter()
        .chain(self.outliers.iter().copied())
    }
}

/// Linear-interpolated quantile of sorted, non-empty data
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_box_stats_quartiles() {
        let stats = BoxStats::from_samples(&[4.0, 1.0, 3.0, 2.0, 5.0]).unwrap();
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q3, 4.0);
        assert_eq!(stats.lower_whisker, 1.0);
        assert_eq!(stats.upper_whisker, 5.0);
        assert!(stats.outliers.is_empty());
    }

    #[test]
    fn test_box_stats_interpolation_and_outliers() {
        let stats = BoxStats::from_samples(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.upper_whisker, 4.0);
        assert_eq!(stats.outliers, vec![100.0]);

        let even = BoxStats::from_samples(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(even.q1, 1.75);
        assert_eq!(even.median, 2.5);
        assert_eq!(even.q3, 3.25);
    }

    #[test]
    fn test_box_stats_single_and_empty() {
        let one = BoxStats::from_samples(&[7.0]).unwrap();
        assert_eq!(one.values().collect::<Vec<_>>(), vec![7.0; 5]);
        assert!(BoxStats::from_samples(&[]).is_none());
        assert!(BoxStats::from_samples(&[f64::NAN]).is_none());
    }

    #[test]
    fn test_plot_is_empty() {
        let bars = Plot::Bars {
            categories: vec!["1".to_string()],
            groups: vec![],
        };
        assert!(bars.is_empty());

        let lines = Plot::Lines {
            x_ticks: None,
            lines: vec![Line::indexed(&[1.0])],
        };
        assert!(!lines.is_empty());
        assert!(Figure::new().is_empty());
    }
}
