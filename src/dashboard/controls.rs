use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analyzers::DatasetSummary;
use crate::utils::constants::{ALL_REGIONS, DEPTH_MARK_STEP, MAX_SLIDER_MARKS};

/// The four content views. The only state the page switches on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tab {
    #[default]
    #[serde(rename = "overview")]
    Overview,
    #[serde(rename = "depth-mag")]
    DepthMagnitude,
    #[serde(rename = "regional")]
    Regional,
    #[serde(rename = "mag-breakdown")]
    MagnitudeBreakdown,
}

impl Tab {
    pub const ALL: [Tab; 4] = [
        Tab::Overview,
        Tab::DepthMagnitude,
        Tab::Regional,
        Tab::MagnitudeBreakdown,
    ];

    pub fn value(&self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::DepthMagnitude => "depth-mag",
            Tab::Regional => "regional",
            Tab::MagnitudeBreakdown => "mag-breakdown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::DepthMagnitude => "Depth & Magnitude",
            Tab::Regional => "Regional Analysis",
            Tab::MagnitudeBreakdown => "Magnitude Breakdown",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.value() == value)
    }
}

/// Extra graph views offered beside the tabs. Only `None` is implemented;
/// the others are declared with their capability switched off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphType {
    #[default]
    #[serde(rename = "none")]
    None,
    #[serde(rename = "3d")]
    Depth3d,
    #[serde(rename = "risk")]
    HighRiskZones,
}

impl GraphType {
    pub const ALL: [GraphType; 3] = [GraphType::None, GraphType::Depth3d, GraphType::HighRiskZones];

    pub fn value(&self) -> &'static str {
        match self {
            GraphType::None => "none",
            GraphType::Depth3d => "3d",
            GraphType::HighRiskZones => "risk",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GraphType::None => "None",
            GraphType::Depth3d => "3D Depth Visualization",
            GraphType::HighRiskZones => "High-Risk Zones",
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, GraphType::None)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    pub enabled: bool,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

pub fn tab_options() -> Vec<SelectOption> {
    Tab::ALL
        .iter()
        .map(|t| SelectOption::new(t.label(), t.value()))
        .collect()
}

pub fn graph_type_options() -> Vec<SelectOption> {
    GraphType::ALL
        .iter()
        .map(|g| {
            let option = SelectOption::new(g.label(), g.value());
            if g.is_enabled() {
                option
            } else {
                option.disabled()
            }
        })
        .collect()
}

/// `"All"` followed by every region, which must already be sorted and unique.
pub fn region_options(regions: &[String]) -> Vec<SelectOption> {
    std::iter::once(SelectOption::new(ALL_REGIONS, ALL_REGIONS))
        .chain(regions.iter().map(|r| SelectOption::new(r.as_str(), r.as_str())))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderMark {
    pub value: i64,
    pub label: String,
}

/// Tick marks from `trunc(min)` to `trunc(max)` inclusive, every `step`.
///
/// The step is widened when the range would otherwise need more than
/// `MAX_SLIDER_MARKS` marks.
pub fn slider_marks(min: f64, max: f64, step: i64) -> Vec<SliderMark> {
    let start = min.trunc() as i64;
    let end = max.trunc() as i64;
    if end < start {
        return Vec::new();
    }

    // i128 so that a span across the whole i64 range cannot overflow
    let span = i128::from(end) - i128::from(start);
    let limit = (MAX_SLIDER_MARKS - 1) as i128;
    let mut step = i128::from(step.max(1));
    if span / step > limit {
        step = (span + limit - 1) / limit;
    }

    (0..=span / step)
        .map(|k| {
            let value = (i128::from(start) + k * step) as i64;
            SliderMark {
                value,
                label: value.to_string(),
            }
        })
        .collect()
}

pub fn magnitude_marks(summary: &DatasetSummary) -> Vec<SliderMark> {
    slider_marks(summary.mag_min, summary.mag_max, 1)
}

pub fn depth_marks(summary: &DatasetSummary) -> Vec<SliderMark> {
    slider_marks(summary.depth_min, summary.depth_max, DEPTH_MARK_STEP)
}

/// Values of every sidebar control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub tab: Tab,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub mag_range: [f64; 2],
    pub regions: Vec<String>,
    pub depth_range: [f64; 2],
    pub graph_type: GraphType,
}

impl FilterState {
    /// Initial control values, also what "Reset Filters" restores.
    pub fn defaults(summary: &DatasetSummary) -> Self {
        let (start_date, end_date) = summary.date_bounds();
        Self {
            tab: Tab::default(),
            start_date,
            end_date,
            mag_range: [summary.mag_min, summary.mag_max],
            regions: vec![ALL_REGIONS.to_string()],
            depth_range: [summary.depth_min, summary.depth_max],
            graph_type: GraphType::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn values(marks: &[SliderMark]) -> Vec<i64> {
        marks.iter().map(|m| m.value).collect()
    }

    #[test]
    fn test_magnitude_marks_are_integers() {
        assert_eq!(values(&slider_marks(0.7, 6.2, 1)), vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(values(&slider_marks(-1.3, 1.0, 1)), vec![-1, 0, 1]);
    }

    #[test]
    fn test_depth_marks_every_hundred() {
        let marks = slider_marks(-3.5, 650.0, DEPTH_MARK_STEP);
        assert_eq!(values(&marks), vec![-3, 97, 197, 297, 397, 497, 597]);
        assert_eq!(marks[1].label, "97");
    }

    #[test]
    fn test_single_point_range() {
        assert_eq!(values(&slider_marks(4.0, 4.0, 1)), vec![4]);
    }

    #[test]
    fn test_outlier_depth_widens_mark_step() {
        let marks = values(&slider_marks(0.0, 1e9, DEPTH_MARK_STEP));
        assert!(marks.len() > 1 && marks.len() <= MAX_SLIDER_MARKS);
        assert_eq!(marks[0], 0);
        assert!(*marks.last().unwrap() <= 1_000_000_000);
        assert!(marks.windows(2).all(|w| w[1] - w[0] > DEPTH_MARK_STEP));

        let extreme = slider_marks(f64::MIN, f64::MAX, 1);
        assert!(extreme.len() <= MAX_SLIDER_MARKS);
        assert_eq!(extreme[0].value, i64::MIN);
    }

    #[test]
    fn test_tab_values_round_trip() {
        for tab in Tab::ALL {
            assert_eq!(Tab::parse(tab.value()), Some(tab));
        }
        assert_eq!(Tab::parse("3d"), None);
        assert_eq!(
            serde_json::to_string(&Tab::DepthMagnitude).unwrap(),
            "\"depth-mag\""
        );
    }

    #[test]
    fn test_graph_options_capabilities() {
        let options = graph_type_options();
        let flags: Vec<(&str, bool)> = options
            .iter()
            .map(|o| (o.value.as_str(), o.enabled))
            .collect();
        assert_eq!(flags, vec![("none", true), ("3d", false), ("risk", false)]);
    }

    #[test]
    fn test_region_options_start_with_all() {
        let options = region_options(&["Alaska".to_string(), "CA".to_string()]);
        let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["All", "Alaska", "CA"]);
    }
}
