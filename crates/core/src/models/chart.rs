use serde::{Deserialize, Serialize};

use super::record::MonthKey;

/// Aggregated total for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthTotal {
    pub month: MonthKey,
    pub total: f64,
}

impl MonthTotal {
    pub fn new(month: MonthKey, total: f64) -> Self {
        Self { month, total }
    }
}

/// Aggregated total for one category or subcategory; one donut segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySlice {
    pub label: String,
    pub value: f64,
}

impl CategorySlice {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// The slice series the donut should show, plus the text that goes with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonutSeries {
    pub slices: Vec<CategorySlice>,
    /// Heading shown above the chart
    pub title: String,
    /// Caption for the legend ("Types" or "Subtypes")
    pub legend_label: String,
}

/// Angular extent of one donut slice, in radians.
///
/// The first segment starts at `-π/2` (12 o'clock); each following segment
/// starts where the previous one ended.
#[derive(Debug, Clone, PartialEq)]
pub struct DonutSegment {
    pub label: String,
    pub value: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl DonutSegment {
    pub fn span(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }

    pub fn contains_angle(&self, angle: f64) -> bool {
        angle >= self.start_angle && angle < self.end_angle
    }
}

/// One plotted point of the monthly line chart, in canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePoint {
    pub x: f64,
    pub y: f64,
    pub label: MonthKey,
    pub value: f64,
}

/// Tooltip for the point nearest the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct LineTooltip {
    /// Index of the highlighted point
    pub index: usize,
    pub point: LinePoint,
    /// Series maximum, shown as context below the value
    pub max: f64,
    /// Top-left corner of the tooltip box
    pub anchor_x: f64,
    pub anchor_y: f64,
}

/// Centre readout of the donut while a segment is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct DonutReadout {
    pub label: String,
    /// Share of the total, 0–100
    pub percentage: f64,
    /// Animated counter value (counts towards the segment value)
    pub value: f64,
    pub palette_index: usize,
}

/// One entry of the donut legend.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub palette_index: usize,
    pub selected: bool,
}

/// Which chart, if any, is shown fullscreen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FullscreenChart {
    Line,
    Donut,
}

/// Device orientation lock requested by the chart screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Portrait => write!(f, "Portrait"),
            Orientation::Landscape => write!(f, "Landscape"),
        }
    }
}
