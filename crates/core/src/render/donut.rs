//! Donut chart of spend per category (or subcategory).
//!
//! Segments are revealed one after another in sort order, a pointer on a
//! segment pops it out and starts the centre counter, and the centre
//! readout appears once the reveal has finished.

use std::f64::consts::{FRAC_PI_2, PI};
use std::time::Duration;

use crate::models::chart::{CategorySlice, DonutReadout, DonutSegment, DonutSeries, LegendEntry};
use crate::render::animation::{AnimationDriver, Easing, FrameTime, Tween};
use crate::render::canvas::{Canvas, Color, Paint, Path, Point, Size, TextAlign, TextStyle};
use crate::render::format::{format_currency, format_percentage};
use crate::render::parse_palette;

const TAU: f64 = PI * 2.0;

const REVEAL_DURATION: Duration = Duration::from_millis(1100);
const COUNTER_DURATION: Duration = Duration::from_millis(650);
const COUNTER_RESET_DURATION: Duration = Duration::from_millis(320);

/// Margin trimmed from the viewport before fitting the square plot box.
const VIEWPORT_MARGIN: f64 = 8.0;
const PAD_LEFT: f64 = 12.0;
const PAD_RIGHT: f64 = 12.0;
const PAD_TOP: f64 = 32.0;
const PAD_BOTTOM: f64 = 18.0;

const OUTER_RADIUS_RATIO: f64 = 0.9;
const INNER_RADIUS_RATIO: f64 = 0.6;
const MIN_HIT_RATIO: f64 = 0.55;
const HIT_TOLERANCE: f64 = 28.0;

const POP_OUT: f64 = 18.0;
const HIGHLIGHT_OFFSET: f64 = 6.0;
const HIGHLIGHT_WIDTH: f64 = 12.0;
/// Opacity of segments that are not selected (`0x55`).
const FADED_ALPHA: f64 = 85.0 / 255.0;
const HOLE_COLOR: Color = Color::rgba(15, 32, 39, 1.0);
const LABEL_COLOR: Color = Color::rgba(207, 216, 220, 1.0);

/// Geometry of the donut inside the available viewport.
///
/// All coordinates are relative to the plot's pointer-capture region,
/// which sits at `origin()` inside the square plot box. Drawing and
/// hit-testing both use [`center`](Self::center), so they always agree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DonutLayout {
    box_size: f64,
    inner_width: f64,
    inner_height: f64,
}

impl DonutLayout {
    pub fn for_viewport(viewport: Size) -> Self {
        let box_size = (viewport.width - VIEWPORT_MARGIN)
            .min(viewport.height - VIEWPORT_MARGIN)
            .max(0.0);
        Self {
            box_size,
            inner_width: (box_size - PAD_LEFT - PAD_RIGHT).max(0.0),
            inner_height: (box_size - PAD_BOTTOM).max(0.0),
        }
    }

    /// Side of the square box the chart is fitted into.
    pub fn box_size(&self) -> f64 {
        self.box_size
    }

    /// Offset of the capture region inside the box.
    pub fn origin(&self) -> Point {
        Point::new(PAD_LEFT, PAD_TOP)
    }

    /// Size of the drawing surface / capture region.
    pub fn plot_size(&self) -> Size {
        Size::new(self.inner_width, self.inner_height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.inner_width / 2.0, self.inner_width / 2.0)
    }

    pub fn outer_radius(&self) -> f64 {
        self.inner_width / 2.0 * OUTER_RADIUS_RATIO
    }

    pub fn inner_radius(&self) -> f64 {
        self.outer_radius() * INNER_RADIUS_RATIO
    }

    /// Distances from the centre at which a pointer selects a segment.
    pub fn hit_range(&self) -> (f64, f64) {
        (
            self.inner_radius() * MIN_HIT_RATIO,
            self.outer_radius() + HIT_TOLERANCE,
        )
    }
}

/// Partition the full circle among `slices` in proportion to their values.
///
/// Starts at 12 o'clock (`-π/2`) and runs clockwise. An all-zero series
/// still yields one zero-span segment per slice.
pub fn compute_segments(slices: &[CategorySlice]) -> Vec<DonutSegment> {
    let total: f64 = slices.iter().map(|s| s.value).sum();
    let denominator = if total > 0.0 { total } else { 1.0 };

    let mut start = -FRAC_PI_2;
    slices
        .iter()
        .map(|slice| {
            let span = slice.value / denominator * TAU;
            let segment = DonutSegment {
                label: slice.label.clone(),
                value: slice.value,
                start_angle: start,
                end_angle: start + span,
            };
            start += span;
            segment
        })
        .collect()
}

/// Find the segment under `point`, or `None` outside the hit annulus.
pub fn hit_test<'a>(
    segments: &'a [DonutSegment],
    layout: &DonutLayout,
    point: Point,
) -> Option<&'a DonutSegment> {
    let center = layout.center();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    let distance = dx.hypot(dy);
    let (min_hit, max_hit) = layout.hit_range();
    if distance < min_hit || distance > max_hit {
        return None;
    }

    let mut angle = dy.atan2(dx);
    if angle < -FRAC_PI_2 {
        angle += TAU;
    }
    // The last segment absorbs angles lost to floating-point drift at 3π/2.
    segments
        .iter()
        .find(|s| s.contains_angle(angle))
        .or_else(|| segments.last())
}

/// Which segment, if any, is highlighted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Unselected,
    Selected(String),
}

impl Selection {
    pub fn label(&self) -> Option<&str> {
        match self {
            Selection::Unselected => None,
            Selection::Selected(label) => Some(label),
        }
    }
}

/// Interactive donut chart.
pub struct DonutChart {
    slices: Vec<CategorySlice>,
    segments: Vec<DonutSegment>,
    total: f64,
    title: String,
    legend_label: String,
    layout: DonutLayout,
    palette: Vec<Color>,
    currency_symbol: String,
    selection: Selection,
    reveal: AnimationDriver,
    counter: Tween,
    on_close: Option<Box<dyn FnMut()>>,
}

impl std::fmt::Debug for DonutChart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DonutChart")
            .field("segments", &self.segments.len())
            .field("total", &self.total)
            .field("title", &self.title)
            .field("selection", &self.selection)
            .field("layout", &self.layout)
            .finish()
    }
}

impl DonutChart {
    pub fn new(viewport: Size, palette: &[String], currency_symbol: impl Into<String>) -> Self {
        Self {
            slices: Vec::new(),
            segments: Vec::new(),
            total: 0.0,
            title: String::new(),
            legend_label: String::new(),
            layout: DonutLayout::for_viewport(viewport),
            palette: parse_palette(palette),
            currency_symbol: currency_symbol.into(),
            selection: Selection::Unselected,
            reveal: AnimationDriver::new(),
            counter: Tween::new(),
            on_close: None,
        }
    }

    /// Register the action run by [`close`](Self::close).
    pub fn with_on_close(mut self, on_close: impl FnMut() + 'static) -> Self {
        self.on_close = Some(Box::new(on_close));
        self
    }

    /// Replace the displayed series.
    ///
    /// A series whose slices differ from the current ones resets selection
    /// and counter and replays the reveal from `now`. An identical series
    /// only updates the title text.
    pub fn set_series(&mut self, series: &DonutSeries, now: FrameTime) {
        self.title = series.title.clone();
        self.legend_label = series.legend_label.clone();
        if series.slices == self.slices && !self.segments.is_empty() {
            return;
        }

        self.slices = series.slices.clone();
        self.segments = compute_segments(&self.slices);
        self.total = self.slices.iter().map(|s| s.value).sum();
        self.selection = Selection::Unselected;
        self.counter.set(0.0);
        if self.segments.is_empty() {
            self.reveal.cancel();
        } else {
            self.reveal.start(now, REVEAL_DURATION, Easing::EaseInOutCubic);
        }
    }

    /// Refit to a new viewport; animation and selection state are kept.
    pub fn resize(&mut self, viewport: Size) {
        self.layout = DonutLayout::for_viewport(viewport);
    }

    pub fn layout(&self) -> &DonutLayout {
        &self.layout
    }

    pub fn segments(&self) -> &[DonutSegment] {
        &self.segments
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn legend_label(&self) -> &str {
        &self.legend_label
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Overall reveal progress in `[0, 1]`.
    pub fn reveal_progress(&self, now: FrameTime) -> f64 {
        self.reveal.sample(now).unwrap_or(1.0)
    }

    /// How much of segment `index` is drawn at reveal progress `progress`,
    /// as a fraction of its own span. Segments occupy consecutive slots of
    /// the reveal timeline proportional to their share of the circle.
    pub fn segment_reveal(&self, index: usize, progress: f64) -> f64 {
        let Some(segment) = self.segments.get(index) else {
            return 0.0;
        };
        let span_fraction = segment.span() / TAU;
        if span_fraction <= 0.0 {
            return 0.0;
        }
        if progress >= 1.0 {
            return 1.0;
        }
        let start: f64 = self.segments[..index].iter().map(|s| s.span() / TAU).sum();
        let end = start + span_fraction;
        if progress <= start {
            0.0
        } else if progress >= end {
            1.0
        } else {
            (progress - start) / span_fraction
        }
    }

    // ── Pointer & legend input ──────────────────────────────────────

    pub fn pointer_down(&mut self, point: Point, now: FrameTime) {
        self.select_at(point, now);
    }

    pub fn pointer_move(&mut self, point: Point, now: FrameTime) {
        self.select_at(point, now);
    }

    /// Releasing the pointer keeps the current selection.
    pub fn pointer_up(&mut self, _now: FrameTime) {}

    /// The gesture was taken away (scroll, system gesture): clear.
    pub fn pointer_cancel(&mut self, now: FrameTime) {
        self.select(Selection::Unselected, now);
    }

    /// Tapping a legend entry selects its segment, or clears the selection
    /// if that segment is already selected.
    pub fn legend_tap(&mut self, label: &str, now: FrameTime) {
        if self.selection.label() == Some(label) {
            self.select(Selection::Unselected, now);
        } else if self.segments.iter().any(|s| s.label == label) {
            self.select(Selection::Selected(label.to_string()), now);
        }
    }

    fn select_at(&mut self, point: Point, now: FrameTime) {
        let selection = match hit_test(&self.segments, &self.layout, point) {
            Some(segment) => Selection::Selected(segment.label.clone()),
            None => Selection::Unselected,
        };
        self.select(selection, now);
    }

    fn select(&mut self, selection: Selection, now: FrameTime) {
        if selection == self.selection {
            return;
        }
        let target = selection
            .label()
            .and_then(|label| self.segments.iter().find(|s| s.label == label))
            .map(|s| s.value);
        match target {
            Some(value) => {
                self.counter
                    .animate_to(now, value, COUNTER_DURATION, Easing::EaseOutCubic);
            }
            None if self.counter.value(now) > 0.0 => {
                self.counter
                    .animate_to(now, 0.0, COUNTER_RESET_DURATION, Easing::EaseOutCubic);
            }
            None => self.counter.set(0.0),
        }
        self.selection = selection;
    }

    // ── Derived display state ───────────────────────────────────────

    fn selected_index(&self) -> Option<usize> {
        let label = self.selection.label()?;
        self.segments.iter().position(|s| s.label == label)
    }

    fn color_for(&self, index: usize) -> Color {
        if self.palette.is_empty() {
            return Color::WHITE;
        }
        self.palette[index % self.palette.len()]
    }

    /// Current value of the centre counter.
    pub fn counter_value(&self, now: FrameTime) -> f64 {
        self.counter.value(now)
    }

    /// Centre readout, shown once the reveal is complete and a segment is
    /// selected.
    pub fn readout(&self, now: FrameTime) -> Option<DonutReadout> {
        if self.reveal_progress(now) < 1.0 {
            return None;
        }
        let index = self.selected_index()?;
        let segment = &self.segments[index];
        let percentage = if self.total > 0.0 {
            segment.value / self.total * 100.0
        } else {
            0.0
        };
        Some(DonutReadout {
            label: segment.label.clone(),
            percentage,
            value: self.counter.value(now),
            palette_index: index % self.palette.len().max(1),
        })
    }

    pub fn legend(&self) -> Vec<LegendEntry> {
        let selected = self.selection.label();
        self.segments
            .iter()
            .enumerate()
            .map(|(i, s)| LegendEntry {
                label: s.label.clone(),
                palette_index: i % self.palette.len().max(1),
                selected: selected == Some(s.label.as_str()),
            })
            .collect()
    }

    // ── Frame loop ──────────────────────────────────────────────────

    /// Whether another frame is needed to keep animating.
    pub fn is_animating(&self, now: FrameTime) -> bool {
        self.reveal.is_running(now) || self.counter.is_running(now)
    }

    /// Frame callback: returns whether the host should schedule another frame.
    pub fn tick(&mut self, now: FrameTime) -> bool {
        self.is_animating(now)
    }

    /// Stop every animation; call when the chart is unmounted.
    pub fn dispose(&mut self) {
        self.reveal.cancel();
        self.counter.cancel();
    }

    /// Run the close action, if one was registered.
    pub fn close(&mut self) {
        if let Some(on_close) = self.on_close.as_mut() {
            on_close();
        }
    }

    // ── Drawing ─────────────────────────────────────────────────────

    pub fn draw(&self, canvas: &mut dyn Canvas, now: FrameTime) {
        let progress = self.reveal_progress(now);
        let center = self.layout.center();
        let outer = self.layout.outer_radius();
        let inner = self.layout.inner_radius();
        let selected = self.selected_index();

        for (index, segment) in self.segments.iter().enumerate() {
            let local = self.segment_reveal(index, progress);
            if local <= 0.0 {
                continue;
            }
            let is_selected = selected == Some(index);
            let sweep = segment.span() * local;
            let drawn_end = segment.start_angle + sweep;
            let origin = if is_selected {
                center.polar(POP_OUT, segment.mid_angle())
            } else {
                center
            };

            let mut wedge = Path::new();
            wedge
                .move_to(origin.polar(outer, segment.start_angle))
                .arc_to(origin, outer, segment.start_angle, sweep)
                .line_to(origin.polar(inner, drawn_end))
                .arc_to(origin, inner, drawn_end, -sweep)
                .close();

            let color = self.color_for(index);
            let fill = if is_selected {
                color
            } else {
                color.with_alpha(FADED_ALPHA)
            };
            canvas.draw_path(&wedge, Paint::Fill(fill));

            if is_selected && local >= 1.0 {
                let ring = outer + HIGHLIGHT_OFFSET;
                let mut highlight = Path::new();
                highlight
                    .move_to(origin.polar(ring, segment.start_angle))
                    .arc_to(origin, ring, segment.start_angle, segment.span());
                canvas.draw_path(
                    &highlight,
                    Paint::Stroke {
                        color,
                        width: HIGHLIGHT_WIDTH,
                    },
                );
            }
        }

        let hole_alpha = ((progress - 0.15) / 0.4).clamp(0.0, 1.0);
        if !self.segments.is_empty() && hole_alpha > 0.0 {
            canvas.draw_circle(
                center,
                inner - 0.5,
                Paint::Fill(HOLE_COLOR.with_alpha(hole_alpha)),
            );
        }

        if let Some(readout) = self.readout(now) {
            let accent = self.color_for(readout.palette_index);
            canvas.draw_text(
                &format_percentage(readout.percentage),
                Point::new(center.x, center.y - 34.0),
                TextStyle::new(accent, 32.0, TextAlign::Center),
            );
            canvas.draw_text(
                &readout.label,
                Point::new(center.x, center.y + 2.0),
                TextStyle::new(LABEL_COLOR, 15.0, TextAlign::Center),
            );
            canvas.draw_text(
                &format_currency(&self.currency_symbol, readout.value),
                Point::new(center.x, center.y + 22.0),
                TextStyle::new(accent, 22.0, TextAlign::Center),
            );
        }
    }
}
