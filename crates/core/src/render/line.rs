//! Monthly totals line chart.
//!
//! Animation runs in stages: the smoothed path draws in, then the point
//! markers pop in left to right, and while the pointer rests on a point its
//! halo pulses until the pointer is released.

use std::time::Duration;

use crate::models::chart::{LinePoint, LineTooltip, MonthTotal};
use crate::render::animation::{AnimationDriver, Easing, FrameTime, Pulse};
use crate::render::canvas::{Canvas, Color, Paint, Path, Point, Size, TextAlign, TextStyle};
use crate::render::format::format_currency_fixed;

const DRAW_IN_DURATION: Duration = Duration::from_millis(900);
const POINT_STAGGER: Duration = Duration::from_millis(40);
const POINT_WINDOW: Duration = Duration::from_millis(260);
const GLOW_HZ: f64 = 1.2;

const HEADER_HEIGHT: f64 = 48.0;
const VERTICAL_PADDING: f64 = 40.0;
const PAD_LEFT: f64 = 56.0;
const PAD_RIGHT: f64 = 36.0;
const PAD_TOP: f64 = 8.0;
const PAD_BOTTOM: f64 = 44.0;

/// Number of intervals between horizontal grid lines (5 ticks).
const Y_INTERVALS: usize = 4;
const POINT_RADIUS: f64 = 5.0;
const ACTIVE_POINT_SCALE: f64 = 1.25;
const MIN_VISIBLE_RADIUS: f64 = 0.1;
const TOOLTIP_WIDTH: f64 = 120.0;
const TOOLTIP_HEIGHT: f64 = 62.0;
const TOOLTIP_OFFSET: f64 = 60.0;
const TOOLTIP_MARGIN: f64 = 4.0;

const LINE_COLOR: Color = Color::rgba(66, 165, 245, 1.0);
const GRID_COLOR: Color = Color::rgba(38, 50, 56, 1.0);
const POINT_COLOR: Color = Color::rgba(100, 181, 246, 1.0);
const AXIS_LABEL_COLOR: Color = Color::rgba(120, 144, 156, 1.0);
const TOOLTIP_BACKGROUND: Color = Color::rgba(16, 32, 39, 1.0);
const TOOLTIP_LABEL_COLOR: Color = Color::rgba(144, 202, 249, 1.0);
const TOOLTIP_MAX_COLOR: Color = Color::rgba(176, 190, 197, 1.0);

/// Canvas and plot-area geometry. The canvas and the pointer-capture
/// region are the same rectangle, so pointer coordinates and point
/// coordinates share one space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineLayout {
    width: f64,
    height: f64,
}

impl LineLayout {
    pub fn for_viewport(viewport: Size) -> Self {
        Self {
            width: viewport.width.max(0.0),
            height: (viewport.height - HEADER_HEIGHT - VERTICAL_PADDING).max(0.0),
        }
    }

    pub fn canvas_size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn plot_left(&self) -> f64 {
        PAD_LEFT
    }

    pub fn plot_top(&self) -> f64 {
        PAD_TOP
    }

    pub fn plot_right(&self) -> f64 {
        self.width - PAD_RIGHT
    }

    pub fn plot_bottom(&self) -> f64 {
        PAD_TOP + self.plot_height()
    }

    pub fn plot_width(&self) -> f64 {
        (self.width - PAD_LEFT - PAD_RIGHT).max(0.0)
    }

    pub fn plot_height(&self) -> f64 {
        (self.height - PAD_TOP - PAD_BOTTOM).max(0.0)
    }
}

/// Largest total in the series, 0 for an empty series.
pub fn series_max(series: &[MonthTotal]) -> f64 {
    series.iter().map(|m| m.total).fold(0.0, f64::max)
}

/// Place each month at an evenly spaced x and a y scaled to the series
/// maximum, so the largest total touches the top of the plot.
pub fn compute_points(series: &[MonthTotal], layout: &LineLayout) -> Vec<LinePoint> {
    let max = series_max(series);
    let scale = if max > 0.0 { max } else { 1.0 };
    let step_x = layout.plot_width() / (series.len().saturating_sub(1).max(1)) as f64;
    let height = layout.plot_height();

    series
        .iter()
        .enumerate()
        .map(|(i, m)| LinePoint {
            x: layout.plot_left() + i as f64 * step_x,
            y: layout.plot_top() + height - m.total / scale * height,
            label: m.month,
            value: m.total,
        })
        .collect()
}

/// Smoothed polyline through `points`: each step is a quadratic curve with
/// the earlier point as control and the midpoint to the next point as end,
/// finished by a straight line into the last point.
pub fn build_smoothed_path(points: &[LinePoint]) -> Option<Path> {
    let first = points.first()?;
    let mut path = Path::new();
    path.move_to(Point::new(first.x, first.y));
    for pair in points.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        path.quad_to(
            Point::new(prev.x, prev.y),
            Point::new((prev.x + curr.x) / 2.0, (prev.y + curr.y) / 2.0),
        );
    }
    let last = points.last()?;
    path.line_to(Point::new(last.x, last.y));
    Some(path)
}

/// Index of the point whose x is closest to `x`; the first wins on ties.
pub fn nearest_point(points: &[LinePoint], x: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, p) in points.iter().enumerate() {
        let distance = (x - p.x).abs();
        match best {
            Some((_, d)) if distance >= d => {}
            _ => best = Some((i, distance)),
        }
    }
    best.map(|(i, _)| i)
}

/// Interactive monthly line chart.
pub struct LineChart {
    series: Vec<MonthTotal>,
    points: Vec<LinePoint>,
    max: f64,
    path: Option<Path>,
    layout: LineLayout,
    currency_symbol: String,
    draw_in: AnimationDriver,
    pop_in: AnimationDriver,
    glow: Pulse,
    tooltip: Option<LineTooltip>,
    on_close: Option<Box<dyn FnMut()>>,
}

impl std::fmt::Debug for LineChart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineChart")
            .field("points", &self.points.len())
            .field("max", &self.max)
            .field("layout", &self.layout)
            .field("tooltip", &self.tooltip.as_ref().map(|t| t.index))
            .finish()
    }
}

impl LineChart {
    pub fn new(viewport: Size, currency_symbol: impl Into<String>) -> Self {
        Self {
            series: Vec::new(),
            points: Vec::new(),
            max: 0.0,
            path: None,
            layout: LineLayout::for_viewport(viewport),
            currency_symbol: currency_symbol.into(),
            draw_in: AnimationDriver::new(),
            pop_in: AnimationDriver::new(),
            glow: Pulse::new(),
            tooltip: None,
            on_close: None,
        }
    }

    /// Register the action run by [`close`](Self::close).
    pub fn with_on_close(mut self, on_close: impl FnMut() + 'static) -> Self {
        self.on_close = Some(Box::new(on_close));
        self
    }

    /// Replace the plotted series. A different series clears the tooltip
    /// and replays the draw-in from `now`; an identical one is a no-op.
    pub fn set_series(&mut self, series: &[MonthTotal], now: FrameTime) {
        if series == self.series.as_slice() && self.path.is_some() {
            return;
        }
        self.series = series.to_vec();
        self.rebuild_geometry();
        self.tooltip = None;
        self.glow.stop();
        self.pop_in.cancel();
        if self.path.is_some() {
            self.draw_in.start(now, DRAW_IN_DURATION, Easing::EaseInOutCubic);
        } else {
            self.draw_in.cancel();
        }
    }

    /// Refit to a new viewport; animation state is kept.
    pub fn resize(&mut self, viewport: Size) {
        self.layout = LineLayout::for_viewport(viewport);
        self.rebuild_geometry();
        if let Some(index) = self.tooltip.as_ref().map(|t| t.index) {
            self.tooltip = self.tooltip_for(index);
        }
    }

    fn rebuild_geometry(&mut self) {
        self.max = series_max(&self.series);
        self.points = compute_points(&self.series, &self.layout);
        self.path = build_smoothed_path(&self.points);
    }

    pub fn layout(&self) -> &LineLayout {
        &self.layout
    }

    pub fn points(&self) -> &[LinePoint] {
        &self.points
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn tooltip(&self) -> Option<&LineTooltip> {
        self.tooltip.as_ref()
    }

    // ── Animation stages ────────────────────────────────────────────

    /// Visible fraction of the path.
    pub fn draw_progress(&self, now: FrameTime) -> f64 {
        self.draw_in.sample(now).unwrap_or(0.0)
    }

    /// Total pop-in time: every point's delay plus one grow window.
    fn pop_in_duration(&self) -> Duration {
        let delays = u32::try_from(self.points.len().saturating_sub(1)).unwrap_or(u32::MAX);
        POINT_STAGGER.saturating_mul(delays).saturating_add(POINT_WINDOW)
    }

    /// Eased growth of point `index` in `[0, ~1.1]`; overshoots slightly
    /// before settling at 1.
    pub fn point_growth(&self, index: usize, now: FrameTime) -> f64 {
        let Some(elapsed) = self.pop_in.elapsed(now) else {
            return 0.0;
        };
        let elapsed = elapsed.min(self.pop_in_duration()).as_secs_f64();
        let delay = POINT_STAGGER.as_secs_f64() * index as f64;
        let local = ((elapsed - delay) / POINT_WINDOW.as_secs_f64()).clamp(0.0, 1.0);
        if local <= 0.0 {
            return 0.0;
        }
        Easing::EaseOutBack.apply(local).max(0.0)
    }

    pub fn point_radius(&self, index: usize, now: FrameTime) -> f64 {
        POINT_RADIUS * self.point_growth(index, now)
    }

    /// Halo pulse phase in `[0, 1]` for the highlighted point.
    pub fn glow_phase(&self, now: FrameTime) -> f64 {
        self.glow.phase(now, GLOW_HZ)
    }

    /// Frame callback. Starts the point pop-in once the draw-in has
    /// completed and returns whether another frame is needed.
    pub fn tick(&mut self, now: FrameTime) -> bool {
        if self.path.is_some() && self.draw_in.is_finished(now) && !self.pop_in.is_started() {
            self.pop_in.start(now, self.pop_in_duration(), Easing::Linear);
        }
        self.is_animating(now)
    }

    pub fn is_animating(&self, now: FrameTime) -> bool {
        let awaiting_pop_in = self.draw_in.is_finished(now) && !self.pop_in.is_started();
        self.draw_in.is_running(now)
            || awaiting_pop_in
            || self.pop_in.is_running(now)
            || self.glow.is_active()
    }

    /// Stop every animation; call when the chart is unmounted.
    pub fn dispose(&mut self) {
        self.draw_in.cancel();
        self.pop_in.cancel();
        self.glow.stop();
        self.tooltip = None;
    }

    /// Run the close action, if one was registered.
    pub fn close(&mut self) {
        if let Some(on_close) = self.on_close.as_mut() {
            on_close();
        }
    }

    // ── Pointer input ───────────────────────────────────────────────

    pub fn pointer_down(&mut self, point: Point, now: FrameTime) {
        self.track(point, now);
    }

    pub fn pointer_move(&mut self, point: Point, now: FrameTime) {
        self.track(point, now);
    }

    pub fn pointer_up(&mut self, _now: FrameTime) {
        self.dismiss_tooltip();
    }

    pub fn pointer_cancel(&mut self, _now: FrameTime) {
        self.dismiss_tooltip();
    }

    fn track(&mut self, point: Point, now: FrameTime) {
        let Some(index) = nearest_point(&self.points, point.x) else {
            return;
        };
        let previous = self.tooltip.as_ref().map(|t| t.index);
        self.tooltip = self.tooltip_for(index);
        if previous != Some(index) {
            self.glow.restart(now);
        }
    }

    fn dismiss_tooltip(&mut self) {
        self.tooltip = None;
        self.glow.stop();
    }

    fn tooltip_for(&self, index: usize) -> Option<LineTooltip> {
        let point = self.points.get(index)?.clone();
        let max_x = self.layout.plot_right() - TOOLTIP_WIDTH;
        let anchor_x = (point.x - TOOLTIP_OFFSET).max(TOOLTIP_MARGIN).min(max_x);
        let anchor_y = (point.y - TOOLTIP_OFFSET).max(TOOLTIP_MARGIN);
        Some(LineTooltip {
            index,
            point,
            max: self.max,
            anchor_x,
            anchor_y,
        })
    }

    // ── Axes ────────────────────────────────────────────────────────

    /// Month abbreviation under each point, with its clamped x position.
    pub fn x_labels(&self) -> Vec<(f64, &'static str)> {
        let min_x = self.layout.plot_left() - 10.0;
        let max_x = self.layout.plot_right() - 20.0;
        self.points
            .iter()
            .map(|p| ((p.x - 10.0).max(min_x).min(max_x), p.label.abbreviation()))
            .collect()
    }

    /// The five y-axis ticks from top to bottom as `(y, value)`.
    pub fn y_ticks(&self) -> Vec<(f64, f64)> {
        let height = self.layout.plot_height();
        (0..=Y_INTERVALS)
            .map(|i| {
                let share = i as f64 / Y_INTERVALS as f64;
                (
                    self.layout.plot_top() + height * share,
                    (self.max * (1.0 - share)).round(),
                )
            })
            .collect()
    }

    // ── Drawing ─────────────────────────────────────────────────────

    pub fn draw(&self, canvas: &mut dyn Canvas, now: FrameTime) {
        self.draw_grid(canvas);

        let Some(path) = self.path.as_ref() else {
            return;
        };
        let visible = path.trimmed(self.draw_progress(now));
        if !visible.is_empty() {
            canvas.draw_path(
                &visible,
                Paint::Stroke {
                    color: LINE_COLOR,
                    width: 4.0,
                },
            );
        }

        self.draw_points(canvas, now);
        self.draw_axis_labels(canvas);
        self.draw_tooltip(canvas);
    }

    fn draw_grid(&self, canvas: &mut dyn Canvas) {
        let layout = &self.layout;
        let mut grid = Path::new();
        for (y, _) in self.y_ticks() {
            grid.move_to(Point::new(layout.plot_left(), y))
                .line_to(Point::new(layout.plot_right(), y));
        }
        grid.move_to(Point::new(layout.plot_left(), layout.plot_top()))
            .line_to(Point::new(layout.plot_left(), layout.plot_bottom()))
            .line_to(Point::new(layout.plot_right(), layout.plot_bottom()));
        canvas.draw_path(
            &grid,
            Paint::Stroke {
                color: GRID_COLOR,
                width: 1.0,
            },
        );
    }

    fn draw_points(&self, canvas: &mut dyn Canvas, now: FrameTime) {
        let active = self.tooltip.as_ref().map(|t| t.index);
        let glow = self.glow_phase(now);
        for (i, p) in self.points.iter().enumerate() {
            let growth = self.point_growth(i, now);
            let radius = POINT_RADIUS * growth;
            if radius <= MIN_VISIBLE_RADIUS {
                continue;
            }
            let alpha = growth.clamp(0.0, 1.0);
            let center = Point::new(p.x, p.y);
            if active == Some(i) {
                let halo = radius + (4.0 + 4.0 * glow) + 4.0;
                canvas.draw_circle(
                    center,
                    halo,
                    Paint::Fill(LINE_COLOR.with_alpha(0.18 + 0.12 * (1.0 - glow))),
                );
                canvas.draw_circle(
                    center,
                    radius * ACTIVE_POINT_SCALE,
                    Paint::Fill(Color::WHITE.with_alpha(alpha)),
                );
            } else {
                canvas.draw_circle(center, radius, Paint::Fill(POINT_COLOR.with_alpha(alpha)));
            }
        }
    }

    fn draw_axis_labels(&self, canvas: &mut dyn Canvas) {
        let style = TextStyle::new(AXIS_LABEL_COLOR, 10.0, TextAlign::Start);
        let label_y = self.layout.canvas_size().height - 16.0;
        for (x, month) in self.x_labels() {
            canvas.draw_text(month, Point::new(x, label_y), style);
        }
        for (y, value) in self.y_ticks() {
            canvas.draw_text(&format!("{value:.0}"), Point::new(4.0, y - 6.0), style);
        }
    }

    fn draw_tooltip(&self, canvas: &mut dyn Canvas) {
        let Some(tooltip) = self.tooltip.as_ref() else {
            return;
        };
        let (x, y) = (tooltip.anchor_x, tooltip.anchor_y);
        let mut frame = Path::new();
        frame
            .move_to(Point::new(x, y))
            .line_to(Point::new(x + TOOLTIP_WIDTH, y))
            .line_to(Point::new(x + TOOLTIP_WIDTH, y + TOOLTIP_HEIGHT))
            .line_to(Point::new(x, y + TOOLTIP_HEIGHT))
            .close();
        canvas.draw_path(&frame, Paint::Fill(TOOLTIP_BACKGROUND));
        canvas.draw_path(
            &frame,
            Paint::Stroke {
                color: LINE_COLOR,
                width: 1.0,
            },
        );

        let symbol = &self.currency_symbol;
        canvas.draw_text(
            &tooltip.point.label.to_string(),
            Point::new(x + 8.0, y + 8.0),
            TextStyle::new(TOOLTIP_LABEL_COLOR, 11.0, TextAlign::Start),
        );
        canvas.draw_text(
            &format_currency_fixed(symbol, tooltip.point.value, 2),
            Point::new(x + 8.0, y + 22.0),
            TextStyle::new(Color::WHITE, 14.0, TextAlign::Start),
        );
        canvas.draw_text(
            &format!("Max {}", format_currency_fixed(symbol, tooltip.max, 0)),
            Point::new(x + 8.0, y + 42.0),
            TextStyle::new(TOOLTIP_MAX_COLOR, 10.0, TextAlign::Start),
        );
    }
}
