//! The 2D vector surface both chart renderers draw onto.
//!
//! The host supplies a [`Canvas`] implementation (Skia, a GPU painter, an
//! SVG writer, ...). Coordinates are in canvas pixels with the origin at the
//! top-left of the plot's pointer-capture region, so a pointer position
//! reported by the host can be fed to the hit-tests unchanged.

/// A point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn lerp(&self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// The point at `radius` from `self` in direction `angle` (radians,
    /// clockwise from 3 o'clock since y grows downwards).
    pub fn polar(&self, radius: f64, angle: f64) -> Point {
        Point::new(self.x + angle.cos() * radius, self.y + angle.sin() * radius)
    }
}

/// Viewport dimensions in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// RGBA colour; `a` is opacity in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const WHITE: Color = Color::rgba(255, 255, 255, 1.0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        match digits.len() {
            6 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, 1.0)),
            8 => Some(Self::rgba(
                channel(0)?,
                channel(2)?,
                channel(4)?,
                f64::from(channel(6)?) / 255.0,
            )),
            _ => None,
        }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// How a shape is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Fill(Color),
    Stroke { color: Color, width: f64 },
}

/// A single path-building instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { control: Point, to: Point },
    /// Circular arc around `center`. Angles in radians; a positive sweep
    /// runs clockwise on screen. If the current point is not the arc's
    /// start, a straight line joins them first.
    ArcTo {
        center: Point,
        radius: f64,
        start_angle: f64,
        sweep: f64,
    },
    Close,
}

/// An ordered list of path commands.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    commands: Vec<PathCommand>,
}

/// Line pieces used to approximate a quadratic curve's length.
const QUAD_SAMPLES: usize = 16;

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(p));
        self
    }

    pub fn line_to(&mut self, p: Point) -> &mut Self {
        self.commands.push(PathCommand::LineTo(p));
        self
    }

    pub fn quad_to(&mut self, control: Point, to: Point) -> &mut Self {
        self.commands.push(PathCommand::QuadTo { control, to });
        self
    }

    pub fn arc_to(&mut self, center: Point, radius: f64, start_angle: f64, sweep: f64) -> &mut Self {
        self.commands.push(PathCommand::ArcTo {
            center,
            radius,
            start_angle,
            sweep,
        });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.commands.push(PathCommand::Close);
        self
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Total drawn length of the path.
    pub fn length(&self) -> f64 {
        let mut current = Point::default();
        let mut contour_start = Point::default();
        self.commands
            .iter()
            .map(|cmd| segment_length(*cmd, &mut current, &mut contour_start))
            .sum()
    }

    /// The leading `fraction` of the path by length, for draw-in effects.
    ///
    /// `fraction <= 0` yields an empty path, `fraction >= 1` a copy.
    pub fn trimmed(&self, fraction: f64) -> Path {
        if fraction >= 1.0 {
            return self.clone();
        }
        let mut out = Path::new();
        let total = self.length();
        if fraction <= 0.0 || total <= 0.0 {
            return out;
        }

        let mut remaining = total * fraction;
        let mut current = Point::default();
        let mut contour_start = Point::default();
        for cmd in &self.commands {
            let from = current;
            let len = segment_length(*cmd, &mut current, &mut contour_start);
            if len <= remaining {
                out.commands.push(*cmd);
                remaining -= len;
                continue;
            }
            if remaining > 0.0 {
                out.commands.push(partial_segment(*cmd, from, remaining / len));
            }
            break;
        }
        out
    }
}

/// Length contributed by `cmd`; advances the pen position.
fn segment_length(cmd: PathCommand, current: &mut Point, contour_start: &mut Point) -> f64 {
    match cmd {
        PathCommand::MoveTo(p) => {
            *current = p;
            *contour_start = p;
            0.0
        }
        PathCommand::LineTo(p) => {
            let len = current.distance_to(p);
            *current = p;
            len
        }
        PathCommand::QuadTo { control, to } => {
            let len = quad_length(*current, control, to);
            *current = to;
            len
        }
        PathCommand::ArcTo {
            center,
            radius,
            start_angle,
            sweep,
        } => {
            let start = center.polar(radius, start_angle);
            let lead_in = current.distance_to(start);
            *current = center.polar(radius, start_angle + sweep);
            lead_in + radius * sweep.abs()
        }
        PathCommand::Close => {
            let len = current.distance_to(*contour_start);
            *current = *contour_start;
            len
        }
    }
}

fn quad_point(p0: Point, c: Point, p1: Point, t: f64) -> Point {
    p0.lerp(c, t).lerp(c.lerp(p1, t), t)
}

fn quad_length(p0: Point, c: Point, p1: Point) -> f64 {
    let mut len = 0.0;
    let mut prev = p0;
    for i in 1..=QUAD_SAMPLES {
        let next = quad_point(p0, c, p1, i as f64 / QUAD_SAMPLES as f64);
        len += prev.distance_to(next);
        prev = next;
    }
    len
}

/// Curve parameter at which a quadratic reaches `fraction` of its length.
fn quad_parameter_at(p0: Point, c: Point, p1: Point, fraction: f64) -> f64 {
    let target = quad_length(p0, c, p1) * fraction;
    let mut walked = 0.0;
    let mut prev = p0;
    for i in 1..=QUAD_SAMPLES {
        let t = i as f64 / QUAD_SAMPLES as f64;
        let next = quad_point(p0, c, p1, t);
        let step = prev.distance_to(next);
        if walked + step >= target && step > 0.0 {
            let t0 = (i - 1) as f64 / QUAD_SAMPLES as f64;
            return t0 + (target - walked) / step / QUAD_SAMPLES as f64;
        }
        walked += step;
        prev = next;
    }
    1.0
}

/// The first `fraction` (by length) of a single segment starting at `from`.
fn partial_segment(cmd: PathCommand, from: Point, fraction: f64) -> PathCommand {
    match cmd {
        PathCommand::LineTo(p) => PathCommand::LineTo(from.lerp(p, fraction)),
        PathCommand::QuadTo { control, to } => {
            let t = quad_parameter_at(from, control, to, fraction);
            PathCommand::QuadTo {
                control: from.lerp(control, t),
                to: quad_point(from, control, to, t),
            }
        }
        PathCommand::ArcTo {
            center,
            radius,
            start_angle,
            sweep,
        } => {
            let lead_in = from.distance_to(center.polar(radius, start_angle));
            let arc_len = radius * sweep.abs();
            let keep = (lead_in + arc_len) * fraction;
            if keep <= lead_in {
                let start = center.polar(radius, start_angle);
                let t = if lead_in > 0.0 { keep / lead_in } else { 1.0 };
                PathCommand::LineTo(from.lerp(start, t))
            } else {
                let arc_fraction = if arc_len > 0.0 { (keep - lead_in) / arc_len } else { 0.0 };
                PathCommand::ArcTo {
                    center,
                    radius,
                    start_angle,
                    sweep: sweep * arc_fraction,
                }
            }
        }
        PathCommand::Close => PathCommand::Close,
        PathCommand::MoveTo(p) => PathCommand::MoveTo(p),
    }
}

/// Horizontal anchoring of a text run relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// `at` is the top-left corner
    Start,
    /// `at` is the top-centre
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub size: f64,
    pub align: TextAlign,
}

impl TextStyle {
    pub const fn new(color: Color, size: f64, align: TextAlign) -> Self {
        Self { color, size, align }
    }
}

/// Drawing surface implemented by the host.
pub trait Canvas {
    fn draw_path(&mut self, path: &Path, paint: Paint);

    fn draw_circle(&mut self, center: Point, radius: f64, paint: Paint);

    fn draw_text(&mut self, text: &str, at: Point, style: TextStyle);
}

/// One call made against a [`RecordingCanvas`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Path { path: Path, paint: Paint },
    Circle { center: Point, radius: f64, paint: Paint },
    Text { text: String, at: Point, style: TextStyle },
}

/// A canvas that records draw calls instead of rasterising them.
///
/// Useful for display-list hosts and for asserting on renderer output.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> impl Iterator<Item = (&Path, &Paint)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Path { path, paint } => Some((path, paint)),
            _ => None,
        })
    }

    pub fn circles(&self) -> impl Iterator<Item = (Point, f64, &Paint)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Circle { center, radius, paint } => Some((*center, *radius, paint)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Canvas for RecordingCanvas {
    fn draw_path(&mut self, path: &Path, paint: Paint) {
        self.ops.push(DrawOp::Path {
            path: path.clone(),
            paint,
        });
    }

    fn draw_circle(&mut self, center: Point, radius: f64, paint: Paint) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            paint,
        });
    }

    fn draw_text(&mut self, text: &str, at: Point, style: TextStyle) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            at,
            style,
        });
    }
}
