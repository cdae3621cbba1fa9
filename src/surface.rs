//! Drawing seam between the scenes and whatever backs the canvas.

use kurbo::{Point, Rect, Vec2};

use crate::palette::Rgba;

/// Line style for strokes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f64,
    /// `[on, off]` dash pattern; solid when `None`.
    pub dash: Option<[f64; 2]>,
}

impl Stroke {
    pub fn solid(color: Rgba, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Rgba, width: f64, on: f64, off: f64) -> Self {
        Self {
            color,
            width,
            dash: Some([on, off]),
        }
    }
}

/// Axis-aligned ellipse rotated by `rotation` radians around its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oval {
    pub center: Point,
    pub radii: Vec2,
    pub rotation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    Left,
    #[default]
    Center,
}

/// A run of monospace text, transformed around its anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub anchor: Point,
    pub size_px: f64,
    pub align: Align,
    pub color: Rgba,
    pub rotation: f64,
    pub scale: f64,
}

impl TextRun {
    pub fn new(text: impl Into<String>, anchor: Point, size_px: f64, color: Rgba) -> Self {
        Self {
            text: text.into(),
            anchor,
            size_px,
            align: Align::Center,
            color,
            rotation: 0.0,
            scale: 1.0,
        }
    }

    pub fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn transformed(mut self, rotation: f64, scale: f64) -> Self {
        self.rotation = rotation;
        self.scale = scale;
        self
    }

    pub fn font(&self) -> String {
        format!("{}px \"JetBrains Mono\", monospace", self.size_px)
    }
}

/// The 2D primitives a scene can emit in one frame.
///
/// Implementations are best-effort: a failed draw call is dropped, never
/// reported, so a broken surface cannot interrupt the page.
pub trait Surface {
    /// Resets the whole surface to transparent.
    fn clear(&mut self);
    fn fill_rect(&mut self, rect: Rect, color: Rgba);
    fn stroke_rect(&mut self, rect: Rect, stroke: Stroke);
    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba);
    /// Radial gradient from `color` at the center to transparent at `radius`.
    fn glow(&mut self, center: Point, radius: f64, color: Rgba);
    fn line(&mut self, from: Point, to: Point, stroke: Stroke);
    fn polyline(&mut self, points: &[Point], stroke: Stroke);
    fn stroke_oval(&mut self, oval: Oval, stroke: Stroke);
    fn fill_oval(&mut self, oval: Oval, color: Rgba);
    fn arc(&mut self, center: Point, radius: f64, start: f64, end: f64, stroke: Stroke);
    fn fill_polygon(&mut self, points: &[Point], color: Rgba);
    fn text(&mut self, run: &TextRun);
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Clear,
    FillRect(Rect, Rgba),
    StrokeRect(Rect, Stroke),
    FillCircle { center: Point, radius: f64, color: Rgba },
    Glow { center: Point, radius: f64, color: Rgba },
    Line { from: Point, to: Point, stroke: Stroke },
    Polyline(Vec<Point>, Stroke),
    StrokeOval(Oval, Stroke),
    FillOval(Oval, Rgba),
    Arc { center: Point, radius: f64, start: f64, end: f64, stroke: Stroke },
    FillPolygon(Vec<Point>, Rgba),
    Text(TextRun),
}

/// Headless surface that keeps every call, in order.
#[derive(Debug, Default)]
pub struct Recorder {
    pub commands: Vec<Command>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_untouched(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn take(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// Straight lines drawn with the given color.
    pub fn lines_with(&self, color: Rgba) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, Command::Line { stroke, .. } if stroke.color == color))
            .count()
    }

    pub fn count(&self, pred: impl Fn(&Command) -> bool) -> usize {
        self.commands.iter().filter(|c| pred(c)).count()
    }
}

impl Surface for Recorder {
    fn clear(&mut self) {
        self.commands.push(Command::Clear);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.commands.push(Command::FillRect(rect, color));
    }

    fn stroke_rect(&mut self, rect: Rect, stroke: Stroke) {
        self.commands.push(Command::StrokeRect(rect, stroke));
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        self.commands.push(Command::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn glow(&mut self, center: Point, radius: f64, color: Rgba) {
        self.commands.push(Command::Glow {
            center,
            radius,
            color,
        });
    }

    fn line(&mut self, from: Point, to: Point, stroke: Stroke) {
        self.commands.push(Command::Line { from, to, stroke });
    }

    fn polyline(&mut self, points: &[Point], stroke: Stroke) {
        self.commands.push(Command::Polyline(points.to_vec(), stroke));
    }

    fn stroke_oval(&mut self, oval: Oval, stroke: Stroke) {
        self.commands.push(Command::StrokeOval(oval, stroke));
    }

    fn fill_oval(&mut self, oval: Oval, color: Rgba) {
        self.commands.push(Command::FillOval(oval, color));
    }

    fn arc(&mut self, center: Point, radius: f64, start: f64, end: f64, stroke: Stroke) {
        self.commands.push(Command::Arc {
            center,
            radius,
            start,
            end,
            stroke,
        });
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgba) {
        self.commands.push(Command::FillPolygon(points.to_vec(), color));
    }

    fn text(&mut self, run: &TextRun) {
        self.commands.push(Command::Text(run.clone()));
    }
}
