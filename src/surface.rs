//! The drawing surface the clock paints on.
//!
//! The clock face only talks to a [`Surface`], so the window host, the PNG
//! snapshot and the tests can each supply their own.

use crate::config::Color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    /// Clockwise arc (screen coordinates) from `start` to `end` radians.
    Arc {
        cx: f64,
        cy: f64,
        radius: f64,
        start: f64,
        end: f64,
    },
    Close,
}

/// A path made of move/line/arc/close operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    ops: Vec<PathOp>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.ops.push(PathOp::MoveTo { x, y });
        self
    }

    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.ops.push(PathOp::LineTo { x, y });
        self
    }

    pub fn arc(mut self, cx: f64, cy: f64, radius: f64, start: f64, end: f64) -> Self {
        self.ops.push(PathOp::Arc {
            cx,
            cy,
            radius,
            start,
            end,
        });
        self
    }

    pub fn close(mut self) -> Self {
        self.ops.push(PathOp::Close);
        self
    }

    pub fn ops(&self) -> &[PathOp] {
        &self.ops
    }

    /// Whether every coordinate in the path is finite.
    pub fn is_finite(&self) -> bool {
        self.ops.iter().all(|op| match *op {
            PathOp::MoveTo { x, y } | PathOp::LineTo { x, y } => x.is_finite() && y.is_finite(),
            PathOp::Arc {
                cx,
                cy,
                radius,
                start,
                end,
            } => [cx, cy, radius, start, end].iter().all(|v| v.is_finite()),
            PathOp::Close => true,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillStyle {
    pub color: Color,
    pub alpha: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub alpha: f32,
    pub width: f32,
    pub cap: LineCap,
}

/// A 2D drawing context with a pixel size.
pub trait Surface {
    /// Current size in pixels as `(width, height)`.
    fn size(&self) -> (usize, usize);
    fn clear(&mut self);
    fn fill(&mut self, path: &Path, style: &FillStyle);
    fn stroke(&mut self, path: &Path, style: &StrokeStyle);
}

/// One call made against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Clear,
    Fill(Path, FillStyle),
    Stroke(Path, StrokeStyle),
}

/// Surface that draws nothing and remembers every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub width: usize,
    pub height: usize,
    pub calls: Vec<SurfaceCall>,
}

impl RecordingSurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            calls: Vec::new(),
        }
    }

    /// Calls since the last clear.
    pub fn last_frame(&self) -> &[SurfaceCall] {
        let start = self
            .calls
            .iter()
            .rposition(|c| *c == SurfaceCall::Clear)
            .unwrap_or(0);
        &self.calls[start..]
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.calls.push(SurfaceCall::Clear);
    }

    fn fill(&mut self, path: &Path, style: &FillStyle) {
        self.calls.push(SurfaceCall::Fill(path.clone(), *style));
    }

    fn stroke(&mut self, path: &Path, style: &StrokeStyle) {
        self.calls.push(SurfaceCall::Stroke(path.clone(), *style));
    }
}
