//! Software rasterizer over an RGBA8 frame buffer.

use crate::config::Color;
use crate::surface::{FillStyle, LineCap, Path, PathOp, StrokeStyle, Surface};
use std::f64::consts::PI;
use tracing::trace;

// Angular step used when flattening arcs into line segments.
const ARC_STEP: f64 = PI / 180.0;
const MAX_ARC_SEGMENTS: usize = 4096;

/// A [`Surface`] drawing straight into an RGBA8 frame, as handed out by
/// `pixels` or backing an `image::RgbaImage`.
pub struct PixelCanvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
    background: Color,
}

impl<'a> PixelCanvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize, background: Color) -> Self {
        Self {
            frame,
            width,
            height,
            background,
        }
    }

    fn set_pixel(&mut self, x: i64, y: i64, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let Some(dst) = self.frame.get_mut(idx..idx + 4) else {
            return;
        };
        let a = alpha.clamp(0.0, 1.0);
        let blend = |src: u8, dst: u8| (src as f32 * a + dst as f32 * (1.0 - a)).round() as u8;
        let out = [
            blend(color.r, dst[0]),
            blend(color.g, dst[1]),
            blend(color.b, dst[2]),
            0xff,
        ];
        dst.copy_from_slice(&out);
    }

    /// Pixel bounds of `points` padded by `pad`, clipped to the frame.
    fn bounds(&self, points: impl Iterator<Item = (f64, f64)>, pad: f64) -> Option<(i64, i64, i64, i64)> {
        let (min_x, min_y, max_x, max_y) = points.fold(
            (f64::MAX, f64::MAX, f64::MIN, f64::MIN),
            |(min_x, min_y, max_x, max_y), (x, y)| (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y)),
        );
        if min_x > max_x {
            return None;
        }
        let x0 = ((min_x - pad).floor() as i64).max(0);
        let y0 = ((min_y - pad).floor() as i64).max(0);
        let x1 = ((max_x + pad).ceil() as i64).min(self.width as i64 - 1);
        let y1 = ((max_y + pad).ceil() as i64).min(self.height as i64 - 1);
        (x0 <= x1 && y0 <= y1).then_some((x0, y0, x1, y1))
    }

    fn draw_thick_line_aa(&mut self, from: (f64, f64), to: (f64, f64), thickness: f32, color: Color, alpha: f32) {
        let half = thickness as f64 / 2.0;
        let Some((x0, y0, x1, y1)) = self.bounds([from, to].into_iter(), half + 1.0) else {
            return;
        };
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let len_sq = dx * dx + dy * dy;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let (px, py) = (x as f64 + 0.5 - from.0, y as f64 + 0.5 - from.1);
                let t = if len_sq > 0.0 {
                    ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let dist = ((px - t * dx).powi(2) + (py - t * dy).powi(2)).sqrt();
                let aa = (1.0 - (dist - half).clamp(0.0, 1.0)) as f32;
                if aa > 0.01 {
                    self.set_pixel(x, y, color, aa * alpha);
                }
            }
        }
    }

    fn draw_circle(&mut self, center: (f64, f64), radius: f64, color: Color, alpha: f32) {
        let Some((x0, y0, x1, y1)) = self.bounds([center].into_iter(), radius + 1.0) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dist = ((x as f64 + 0.5 - center.0).powi(2) + (y as f64 + 0.5 - center.1).powi(2)).sqrt();
                let aa = if dist > radius {
                    1.0 - (dist - radius).min(1.0)
                } else {
                    1.0
                };
                if aa > 0.0 {
                    self.set_pixel(x, y, color, aa as f32 * alpha);
                }
            }
        }
    }
}

/// A flattened subpath: its points and whether it was explicitly closed.
struct Polyline {
    points: Vec<(f64, f64)>,
    closed: bool,
}

fn flatten(path: &Path) -> Vec<Polyline> {
    let mut lines: Vec<Polyline> = Vec::new();
    let mut current = Polyline {
        points: Vec::new(),
        closed: false,
    };
    for op in path.ops() {
        match *op {
            PathOp::MoveTo { x, y } => {
                if !current.points.is_empty() {
                    lines.push(std::mem::replace(
                        &mut current,
                        Polyline {
                            points: Vec::new(),
                            closed: false,
                        },
                    ));
                }
                current.points.push((x, y));
            }
            PathOp::LineTo { x, y } => current.points.push((x, y)),
            PathOp::Arc {
                cx,
                cy,
                radius,
                start,
                end,
            } => {
                let segments = (((end - start).abs() / ARC_STEP).ceil() as usize).clamp(1, MAX_ARC_SEGMENTS);
                for i in 0..=segments {
                    let angle = start + (end - start) * i as f64 / segments as f64;
                    current
                        .points
                        .push((cx + angle.cos() * radius, cy + angle.sin() * radius));
                }
            }
            PathOp::Close => current.closed = true,
        }
    }
    if !current.points.is_empty() {
        lines.push(current);
    }
    lines
}

/// Where the horizontal line at `y` crosses the edges of every subpath (each
/// treated as closed), sorted left to right. Pairs of crossings bound the
/// even-odd interior.
fn crossings(lines: &[Polyline], y: f64, xs: &mut Vec<f64>) {
    xs.clear();
    for line in lines {
        let pts = &line.points;
        for i in 0..pts.len() {
            let (ax, ay) = pts[i];
            let (bx, by) = pts[(i + 1) % pts.len()];
            if (ay > y) != (by > y) {
                xs.push(ax + (y - ay) / (by - ay) * (bx - ax));
            }
        }
    }
    xs.sort_by(f64::total_cmp);
}

impl Surface for PixelCanvas<'_> {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        let (r, g, b) = self.background.as_tuple();
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[r, g, b, 0xff]);
        }
    }

    fn fill(&mut self, path: &Path, style: &FillStyle) {
        if !path.is_finite() {
            trace!("skipping fill of non-finite path");
            return;
        }
        let lines = flatten(path);
        let Some((x0, y0, x1, y1)) = self.bounds(lines.iter().flat_map(|l| l.points.iter().copied()), 0.0) else {
            return;
        };
        let mut xs = Vec::new();
        for y in y0..=y1 {
            crossings(&lines, y as f64 + 0.5, &mut xs);
            // Pixel centres in [left, right) are inside.
            for span in xs.chunks_exact(2) {
                let left = ((span[0] - 0.5).ceil() as i64).max(x0);
                let right = ((span[1] - 0.5).ceil() as i64).min(x1 + 1);
                for x in left..right {
                    self.set_pixel(x, y, style.color, style.alpha);
                }
            }
        }
    }

    fn stroke(&mut self, path: &Path, style: &StrokeStyle) {
        if !path.is_finite() {
            trace!("skipping stroke of non-finite path");
            return;
        }
        for line in flatten(path) {
            let pts = &line.points;
            let mut segments: Vec<((f64, f64), (f64, f64))> = pts.windows(2).map(|w| (w[0], w[1])).collect();
            if line.closed && pts.len() > 2 {
                segments.push((pts[pts.len() - 1], pts[0]));
            }
            for (from, to) in segments {
                self.draw_thick_line_aa(from, to, style.width, style.color, style.alpha);
            }
            if style.cap == LineCap::Round && !line.closed {
                let radius = style.width as f64 / 2.0;
                if let (Some(&first), Some(&last)) = (pts.first(), pts.last()) {
                    self.draw_circle(first, radius, style.color, style.alpha);
                    self.draw_circle(last, radius, style.color, style.alpha);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::new(0xff, 0x00, 0x00);

    fn pixel(frame: &[u8], width: usize, x: usize, y: usize) -> [u8; 4] {
        let idx = (y * width + x) * 4;
        [frame[idx], frame[idx + 1], frame[idx + 2], frame[idx + 3]]
    }

    /// Point-by-point even-odd test, the reference for the scanline fill.
    fn inside(lines: &[Polyline], x: f64, y: f64) -> bool {
        let mut inside = false;
        for line in lines {
            let pts = &line.points;
            for i in 0..pts.len() {
                let (ax, ay) = pts[i];
                let (bx, by) = pts[(i + 1) % pts.len()];
                if (ay > y) != (by > y) && x < ax + (y - ay) / (by - ay) * (bx - ax) {
                    inside = !inside;
                }
            }
        }
        inside
    }

    #[test]
    fn scanline_fill_matches_point_test() {
        let shapes = [
            Path::new()
                .move_to(32.0, 32.0)
                .arc(32.0, 32.0, 27.3, -PI / 2.0, PI * 0.83)
                .close(),
            Path::new()
                .move_to(32.0, 32.0)
                .arc(32.0, 32.0, 30.0, 2.1, 2.1 + PI * 1.9)
                .close(),
            Path::new()
                .move_to(5.2, 60.1)
                .line_to(33.7, 3.9)
                .line_to(58.4, 44.4)
                .close(),
            // Two subpaths: a square with a square hole.
            Path::new()
                .move_to(10.0, 10.0)
                .line_to(50.0, 10.0)
                .line_to(50.0, 50.0)
                .line_to(10.0, 50.0)
                .close()
                .move_to(20.0, 20.0)
                .line_to(40.0, 20.0)
                .line_to(40.0, 40.0)
                .line_to(20.0, 40.0)
                .close(),
        ];
        for path in &shapes {
            let mut frame = vec![0u8; 64 * 64 * 4];
            let mut canvas = PixelCanvas::new(&mut frame, 64, 64, Color::BLACK);
            canvas.clear();
            canvas.fill(path, &FillStyle { color: Color::WHITE, alpha: 1.0 });

            let lines = flatten(path);
            for y in 0..64 {
                for x in 0..64 {
                    let expected = inside(&lines, x as f64 + 0.5, y as f64 + 0.5);
                    let filled = pixel(&frame, 64, x, y)[0] == 0xff;
                    assert_eq!(filled, expected, "pixel ({x}, {y}) of {path:?}");
                }
            }
        }
    }

    #[test]
    fn clear_paints_background() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        let mut canvas = PixelCanvas::new(&mut frame, 4, 4, Color::new(1, 2, 3));
        canvas.clear();
        assert_eq!(pixel(&frame, 4, 3, 3), [1, 2, 3, 0xff]);
    }

    #[test]
    fn fills_pie_wedge_quadrant() {
        let mut frame = vec![0u8; 20 * 20 * 4];
        let mut canvas = PixelCanvas::new(&mut frame, 20, 20, Color::BLACK);
        canvas.clear();
        // Quarter from 3 o'clock to 6 o'clock: the lower right quadrant.
        let wedge = Path::new()
            .move_to(10.0, 10.0)
            .arc(10.0, 10.0, 8.0, 0.0, PI / 2.0)
            .close();
        canvas.fill(&wedge, &FillStyle { color: RED, alpha: 1.0 });
        assert_eq!(pixel(&frame, 20, 13, 13), [0xff, 0, 0, 0xff]);
        assert_eq!(pixel(&frame, 20, 6, 6), [0, 0, 0, 0xff]);
        assert_eq!(pixel(&frame, 20, 6, 13), [0, 0, 0, 0xff]);
    }

    #[test]
    fn partial_alpha_blends_with_background() {
        let mut frame = vec![0u8; 10 * 10 * 4];
        let mut canvas = PixelCanvas::new(&mut frame, 10, 10, Color::BLACK);
        canvas.clear();
        let square = Path::new()
            .move_to(0.0, 0.0)
            .line_to(10.0, 0.0)
            .line_to(10.0, 10.0)
            .line_to(0.0, 10.0)
            .close();
        canvas.fill(&square, &FillStyle { color: Color::WHITE, alpha: 0.5 });
        assert_eq!(pixel(&frame, 10, 5, 5), [128, 128, 128, 0xff]);
    }

    #[test]
    fn stroke_covers_the_line() {
        let mut frame = vec![0u8; 20 * 20 * 4];
        let mut canvas = PixelCanvas::new(&mut frame, 20, 20, Color::BLACK);
        canvas.clear();
        let line = Path::new().move_to(2.0, 10.5).line_to(18.0, 10.5);
        canvas.stroke(
            &line,
            &StrokeStyle {
                color: Color::WHITE,
                alpha: 1.0,
                width: 3.0,
                cap: LineCap::Round,
            },
        );
        assert_eq!(pixel(&frame, 20, 10, 10), [0xff, 0xff, 0xff, 0xff]);
        assert_eq!(pixel(&frame, 20, 10, 2), [0, 0, 0, 0xff]);
    }

    #[test]
    fn non_finite_paths_are_skipped() {
        let mut frame = vec![0u8; 8 * 8 * 4];
        let mut canvas = PixelCanvas::new(&mut frame, 8, 8, Color::BLACK);
        canvas.clear();
        let broken = Path::new()
            .move_to(4.0, 4.0)
            .arc(4.0, 4.0, 3.0, f64::NAN, 1.0)
            .close();
        canvas.fill(&broken, &FillStyle { color: RED, alpha: 1.0 });
        assert!(frame.chunks_exact(4).all(|p| p == [0, 0, 0, 0xff]));
    }

    #[test]
    fn drawing_off_canvas_is_clipped() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        let mut canvas = PixelCanvas::new(&mut frame, 4, 4, Color::BLACK);
        let far = Path::new().move_to(-50.0, -50.0).line_to(-40.0, -40.0).line_to(-50.0, -40.0);
        canvas.fill(&far, &FillStyle { color: RED, alpha: 1.0 });
        assert!(frame.iter().all(|b| *b == 0));
    }
}
