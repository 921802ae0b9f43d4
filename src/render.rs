use crate::clock::{minute_to_angle, ClockState};
use crate::config::{ClockConfig, Color};
use crate::schedule::{ScheduledSection, MINUTES_PER_DAY};
use crate::surface::{FillStyle, LineCap, Path, StrokeStyle, Surface};
use tracing::warn;

// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear,
    Fill { path: Path, style: FillStyle },
    Stroke { path: Path, style: StrokeStyle },
}

/// The draw commands for one frame, replayed in order onto a surface.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear => surface.clear(),
                DrawCommand::Fill { path, style } => surface.fill(path, style),
                DrawCommand::Stroke { path, style } => surface.stroke(path, style),
            }
        }
    }
}

// ============================================================================
// DIAL GEOMETRY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dial {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl Dial {
    /// Largest dial that fits the surface, centred on it.
    pub fn new(width: usize, height: usize, config: &ClockConfig) -> Self {
        let half = width.min(height) as f64 / 2.0;
        Self {
            cx: width as f64 / 2.0,
            cy: height as f64 / 2.0,
            r: half * config.radius_factor,
        }
    }
}

// ============================================================================
// CLOCK FACE
// ============================================================================

/// The 24-hour dial: a wedge per section and a pointer at the current time.
#[derive(Debug, Clone)]
pub struct ClockFace {
    sections: Vec<ScheduledSection>,
    fills: Vec<Color>,
    config: ClockConfig,
}

impl ClockFace {
    pub fn new(sections: Vec<ScheduledSection>, config: ClockConfig) -> Self {
        let fills = sections
            .iter()
            .map(|s| {
                Color::parse(&s.color).unwrap_or_else(|| {
                    warn!(section = %s.name, color = %s.color, "unrecognized section color");
                    config.fallback_section_color
                })
            })
            .collect();
        Self {
            sections,
            fills,
            config,
        }
    }

    pub fn sections(&self) -> &[ScheduledSection] {
        &self.sections
    }

    pub fn config(&self) -> &ClockConfig {
        &self.config
    }

    pub fn state_at(&self, minute_of_day: f64) -> ClockState {
        ClockState::at(&self.sections, minute_of_day)
    }

    /// Builds the frame for a `width` x `height` surface at `minute_of_day`.
    pub fn scene(&self, width: usize, height: usize, minute_of_day: f64) -> Scene {
        let mut scene = Scene::new();
        scene.add_command(DrawCommand::Clear);

        let dial = Dial::new(width, height, &self.config);
        let state = self.state_at(minute_of_day);

        for (i, (section, &color)) in self.sections.iter().zip(&self.fills).enumerate() {
            add_section_wedge(&mut scene, &dial, section, color, state.active == Some(i), &self.config);
        }
        if self.config.boundary_blend_minutes > 0.0 {
            add_boundary_blends(&mut scene, &dial, &self.sections, &self.fills, state.active, &self.config);
        }
        add_pointer(&mut scene, &dial, state.angle, &self.config);

        scene
    }

    /// Paints the dial for `minute_of_day` onto `surface`.
    pub fn draw(&self, surface: &mut dyn Surface, minute_of_day: f64) {
        let (width, height) = surface.size();
        self.scene(width, height, minute_of_day).render(surface);
    }
}

fn add_section_wedge(
    scene: &mut Scene,
    dial: &Dial,
    section: &ScheduledSection,
    color: Color,
    is_active: bool,
    config: &ClockConfig,
) {
    let r = if is_active { dial.r * config.active_scale } else { dial.r };
    let wedge = Path::new()
        .move_to(dial.cx, dial.cy)
        .arc(
            dial.cx,
            dial.cy,
            r,
            minute_to_angle(section.start_minute),
            minute_to_angle(section.end_minute),
        )
        .close();
    let alpha = if is_active { 1.0 } else { config.inactive_alpha };
    scene.add_command(DrawCommand::Fill {
        path: wedge.clone(),
        style: FillStyle { color, alpha },
    });
    if is_active {
        scene.add_command(DrawCommand::Stroke {
            path: wedge,
            style: StrokeStyle {
                color: config.active_outline_color,
                alpha: 1.0,
                width: config.active_outline_width,
                cap: LineCap::Butt,
            },
        });
    }
}

/// Paints one-minute slices across every boundary, fading from the ending
/// section's color into the next one. Each slice takes the radius and
/// opacity of the section it lies in.
fn add_boundary_blends(
    scene: &mut Scene,
    dial: &Dial,
    sections: &[ScheduledSection],
    fills: &[Color],
    active: Option<usize>,
    config: &ClockConfig,
) {
    let count = sections.len();
    if count < 2 {
        return;
    }
    let blend = config.boundary_blend_minutes;
    let slices = (2.0 * blend).ceil().clamp(1.0, MINUTES_PER_DAY) as usize;
    let slice_width = 2.0 * blend / slices as f64;

    for (i, section) in sections.iter().enumerate() {
        let next = (i + 1) % count;
        let boundary = section.end_minute;
        for k in 0..slices {
            let from = boundary - blend + k as f64 * slice_width;
            let owner = if from + slice_width / 2.0 < boundary { i } else { next };
            let is_active = active == Some(owner);
            let r = if is_active { dial.r * config.active_scale } else { dial.r };
            let t = (k as f64 + 0.5) / slices as f64;
            scene.add_command(DrawCommand::Fill {
                path: Path::new()
                    .move_to(dial.cx, dial.cy)
                    .arc(
                        dial.cx,
                        dial.cy,
                        r,
                        minute_to_angle(from),
                        minute_to_angle(from + slice_width),
                    )
                    .close(),
                style: FillStyle {
                    color: fills[i].mix(fills[next], t),
                    alpha: if is_active { 1.0 } else { config.inactive_alpha },
                },
            });
        }
    }
}

/// Shaft with a round cap plus a triangular head, tip on the dial edge.
fn add_pointer(scene: &mut Scene, dial: &Dial, angle: f64, config: &ClockConfig) {
    let length = dial.r;
    let head = length * config.pointer_head_factor;
    let (cos, sin) = (angle.cos(), angle.sin());
    // Rotate a point given along/across the pointer into screen space.
    let at = |along: f64, across: f64| {
        (
            dial.cx + along * cos - across * sin,
            dial.cy + along * sin + across * cos,
        )
    };

    let (shaft_x, shaft_y) = at(length - head, 0.0);
    scene.add_command(DrawCommand::Stroke {
        path: Path::new().move_to(dial.cx, dial.cy).line_to(shaft_x, shaft_y),
        style: StrokeStyle {
            color: config.pointer_color,
            alpha: 1.0,
            width: (length * config.pointer_width_factor) as f32,
            cap: LineCap::Round,
        },
    });

    let (left_x, left_y) = at(length - head, -head * 0.8);
    let (tip_x, tip_y) = at(length, 0.0);
    let (right_x, right_y) = at(length - head, head * 0.8);
    scene.add_command(DrawCommand::Fill {
        path: Path::new()
            .move_to(left_x, left_y)
            .line_to(tip_x, tip_y)
            .line_to(right_x, right_y)
            .close(),
        style: FillStyle {
            color: config.pointer_color,
            alpha: 1.0,
        },
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SectionRecord;
    use crate::schedule::build_schedule;
    use crate::surface::{PathOp, RecordingSurface, SurfaceCall};

    fn face(entries: &[(&str, &str)]) -> ClockFace {
        let records: Vec<SectionRecord> = entries
            .iter()
            .map(|(color, started)| SectionRecord {
                name: Some(format!("at {started}")),
                color: Some(color.to_string()),
                started: Some(started.to_string()),
            })
            .collect();
        ClockFace::new(build_schedule(&records), ClockConfig::default())
    }

    fn wedge_radius(path: &Path) -> f64 {
        path.ops()
            .iter()
            .find_map(|op| match op {
                PathOp::Arc { radius, .. } => Some(*radius),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn dial_fits_the_shorter_side() {
        let dial = Dial::new(400, 200, &ClockConfig::default());
        assert_eq!((dial.cx, dial.cy), (200.0, 100.0));
        assert!((dial.r - 90.0).abs() < 1e-9);
    }

    #[test]
    fn active_section_is_enlarged_opaque_and_outlined() {
        let face = face(&[("#ff0000", "22:00"), ("#00ff00", "06:00")]);
        let scene = face.scene(200, 200, 1350.0);
        let commands = scene.commands();

        let DrawCommand::Fill { path, style } = &commands[1] else {
            panic!("expected active wedge fill");
        };
        assert!((wedge_radius(path) - 90.0 * 1.05).abs() < 1e-9);
        assert_eq!(style.alpha, 1.0);
        assert!(matches!(commands[2], DrawCommand::Stroke { .. }));

        let DrawCommand::Fill { path, style } = &commands[3] else {
            panic!("expected inactive wedge fill");
        };
        assert!((wedge_radius(path) - 90.0).abs() < 1e-9);
        assert_eq!(style.alpha, 0.5);
        assert_eq!(style.color, Color::new(0, 0xff, 0));
    }

    #[test]
    fn wedge_angles_follow_the_schedule() {
        let face = face(&[("red", "00:00"), ("blue", "06:00")]);
        let scene = face.scene(100, 100, 100.0);
        let DrawCommand::Fill { path, .. } = &scene.commands()[1] else {
            panic!("expected wedge");
        };
        let Some(PathOp::Arc { start, end, .. }) = path.ops().get(1).copied() else {
            panic!("expected arc");
        };
        assert!((start - minute_to_angle(0.0)).abs() < 1e-9);
        assert!((end - minute_to_angle(360.0)).abs() < 1e-9);
    }

    #[test]
    fn same_instant_gives_identical_frames() {
        let face = face(&[("#1f2d3d", "23:00"), ("#2e8b57", "09:00")]);
        let mut surface = RecordingSurface::new(320, 240);
        face.draw(&mut surface, 612.25);
        let first = surface.last_frame().to_vec();
        face.draw(&mut surface, 612.25);
        assert_eq!(surface.last_frame(), first.as_slice());
        assert_eq!(face.scene(320, 240, 612.25), face.scene(320, 240, 612.25));
    }

    #[test]
    fn empty_schedule_draws_only_the_pointer() {
        let face = ClockFace::new(Vec::new(), ClockConfig::default());
        let mut surface = RecordingSurface::new(100, 100);
        face.draw(&mut surface, 0.0);
        assert_eq!(surface.calls.len(), 3);
        assert_eq!(surface.calls[0], SurfaceCall::Clear);
        assert!(matches!(surface.calls[1], SurfaceCall::Stroke(_, s) if s.cap == LineCap::Round));
        assert!(matches!(surface.calls[2], SurfaceCall::Fill(..)));
    }

    #[test]
    fn pointer_tip_reaches_the_dial_edge() {
        let face = ClockFace::new(Vec::new(), ClockConfig::default());
        // 06:00 points right.
        let scene = face.scene(200, 200, 360.0);
        let DrawCommand::Fill { path, .. } = scene.commands().last().unwrap() else {
            panic!("expected pointer head");
        };
        let PathOp::LineTo { x, y } = path.ops()[1] else {
            panic!("expected tip");
        };
        assert!((x - 190.0).abs() < 1e-9);
        assert!((y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn boundary_blend_adds_fading_slices() {
        let records: Vec<SectionRecord> = [("red", "00:00"), ("blue", "12:00")]
            .iter()
            .map(|(color, started)| SectionRecord {
                name: None,
                color: Some(color.to_string()),
                started: Some(started.to_string()),
            })
            .collect();
        let config = ClockConfig::builder().boundary_blend_minutes(5.0).build();
        let face = ClockFace::new(build_schedule(&records), config);
        let scene = face.scene(100, 100, 180.0);

        // Clear, two wedges, one outline, ten slices per boundary, pointer.
        assert_eq!(scene.commands().len(), 1 + 2 + 1 + 20 + 2);
        let DrawCommand::Fill { path, style } = &scene.commands()[4] else {
            panic!("expected first slice");
        };
        let Some(PathOp::Arc { start, end, .. }) = path.ops().get(1).copied() else {
            panic!("expected arc");
        };
        assert!((start - minute_to_angle(715.0)).abs() < 1e-9);
        assert!((end - minute_to_angle(716.0)).abs() < 1e-9);
        assert_eq!(style.color, Color::new(0xff, 0, 0).mix(Color::new(0, 0, 0xff), 0.05));
        assert_eq!(style.alpha, 1.0);

        let DrawCommand::Fill { style, .. } = &scene.commands()[13] else {
            panic!("expected last slice");
        };
        assert_eq!(style.alpha, 0.5);
    }

    #[test]
    fn unknown_color_uses_fallback() {
        let face = face(&[("not-a-color", "08:00"), ("red", "20:00")]);
        let scene = face.scene(100, 100, 1300.0);
        let DrawCommand::Fill { style, .. } = &scene.commands()[1] else {
            panic!("expected wedge");
        };
        assert_eq!(style.color, ClockConfig::default().fallback_section_color);
    }
}
