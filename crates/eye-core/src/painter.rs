use std::f32::consts::{FRAC_PI_4, TAU};

use crate::animation::EyeFrame;
use crate::canvas::{Canvas, Paint, Path, RenderHint};
use crate::geometry::Viewport;
use crate::outline::AlmondOutline;
use crate::theme::{Color, ThemePalette};

const GLOW_BLUR: f32 = 40.0;
const GLOW_MIN_OPENNESS: f32 = 0.1;
const HIGHLIGHT_MIN_OPENNESS: f32 = 0.2;
const OUTLINE_WIDTH: f32 = 1.0;
const RADIAL_LINES: usize = 24;
const RADIAL_LINE_WIDTH: f32 = 1.0;
const HIGHLIGHT: Color = Color::rgba(1.0, 1.0, 1.0, 0.15);

/// Optional decoration, dropped while the loop warms up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Detail {
    pub radial_lines: bool,
}

impl Detail {
    pub const FULL: Detail = Detail { radial_lines: true };
    pub const REDUCED: Detail = Detail {
        radial_lines: false,
    };
}

/// Where the controller puts its frames.
pub trait EyeSurface {
    fn resize(&mut self, viewport: &Viewport);
    fn set_render_hint(&mut self, hint: RenderHint);
    fn present(&mut self, frame: &EyeFrame, palette: &ThemePalette, detail: Detail);
}

/// Drives any [`Canvas`] with [`paint`].
#[derive(Debug, Default)]
pub struct CanvasSurface<C> {
    canvas: C,
}

impl<C: Canvas> CanvasSurface<C> {
    pub fn new(canvas: C) -> Self {
        Self { canvas }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn into_inner(self) -> C {
        self.canvas
    }
}

impl<C: Canvas> EyeSurface for CanvasSurface<C> {
    fn resize(&mut self, viewport: &Viewport) {
        let (width, height) = viewport.surface_size();
        self.canvas
            .resize(width, height, viewport.device_pixel_ratio);
    }

    fn set_render_hint(&mut self, hint: RenderHint) {
        self.canvas.set_render_hint(hint);
    }

    fn present(&mut self, frame: &EyeFrame, palette: &ThemePalette, detail: Detail) {
        paint(&mut self.canvas, frame, palette, detail);
    }
}

/// The almond as a closed path: upper lid left to right, lower lid back.
pub fn almond_path(outline: &AlmondOutline) -> Path {
    let mut path = Path::new();
    path.move_to(outline.upper.from)
        .cubic_to(outline.upper.ctrl1, outline.upper.ctrl2, outline.upper.to)
        .cubic_to(outline.lower.ctrl1, outline.lower.ctrl2, outline.lower.to)
        .close();
    path
}

/// 24 spokes from 0.3 r out to 0.9 r (even) or 0.7 r (odd), as one path.
pub fn radial_lines_path(iris_radius: f32) -> Path {
    let mut path = Path::new();
    for i in 0..RADIAL_LINES {
        let angle = i as f32 / RADIAL_LINES as f32 * TAU;
        let (sin, cos) = angle.sin_cos();
        let reach = if i % 2 == 0 { 0.9 } else { 0.7 };
        path.move_to([cos * iris_radius * 0.3, sin * iris_radius * 0.3])
            .line_to([cos * iris_radius * reach, sin * iris_radius * reach]);
    }
    path
}

/// Paint one frame. Reads state only.
///
/// Layers, back to front: outline (with glow), then inside the almond
/// clip the rotated iris with its spokes, the upright pupil and the
/// highlight.
pub fn paint(canvas: &mut dyn Canvas, frame: &EyeFrame, palette: &ThemePalette, detail: Detail) {
    canvas.clear();

    let g = &frame.geometry;
    if !(g.eye_width > 0.0) {
        return;
    }

    canvas.save();
    canvas.translate(g.center[0], g.center[1]);

    let openness = frame.openness();
    let eye_path = almond_path(&AlmondOutline::new(g.eye_width, g.eye_height, openness));

    let glow = !palette.glow.is_transparent() && openness > GLOW_MIN_OPENNESS;
    if glow {
        canvas.set_shadow(GLOW_BLUR, palette.glow);
    }
    canvas.stroke(&eye_path, palette.outline, OUTLINE_WIDTH);
    if glow {
        canvas.set_shadow(0.0, Color::TRANSPARENT);
    }

    canvas.save();
    canvas.clip(&eye_path);

    // Iris
    canvas.translate(frame.iris[0], frame.iris[1]);
    canvas.rotate(frame.iris_rotation);

    let mut iris = Path::new();
    iris.circle([0.0, 0.0], g.iris_radius);
    canvas.fill(
        &iris,
        &Paint::RadialGradient {
            inner_radius: g.iris_radius * 0.2,
            outer_radius: g.iris_radius,
            inner: palette.iris_start,
            outer: palette.iris_end,
        },
    );

    if detail.radial_lines {
        canvas.stroke(
            &radial_lines_path(g.iris_radius),
            palette.radial_lines,
            RADIAL_LINE_WIDTH,
        );
    }

    // Pupil stays upright and sits halfway between iris and pupil targets.
    canvas.rotate(-frame.iris_rotation);
    canvas.translate(
        (frame.pupil[0] - frame.iris[0]) * 0.5,
        (frame.pupil[1] - frame.iris[1]) * 0.5,
    );

    let mut pupil = Path::new();
    pupil.circle([0.0, 0.0], g.pupil_radius);
    canvas.fill(&pupil, &Paint::Solid(palette.pupil));

    if openness > HIGHLIGHT_MIN_OPENNESS {
        let r = g.pupil_radius;
        let mut gloss = Path::new();
        gloss.ellipse([-r * 0.3, -r * 0.3], [r * 0.25, r * 0.15], FRAC_PI_4);
        canvas.fill(&gloss, &Paint::Solid(HIGHLIGHT));
    }

    canvas.restore();
    canvas.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, PathCommand, RecordingCanvas};
    use crate::config::Tuning;
    use crate::geometry::EyeGeometry;

    fn frame(blink: f32, squint: f32) -> EyeFrame {
        EyeFrame {
            geometry: EyeGeometry::from_viewport(
                &Viewport::new(800.0, 600.0, 1.0),
                &Tuning::default(),
            ),
            pupil: [10.0, 4.0],
            iris: [6.0, 2.0],
            blink,
            squint,
            iris_rotation: 0.5,
        }
    }

    fn draw(frame: &EyeFrame, palette: &ThemePalette, detail: Detail) -> Vec<DrawCommand> {
        let mut canvas = RecordingCanvas::new();
        paint(&mut canvas, frame, palette, detail);
        assert_eq!(canvas.depth(), 0, "unbalanced save/restore");
        canvas.take()
    }

    fn strokes(cmds: &[DrawCommand]) -> Vec<&Path> {
        cmds.iter()
            .filter_map(|c| match c {
                DrawCommand::Stroke { path, .. } => Some(path),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn layers_in_order() {
        let cmds = draw(&frame(0.0, 0.0), &ThemePalette::dark(), Detail::FULL);

        assert_eq!(cmds[0], DrawCommand::Clear);
        assert_eq!(cmds[1], DrawCommand::Save);
        assert_eq!(cmds[2], DrawCommand::Translate(400.0, 300.0));
        assert!(matches!(cmds[3], DrawCommand::Shadow { blur, .. } if blur == GLOW_BLUR));
        assert!(matches!(cmds[4], DrawCommand::Stroke { width, .. } if width == 1.0));
        assert!(matches!(cmds[5], DrawCommand::Shadow { blur, .. } if blur == 0.0));
        assert_eq!(cmds[6], DrawCommand::Save);
        assert!(matches!(cmds[7], DrawCommand::Clip(_)));
        assert_eq!(cmds[8], DrawCommand::Translate(6.0, 2.0));
        assert_eq!(cmds[9], DrawCommand::Rotate(0.5));
        assert!(matches!(
            cmds[10],
            DrawCommand::Fill {
                paint: Paint::RadialGradient { .. },
                ..
            }
        ));
        assert!(matches!(cmds[11], DrawCommand::Stroke { .. }));
        assert_eq!(cmds[12], DrawCommand::Rotate(-0.5));
        assert_eq!(cmds[13], DrawCommand::Translate(2.0, 1.0));
        assert!(matches!(
            cmds[14],
            DrawCommand::Fill {
                paint: Paint::Solid(_),
                ..
            }
        ));
        assert!(matches!(
            &cmds[15],
            DrawCommand::Fill { path, paint: Paint::Solid(c) }
                if *c == HIGHLIGHT && matches!(path.commands()[0], PathCommand::Ellipse { .. })
        ));
        assert_eq!(cmds[16], DrawCommand::Restore);
        assert_eq!(cmds[17], DrawCommand::Restore);
        assert_eq!(cmds.len(), 18);
    }

    #[test]
    fn clip_and_outline_share_the_almond() {
        let cmds = draw(&frame(0.2, 0.0), &ThemePalette::dark(), Detail::FULL);
        let outline = strokes(&cmds)[0].clone();
        let clip = cmds
            .iter()
            .find_map(|c| match c {
                DrawCommand::Clip(p) => Some(p.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(outline, clip);
        assert!(matches!(
            outline.commands(),
            [
                PathCommand::MoveTo(_),
                PathCommand::CubicTo { .. },
                PathCommand::CubicTo { .. },
                PathCommand::Close
            ]
        ));
    }

    #[test]
    fn radial_lines_are_one_batched_stroke() {
        let cmds = draw(&frame(0.0, 0.0), &ThemePalette::dark(), Detail::FULL);
        let spokes = strokes(&cmds)[1];
        assert_eq!(spokes.subpath_count(), 24);

        let reduced = draw(&frame(0.0, 0.0), &ThemePalette::dark(), Detail::REDUCED);
        assert_eq!(strokes(&reduced).len(), 1);
    }

    #[test]
    fn spokes_alternate_length() {
        let r = 100.0;
        let path = radial_lines_path(r);
        let ends: Vec<f32> = path
            .commands()
            .iter()
            .filter_map(|c| match c {
                PathCommand::LineTo([x, y]) => Some((x * x + y * y).sqrt()),
                _ => None,
            })
            .collect();
        assert_eq!(ends.len(), 24);
        for (i, len) in ends.iter().enumerate() {
            let want = if i % 2 == 0 { 90.0 } else { 70.0 };
            assert!((len - want).abs() < 1e-3, "spoke {i}: {len}");
        }
    }

    #[test]
    fn closed_eye_skips_glow_and_highlight() {
        let cmds = draw(&frame(1.0, 0.0), &ThemePalette::dark(), Detail::FULL);
        assert!(!cmds.iter().any(|c| matches!(c, DrawCommand::Shadow { .. })));
        let highlight = cmds.iter().any(|c| {
            matches!(c, DrawCommand::Fill { paint: Paint::Solid(col), .. } if *col == HIGHLIGHT)
        });
        assert!(!highlight);
    }

    #[test]
    fn transparent_glow_is_never_applied() {
        let cmds = draw(&frame(0.0, 0.0), &ThemePalette::light(), Detail::FULL);
        assert!(!cmds.iter().any(|c| matches!(c, DrawCommand::Shadow { .. })));
    }

    #[test]
    fn degenerate_geometry_only_clears() {
        let mut f = frame(0.0, 0.0);
        f.geometry = EyeGeometry::from_viewport(&Viewport::new(0.0, 0.0, 1.0), &Tuning::default());
        let cmds = draw(&f, &ThemePalette::dark(), Detail::FULL);
        assert_eq!(cmds, vec![DrawCommand::Clear]);
    }

    #[test]
    fn canvas_surface_sizes_backing_store() {
        let mut surface = CanvasSurface::new(RecordingCanvas::new());
        surface.resize(&Viewport::new(800.0, 600.0, 2.0));
        assert_eq!(
            surface.canvas().commands(),
            &[DrawCommand::Resize {
                width: 1600,
                height: 1200,
                scale: 2.0
            }]
        );
    }
}
