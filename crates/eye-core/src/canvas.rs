//! Minimal 2D drawing surface.
//!
//! The command set mirrors an immediate-mode canvas: a transform and clip
//! stack, path strokes and fills with solid or radial-gradient paint, and an
//! optional drop shadow. `RecordingCanvas` keeps every call so hosts without
//! a raster backend, and tests, can inspect what a frame drew.

use crate::theme::Color;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo([f32; 2]),
    LineTo([f32; 2]),
    CubicTo {
        ctrl1: [f32; 2],
        ctrl2: [f32; 2],
        to: [f32; 2],
    },
    /// Full circle.
    Circle { center: [f32; 2], radius: f32 },
    /// Full ellipse rotated by `rotation` radians.
    Ellipse {
        center: [f32; 2],
        radii: [f32; 2],
        rotation: f32,
    },
    Close,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, p: [f32; 2]) -> &mut Self {
        self.commands.push(PathCommand::MoveTo(p));
        self
    }

    pub fn line_to(&mut self, p: [f32; 2]) -> &mut Self {
        self.commands.push(PathCommand::LineTo(p));
        self
    }

    pub fn cubic_to(&mut self, ctrl1: [f32; 2], ctrl2: [f32; 2], to: [f32; 2]) -> &mut Self {
        self.commands.push(PathCommand::CubicTo { ctrl1, ctrl2, to });
        self
    }

    pub fn circle(&mut self, center: [f32; 2], radius: f32) -> &mut Self {
        self.commands.push(PathCommand::Circle { center, radius });
        self
    }

    pub fn ellipse(&mut self, center: [f32; 2], radii: [f32; 2], rotation: f32) -> &mut Self {
        self.commands.push(PathCommand::Ellipse {
            center,
            radii,
            rotation,
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

    /// Number of `MoveTo` commands, i.e. separate subpaths started explicitly.
    pub fn subpath_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::MoveTo(_)))
            .count()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Paint {
    Solid(Color),
    /// Concentric radial gradient around the local origin.
    RadialGradient {
        inner_radius: f32,
        outer_radius: f32,
        inner: Color,
        outer: Color,
    },
}

/// Compositing hint for the backing surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderHint {
    /// Contents change every frame; keep the surface on its own layer.
    Animated,
    #[default]
    Auto,
}

pub trait Canvas {
    /// Resize the backing store to `width × height` physical pixels and
    /// reset the transform to `scale` so drawing uses logical pixels.
    fn resize(&mut self, width: u32, height: u32, scale: f32);
    fn set_render_hint(&mut self, hint: RenderHint);
    /// Clear the whole surface to transparent.
    fn clear(&mut self);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    fn rotate(&mut self, radians: f32);
    /// Shadow applied to subsequent strokes and fills; blur 0 disables it.
    fn set_shadow(&mut self, blur: f32, color: Color);
    fn stroke(&mut self, path: &Path, color: Color, width: f32);
    fn fill(&mut self, path: &Path, paint: &Paint);
    /// Intersect the current clip with `path`.
    fn clip(&mut self, path: &Path);
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Resize { width: u32, height: u32, scale: f32 },
    RenderHint(RenderHint),
    Clear,
    Save,
    Restore,
    Translate(f32, f32),
    Rotate(f32),
    Shadow { blur: f32, color: Color },
    Stroke { path: Path, color: Color, width: f32 },
    Fill { path: Path, paint: Paint },
    Clip(Path),
}

/// Canvas that records every call in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
    depth: usize,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain everything recorded so far.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Current save/restore nesting.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Canvas for RecordingCanvas {
    fn resize(&mut self, width: u32, height: u32, scale: f32) {
        self.commands.push(DrawCommand::Resize {
            width,
            height,
            scale,
        });
    }

    fn set_render_hint(&mut self, hint: RenderHint) {
        self.commands.push(DrawCommand::RenderHint(hint));
    }

    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn save(&mut self) {
        self.depth += 1;
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.commands.push(DrawCommand::Translate(dx, dy));
    }

    fn rotate(&mut self, radians: f32) {
        self.commands.push(DrawCommand::Rotate(radians));
    }

    fn set_shadow(&mut self, blur: f32, color: Color) {
        self.commands.push(DrawCommand::Shadow { blur, color });
    }

    fn stroke(&mut self, path: &Path, color: Color, width: f32) {
        self.commands.push(DrawCommand::Stroke {
            path: path.clone(),
            color,
            width,
        });
    }

    fn fill(&mut self, path: &Path, paint: &Paint) {
        self.commands.push(DrawCommand::Fill {
            path: path.clone(),
            paint: *paint,
        });
    }

    fn clip(&mut self, path: &Path) {
        self.commands.push(DrawCommand::Clip(path.clone()));
    }
}
