use crate::config::Tuning;

/// Host viewport in logical (CSS) pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub device_pixel_ratio: f32,
}

impl Viewport {
    /// Non-finite or negative sizes collapse to zero; a missing or bogus
    /// pixel ratio becomes 1.
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            width: sanitize(width),
            height: sanitize(height),
            device_pixel_ratio: if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
                device_pixel_ratio
            } else {
                1.0
            },
        }
    }

    pub fn center(&self) -> [f32; 2] {
        [self.width / 2.0, self.height / 2.0]
    }

    /// Backing-store size in physical pixels.
    pub fn surface_size(&self) -> (u32, u32) {
        (
            (self.width * self.device_pixel_ratio).round() as u32,
            (self.height * self.device_pixel_ratio).round() as u32,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

fn sanitize(v: f32) -> f32 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

/// Cached eye dimensions, recomputed on every resize.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EyeGeometry {
    pub center: [f32; 2],
    pub eye_width: f32,
    pub eye_height: f32,
    pub iris_radius: f32,
    pub pupil_radius: f32,
    gaze_limit: [f32; 2],
}

impl EyeGeometry {
    pub fn from_viewport(viewport: &Viewport, tuning: &Tuning) -> Self {
        let eye_width = (viewport.width * tuning.width_fraction).min(tuning.max_eye_width);
        let eye_height = eye_width * tuning.height_ratio;
        let iris_radius = eye_height * tuning.iris_ratio;
        Self {
            center: viewport.center(),
            eye_width,
            eye_height,
            iris_radius,
            pupil_radius: iris_radius * tuning.pupil_ratio,
            gaze_limit: [tuning.gaze_limit_x, tuning.gaze_limit_y],
        }
    }

    /// Pointer offset from the eye center, held inside the almond.
    ///
    /// The vertical bound shrinks as the lid closes; `blink` beyond the
    /// `0..=1` range (mid-blink overshoot) is treated as fully closed.
    pub fn gaze_target(&self, pointer: [f32; 2], blink: f32) -> [f32; 2] {
        // Bounds must stay non-negative (and non-NaN) for `clamp`.
        let max_x = (self.eye_width * self.gaze_limit[0]).max(0.0);
        let lid = if blink.is_nan() {
            0.0
        } else {
            (1.0 - blink).clamp(0.0, 1.0)
        };
        let max_y = (self.eye_height * self.gaze_limit[1] * lid).max(0.0);
        let dx = finite_or_zero(pointer[0] - self.center[0]);
        let dy = finite_or_zero(pointer[1] - self.center[1]);
        [dx.clamp(-max_x, max_x), dy.clamp(-max_y, max_y)]
    }
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}
