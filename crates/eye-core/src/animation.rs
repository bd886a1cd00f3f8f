use std::f64::consts::TAU;

use crate::config::Tuning;
use crate::geometry::EyeGeometry;
use crate::interaction::PointerState;

/// Which of the mutually exclusive lid behaviours drove the last frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LidRegime {
    /// Nobody has touched the page yet: lids pinned shut.
    NotInteracted,
    /// No input for the idle threshold: lids drift closed, blink timer frozen.
    Idle,
    /// Counting down to the next blink, lids easing open.
    ActiveOpen,
    /// Mid-blink: lids closing fast until the overshoot snaps them to 1.
    ActiveBlinking,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LidState {
    /// 0 = open, 1 = closed. Briefly exceeds 1 mid-blink.
    pub blink: f32,
    /// 0 = relaxed, 1 = squinted.
    pub squint: f32,
    pub regime: LidRegime,
    /// Frames until the next blink fires.
    pub countdown: f32,
}

/// Per-frame inputs gathered by the controller.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput {
    pub pointer: PointerState,
    pub interacted: bool,
    pub idle: bool,
}

/// Snapshot handed to the surface. Painting never mutates animation state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EyeFrame {
    pub geometry: EyeGeometry,
    pub pupil: [f32; 2],
    pub iris: [f32; 2],
    pub blink: f32,
    pub squint: f32,
    /// Iris rotation reduced into `0..TAU`.
    pub iris_rotation: f32,
}

impl EyeFrame {
    pub fn openness(&self) -> f32 {
        openness(self.blink, self.squint)
    }
}

/// `clamp(1 - blink - 0.4 * squint, 0, 1)`.
pub fn openness(blink: f32, squint: f32) -> f32 {
    let open = 1.0 - blink - squint * 0.4;
    if open.is_nan() {
        0.0
    } else {
        open.clamp(0.0, 1.0)
    }
}

fn lerp(start: f32, end: f32, amt: f32) -> f32 {
    start + (end - start) * amt
}

/// Smoothed gaze, lid state machine and iris spin.
pub struct EyeAnimation {
    tuning: Tuning,
    rng: fastrand::Rng,
    pupil: [f32; 2],
    iris: [f32; 2],
    lid: LidState,
    squint_request: f32,
    iris_rotation: f64,
}

impl EyeAnimation {
    pub fn new(tuning: &Tuning) -> Self {
        let rng = tuning
            .blink_seed
            .map(fastrand::Rng::with_seed)
            .unwrap_or_else(fastrand::Rng::new);
        Self::with_rng(tuning, rng)
    }

    pub fn with_rng(tuning: &Tuning, mut rng: fastrand::Rng) -> Self {
        let countdown = sample(&mut rng, tuning.first_blink_frames);
        Self {
            tuning: tuning.clone(),
            rng,
            pupil: [0.0; 2],
            iris: [0.0; 2],
            lid: LidState {
                blink: 1.0,
                squint: 0.0,
                regime: LidRegime::NotInteracted,
                countdown,
            },
            squint_request: 0.0,
            iris_rotation: 0.0,
        }
    }

    /// Advance one rendered frame.
    pub fn update(&mut self, input: &FrameInput, geometry: &EyeGeometry) {
        self.step_gaze(input, geometry);
        self.step_lids(input);
        self.step_squint(input);

        let v = input.pointer.velocity;
        let spin = self.tuning.rotation_drift + (v[0] + v[1]).abs() * self.tuning.rotation_gain;
        if spin.is_finite() {
            self.iris_rotation += f64::from(spin);
        }
    }

    fn step_gaze(&mut self, input: &FrameInput, geometry: &EyeGeometry) {
        let target = geometry.gaze_target(input.pointer.position, self.lid.blink);
        let rate = self.tuning.gaze_smoothing;
        let lag = self.tuning.iris_lag;
        for axis in 0..2 {
            self.pupil[axis] = lerp(self.pupil[axis], target[axis], rate);
            self.iris[axis] = lerp(self.iris[axis], target[axis] * lag, rate * lag);
        }
    }

    fn step_lids(&mut self, input: &FrameInput) {
        let t = &self.tuning;
        let lid = &mut self.lid;

        lid.regime = if !input.interacted {
            LidRegime::NotInteracted
        } else if input.idle {
            LidRegime::Idle
        } else if lid.regime == LidRegime::ActiveBlinking {
            LidRegime::ActiveBlinking
        } else {
            lid.countdown -= 1.0;
            if lid.countdown <= 0.0 {
                LidRegime::ActiveBlinking
            } else {
                LidRegime::ActiveOpen
            }
        };

        match lid.regime {
            LidRegime::NotInteracted => lid.blink = 1.0,
            LidRegime::Idle => {
                lid.blink = lerp(lid.blink, 1.0, t.idle_close_rate);
                self.squint_request = 0.0;
            }
            LidRegime::ActiveBlinking => {
                lid.blink += t.blink_speed;
                if lid.blink >= t.blink_overshoot {
                    lid.blink = 1.0;
                    lid.regime = LidRegime::ActiveOpen;
                    lid.countdown = sample(&mut self.rng, t.blink_interval_frames);
                }
            }
            LidRegime::ActiveOpen => lid.blink = lerp(lid.blink, 0.0, t.open_rate),
        }
    }

    fn step_squint(&mut self, input: &FrameInput) {
        let t = &self.tuning;
        let desired = if input.idle {
            0.0
        } else {
            let from_velocity =
                (input.pointer.speed() * t.velocity_squint_gain).min(t.velocity_squint_cap);
            self.squint_request.max(from_velocity)
        };
        if desired.is_finite() {
            self.lid.squint = lerp(self.lid.squint, desired, t.squint_rate);
        }
    }

    /// Hover squint request. Nothing raises it today; pointer moves and
    /// idling clear it.
    pub fn request_squint(&mut self, amount: f32) {
        if amount.is_finite() {
            self.squint_request = amount.clamp(0.0, 1.0);
        }
    }

    pub fn clear_squint_request(&mut self) {
        self.squint_request = 0.0;
    }

    pub fn squint_request(&self) -> f32 {
        self.squint_request
    }

    pub fn lid(&self) -> &LidState {
        &self.lid
    }

    pub fn pupil(&self) -> [f32; 2] {
        self.pupil
    }

    pub fn iris(&self) -> [f32; 2] {
        self.iris
    }

    /// Accumulated spin in radians; never reset.
    pub fn iris_rotation(&self) -> f64 {
        self.iris_rotation
    }

    pub fn frame(&self, geometry: &EyeGeometry) -> EyeFrame {
        EyeFrame {
            geometry: *geometry,
            pupil: self.pupil,
            iris: self.iris,
            blink: self.lid.blink,
            squint: self.lid.squint,
            iris_rotation: self.iris_rotation.rem_euclid(TAU) as f32,
        }
    }
}

/// Uniform in `[lo, hi)`.
fn sample(rng: &mut fastrand::Rng, [lo, hi]: [f32; 2]) -> f32 {
    lo + rng.f32() * (hi - lo)
}
