use std::time::Duration;

use crate::animation::{EyeAnimation, FrameInput};
use crate::canvas::RenderHint;
use crate::clock::Clock;
use crate::config::Tuning;
use crate::geometry::{EyeGeometry, Viewport};
use crate::interaction::{InteractionEvent, InteractionTracker};
use crate::painter::EyeSurface;
use crate::scheduler::{FrameDecision, FrameRequester, FrameScheduler};
use crate::theme::{ThemePalette, ThemeSource};

/// Owns the eye: input state, animation, palette and the frame loop.
///
/// Built without a surface the controller is inert and every method is a
/// no-op.
pub struct EyeController<S, R, C> {
    inner: Option<Live<S, R, C>>,
}

struct Live<S, R, C> {
    surface: S,
    requester: R,
    clock: C,
    viewport: Viewport,
    geometry: EyeGeometry,
    tracker: InteractionTracker,
    animation: EyeAnimation,
    palette: ThemePalette,
    scheduler: FrameScheduler,
    tuning: Tuning,
    visible: bool,
    running: bool,
}

impl<S: EyeSurface, R: FrameRequester, C: Clock> EyeController<S, R, C> {
    pub fn new(
        surface: Option<S>,
        requester: R,
        clock: C,
        viewport: Viewport,
        theme: &dyn ThemeSource,
        tuning: Tuning,
    ) -> Self {
        let Some(mut surface) = surface else {
            log::debug!("no eye surface available, controller is inert");
            return Self { inner: None };
        };

        let now = clock.now();
        let geometry = EyeGeometry::from_viewport(&viewport, &tuning);
        surface.resize(&viewport);
        surface.set_render_hint(RenderHint::Animated);

        let live = Live {
            surface,
            requester,
            viewport,
            geometry,
            tracker: InteractionTracker::new(
                now,
                Duration::from_millis(tuning.idle_threshold_ms),
            ),
            animation: EyeAnimation::new(&tuning),
            palette: ThemePalette::resolve(theme),
            scheduler: FrameScheduler::new(&tuning),
            clock,
            tuning,
            visible: true,
            running: false,
        };
        log::debug!(
            "eye controller ready: {}x{} eye in {}x{} viewport",
            geometry.eye_width,
            geometry.eye_height,
            viewport.width,
            viewport.height
        );
        Self { inner: Some(live) }
    }

    pub fn is_inert(&self) -> bool {
        self.inner.is_none()
    }

    /// Record pointer, key, touch or scroll input. Never touches geometry.
    pub fn handle_event(&mut self, event: InteractionEvent) {
        let Some(live) = &mut self.inner else { return };
        let now = live.clock.now();
        live.tracker.record(event, now);
        if matches!(event, InteractionEvent::PointerMove { .. }) {
            live.animation.clear_squint_request();
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        let Some(live) = &mut self.inner else { return };
        live.viewport = viewport;
        live.geometry = EyeGeometry::from_viewport(&viewport, &live.tuning);
        live.surface.resize(&viewport);
        log::debug!(
            "resized to {}x{}@{}: eye {}x{}",
            viewport.width,
            viewport.height,
            viewport.device_pixel_ratio,
            live.geometry.eye_width,
            live.geometry.eye_height
        );
    }

    /// Re-read theme colours after the host switched theme.
    pub fn refresh_theme(&mut self, theme: &dyn ThemeSource) {
        let Some(live) = &mut self.inner else { return };
        live.palette = ThemePalette::resolve(theme);
        log::debug!("eye palette refreshed for {:?} theme", theme.mode());
    }

    /// Hidden surfaces keep the loop alive but skip update and paint.
    pub fn set_visible(&mut self, visible: bool) {
        if let Some(live) = &mut self.inner {
            live.visible = visible;
        }
    }

    /// Hover squint hook; nothing in the default interaction model calls it.
    pub fn request_squint(&mut self, amount: f32) {
        if let Some(live) = &mut self.inner {
            live.animation.request_squint(amount);
        }
    }

    /// Begin the frame loop. Calling it while running does nothing.
    pub fn start(&mut self) {
        let Some(live) = &mut self.inner else { return };
        if live.running {
            return;
        }
        live.running = true;
        live.scheduler.restart();
        live.requester.request_frame();
        log::debug!("eye animation started");
    }

    /// End the frame loop. A callback already in flight returns without
    /// rescheduling.
    pub fn stop(&mut self) {
        let Some(live) = &mut self.inner else { return };
        if live.running {
            live.running = false;
            log::debug!("eye animation stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.as_ref().is_some_and(|l| l.running)
    }

    /// Per-frame callback from the host.
    pub fn on_frame(&mut self) {
        let Some(live) = &mut self.inner else { return };
        if !live.running {
            return;
        }

        let tick = live.scheduler.tick(live.visible);
        if tick.warmed_up_now {
            live.surface.set_render_hint(RenderHint::Auto);
            log::debug!(
                "eye warm-up finished after {} frames",
                live.scheduler.frame_count()
            );
        }

        if let FrameDecision::Render(detail) = tick.decision {
            live.update();
            let frame = live.animation.frame(&live.geometry);
            live.surface.present(&frame, &live.palette, detail);
        }

        live.requester.request_frame();
    }

    pub fn surface(&self) -> Option<&S> {
        self.inner.as_ref().map(|l| &l.surface)
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.inner.as_mut().map(|l| &mut l.surface)
    }

    pub fn animation(&self) -> Option<&EyeAnimation> {
        self.inner.as_ref().map(|l| &l.animation)
    }

    pub fn geometry(&self) -> Option<&EyeGeometry> {
        self.inner.as_ref().map(|l| &l.geometry)
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.inner.as_ref().map(|l| &l.viewport)
    }

    pub fn palette(&self) -> Option<&ThemePalette> {
        self.inner.as_ref().map(|l| &l.palette)
    }

    pub fn palette_mut(&mut self) -> Option<&mut ThemePalette> {
        self.inner.as_mut().map(|l| &mut l.palette)
    }

    pub fn scheduler(&self) -> Option<&FrameScheduler> {
        self.inner.as_ref().map(|l| &l.scheduler)
    }

    pub fn tracker(&self) -> Option<&InteractionTracker> {
        self.inner.as_ref().map(|l| &l.tracker)
    }

    pub fn is_idle(&self) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|l| l.tracker.is_idle(l.clock.now()))
    }
}

impl<S, R, C: Clock> Live<S, R, C> {
    fn update(&mut self) {
        let now = self.clock.now();
        let input = FrameInput {
            pointer: *self.tracker.pointer(),
            interacted: self.tracker.interacted(),
            idle: self.tracker.is_idle(now),
        };
        self.animation.update(&input, &self.geometry);
    }
}
