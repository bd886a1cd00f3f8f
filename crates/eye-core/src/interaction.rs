use std::time::{Duration, Instant};

/// Raw host input the eye reacts to.
///
/// Coordinates are logical pixels relative to the viewport origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InteractionEvent {
    PointerMove { x: f32, y: f32 },
    PointerDown,
    KeyDown,
    TouchStart,
    Scroll,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    pub position: [f32; 2],
    pub last: [f32; 2],
    /// Delta between the two most recent moves. Not decayed per frame.
    pub velocity: [f32; 2],
}

impl PointerState {
    fn moved_to(&mut self, x: f32, y: f32) {
        self.position = [x, y];
        self.velocity = [x - self.last[0], y - self.last[1]];
        self.last = self.position;
    }

    /// `|vx| + |vy|`.
    pub fn speed(&self) -> f32 {
        self.velocity[0].abs() + self.velocity[1].abs()
    }
}

/// Remembers when the user last did anything and where the pointer is.
///
/// Handlers only write cached values; nothing here reads geometry or the
/// surface.
#[derive(Clone, Debug)]
pub struct InteractionTracker {
    pointer: PointerState,
    last_interaction: Instant,
    interacted: bool,
    idle_threshold: Duration,
}

impl InteractionTracker {
    pub fn new(now: Instant, idle_threshold: Duration) -> Self {
        Self {
            pointer: PointerState::default(),
            last_interaction: now,
            interacted: false,
            idle_threshold,
        }
    }

    pub fn record(&mut self, event: InteractionEvent, now: Instant) {
        self.last_interaction = now;
        if !self.interacted {
            log::debug!("first interaction ({event:?}), opening eye");
        }
        self.interacted = true;

        if let InteractionEvent::PointerMove { x, y } = event {
            if x.is_finite() && y.is_finite() {
                self.pointer.moved_to(x, y);
            }
        }
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// One-way latch: true after the first event, forever.
    pub fn interacted(&self) -> bool {
        self.interacted
    }

    pub fn is_idle(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_interaction) >= self.idle_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDLE: Duration = Duration::from_millis(5000);

    #[test]
    fn any_event_latches_interaction() {
        let t0 = Instant::now();
        for event in [
            InteractionEvent::PointerDown,
            InteractionEvent::KeyDown,
            InteractionEvent::TouchStart,
            InteractionEvent::Scroll,
            InteractionEvent::PointerMove { x: 1.0, y: 1.0 },
        ] {
            let mut tracker = InteractionTracker::new(t0, IDLE);
            assert!(!tracker.interacted());
            tracker.record(event, t0);
            assert!(tracker.interacted());
        }
    }

    #[test]
    fn velocity_is_delta_between_moves() {
        let t0 = Instant::now();
        let mut tracker = InteractionTracker::new(t0, IDLE);
        tracker.record(InteractionEvent::PointerMove { x: 10.0, y: 20.0 }, t0);
        tracker.record(InteractionEvent::PointerMove { x: 13.0, y: 16.0 }, t0);

        let p = tracker.pointer();
        assert_eq!(p.position, [13.0, 16.0]);
        assert_eq!(p.velocity, [3.0, -4.0]);
        assert_eq!(p.speed(), 7.0);

        // Non-move events keep the last velocity.
        tracker.record(InteractionEvent::KeyDown, t0);
        assert_eq!(tracker.pointer().velocity, [3.0, -4.0]);
    }

    #[test]
    fn idle_after_threshold_and_reset_by_events() {
        let t0 = Instant::now();
        let mut tracker = InteractionTracker::new(t0, IDLE);
        tracker.record(InteractionEvent::Scroll, t0);

        assert!(!tracker.is_idle(t0 + Duration::from_millis(4999)));
        assert!(tracker.is_idle(t0 + IDLE));

        let t1 = t0 + Duration::from_secs(6);
        tracker.record(InteractionEvent::KeyDown, t1);
        assert!(!tracker.is_idle(t1 + Duration::from_millis(10)));
        assert!(tracker.interacted());
    }
}
