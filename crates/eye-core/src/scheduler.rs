use crate::config::Tuning;
use crate::painter::Detail;

/// Host capability: call the controller's `on_frame` once more, at the
/// next display refresh.
pub trait FrameRequester {
    fn request_frame(&mut self);
}

impl<F: FnMut()> FrameRequester for F {
    fn request_frame(&mut self) {
        self()
    }
}

/// What a frame callback should do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameDecision {
    /// Host still settling after `start()`; not counted.
    Settling,
    /// Surface hidden; counted, no work.
    Hidden,
    /// Odd-one-out frame during warm-up; counted, no work.
    Throttled,
    Render(Detail),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    pub decision: FrameDecision,
    /// Set on the single tick where warm-up ends.
    pub warmed_up_now: bool,
}

/// Frame counting and warm-up gating.
#[derive(Clone, Debug)]
pub struct FrameScheduler {
    warmup_frames: u64,
    settle_frames: u32,
    settle_remaining: u32,
    frame_count: u64,
    warmed_up: bool,
}

impl FrameScheduler {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            warmup_frames: tuning.warmup_frames,
            settle_frames: tuning.settle_frames,
            settle_remaining: tuning.settle_frames,
            frame_count: 0,
            warmed_up: false,
        }
    }

    /// Re-arm the settle delay. Frame count and warm-up survive restarts.
    pub fn restart(&mut self) {
        self.settle_remaining = self.settle_frames;
    }

    pub fn tick(&mut self, visible: bool) -> Tick {
        if self.settle_remaining > 0 {
            self.settle_remaining -= 1;
            return Tick {
                decision: FrameDecision::Settling,
                warmed_up_now: false,
            };
        }

        self.frame_count += 1;
        let warmed_up_now = !self.warmed_up && self.frame_count > self.warmup_frames;
        if warmed_up_now {
            self.warmed_up = true;
        }

        let decision = if !visible {
            FrameDecision::Hidden
        } else if !self.warmed_up && self.frame_count % 2 == 0 {
            FrameDecision::Throttled
        } else if self.warmed_up {
            FrameDecision::Render(Detail::FULL)
        } else {
            FrameDecision::Render(Detail::REDUCED)
        };

        Tick {
            decision,
            warmed_up_now,
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn is_warmed_up(&self) -> bool {
        self.warmed_up
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> FrameScheduler {
        FrameScheduler::new(&Tuning {
            settle_frames: 0,
            ..Tuning::default()
        })
    }

    #[test]
    fn warmup_renders_odd_frames_without_spokes() {
        let mut s = scheduler();
        for frame in 1..=60u64 {
            let tick = s.tick(true);
            let want = if frame % 2 == 0 {
                FrameDecision::Throttled
            } else {
                FrameDecision::Render(Detail::REDUCED)
            };
            assert_eq!(tick.decision, want, "frame {frame}");
            assert!(!tick.warmed_up_now);
        }

        let tick = s.tick(true);
        assert!(tick.warmed_up_now);
        assert_eq!(tick.decision, FrameDecision::Render(Detail::FULL));

        for _ in 62..=200 {
            let tick = s.tick(true);
            assert_eq!(tick.decision, FrameDecision::Render(Detail::FULL));
            assert!(!tick.warmed_up_now);
        }
        assert!(s.is_warmed_up());
    }

    #[test]
    fn hidden_frames_still_count() {
        let mut s = scheduler();
        for _ in 0..61 {
            assert_eq!(s.tick(false).decision, FrameDecision::Hidden);
        }
        assert_eq!(s.frame_count(), 61);
        assert!(s.is_warmed_up());
        assert_eq!(s.tick(true).decision, FrameDecision::Render(Detail::FULL));
    }

    #[test]
    fn settle_frames_are_not_counted() {
        let mut s = FrameScheduler::new(&Tuning::default());
        assert_eq!(s.tick(true).decision, FrameDecision::Settling);
        assert_eq!(s.tick(true).decision, FrameDecision::Settling);
        assert_eq!(s.frame_count(), 0);
        assert_eq!(s.tick(true).decision, FrameDecision::Render(Detail::REDUCED));

        s.restart();
        assert_eq!(s.tick(true).decision, FrameDecision::Settling);
        assert_eq!(s.frame_count(), 1);
    }

    #[test]
    fn closures_request_frames() {
        let mut count = 0;
        {
            let mut requester = || count += 1;
            requester.request_frame();
            requester.request_frame();
        }
        assert_eq!(count, 2);
    }
}
