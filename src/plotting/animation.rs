//! Finite reveal animation: curves grow from the left edge in a fixed number
//! of frames, one frame per timer tick, and the animation never loops.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RevealState {
    /// everything drawn
    Idle,
    /// `frame` of `frames` shown
    Running { frame: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevealAnimation {
    frames: usize,
    interval: Duration,
    state: RevealState,
}

impl RevealAnimation {
    pub fn new(frames: usize, interval: Duration) -> Self {
        Self {
            frames: frames.max(1),
            interval,
            state: RevealState::Idle,
        }
    }

    /// Restarts at frame 0, nothing revealed yet.
    pub fn start(&mut self) {
        self.state = RevealState::Running { frame: 0 };
    }

    pub fn stop(&mut self) {
        self.state = RevealState::Idle;
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, RevealState::Running { .. })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn frame(&self) -> Option<usize> {
        match self.state {
            RevealState::Running { frame } => Some(frame),
            RevealState::Idle => None,
        }
    }

    /// Advances one frame. Returns `true` while more ticks are wanted; the
    /// tick that shows the last frame returns `false` and ends the animation.
    pub fn tick(&mut self) -> bool {
        match self.state {
            RevealState::Idle => false,
            RevealState::Running { frame } => {
                let next = frame + 1;
                if next >= self.frames {
                    self.state = RevealState::Idle;
                    false
                } else {
                    self.state = RevealState::Running { frame: next };
                    true
                }
            }
        }
    }

    /// How many of `n` samples are drawn: `ceil(n * frame / frames)`.
    pub fn visible_len(&self, n: usize) -> usize {
        match self.state {
            RevealState::Idle => n,
            RevealState::Running { frame } => (n * frame).div_ceil(self.frames),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_run_is_finite() {
        let mut animation = RevealAnimation::new(20, Duration::from_millis(50));
        assert_eq!(animation.visible_len(400), 400);
        animation.start();
        assert_eq!(animation.visible_len(400), 0);

        let mut ticks = 0;
        let mut lengths = Vec::new();
        while animation.tick() {
            ticks += 1;
            lengths.push(animation.visible_len(400));
        }
        // 19 continuing ticks, then the final one that returns false
        assert_eq!(ticks, 19);
        assert_eq!(lengths[0], 20);
        assert_eq!(lengths[18], 380);
        assert!(lengths.windows(2).all(|w| w[1] > w[0]));
        assert!(!animation.is_running());
        assert_eq!(animation.visible_len(400), 400);

        // never loops
        assert!(!animation.tick());
        assert_eq!(animation.visible_len(400), 400);
    }

    #[test]
    fn test_prefix_rounds_up() {
        let mut animation = RevealAnimation::new(20, Duration::from_millis(50));
        animation.start();
        animation.tick();
        assert_eq!(animation.frame(), Some(1));
        // ceil(7 * 1 / 20) = 1
        assert_eq!(animation.visible_len(7), 1);
    }

    #[test]
    fn test_restart_and_stop() {
        let mut animation = RevealAnimation::new(3, Duration::from_millis(10));
        animation.start();
        animation.tick();
        animation.start();
        assert_eq!(animation.frame(), Some(0));
        animation.stop();
        assert!(!animation.is_running());
        assert_eq!(animation.interval(), Duration::from_millis(10));
    }
}
