//! Key-repeat and idle timing
//!
//! All timers work on a caller-supplied clock in seconds so the session can
//! be driven deterministically by tests and by headless tools.

/// Key-repeat deadline for a held action.
///
/// Pressing fires immediately and arms the timer `delay` seconds out.
/// While held, each poll past the deadline fires once and re-arms the
/// timer `interval` seconds after the poll time. Releasing disarms it.
#[derive(Debug, Clone, Copy)]
pub struct RepeatTimer {
    deadline: Option<f32>,
    delay: f32,
    interval: f32,
}

impl RepeatTimer {
    /// Initial repeat delay in seconds
    pub const DEFAULT_DELAY: f32 = 0.3;
    /// Steady-state repeat interval in seconds
    pub const DEFAULT_INTERVAL: f32 = 0.1;

    pub fn new(delay: f32, interval: f32) -> Self {
        Self { deadline: None, delay, interval }
    }

    /// Arm on press. The caller performs the immediate action itself.
    pub fn arm(&mut self, now: f32) {
        self.deadline = Some(now + self.delay);
    }

    /// Disarm on release
    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true when a repeat should fire at `now`.
    pub fn poll(&mut self, now: f32) -> bool {
        match self.deadline {
            Some(deadline) if now > deadline => {
                self.deadline = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}

impl Default for RepeatTimer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY, Self::DEFAULT_INTERVAL)
    }
}

/// Fires once after a period without activity.
#[derive(Debug, Clone, Copy)]
pub struct IdleTimer {
    last_activity: Option<f32>,
    threshold: f32,
}

impl IdleTimer {
    pub fn new(threshold: f32) -> Self {
        Self { last_activity: None, threshold }
    }

    /// Record user activity at `now`
    pub fn touch(&mut self, now: f32) {
        self.last_activity = Some(now);
    }

    /// Returns true exactly once per idle period.
    pub fn poll(&mut self, now: f32) -> bool {
        match self.last_activity {
            Some(last) if now - last > self.threshold => {
                self.last_activity = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeat_not_armed_never_fires() {
        let mut timer = RepeatTimer::default();
        assert!(!timer.poll(10.0));
    }

    #[test]
    fn test_repeat_delay_then_interval() {
        let mut timer = RepeatTimer::default();
        timer.arm(0.0);
        assert!(!timer.poll(0.2));
        assert!(!timer.poll(0.3));
        assert!(timer.poll(0.31));
        assert!(!timer.poll(0.35));
        assert!(timer.poll(0.42));
        timer.disarm();
        assert!(!timer.is_armed());
        assert!(!timer.poll(5.0));
    }

    #[test]
    fn test_idle_fires_once() {
        let mut idle = IdleTimer::new(180.0);
        assert!(!idle.poll(1000.0));
        idle.touch(0.0);
        assert!(!idle.poll(100.0));
        assert!(idle.poll(181.0));
        assert!(!idle.poll(400.0));
        idle.touch(400.0);
        assert!(idle.poll(600.0));
    }
}
