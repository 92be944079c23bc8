//! Time-based coalescing for layout-dependent recomputation.

/// Quiet period before a debounced layout pass runs.
pub const DEFAULT_QUIET_MS: u64 = 150;

/// Cancel-and-reschedule timer model. Every trigger pushes the deadline out
/// to `now + quiet`; the action fires once, after the quiet period elapses
/// with no further triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    quiet_ms: u64,
    deadline: Option<u64>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_MS)
    }
}

impl Debouncer {
    #[must_use]
    pub const fn new(quiet_ms: u64) -> Self {
        Self {
            quiet_ms,
            deadline: None,
        }
    }

    #[must_use]
    pub const fn quiet_ms(&self) -> u64 {
        self.quiet_ms
    }

    /// Record a trigger at `now_ms`. Returns `true` if a pending deadline was
    /// cancelled in favour of the new one.
    pub fn trigger(&mut self, now_ms: u64) -> bool {
        let replaced = self.deadline.is_some();
        self.deadline = Some(now_ms.saturating_add(self.quiet_ms));
        replaced
    }

    /// Returns `true` exactly once when the deadline has passed.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    #[must_use]
    pub const fn deadline(&self) -> Option<u64> {
        self.deadline
    }
}

/// Collapses many requests within one rendering frame into a single
/// measurement pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameGate {
    scheduled: bool,
}

impl FrameGate {
    /// Returns `true` if the caller should schedule a frame callback.
    pub fn request(&mut self) -> bool {
        if self.scheduled {
            false
        } else {
            self.scheduled = true;
            true
        }
    }

    /// Call from the frame callback once the pass has run.
    pub fn frame_done(&mut self) {
        self.scheduled = false;
    }

    #[must_use]
    pub const fn is_scheduled(&self) -> bool {
        self.scheduled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_triggers_push_deadline_out() {
        let mut d = Debouncer::new(100);
        assert!(!d.trigger(0));
        assert!(d.trigger(60));
        assert!(!d.poll(120));
        assert!(d.poll(160));
        assert!(!d.poll(500), "fires once");
    }

    #[test]
    fn cancel_drops_pending_work() {
        let mut d = Debouncer::default();
        d.trigger(10);
        d.cancel();
        assert!(!d.is_pending());
        assert!(!d.poll(10_000));
    }

    #[test]
    fn frame_gate_coalesces() {
        let mut gate = FrameGate::default();
        assert!(gate.request());
        assert!(!gate.request());
        gate.frame_done();
        assert!(gate.request());
    }
}
