//! Frame scheduling and the scene lifecycle.
//!
//! The driver owns no timers. The host tells it what happened (a frame
//! fired, the tab was hidden, the canvas scrolled away) and the driver
//! decides whether to draw and whether to ask for another frame.

/// Whatever can schedule one display-frame callback.
pub trait FrameHost {
    fn request_frame(&mut self);
    /// Best-effort cancellation of the outstanding request.
    fn cancel_frame(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed, `start` not called yet.
    Uninitialized,
    Running,
    /// Started but hidden, off-screen or stopped.
    Paused,
    /// Reduced motion was requested; the scene never runs.
    Skipped,
}

/// Fraction of the canvas that must be on screen to keep animating.
pub const DEFAULT_VISIBILITY_THRESHOLD: f64 = 0.1;

#[derive(Debug)]
pub struct FrameDriver {
    state: Lifecycle,
    wanted: bool,
    document_visible: bool,
    on_screen: bool,
    threshold: f64,
    pending: bool,
    last_timestamp: Option<f64>,
    frames: u64,
}

impl FrameDriver {
    pub fn new(reduced_motion: bool) -> Self {
        Self {
            state: if reduced_motion {
                Lifecycle::Skipped
            } else {
                Lifecycle::Uninitialized
            },
            wanted: false,
            document_visible: true,
            on_screen: true,
            threshold: DEFAULT_VISIBILITY_THRESHOLD,
            pending: false,
            last_timestamp: None,
            frames: 0,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == Lifecycle::Running
    }

    /// Frames drawn so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn has_pending_request(&self) -> bool {
        self.pending
    }

    pub fn start<H: FrameHost + ?Sized>(&mut self, host: &mut H) {
        if self.state == Lifecycle::Skipped {
            return;
        }
        self.wanted = true;
        self.refresh(host);
    }

    /// Halts frame requests. Calling it again is a no-op.
    pub fn stop<H: FrameHost + ?Sized>(&mut self, host: &mut H) {
        if self.state == Lifecycle::Skipped || !self.wanted {
            return;
        }
        self.wanted = false;
        self.refresh(host);
    }

    pub fn set_document_visible<H: FrameHost + ?Sized>(&mut self, visible: bool, host: &mut H) {
        self.document_visible = visible;
        self.refresh(host);
    }

    /// Feeds an intersection ratio in `[0, 1]` from the viewport observer.
    pub fn set_intersection<H: FrameHost + ?Sized>(&mut self, ratio: f64, host: &mut H) {
        self.on_screen = ratio >= self.threshold;
        self.refresh(host);
    }

    /// Called when a requested frame fires. Returns whether the scene should
    /// be drawn for this timestamp; schedules the next frame if still running.
    pub fn on_frame<H: FrameHost + ?Sized>(&mut self, timestamp: f64, host: &mut H) -> bool {
        self.pending = false;
        if !self.is_running() {
            return false;
        }
        // Hosts may hand out equal stamps when frames are coalesced.
        if self.last_timestamp.is_some_and(|last| timestamp <= last) {
            self.request(host);
            return false;
        }
        self.last_timestamp = Some(timestamp);
        self.frames += 1;
        self.request(host);
        true
    }

    fn request<H: FrameHost + ?Sized>(&mut self, host: &mut H) {
        if !self.pending {
            self.pending = true;
            host.request_frame();
        }
    }

    fn refresh<H: FrameHost + ?Sized>(&mut self, host: &mut H) {
        if self.state == Lifecycle::Skipped {
            return;
        }
        let next = if self.wanted && self.document_visible && self.on_screen {
            Lifecycle::Running
        } else if self.wanted || self.state != Lifecycle::Uninitialized {
            Lifecycle::Paused
        } else {
            Lifecycle::Uninitialized
        };
        if next == self.state {
            return;
        }
        log::debug!("frame driver {:?} -> {:?}", self.state, next);
        self.state = next;
        if next == Lifecycle::Running {
            self.request(host);
        } else if self.pending {
            host.cancel_frame();
            self.pending = false;
        }
    }
}

/// Trailing-edge debounce: fires once `delay_ms` has passed since the last
/// `touch`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Debounce {
    delay_ms: f64,
    last: Option<f64>,
}

impl Debounce {
    pub const RESIZE_MS: f64 = 250.0;

    pub fn new(delay_ms: f64) -> Self {
        Self {
            delay_ms,
            last: None,
        }
    }

    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    /// Records an event; returns how long to wait before checking `due`.
    pub fn touch(&mut self, now_ms: f64) -> f64 {
        self.last = Some(now_ms);
        self.delay_ms
    }

    /// True once per burst, after the quiet period has elapsed.
    pub fn due(&mut self, now_ms: f64) -> bool {
        match self.last {
            Some(last) if now_ms - last >= self.delay_ms => {
                self.last = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.last.is_some()
    }
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(Self::RESIZE_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingHost {
        requested: usize,
        cancelled: usize,
    }

    impl FrameHost for CountingHost {
        fn request_frame(&mut self) {
            self.requested += 1;
        }

        fn cancel_frame(&mut self) {
            self.cancelled += 1;
        }
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut host = CountingHost::default();
        let mut d = FrameDriver::new(false);
        assert_eq!(d.state(), Lifecycle::Uninitialized);
        d.start(&mut host);
        d.start(&mut host);
        assert_eq!(host.requested, 1);
        assert!(d.is_running());

        d.stop(&mut host);
        d.stop(&mut host);
        assert_eq!(d.state(), Lifecycle::Paused);
        assert_eq!(host.cancelled, 1);
        assert!(!d.has_pending_request());
    }

    #[test]
    fn in_flight_frame_after_stop_does_not_reschedule() {
        let mut host = CountingHost::default();
        let mut d = FrameDriver::new(false);
        d.start(&mut host);
        assert!(d.on_frame(16.0, &mut host));
        d.stop(&mut host);
        assert!(!d.on_frame(32.0, &mut host));
        assert_eq!(host.requested, 2);
    }

    #[test]
    fn resume_needs_both_visibility_and_intersection() {
        let mut host = CountingHost::default();
        let mut d = FrameDriver::new(false);
        d.start(&mut host);
        d.set_intersection(0.05, &mut host);
        assert_eq!(d.state(), Lifecycle::Paused);
        d.set_document_visible(false, &mut host);
        d.set_intersection(0.5, &mut host);
        assert_eq!(d.state(), Lifecycle::Paused);
        d.set_document_visible(true, &mut host);
        assert!(d.is_running());
        assert_eq!(host.requested, 2);
    }

    #[test]
    fn stale_timestamps_are_skipped() {
        let mut host = CountingHost::default();
        let mut d = FrameDriver::new(false);
        d.start(&mut host);
        assert!(d.on_frame(100.0, &mut host));
        assert!(!d.on_frame(100.0, &mut host));
        assert!(d.on_frame(116.0, &mut host));
        assert_eq!(d.frames(), 2);
    }

    #[test]
    fn reduced_motion_is_terminal() {
        let mut host = CountingHost::default();
        let mut d = FrameDriver::new(true);
        d.start(&mut host);
        d.set_document_visible(true, &mut host);
        d.set_intersection(1.0, &mut host);
        assert!(!d.on_frame(16.0, &mut host));
        assert_eq!(d.state(), Lifecycle::Skipped);
        assert_eq!(host.requested, 0);
    }

    #[test]
    fn debounce_fires_once_after_quiet_period() {
        let mut b = Debounce::default();
        assert!(!b.due(0.0));
        b.touch(0.0);
        b.touch(100.0);
        b.touch(200.0);
        assert!(!b.due(400.0));
        assert!(b.due(450.0));
        assert!(!b.due(900.0));
    }
}
