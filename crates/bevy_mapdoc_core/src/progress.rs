//! Load progress reporting.

/// Subscriber notified as a load crosses percentage thresholds.
///
/// Notifications are delivered synchronously on the loading thread.
pub trait PercentDoneListener: Send + Sync {
    fn on_percent_done(&mut self, percent: u32);
}

impl<F> PercentDoneListener for F
where
    F: FnMut(u32) + Send + Sync,
{
    fn on_percent_done(&mut self, percent: u32) {
        self(percent);
    }
}

/// Counts processed elements against an expected total.
///
/// Every time the completed percentage reaches the next multiple of the
/// interval, each listener is told that multiple. Thresholds are reported in
/// ascending order, at most once each, and never above 100.
pub struct ProgressTracker {
    total: u32,
    count: u32,
    interval: u32,
    next_threshold: u32,
    listeners: Vec<Box<dyn PercentDoneListener>>,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(10)
    }
}

impl std::fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("total", &self.total)
            .field("count", &self.count)
            .field("interval", &self.interval)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ProgressTracker {
    pub fn new(interval: u32) -> Self {
        let interval = interval.clamp(1, 100);
        Self {
            total: 0,
            count: 0,
            interval,
            next_threshold: interval,
            listeners: Vec::new(),
        }
    }

    /// Forget the previous load. Listeners and the interval are kept.
    pub fn reset(&mut self) {
        self.total = 0;
        self.count = 0;
        self.next_threshold = self.interval;
    }

    /// Expected number of elements. Zero disables notifications.
    pub fn set_total(&mut self, total: u32) {
        self.total = total;
    }

    /// Notification step in percent, clamped to `1..=100`.
    pub fn set_interval(&mut self, percent: u32) {
        self.interval = percent.clamp(1, 100);
        self.next_threshold = self.interval;
        while self.next_threshold <= self.percent_done() && self.next_threshold < 100 {
            self.next_threshold += self.interval;
        }
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn add_listener(&mut self, listener: impl PercentDoneListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Completed percentage, capped at 100. Zero when no total is known.
    pub fn percent_done(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let percent = u64::from(self.count) * 100 / u64::from(self.total);
        percent.min(100) as u32
    }

    /// Record one processed element.
    pub fn increment(&mut self) {
        self.count = self.count.saturating_add(1);
        if self.total == 0 {
            return;
        }

        let percent = self.percent_done();
        while self.next_threshold <= percent && self.next_threshold <= 100 {
            let threshold = self.next_threshold;
            for listener in &mut self.listeners {
                listener.on_percent_done(threshold);
            }
            self.next_threshold += self.interval;
        }
    }
}
