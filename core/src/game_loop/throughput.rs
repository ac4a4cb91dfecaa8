use std::time::Duration;

use tokio::sync::watch;

/// Updates and frames completed during the last measurement window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Throughput {
    pub updates: u32,
    pub frames: u32,
}

/// Counts work per window and publishes each completed window.
#[derive(Debug)]
pub struct ThroughputCounter {
    window: Duration,
    window_start: Duration,
    updates: u32,
    frames: u32,
    tx: watch::Sender<Throughput>,
}

impl ThroughputCounter {
    pub fn new(window: Duration, now: Duration) -> Self {
        let (tx, _) = watch::channel(Throughput::default());
        Self {
            window,
            window_start: now,
            updates: 0,
            frames: 0,
            tx,
        }
    }

    pub fn record_update(&mut self) {
        self.updates += 1;
    }

    pub fn record_frame(&mut self) {
        self.frames += 1;
    }

    /// Close the window if it has run its length.
    ///
    /// Window boundaries stay on a fixed grid from the first window's start,
    /// so a late call does not push the following windows back. Windows that
    /// passed entirely without a call are skipped.
    pub fn roll(&mut self, now: Duration) -> Option<Throughput> {
        if now.saturating_sub(self.window_start) < self.window {
            return None;
        }
        let snapshot = Throughput {
            updates: std::mem::take(&mut self.updates),
            frames: std::mem::take(&mut self.frames),
        };
        self.window_start += self.window;
        while now.saturating_sub(self.window_start) >= self.window {
            self.window_start += self.window;
        }
        self.tx.send_replace(snapshot);
        Some(snapshot)
    }

    pub fn subscribe(&self) -> watch::Receiver<Throughput> {
        self.tx.subscribe()
    }

    pub fn last(&self) -> Throughput {
        *self.tx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_publishes_and_resets() {
        let mut counter = ThroughputCounter::new(Duration::from_secs(1), Duration::ZERO);
        let rx = counter.subscribe();
        for _ in 0..5 {
            counter.record_update();
        }
        counter.record_frame();

        assert_eq!(counter.roll(Duration::from_millis(999)), None);
        let snapshot = counter.roll(Duration::from_millis(1000)).unwrap();

        assert_eq!(snapshot, Throughput { updates: 5, frames: 1 });
        assert_eq!(*rx.borrow(), snapshot);
        assert_eq!(counter.roll(Duration::from_millis(1500)), None);
    }

    #[test]
    fn late_roll_keeps_window_grid() {
        let mut counter = ThroughputCounter::new(Duration::from_secs(1), Duration::ZERO);
        counter.record_update();

        // First window closes 30 ms late; the next one still ends at 2000 ms
        assert!(counter.roll(Duration::from_millis(1030)).is_some());
        counter.record_update();
        assert_eq!(counter.roll(Duration::from_millis(1999)), None);
        assert_eq!(
            counter.roll(Duration::from_millis(2000)),
            Some(Throughput { updates: 1, frames: 0 })
        );
    }

    #[test]
    fn skipped_windows_are_caught_up() {
        let mut counter = ThroughputCounter::new(Duration::from_secs(1), Duration::ZERO);
        counter.record_frame();

        assert!(counter.roll(Duration::from_millis(3500)).is_some());
        // Grid resumes at 3000 ms, so the next window closes at 4000 ms
        assert_eq!(counter.roll(Duration::from_millis(3999)), None);
        assert!(counter.roll(Duration::from_millis(4000)).is_some());
    }
}
