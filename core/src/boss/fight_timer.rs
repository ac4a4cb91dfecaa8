/// Pause-aware fight clock.
///
/// Elapsed fight time excludes paused intervals: resuming shifts the
/// recorded start forward by the paused duration. A head start (debug
/// offset) is added to every reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FightTimer {
    started_at: Option<u64>,
    head_start: u64,
    paused_at: Option<u64>,
}

impl FightTimer {
    /// Start the clock at `now_ms`. Returns false if it was already running.
    pub fn start(&mut self, now_ms: u64, head_start_ms: u64) -> bool {
        if self.started_at.is_some() {
            return false;
        }
        self.started_at = Some(now_ms);
        self.head_start = head_start_ms;
        self.paused_at = None;
        true
    }

    pub fn started_at(&self) -> Option<u64> {
        self.started_at
    }

    pub fn head_start(&self) -> u64 {
        self.head_start
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Fight time at `now_ms`, frozen while paused
    pub fn elapsed(&self, now_ms: u64) -> Option<u64> {
        let start = self.started_at?;
        let reference = self.paused_at.unwrap_or(now_ms);
        Some(reference.saturating_sub(start) + self.head_start)
    }

    pub fn pause(&mut self, now_ms: u64) {
        if self.started_at.is_some() && self.paused_at.is_none() {
            self.paused_at = Some(now_ms);
        }
    }

    /// Resume and return how long the clock was paused
    pub fn resume(&mut self, now_ms: u64) -> Option<u64> {
        let (start, paused_at) = (self.started_at?, self.paused_at.take()?);
        let paused_for = now_ms.saturating_sub(paused_at);
        self.started_at = Some(start + paused_for);
        Some(paused_for)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_excludes_pause() {
        let mut timer = FightTimer::default();
        assert_eq!(timer.elapsed(100), None);

        timer.start(1_000, 0);
        assert_eq!(timer.elapsed(3_000), Some(2_000));

        timer.pause(3_000);
        assert_eq!(timer.elapsed(10_000), Some(2_000));

        assert_eq!(timer.resume(10_000), Some(7_000));
        assert_eq!(timer.elapsed(11_000), Some(3_000));
    }

    #[test]
    fn head_start_is_added() {
        let mut timer = FightTimer::default();
        timer.start(0, 90_000);
        assert_eq!(timer.elapsed(500), Some(90_500));
    }

    #[test]
    fn second_start_is_ignored() {
        let mut timer = FightTimer::default();
        assert!(timer.start(10, 0));
        assert!(!timer.start(50, 0));
        assert_eq!(timer.started_at(), Some(10));
    }

    #[test]
    fn resume_without_pause_is_noop() {
        let mut timer = FightTimer::default();
        timer.start(0, 0);
        assert_eq!(timer.resume(500), None);
        assert_eq!(timer.elapsed(500), Some(500));
    }
}
