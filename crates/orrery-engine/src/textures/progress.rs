/// Snapshot returned by each recorded completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub completed: u32,
    pub total: u32,
    /// Rounded percentage, capped at 100.
    pub percent: u32,
    /// True only on the call that made the tracker complete.
    pub became_ready: bool,
}

/// Counts resolved texture requests against the number expected at startup.
///
/// The count never decreases and never exceeds the total. The ready signal
/// fires exactly once.
#[derive(Debug, Clone)]
pub struct LoadProgress {
    total: u32,
    completed: u32,
    ready_fired: bool,
}

impl LoadProgress {
    pub fn new(total: u32) -> Self {
        Self {
            total,
            completed: 0,
            ready_fired: false,
        }
    }

    /// Count one resolved request. Calls beyond the total are ignored.
    pub fn record_completion(&mut self) -> ProgressUpdate {
        if self.completed >= self.total {
            log::warn!(
                "load progress: completion beyond expected total {} ignored",
                self.total
            );
            return self.snapshot(false);
        }
        self.completed += 1;
        let became_ready = self.fire_if_complete();
        self.snapshot(became_ready)
    }

    /// Returns true the first time the tracker is observed complete.
    /// A zero total is complete from the start.
    pub fn fire_if_complete(&mut self) -> bool {
        if self.ready_fired || !self.is_complete() {
            return false;
        }
        self.ready_fired = true;
        true
    }

    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        let pct = (self.completed as f64 / self.total as f64 * 100.0).round() as u32;
        pct.min(100)
    }

    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }

    pub fn is_ready(&self) -> bool {
        self.ready_fired
    }

    pub fn completed(&self) -> u32 {
        self.completed
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    fn snapshot(&self, became_ready: bool) -> ProgressUpdate {
        ProgressUpdate {
            completed: self.completed,
            total: self.total,
            percent: self.percent(),
            became_ready,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_fires_exactly_once_at_total() {
        let mut progress = LoadProgress::new(30);
        let mut fired = 0;
        for _ in 0..30 {
            if progress.record_completion().became_ready {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
        assert!(progress.is_ready());
        assert_eq!(progress.percent(), 100);
    }

    #[test]
    fn fewer_completions_never_fire() {
        let mut progress = LoadProgress::new(5);
        for _ in 0..4 {
            assert!(!progress.record_completion().became_ready);
        }
        assert!(!progress.is_ready());
        assert_eq!(progress.percent(), 80);
    }

    #[test]
    fn extra_completions_are_ignored() {
        let mut progress = LoadProgress::new(2);
        progress.record_completion();
        assert!(progress.record_completion().became_ready);
        let extra = progress.record_completion();
        assert!(!extra.became_ready);
        assert_eq!(extra.completed, 2);
        assert!(!progress.fire_if_complete());
    }

    #[test]
    fn percent_rounds() {
        let mut progress = LoadProgress::new(3);
        assert_eq!(progress.record_completion().percent, 33);
        assert_eq!(progress.record_completion().percent, 67);
    }

    #[test]
    fn zero_total_is_complete_immediately() {
        let mut progress = LoadProgress::new(0);
        assert_eq!(progress.percent(), 100);
        assert!(progress.fire_if_complete());
        assert!(!progress.fire_if_complete());
        assert!(!progress.record_completion().became_ready);
    }
}
