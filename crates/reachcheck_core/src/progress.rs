use std::fmt;

/// What the progress indicator should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressDisplay {
    /// No run, or a run with nothing to check.
    #[default]
    Idle,
    Percent(u8),
}

impl ProgressDisplay {
    pub fn percent(self) -> u8 {
        match self {
            ProgressDisplay::Idle => 0,
            ProgressDisplay::Percent(value) => value,
        }
    }
}

impl fmt::Display for ProgressDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressDisplay::Idle => write!(f, "idle"),
            ProgressDisplay::Percent(value) => write!(f, "{value}%"),
        }
    }
}

/// `round(100 * completed / total)` clamped to `0..=100`, or `None` when `total` is zero.
///
/// Halves round up, so 1 of 8 is 13%.
pub fn progress_percent(completed: usize, total: usize) -> Option<u8> {
    if total == 0 {
        return None;
    }
    let total = total as u128;
    let completed = (completed as u128).min(total);
    let rounded = (completed * 200 + total) / (total * 2);
    Some(rounded.min(100) as u8)
}

/// Turns `completed/total` pairs into display values.
///
/// The only state kept is the last rendered value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressReporter {
    last: ProgressDisplay,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_progress(&mut self, completed: usize, total: usize) -> ProgressDisplay {
        self.last = match progress_percent(completed, total) {
            Some(value) => ProgressDisplay::Percent(value),
            None => ProgressDisplay::Idle,
        };
        self.last
    }

    pub fn last(&self) -> ProgressDisplay {
        self.last
    }

    pub fn reset(&mut self) {
        self.last = ProgressDisplay::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::{progress_percent, ProgressDisplay, ProgressReporter};

    #[test]
    fn zero_total_is_idle_not_a_division() {
        assert_eq!(progress_percent(0, 0), None);
        assert_eq!(progress_percent(3, 0), None);
        let mut reporter = ProgressReporter::new();
        assert_eq!(reporter.on_progress(0, 0), ProgressDisplay::Idle);
        assert_eq!(reporter.last().percent(), 0);
    }

    #[test]
    fn rounds_to_nearest_percent() {
        assert_eq!(progress_percent(1, 3), Some(33));
        assert_eq!(progress_percent(2, 3), Some(67));
        assert_eq!(progress_percent(1, 8), Some(13));
        assert_eq!(progress_percent(1, 2), Some(50));
        assert_eq!(progress_percent(2, 2), Some(100));
    }

    #[test]
    fn completed_beyond_total_is_clamped() {
        assert_eq!(progress_percent(7, 5), Some(100));
        assert_eq!(progress_percent(usize::MAX, usize::MAX), Some(100));
    }

    #[test]
    fn reporter_keeps_last_value_until_reset() {
        let mut reporter = ProgressReporter::new();
        reporter.on_progress(1, 4);
        assert_eq!(reporter.last(), ProgressDisplay::Percent(25));
        // Repeating the same event is harmless.
        assert_eq!(reporter.on_progress(1, 4), ProgressDisplay::Percent(25));
        reporter.reset();
        assert_eq!(reporter.last(), ProgressDisplay::Idle);
        assert_eq!(reporter.last().to_string(), "idle");
        assert_eq!(ProgressDisplay::Percent(42).to_string(), "42%");
    }
}
