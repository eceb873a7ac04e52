/// `round(100 * attempted / total)`, rounding halves up. An empty batch is complete.
pub fn progress_percent(attempted: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let attempted = attempted.min(total) as u128;
    let total = total as u128;
    ((200 * attempted + total) / (2 * total)) as u8
}

/// Counts attempted items and yields the percentage to report after each one.
#[derive(Debug)]
pub struct ProgressTracker {
    total: usize,
    attempted: usize,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            attempted: 0,
        }
    }

    pub fn record_attempt(&mut self) -> u8 {
        self.attempted = (self.attempted + 1).min(self.total);
        progress_percent(self.attempted, self.total)
    }
}
