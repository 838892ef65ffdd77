//! Overall progress across savings goals.

use crate::models::SavingsGoal;

/// Aggregate progress of a set of savings goals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavingsProgress {
    /// Sum of all targets.
    pub total_target: f64,
    /// Sum of all saved amounts.
    pub total_saved: f64,
    /// `total_target - total_saved`; negative once exceeded.
    pub total_remaining: f64,
    /// Progress in percent, clamped to `[0, 100]`.
    pub progress_percent: f64,
    /// Progress in percent, unclamped.
    pub raw_progress_percent: f64,
    /// Number of goals.
    pub total_goals: usize,
    /// Number of goals that reached their target.
    pub completed: usize,
}

impl SavingsProgress {
    /// Whether more was saved than targeted overall.
    #[inline]
    #[must_use]
    pub const fn is_exceeded(&self) -> bool {
        self.raw_progress_percent > 100.0
    }
}

/// Sums targets and saved amounts across goals.
///
/// Progress is `total_saved / total_target`, or 0 when the total target is
/// not positive.
#[must_use]
pub fn savings_progress(goals: &[SavingsGoal]) -> SavingsProgress {
    let total_target: f64 = goals.iter().map(|goal| goal.target).sum();
    let total_saved: f64 = goals.iter().map(|goal| goal.saved).sum();
    let raw_progress_percent = if total_target > 0.0 {
        total_saved / total_target * 100.0
    } else {
        0.0
    };

    SavingsProgress {
        total_target,
        total_saved,
        total_remaining: total_target - total_saved,
        progress_percent: raw_progress_percent.clamp(0.0, 100.0),
        raw_progress_percent,
        total_goals: goals.len(),
        completed: goals.iter().filter(|goal| goal.is_complete()).count(),
    }
}
