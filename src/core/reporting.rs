// src/core/reporting.rs

use crate::core::models::{DayOutcome, DayStatus};

/// Aggregated result of one run. Outcomes are appended as days complete;
/// the summary decides the process exit code.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub success: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &DayOutcome) {
        match outcome.status {
            DayStatus::Success => self.success += 1,
            DayStatus::Skipped => self.skipped += 1,
            DayStatus::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.success + self.skipped + self.failed
    }

    /// Zero eligible days is a clean run; any failed day flips the code.
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 {
            1
        } else {
            0
        }
    }

    pub fn format_summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&"=".repeat(60));
        out.push_str("\nSUMMARY\n");
        out.push_str(&"=".repeat(60));
        out.push_str(&format!("\nSuccessful orders: {}", self.success));
        out.push_str(&format!("\nSkipped (no service): {}", self.skipped));
        out.push_str(&format!("\nFailed: {}", self.failed));
        out.push_str(&format!("\nTotal days processed: {}\n", self.total()));
        out.push_str(&"=".repeat(60));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_per_status() {
        let mut summary = RunSummary::default();
        summary.record(&DayOutcome::success(5));
        summary.record(&DayOutcome::skipped(12));
        summary.record(&DayOutcome::failed(19, "confirmation failed"));
        assert_eq!(summary.success, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn test_exit_code_zero_for_empty_run() {
        assert_eq!(RunSummary::default().exit_code(), 0);
    }

    #[test]
    fn test_exit_code_zero_without_failures() {
        let mut summary = RunSummary::default();
        summary.record(&DayOutcome::success(5));
        summary.record(&DayOutcome::skipped(12));
        assert_eq!(summary.exit_code(), 0);
    }

    #[test]
    fn test_any_failure_makes_exit_nonzero() {
        let mut summary = RunSummary::default();
        summary.record(&DayOutcome::success(5));
        summary.record(&DayOutcome::failed(19, "boom"));
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn test_summary_block_mentions_counts() {
        let mut summary = RunSummary::default();
        summary.record(&DayOutcome::success(5));
        let block = summary.format_summary();
        assert!(block.contains("Successful orders: 1"));
        assert!(block.contains("Total days processed: 1"));
    }
}
