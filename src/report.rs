use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{StreakTier, StudentSummary, TierSet};
use crate::streak;

pub fn tier_counts(summaries: &[StudentSummary]) -> Vec<(StreakTier, usize)> {
    StreakTier::ALL
        .iter()
        .map(|&tier| {
            let count = summaries
                .iter()
                .filter(|summary| summary.streak.tier == tier)
                .count();
            (tier, count)
        })
        .collect()
}

pub fn average_goal_percent(summaries: &[StudentSummary]) -> f64 {
    if summaries.is_empty() {
        return 0.0;
    }
    let total: f64 = summaries
        .iter()
        .map(|summary| summary.weekly_goal.goal_progress_percent)
        .sum();
    total / summaries.len() as f64
}

/// Renders a markdown report; `summaries` must already be ranked.
pub fn build_report(
    cohort: Option<&str>,
    generated_on: NaiveDate,
    tier_set: TierSet,
    summaries: &[StudentSummary],
) -> String {
    let mut output = String::new();
    let cohort_label = cohort.unwrap_or("all cohorts");

    let _ = writeln!(output, "# Academia Progress Report");
    let _ = writeln!(
        output,
        "Generated for {} on {} ({} students)",
        cohort_label,
        generated_on,
        summaries.len()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Level Leaderboard");

    if summaries.is_empty() {
        let _ = writeln!(output, "No students recorded for this cohort.");
    } else {
        for summary in summaries.iter().take(10) {
            let _ = writeln!(
                output,
                "- {} ({}, {}) level {} with {} XP ({:.0}% into level)",
                summary.full_name,
                summary.email,
                summary.cohort,
                summary.level.current_level,
                summary.total_xp,
                summary.level.level_progress_percent
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Streak Tiers");

    if summaries.is_empty() {
        let _ = writeln!(output, "No students recorded for this cohort.");
    } else {
        for (tier, count) in tier_counts(summaries) {
            let _ = writeln!(
                output,
                "- {}: {} students",
                streak::tier_label(tier, tier_set),
                count
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Weekly Goal");

    if summaries.is_empty() {
        let _ = writeln!(output, "No students recorded for this cohort.");
    } else {
        let on_track = summaries
            .iter()
            .filter(|summary| summary.weekly_goal.goal_progress_percent >= 100.0)
            .count();
        let _ = writeln!(
            output,
            "- {} of {} students met their weekly goal",
            on_track,
            summaries.len()
        );
        let _ = writeln!(
            output,
            "- Average goal progress {:.1}%",
            average_goal_percent(summaries)
        );
    }

    let mut by_longest = summaries.to_vec();
    by_longest.sort_by(|a, b| b.longest_streak_days.cmp(&a.longest_streak_days));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Longest Streaks");

    if by_longest.is_empty() {
        let _ = writeln!(output, "No students recorded for this cohort.");
    } else {
        for summary in by_longest.iter().take(5) {
            let _ = writeln!(
                output,
                "- {}: {} days (current {})",
                summary.full_name, summary.longest_streak_days, summary.streak.streak_days
            );
        }
    }

    output
}
