use crate::models::{
    AchievementCounters, EngagementCounters, LevelProgress, WeeklyGoalProgress, DAYS_PER_WEEK,
    DEFAULT_DAILY_GOAL_MINUTES,
};

const BASE_LEVEL_XP: f64 = 100.0;
const LEVEL_GROWTH: f64 = 1.2;

/// XP needed to advance from `level` to `level + 1`.
pub fn xp_threshold(level: u32) -> u64 {
    let exponent = i32::try_from(level.max(1) - 1).unwrap_or(i32::MAX);
    // `as` saturates once the curve leaves the u64 range
    (BASE_LEVEL_XP * LEVEL_GROWTH.powi(exponent)).floor() as u64
}

/// Total XP needed to reach `level` from level 1.
pub fn cumulative_xp(level: u32) -> u64 {
    let mut total: u64 = 0;
    for n in 1..level {
        total = total.saturating_add(xp_threshold(n));
        if total == u64::MAX {
            break;
        }
    }
    total
}

fn signed(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

/// Derives level progress from the supplied level and XP total.
///
/// The level is trusted as given and never recomputed from XP, so the two
/// can disagree; `xp_remaining_to_next_level` is left unclamped to show it.
pub fn level_progress(achievements: &AchievementCounters) -> LevelProgress {
    let level = achievements.current_level.max(1);
    let total_xp = signed(achievements.total_xp);

    let current_floor = xp_threshold(level);
    let next_floor = xp_threshold(level.saturating_add(1));
    let xp_into_level = total_xp.saturating_sub(signed(cumulative_xp(level)));

    let span = signed(next_floor).saturating_sub(signed(current_floor));
    let level_progress_percent = if span > 0 {
        clamp_percent(xp_into_level as f64 / span as f64 * 100.0)
    } else {
        0.0
    };

    LevelProgress {
        current_level: level,
        xp_for_current_level_floor: current_floor,
        xp_for_next_level_floor: next_floor,
        xp_into_level,
        level_progress_percent,
        xp_remaining_to_next_level: signed(next_floor).saturating_sub(total_xp),
    }
}

pub fn weekly_goal_progress(engagement: &EngagementCounters) -> WeeklyGoalProgress {
    let this_week_minutes: u64 = engagement
        .weekly_study_minutes
        .iter()
        .map(|&minutes| u64::from(minutes))
        .sum();
    let daily_goal = match engagement.daily_goal_minutes {
        0 => DEFAULT_DAILY_GOAL_MINUTES,
        minutes => minutes,
    };
    let weekly_goal_minutes = u64::from(daily_goal) * DAYS_PER_WEEK as u64;

    WeeklyGoalProgress {
        this_week_minutes,
        daily_average_minutes: this_week_minutes as f64 / DAYS_PER_WEEK as f64,
        weekly_goal_minutes,
        goal_progress_percent: clamp_percent(
            this_week_minutes as f64 / weekly_goal_minutes as f64 * 100.0,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn achievements(total_xp: u64, current_level: u32) -> AchievementCounters {
        AchievementCounters {
            total_xp,
            current_level,
        }
    }

    fn engagement(weekly: [u32; 7], goal: u32) -> EngagementCounters {
        EngagementCounters {
            weekly_study_minutes: weekly,
            daily_goal_minutes: goal,
            ..EngagementCounters::default()
        }
    }

    #[test]
    fn thresholds_follow_curve() {
        assert_eq!(xp_threshold(1), 100);
        assert_eq!(xp_threshold(2), 120);
        assert_eq!(xp_threshold(3), 144);
        assert_eq!(xp_threshold(4), 172);
    }

    #[test]
    fn cumulative_xp_sums_previous_levels() {
        assert_eq!(cumulative_xp(1), 0);
        assert_eq!(cumulative_xp(2), 100);
        assert_eq!(cumulative_xp(3), 220);
        assert_eq!(cumulative_xp(4), 364);
    }

    #[test]
    fn cumulative_xp_saturates_for_huge_levels() {
        assert_eq!(cumulative_xp(u32::MAX), u64::MAX);
        assert_eq!(xp_threshold(u32::MAX), u64::MAX);
    }

    #[test]
    fn drifted_level_reports_negative_remaining() {
        let progress = level_progress(&achievements(250, 2));
        assert_eq!(progress.current_level, 2);
        assert_eq!(progress.xp_for_current_level_floor, 120);
        assert_eq!(progress.xp_for_next_level_floor, 144);
        assert_eq!(progress.xp_into_level, 150);
        assert_eq!(progress.level_progress_percent, 100.0);
        assert_eq!(progress.xp_remaining_to_next_level, -106);
    }

    #[test]
    fn partial_progress_within_level() {
        // span between level 1 and 2 floors is 20 XP
        let progress = level_progress(&achievements(5, 1));
        assert_eq!(progress.xp_into_level, 5);
        assert!((progress.level_progress_percent - 25.0).abs() < 1e-9);
        assert_eq!(progress.xp_remaining_to_next_level, 115);
    }

    #[test]
    fn level_ahead_of_xp_clamps_to_zero() {
        let progress = level_progress(&achievements(0, 10));
        assert!(progress.xp_into_level < 0);
        assert_eq!(progress.level_progress_percent, 0.0);
        assert!(progress.xp_remaining_to_next_level > 0);
    }

    #[test]
    fn saturated_level_does_not_divide_by_zero() {
        let progress = level_progress(&achievements(u64::MAX, u32::MAX));
        assert_eq!(progress.level_progress_percent, 0.0);
    }

    #[test]
    fn full_week_meets_goal() {
        let goal = weekly_goal_progress(&engagement([30; 7], 30));
        assert_eq!(goal.this_week_minutes, 210);
        assert_eq!(goal.weekly_goal_minutes, 210);
        assert_eq!(goal.goal_progress_percent, 100.0);
        assert!((goal.daily_average_minutes - 30.0).abs() < 1e-9);
    }

    #[test]
    fn partial_week_and_overachievement() {
        let half = weekly_goal_progress(&engagement([15; 7], 30));
        assert!((half.goal_progress_percent - 50.0).abs() < 1e-9);

        let over = weekly_goal_progress(&engagement([120, 0, 0, 0, 0, 0, 300], 10));
        assert_eq!(over.this_week_minutes, 420);
        assert_eq!(over.goal_progress_percent, 100.0);
    }

    #[test]
    fn zero_goal_falls_back_to_default() {
        let goal = weekly_goal_progress(&engagement([0; 7], 0));
        assert_eq!(goal.weekly_goal_minutes, 210);
        assert_eq!(goal.goal_progress_percent, 0.0);
    }

    proptest! {
        #[test]
        fn thresholds_strictly_increase(level in 1u32..150) {
            prop_assert!(xp_threshold(level + 1) > xp_threshold(level));
        }

        #[test]
        fn level_percent_is_clamped(total_xp in any::<u64>(), level in any::<u32>()) {
            let progress = level_progress(&achievements(total_xp, level));
            prop_assert!((0.0..=100.0).contains(&progress.level_progress_percent));
        }

        #[test]
        fn goal_percent_is_clamped(weekly in any::<[u32; 7]>(), goal in any::<u32>()) {
            let progress = weekly_goal_progress(&engagement(weekly, goal));
            prop_assert!((0.0..=100.0).contains(&progress.goal_progress_percent));
        }
    }
}
