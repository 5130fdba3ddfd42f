use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DAYS_PER_WEEK: usize = 7;
pub const DEFAULT_DAILY_GOAL_MINUTES: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngagementCounters {
    pub current_streak_days: u32,
    pub longest_streak_days: u32,
    pub total_study_minutes: u64,
    pub weekly_study_minutes: [u32; DAYS_PER_WEEK],
    pub daily_goal_minutes: u32,
}

impl Default for EngagementCounters {
    fn default() -> Self {
        Self {
            current_streak_days: 0,
            longest_streak_days: 0,
            total_study_minutes: 0,
            weekly_study_minutes: [0; DAYS_PER_WEEK],
            daily_goal_minutes: DEFAULT_DAILY_GOAL_MINUTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AchievementCounters {
    pub total_xp: u64,
    pub current_level: u32,
}

impl Default for AchievementCounters {
    fn default() -> Self {
        Self {
            total_xp: 0,
            current_level: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSnapshot {
    pub engagement: EngagementCounters,
    pub achievements: AchievementCounters,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelProgress {
    pub current_level: u32,
    pub xp_for_current_level_floor: u64,
    pub xp_for_next_level_floor: u64,
    pub xp_into_level: i64,
    pub level_progress_percent: f64,
    /// Negative when the supplied level lags behind the XP total.
    pub xp_remaining_to_next_level: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyGoalProgress {
    pub this_week_minutes: u64,
    pub daily_average_minutes: f64,
    pub weekly_goal_minutes: u64,
    pub goal_progress_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakTier {
    Cold,
    Warming,
    Hot,
    Fire,
    Legendary,
}

impl StreakTier {
    pub const ALL: [StreakTier; 5] = [
        StreakTier::Cold,
        StreakTier::Warming,
        StreakTier::Hot,
        StreakTier::Fire,
        StreakTier::Legendary,
    ];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TierSet {
    #[default]
    A,
    B,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakStatus {
    pub streak_days: u32,
    pub tier: StreakTier,
    pub tier_set: TierSet,
    pub label: &'static str,
    pub message: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetDescriptor {
    pub id: String,
    pub widget_type: String,
    pub row: u32,
    pub column: u32,
    pub is_visible: Option<bool>,
    pub is_collapsed: bool,
    pub settings: serde_json::Map<String, serde_json::Value>,
}

impl WidgetDescriptor {
    pub fn is_hidden(&self) -> bool {
        self.is_visible == Some(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub level: LevelProgress,
    pub weekly_goal: WeeklyGoalProgress,
    pub streak: StreakStatus,
    pub current_streak_days: u32,
    pub longest_streak_days: u32,
    pub total_study_minutes: u64,
    pub total_xp: u64,
    pub widgets: Vec<WidgetDescriptor>,
    pub is_default_layout: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRecord {
    pub student_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub cohort: String,
    pub snapshot: DashboardSnapshot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentSummary {
    pub student_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub cohort: String,
    pub total_xp: u64,
    pub longest_streak_days: u32,
    pub level: LevelProgress,
    pub weekly_goal: WeeklyGoalProgress,
    pub streak: StreakStatus,
}
