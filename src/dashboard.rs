use serde_json::Map;

use crate::models::{DashboardSnapshot, DashboardView, TierSet, WidgetDescriptor};
use crate::progress;
use crate::streak;

const DEFAULT_LAYOUT: [(&str, u32, u32); 4] = [
    ("progress_overview", 1, 1),
    ("course_cards", 1, 2),
    ("achievement_showcase", 2, 1),
    ("streak_tracker", 2, 2),
];

/// The layout shown before a student has saved any widget preferences.
pub fn default_widgets() -> Vec<WidgetDescriptor> {
    DEFAULT_LAYOUT
        .iter()
        .map(|&(widget_type, row, column)| WidgetDescriptor {
            id: widget_type.to_string(),
            widget_type: widget_type.to_string(),
            row,
            column,
            is_visible: Some(true),
            is_collapsed: false,
            settings: Map::new(),
        })
        .collect()
}

/// Drops explicitly hidden widgets and orders the rest by row, then column.
/// Widgets sharing a position keep their input order.
pub fn order_widgets(widgets: &[WidgetDescriptor]) -> Vec<WidgetDescriptor> {
    let mut visible: Vec<WidgetDescriptor> = widgets
        .iter()
        .filter(|widget| !widget.is_hidden())
        .cloned()
        .collect();
    visible.sort_by_key(|widget| (widget.row.max(1), widget.column.max(1)));
    visible
}

pub fn assemble(
    snapshot: &DashboardSnapshot,
    widgets: Option<&[WidgetDescriptor]>,
    tier_set: TierSet,
) -> DashboardView {
    let engagement = &snapshot.engagement;
    let (widgets, is_default_layout) = match widgets {
        Some(widgets) if !widgets.is_empty() => (order_widgets(widgets), false),
        _ => (default_widgets(), true),
    };

    DashboardView {
        level: progress::level_progress(&snapshot.achievements),
        weekly_goal: progress::weekly_goal_progress(engagement),
        streak: streak::classify(i64::from(engagement.current_streak_days), tier_set),
        current_streak_days: engagement.current_streak_days,
        longest_streak_days: engagement.longest_streak_days,
        total_study_minutes: engagement.total_study_minutes,
        total_xp: snapshot.achievements.total_xp,
        widgets,
        is_default_layout,
    }
}
