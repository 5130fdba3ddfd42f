//! Boundary parsing for dashboard payloads.
//!
//! Upstream endpoints hand us loosely typed JSON. Everything is coerced here,
//! once, into the typed counters the rest of the crate works with. None of
//! these functions fail: missing, negative or malformed fields fall back to
//! their documented defaults.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::models::{
    AchievementCounters, DashboardSnapshot, EngagementCounters, WidgetDescriptor, DAYS_PER_WEEK,
    DEFAULT_DAILY_GOAL_MINUTES,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSnapshot {
    engagement: Value,
    achievements: Value,
    preferences: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEngagement {
    current_streak: Value,
    longest_streak: Value,
    total_study_minutes: Value,
    weekly_study_minutes: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAchievements {
    total_xp: Value,
    current_level: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPreferences {
    study_goal_minutes_daily: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawWidgetEntry {
    widget: Value,
    preferences: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawWidget {
    id: Value,
    widget_type: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawWidgetPreferences {
    position: Value,
    settings: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPosition {
    row: Value,
    column: Value,
}

/// Deserializes a JSON object section, or returns the default for anything else.
fn section<T: DeserializeOwned + Default>(value: Value) -> T {
    if !value.is_object() {
        return T::default();
    }
    serde_json::from_value(value).unwrap_or_default()
}

fn float_to_count(value: f64) -> Option<u64> {
    if !value.is_finite() {
        return None;
    }
    if value <= 0.0 {
        return Some(0);
    }
    // `as` saturates at u64::MAX
    Some(value.floor() as u64)
}

/// Coerces a JSON value into a non-negative count.
///
/// Integers pass through, floats are floored, numeric strings are parsed and
/// negatives become zero. Returns `None` for values with no numeric reading.
pub fn coerce_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => {
            if let Some(unsigned) = number.as_u64() {
                Some(unsigned)
            } else if number.as_i64().is_some() {
                Some(0)
            } else {
                number.as_f64().and_then(float_to_count)
            }
        }
        Value::String(text) => text.trim().parse::<f64>().ok().and_then(float_to_count),
        _ => None,
    }
}

fn count_u64(value: &Value) -> u64 {
    coerce_count(value).unwrap_or(0)
}

fn count_u32(value: &Value) -> u32 {
    u32::try_from(count_u64(value)).unwrap_or(u32::MAX)
}

fn weekly_minutes(value: &Value) -> [u32; DAYS_PER_WEEK] {
    let mut days = [0; DAYS_PER_WEEK];
    if let Value::Array(entries) = value {
        for (slot, entry) in days.iter_mut().zip(entries.iter()) {
            *slot = count_u32(entry);
        }
    }
    days
}

fn daily_goal(value: &Value) -> u32 {
    match count_u32(value) {
        0 => DEFAULT_DAILY_GOAL_MINUTES,
        minutes => minutes,
    }
}

impl DashboardSnapshot {
    /// Builds a snapshot from an arbitrary JSON value. Never fails.
    pub fn from_value(value: Value) -> Self {
        let raw: RawSnapshot = section(value);
        let engagement: RawEngagement = section(raw.engagement);
        let achievements: RawAchievements = section(raw.achievements);
        let preferences: RawPreferences = section(raw.preferences);

        Self {
            engagement: EngagementCounters {
                current_streak_days: count_u32(&engagement.current_streak),
                longest_streak_days: count_u32(&engagement.longest_streak),
                total_study_minutes: count_u64(&engagement.total_study_minutes),
                weekly_study_minutes: weekly_minutes(&engagement.weekly_study_minutes),
                daily_goal_minutes: daily_goal(&preferences.study_goal_minutes_daily),
            },
            achievements: AchievementCounters {
                total_xp: count_u64(&achievements.total_xp),
                current_level: count_u32(&achievements.current_level).max(1),
            },
        }
    }
}

fn text_field(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn position(value: &Value) -> u32 {
    match count_u32(value) {
        0 => 1,
        position => position,
    }
}

fn parse_widget(entry: Value) -> Option<WidgetDescriptor> {
    if !entry.is_object() {
        debug!(?entry, "skipping non-object widget entry");
        return None;
    }

    let raw: RawWidgetEntry = section(entry);
    let widget: RawWidget = section(raw.widget);
    let preferences: RawWidgetPreferences = section(raw.preferences);
    let position_raw: RawPosition = section(preferences.position);

    let mut settings = match preferences.settings {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    let is_visible = match settings.remove("is_visible") {
        Some(Value::Bool(flag)) => Some(flag),
        _ => None,
    };
    let is_collapsed = matches!(settings.remove("is_collapsed"), Some(Value::Bool(true)));

    let widget_type = text_field(&widget.widget_type).unwrap_or_else(|| "unknown".to_string());
    let id = text_field(&widget.id).unwrap_or_else(|| widget_type.clone());

    Some(WidgetDescriptor {
        id,
        widget_type,
        row: position(&position_raw.row),
        column: position(&position_raw.column),
        is_visible,
        is_collapsed,
        settings,
    })
}

/// Parses a widget configuration collection.
///
/// Accepts either a bare array or an object carrying a `widgets` array.
/// Returns `None` when no collection is present at all.
pub fn parse_widgets(value: Value) -> Option<Vec<WidgetDescriptor>> {
    match value {
        Value::Array(entries) => Some(entries.into_iter().filter_map(parse_widget).collect()),
        Value::Object(mut map) => map.remove("widgets").and_then(parse_widgets),
        _ => None,
    }
}
