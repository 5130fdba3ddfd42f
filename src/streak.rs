use std::fmt;
use std::str::FromStr;

use crate::models::{StreakStatus, StreakTier, TierSet};

// Indexed by `StreakTier` discriminant.
struct TierEntry {
    tier: StreakTier,
    label: &'static str,
    message: &'static str,
    color: &'static str,
}

// Both sets share breakpoints: 0, 1-2, 3-6, 7-29, 30+
const TIER_SET_A: [TierEntry; 5] = [
    TierEntry {
        tier: StreakTier::Cold,
        label: "start",
        message: "Start your streak today!",
        color: "gray",
    },
    TierEntry {
        tier: StreakTier::Warming,
        label: "building",
        message: "Building momentum, keep it going!",
        color: "blue",
    },
    TierEntry {
        tier: StreakTier::Hot,
        label: "strong",
        message: "Strong streak! You're on a roll.",
        color: "green",
    },
    TierEntry {
        tier: StreakTier::Fire,
        label: "excellent",
        message: "Excellent consistency, a full week and counting!",
        color: "orange",
    },
    TierEntry {
        tier: StreakTier::Legendary,
        label: "legendary",
        message: "Legendary dedication! A month or more of daily practice.",
        color: "purple",
    },
];

const TIER_SET_B: [TierEntry; 5] = [
    TierEntry {
        tier: StreakTier::Cold,
        label: "cold",
        message: "No streak yet. One lesson lights the fire.",
        color: "slate",
    },
    TierEntry {
        tier: StreakTier::Warming,
        label: "warming",
        message: "Warming up. Come back tomorrow!",
        color: "yellow",
    },
    TierEntry {
        tier: StreakTier::Hot,
        label: "hot",
        message: "You're hot! Don't break the chain.",
        color: "orange",
    },
    TierEntry {
        tier: StreakTier::Fire,
        label: "fire",
        message: "On fire! Your habit is taking hold.",
        color: "red",
    },
    TierEntry {
        tier: StreakTier::Legendary,
        label: "legendary",
        message: "Legendary streak. Your future self says thanks.",
        color: "purple",
    },
];

pub fn tier_for_days(streak_days: u32) -> StreakTier {
    match streak_days {
        0 => StreakTier::Cold,
        1..=2 => StreakTier::Warming,
        3..=6 => StreakTier::Hot,
        7..=29 => StreakTier::Fire,
        _ => StreakTier::Legendary,
    }
}

fn table(tier_set: TierSet) -> &'static [TierEntry; 5] {
    match tier_set {
        TierSet::A => &TIER_SET_A,
        TierSet::B => &TIER_SET_B,
    }
}

/// Maps a streak length to its tier within the chosen tier set.
/// Negative lengths are treated as no streak.
pub fn classify(streak_days: i64, tier_set: TierSet) -> StreakStatus {
    let days = u32::try_from(streak_days.max(0)).unwrap_or(u32::MAX);
    let tier = tier_for_days(days);
    let entry = &table(tier_set)[tier as usize];
    debug_assert_eq!(entry.tier, tier);

    StreakStatus {
        streak_days: days,
        tier,
        tier_set,
        label: entry.label,
        message: entry.message,
        color: entry.color,
    }
}

pub fn tier_label(tier: StreakTier, tier_set: TierSet) -> &'static str {
    table(tier_set)[tier as usize].label
}

impl FromStr for TierSet {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "a" => Ok(TierSet::A),
            "b" => Ok(TierSet::B),
            other => Err(format!("unknown tier set '{other}', expected 'a' or 'b'")),
        }
    }
}

impl fmt::Display for TierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TierSet::A => write!(f, "a"),
            TierSet::B => write!(f, "b"),
        }
    }
}
