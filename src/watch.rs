//! Periodic re-derivation of a dashboard snapshot on disk.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde_json::Value;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::dashboard;
use crate::models::{DashboardSnapshot, DashboardView, TierSet};
use crate::payload;

#[derive(Debug, Clone)]
pub struct WatchTarget {
    pub snapshot_path: PathBuf,
    pub widgets_path: Option<PathBuf>,
    pub tier_set: TierSet,
}

/// State carried across refreshes of a watched dashboard.
#[derive(Debug, Default)]
pub struct DashboardState {
    view: Option<DashboardView>,
    refreshes: u64,
    failures: u64,
    last_error: Option<String>,
}

impl DashboardState {
    pub fn view(&self) -> Option<&DashboardView> {
        self.view.as_ref()
    }

    pub fn set_view(&mut self, view: DashboardView) {
        self.view = Some(view);
        self.refreshes += 1;
        self.last_error = None;
    }

    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Records a failed refresh; the previous view stays in place.
    pub fn set_error(&mut self, error: String) {
        self.failures += 1;
        self.last_error = Some(error);
    }
}

pub fn read_json(path: &Path) -> anyhow::Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Reads the snapshot (and optional widget file) and assembles the view.
///
/// Widgets come from the dedicated file when given, otherwise from a
/// `widgets` key on the snapshot itself.
pub fn load_view(target: &WatchTarget) -> anyhow::Result<DashboardView> {
    let mut raw = read_json(&target.snapshot_path)?;
    let widgets = match &target.widgets_path {
        Some(path) => payload::parse_widgets(read_json(path)?),
        None => raw
            .as_object_mut()
            .and_then(|map| map.remove("widgets"))
            .and_then(payload::parse_widgets),
    };
    let snapshot = DashboardSnapshot::from_value(raw);
    Ok(dashboard::assemble(
        &snapshot,
        widgets.as_deref(),
        target.tier_set,
    ))
}

fn refresh(target: &WatchTarget, state: &mut DashboardState) {
    match load_view(target) {
        Ok(view) => {
            debug!(
                level = view.level.current_level,
                streak = view.current_streak_days,
                "dashboard refreshed"
            );
            state.set_view(view);
        }
        Err(err) => {
            let message = format!("{err:#}");
            warn!(error = %message, "dashboard refresh failed");
            state.set_error(message);
        }
    }
}

/// Refreshes the view every `period` until `cancel` resolves.
///
/// `on_refresh` runs after every attempt, successful or not.
pub async fn run<C, F>(
    target: &WatchTarget,
    period: Duration,
    cancel: C,
    mut on_refresh: F,
) -> DashboardState
where
    C: Future<Output = ()>,
    F: FnMut(&DashboardState),
{
    let mut state = DashboardState::default();
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(cancel);

    info!(
        path = %target.snapshot_path.display(),
        interval_secs = period.as_secs_f64(),
        "watching dashboard snapshot"
    );

    loop {
        tokio::select! {
            _ = &mut cancel => {
                info!(refreshes = state.refreshes(), "watch cancelled");
                break;
            }
            _ = ticker.tick() => {
                refresh(target, &mut state);
                on_refresh(&state);
            }
        }
    }

    state
}
