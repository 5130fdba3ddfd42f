use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

mod cohort;
mod config;
mod dashboard;
mod logging;
mod models;
mod payload;
mod progress;
mod report;
mod streak;
mod watch;

use models::{AchievementCounters, DashboardView, TierSet};

#[derive(Parser)]
#[command(name = "academia-progress")]
#[command(about = "Progress, streak and dashboard metrics for academia students", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble the dashboard view for a snapshot file
    Dashboard {
        #[arg(long)]
        snapshot: PathBuf,
        /// Widget configuration; defaults to the snapshot's `widgets` key
        #[arg(long)]
        widgets: Option<PathBuf>,
        #[arg(long)]
        tier_set: Option<TierSet>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Show level progress for an XP total
    Level {
        #[arg(long)]
        total_xp: u64,
        #[arg(long, default_value_t = 1)]
        level: u32,
    },
    /// Classify a streak length
    Streak {
        #[arg(long, allow_negative_numbers = true)]
        days: i64,
        #[arg(long)]
        tier_set: Option<TierSet>,
    },
    /// Rank students from a cohort CSV
    Cohort {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        cohort: Option<String>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long)]
        tier_set: Option<TierSet>,
    },
    /// Generate a markdown cohort report
    Report {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        cohort: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
        #[arg(long)]
        tier_set: Option<TierSet>,
    },
    /// Re-derive a snapshot on an interval until interrupted
    Watch {
        #[arg(long)]
        snapshot: PathBuf,
        #[arg(long)]
        widgets: Option<PathBuf>,
        #[arg(long)]
        interval_secs: Option<u64>,
        #[arg(long)]
        tier_set: Option<TierSet>,
    },
}

fn print_view(view: &DashboardView) {
    println!(
        "Level {} ({:.0}%, {} XP to next level)",
        view.level.current_level,
        view.level.level_progress_percent,
        view.level.xp_remaining_to_next_level
    );
    println!(
        "Streak {} days, longest {}: {} {}",
        view.current_streak_days, view.longest_streak_days, view.streak.label, view.streak.message
    );
    println!(
        "This week {} of {} minutes ({:.0}%, {:.1} per day)",
        view.weekly_goal.this_week_minutes,
        view.weekly_goal.weekly_goal_minutes,
        view.weekly_goal.goal_progress_percent,
        view.weekly_goal.daily_average_minutes
    );
    let layout = if view.is_default_layout { " (default layout)" } else { "" };
    println!("Widgets{layout}:");
    for widget in &view.widgets {
        let collapsed = if widget.is_collapsed { ", collapsed" } else { "" };
        println!(
            "- {} [{}] at ({}, {}){}",
            widget.id, widget.widget_type, widget.row, widget.column, collapsed
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(&config::log_level())?;
    let settings = config::Settings::from_env();

    match cli.command {
        Commands::Dashboard {
            snapshot,
            widgets,
            tier_set,
            format,
        } => {
            let target = watch::WatchTarget {
                snapshot_path: snapshot,
                widgets_path: widgets,
                tier_set: tier_set.unwrap_or(settings.tier_set),
            };
            let view = watch::load_view(&target)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
                OutputFormat::Text => print_view(&view),
            }
        }
        Commands::Level { total_xp, level } => {
            let level_progress = progress::level_progress(&AchievementCounters {
                total_xp,
                current_level: level.max(1),
            });
            println!("{}", serde_json::to_string_pretty(&level_progress)?);
        }
        Commands::Streak { days, tier_set } => {
            let status = streak::classify(days, tier_set.unwrap_or(settings.tier_set));
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Commands::Cohort {
            csv,
            cohort: label,
            limit,
            tier_set,
        } => {
            let records = cohort::filter_cohort(cohort::load_csv(&csv)?, label.as_deref());
            let summaries = cohort::summarize(&records, tier_set.unwrap_or(settings.tier_set));

            if summaries.is_empty() {
                println!("No students found for this cohort.");
                return Ok(());
            }

            println!("Top students by level:");
            for summary in summaries.iter().take(limit) {
                println!(
                    "- {} ({}, {}) level {} with {} XP, streak {} days ({}), weekly goal {:.0}%",
                    summary.full_name,
                    summary.email,
                    summary.cohort,
                    summary.level.current_level,
                    summary.total_xp,
                    summary.streak.streak_days,
                    summary.streak.label,
                    summary.weekly_goal.goal_progress_percent
                );
            }
        }
        Commands::Report {
            csv,
            cohort: label,
            out,
            tier_set,
        } => {
            let tier_set = tier_set.unwrap_or(settings.tier_set);
            let records = cohort::filter_cohort(cohort::load_csv(&csv)?, label.as_deref());
            let summaries = cohort::summarize(&records, tier_set);
            let report = report::build_report(
                label.as_deref(),
                Utc::now().date_naive(),
                tier_set,
                &summaries,
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Watch {
            snapshot,
            widgets,
            interval_secs,
            tier_set,
        } => {
            let target = watch::WatchTarget {
                snapshot_path: snapshot,
                widgets_path: widgets,
                tier_set: tier_set.unwrap_or(settings.tier_set),
            };
            let period = interval_secs
                .filter(|secs| *secs > 0)
                .map_or(settings.refresh_interval, Duration::from_secs);
            let cancel = async {
                if let Err(err) = tokio::signal::ctrl_c().await {
                    tracing::error!(%err, "failed to listen for ctrl-c");
                }
            };

            let state = watch::run(&target, period, cancel, |state| {
                if state.last_error().is_some() {
                    return;
                }
                if let Some(view) = state.view() {
                    print_view(view);
                    println!();
                }
            })
            .await;
            info!(
                refreshes = state.refreshes(),
                failures = state.failures(),
                "watch finished"
            );
        }
    }

    Ok(())
}
