use std::path::Path;

use anyhow::Context;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{DashboardSnapshot, StudentRecord, StudentSummary, TierSet};
use crate::progress;
use crate::streak;

#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    student_id: Option<Uuid>,
    full_name: String,
    email: String,
    cohort: String,
    current_streak: Option<String>,
    longest_streak: Option<String>,
    total_study_minutes: Option<String>,
    total_xp: Option<String>,
    current_level: Option<String>,
    study_goal_minutes_daily: Option<String>,
    day_1: Option<String>,
    day_2: Option<String>,
    day_3: Option<String>,
    day_4: Option<String>,
    day_5: Option<String>,
    day_6: Option<String>,
    day_7: Option<String>,
}

fn cell(value: Option<String>) -> Value {
    value.map_or(Value::Null, Value::String)
}

impl CsvRow {
    fn into_record(self) -> StudentRecord {
        // Counters go through the same coercion as the dashboard payload.
        let snapshot = DashboardSnapshot::from_value(json!({
            "engagement": {
                "current_streak": cell(self.current_streak),
                "longest_streak": cell(self.longest_streak),
                "total_study_minutes": cell(self.total_study_minutes),
                "weekly_study_minutes": [
                    cell(self.day_1),
                    cell(self.day_2),
                    cell(self.day_3),
                    cell(self.day_4),
                    cell(self.day_5),
                    cell(self.day_6),
                    cell(self.day_7),
                ],
            },
            "achievements": {
                "total_xp": cell(self.total_xp),
                "current_level": cell(self.current_level),
            },
            "preferences": {
                "study_goal_minutes_daily": cell(self.study_goal_minutes_daily),
            },
        }));

        StudentRecord {
            student_id: self.student_id.unwrap_or_else(Uuid::new_v4),
            full_name: self.full_name,
            email: self.email,
            cohort: self.cohort,
            snapshot,
        }
    }
}

pub fn load_csv(csv_path: &Path) -> anyhow::Result<Vec<StudentRecord>> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    let mut records = Vec::new();

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("invalid row {} in {}", index + 1, csv_path.display()))?;
        records.push(row.into_record());
    }

    info!(path = %csv_path.display(), students = records.len(), "loaded cohort csv");
    Ok(records)
}

pub fn filter_cohort(records: Vec<StudentRecord>, cohort: Option<&str>) -> Vec<StudentRecord> {
    match cohort {
        Some(label) => records
            .into_iter()
            .filter(|record| record.cohort == label)
            .collect(),
        None => records,
    }
}

pub fn summarize(records: &[StudentRecord], tier_set: TierSet) -> Vec<StudentSummary> {
    let mut summaries: Vec<StudentSummary> = records
        .iter()
        .map(|record| {
            let engagement = &record.snapshot.engagement;
            let achievements = &record.snapshot.achievements;
            StudentSummary {
                student_id: record.student_id,
                full_name: record.full_name.clone(),
                email: record.email.clone(),
                cohort: record.cohort.clone(),
                total_xp: achievements.total_xp,
                longest_streak_days: engagement.longest_streak_days,
                level: progress::level_progress(achievements),
                weekly_goal: progress::weekly_goal_progress(engagement),
                streak: streak::classify(i64::from(engagement.current_streak_days), tier_set),
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.level
            .current_level
            .cmp(&a.level.current_level)
            .then_with(|| b.total_xp.cmp(&a.total_xp))
            .then_with(|| a.full_name.cmp(&b.full_name))
    });
    debug!(students = summaries.len(), "summarized cohort");
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "student_id,full_name,email,cohort,current_streak,longest_streak,total_study_minutes,total_xp,current_level,study_goal_minutes_daily,day_1,day_2,day_3,day_4,day_5,day_6,day_7";

    fn write_csv(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file
    }

    #[test]
    fn loads_rows_with_defaults() {
        let file = write_csv(&[
            "3d7f5d6f-24f7-4e8e-8b4b-3e7e44b4a7b2,Avery Lee,avery@example.com,2026,4,10,900,250,2,45,30,30,30,30,30,30,30",
            ",Jules Moreno,jules@example.com,2025,,,,,,,,,,,,,",
        ]);

        let records = load_csv(file.path()).unwrap();
        assert_eq!(records.len(), 2);

        let avery = &records[0];
        assert_eq!(
            avery.student_id,
            Uuid::parse_str("3d7f5d6f-24f7-4e8e-8b4b-3e7e44b4a7b2").unwrap()
        );
        assert_eq!(avery.snapshot.engagement.current_streak_days, 4);
        assert_eq!(avery.snapshot.engagement.daily_goal_minutes, 45);
        assert_eq!(avery.snapshot.engagement.weekly_study_minutes, [30; 7]);
        assert_eq!(avery.snapshot.achievements.total_xp, 250);

        let jules = &records[1];
        assert_eq!(jules.snapshot, DashboardSnapshot::default());
    }

    #[test]
    fn rejects_malformed_student_id() {
        let file = write_csv(&["not-a-uuid,Kiara Patel,kiara@example.com,2026,1,1,1,1,1,1,1,1,1,1,1,1,1"]);
        assert!(load_csv(file.path()).is_err());
    }

    fn record(name: &str, cohort: &str, total_xp: u64, current_level: u32) -> StudentRecord {
        let mut snapshot = DashboardSnapshot::default();
        snapshot.achievements.total_xp = total_xp;
        snapshot.achievements.current_level = current_level;
        StudentRecord {
            student_id: Uuid::new_v4(),
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            cohort: cohort.to_string(),
            snapshot,
        }
    }

    #[test]
    fn summaries_rank_by_level_then_xp() {
        let records = vec![
            record("Cara", "2026", 50, 1),
            record("Bo", "2026", 400, 3),
            record("Al", "2026", 300, 3),
            record("Di", "2026", 300, 3),
        ];
        let summaries = summarize(&records, TierSet::A);
        let names: Vec<&str> = summaries.iter().map(|s| s.full_name.as_str()).collect();
        assert_eq!(names, vec!["Bo", "Al", "Di", "Cara"]);
    }

    #[test]
    fn filters_by_cohort() {
        let records = vec![record("Al", "2025", 0, 1), record("Bo", "2026", 0, 1)];
        let filtered = filter_cohort(records.clone(), Some("2026"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].full_name, "Bo");
        assert_eq!(filter_cohort(records, None).len(), 2);
    }
}
