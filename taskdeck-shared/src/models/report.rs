/// Weekly aggregate report
///
/// "This week" is the span from the most recent Monday 00:00 (UTC,
/// inclusive) to now. The report issues independent COUNT queries with
/// no shared transaction snapshot; counts observed under concurrent
/// writes may be mutually inconsistent, which is acceptable for a
/// reporting view.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;

/// Aggregate counts for the weekly report endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyReport {
    /// Tasks assigned to the caller, created this week
    pub tasks_assigned_to_me_this_week: i64,

    /// Tasks the caller assigned to others, created this week
    pub tasks_i_assigned_this_week: i64,

    /// The caller's assigned tasks marked DONE this week
    pub tasks_i_completed_this_week: i64,

    /// All tasks created this week
    pub total_tasks_created_this_week: i64,

    /// All tasks marked DONE this week
    pub total_tasks_completed_this_week: i64,

    /// Per-status counts over all of the caller's assigned tasks
    pub tasks_by_status: HashMap<String, i64>,

    /// Per-priority counts over all of the caller's assigned tasks
    pub tasks_by_priority: HashMap<String, i64>,
}

/// Returns the most recent Monday on or before the given date
pub fn week_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(today.weekday().num_days_from_monday() as i64)
}

impl WeeklyReport {
    /// Generates the report for the given user
    ///
    /// # Errors
    ///
    /// Returns an error if any of the count queries fails
    pub async fn generate(pool: &PgPool, user_id: i32) -> Result<Self, sqlx::Error> {
        let start: DateTime<Utc> = week_start(Utc::now().date_naive())
            .and_time(NaiveTime::MIN)
            .and_utc();

        let (tasks_assigned_to_me_this_week,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM tasks
            WHERE assigned_to_user_id = $1 AND created_at >= $2
            "#,
        )
        .bind(user_id)
        .bind(start)
        .fetch_one(pool)
        .await?;

        let (tasks_i_assigned_this_week,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM tasks
            WHERE assigned_by_user_id = $1 AND created_at >= $2
            "#,
        )
        .bind(user_id)
        .bind(start)
        .fetch_one(pool)
        .await?;

        let (tasks_i_completed_this_week,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM tasks
            WHERE assigned_to_user_id = $1 AND status = 'DONE' AND updated_at >= $2
            "#,
        )
        .bind(user_id)
        .bind(start)
        .fetch_one(pool)
        .await?;

        let (total_tasks_created_this_week,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE created_at >= $1")
                .bind(start)
                .fetch_one(pool)
                .await?;

        let (total_tasks_completed_this_week,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM tasks WHERE status = 'DONE' AND updated_at >= $1",
        )
        .bind(start)
        .fetch_one(pool)
        .await?;

        let status_rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT status, COUNT(*)
            FROM tasks
            WHERE assigned_to_user_id = $1
            GROUP BY status
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        let priority_rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT priority, COUNT(*)
            FROM tasks
            WHERE assigned_to_user_id = $1
            GROUP BY priority
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(Self {
            tasks_assigned_to_me_this_week,
            tasks_i_assigned_this_week,
            tasks_i_completed_this_week,
            total_tasks_created_this_week,
            total_tasks_completed_this_week,
            tasks_by_status: status_rows.into_iter().collect(),
            tasks_by_priority: priority_rows.into_iter().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_week_start_is_identity_on_monday() {
        let monday = date(2026, 8, 3);
        assert_eq!(monday.weekday(), Weekday::Mon);
        assert_eq!(week_start(monday), monday);
    }

    #[test]
    fn test_week_start_for_every_weekday() {
        let monday = date(2026, 8, 3);
        for offset in 0..7 {
            let day = monday + Duration::days(offset);
            assert_eq!(week_start(day), monday, "offset {}", offset);
        }
    }

    #[test]
    fn test_week_start_crosses_month_boundary() {
        // 2026-08-01 is a Saturday; its week began Monday 2026-07-27.
        let saturday = date(2026, 8, 1);
        assert_eq!(saturday.weekday(), Weekday::Sat);
        assert_eq!(week_start(saturday), date(2026, 7, 27));
    }

    #[test]
    fn test_week_start_crosses_year_boundary() {
        // 2026-01-01 is a Thursday; its week began Monday 2025-12-29.
        let thursday = date(2026, 1, 1);
        assert_eq!(thursday.weekday(), Weekday::Thu);
        assert_eq!(week_start(thursday), date(2025, 12, 29));
    }

    #[test]
    fn test_report_serializes_with_original_keys() {
        let report = WeeklyReport {
            tasks_assigned_to_me_this_week: 3,
            tasks_i_assigned_this_week: 1,
            tasks_i_completed_this_week: 2,
            total_tasks_created_this_week: 9,
            total_tasks_completed_this_week: 4,
            tasks_by_status: HashMap::from([("TODO".to_string(), 5)]),
            tasks_by_priority: HashMap::from([("HIGH".to_string(), 2)]),
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["tasks_assigned_to_me_this_week"], 3);
        assert_eq!(json["total_tasks_completed_this_week"], 4);
        assert_eq!(json["tasks_by_status"]["TODO"], 5);
        assert_eq!(json["tasks_by_priority"]["HIGH"], 2);
    }
}
