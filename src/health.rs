//! Urgency and health-score derivation.
//!
//! Everything here is a pure function of a task (or a set of tasks) and the
//! current time. Scores are always one of 0, 50 or 100 per task; board and
//! system scores are plain averages.

use chrono::{DateTime, Utc};

use crate::models::task::{Task, TaskStatus};

pub const HEALTHY: f64 = 100.0;
pub const DEGRADED: f64 = 50.0;
pub const FAILING: f64 = 0.0;

/// Hours elapsed since `since`. Timestamps in the future count as zero.
pub fn elapsed_hours(since: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (now - since).num_milliseconds().max(0);
    millis as f64 / 3_600_000.0
}

/// The tier implied by elapsed time alone, ignoring the stored status.
pub fn derived_tier(elapsed: f64, warning_hours: f64, critical_hours: f64) -> TaskStatus {
    if elapsed >= critical_hours {
        TaskStatus::Critical
    } else if elapsed >= warning_hours {
        TaskStatus::Warning
    } else {
        TaskStatus::Active
    }
}

pub fn task_health_score(task: &Task, now: DateTime<Utc>) -> f64 {
    match task.status {
        TaskStatus::Completed => HEALTHY,
        TaskStatus::Critical => FAILING,
        TaskStatus::Warning => DEGRADED,
        TaskStatus::Active => {
            let elapsed = elapsed_hours(task.last_interaction, now);
            match derived_tier(elapsed, task.warning_hours, task.critical_hours) {
                TaskStatus::Critical => FAILING,
                TaskStatus::Warning => DEGRADED,
                _ => HEALTHY,
            }
        }
    }
}

/// Mean task score, or 100 for an empty set.
pub fn average_health_score<'a, I>(tasks: I, now: DateTime<Utc>) -> f64
where
    I: IntoIterator<Item = &'a Task>,
{
    let (sum, count) = tasks
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), task| {
            (sum + task_health_score(task, now), count + 1)
        });
    if count == 0 {
        HEALTHY
    } else {
        sum / count as f64
    }
}

pub fn board_health_score(tasks: &[Task], now: DateTime<Utc>) -> f64 {
    average_health_score(tasks, now)
}

pub fn system_health_score(tasks: &[Task], now: DateTime<Utc>) -> f64 {
    average_health_score(tasks, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::icon::IconLibrary;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn task_idle_for(hours: i64, status: TaskStatus) -> Task {
        let last = now() - Duration::hours(hours);
        Task {
            id: format!("t-{hours}"),
            board_id: "b".into(),
            name: "Laundry".into(),
            description: String::new(),
            status,
            warning_hours: 24.0,
            critical_hours: 48.0,
            last_interaction: last,
            last_status_change: last,
            created_at: last,
            icon_library: IconLibrary::Fa,
            icon_name: "FaTshirt".into(),
        }
    }

    #[test]
    fn active_task_score_follows_elapsed_time() {
        assert_eq!(task_health_score(&task_idle_for(0, TaskStatus::Active), now()), 100.0);
        assert_eq!(task_health_score(&task_idle_for(23, TaskStatus::Active), now()), 100.0);
        assert_eq!(task_health_score(&task_idle_for(24, TaskStatus::Active), now()), 50.0);
        assert_eq!(task_health_score(&task_idle_for(47, TaskStatus::Active), now()), 50.0);
        assert_eq!(task_health_score(&task_idle_for(48, TaskStatus::Active), now()), 0.0);
        assert_eq!(task_health_score(&task_idle_for(500, TaskStatus::Active), now()), 0.0);
    }

    #[test]
    fn explicit_statuses_short_circuit() {
        // elapsed time is irrelevant once the status says otherwise
        assert_eq!(task_health_score(&task_idle_for(500, TaskStatus::Completed), now()), 100.0);
        assert_eq!(task_health_score(&task_idle_for(0, TaskStatus::Critical), now()), 0.0);
        assert_eq!(task_health_score(&task_idle_for(0, TaskStatus::Warning), now()), 50.0);
    }

    #[test]
    fn future_interaction_counts_as_fresh() {
        let task = task_idle_for(-5, TaskStatus::Active);
        assert_eq!(elapsed_hours(task.last_interaction, now()), 0.0);
        assert_eq!(task_health_score(&task, now()), 100.0);
    }

    #[test]
    fn board_score_is_the_mean() {
        assert_eq!(board_health_score(&[], now()), 100.0);

        let tasks = vec![
            task_idle_for(1, TaskStatus::Active),
            task_idle_for(100, TaskStatus::Active),
        ];
        assert_eq!(board_health_score(&tasks, now()), 50.0);

        let tasks = vec![
            task_idle_for(1, TaskStatus::Active),
            task_idle_for(30, TaskStatus::Active),
            task_idle_for(1, TaskStatus::Critical),
        ];
        assert_eq!(system_health_score(&tasks, now()), 50.0);
    }

    #[test]
    fn derived_tier_boundaries() {
        assert_eq!(derived_tier(0.0, 24.0, 48.0), TaskStatus::Active);
        assert_eq!(derived_tier(24.0, 24.0, 48.0), TaskStatus::Warning);
        assert_eq!(derived_tier(48.0, 24.0, 48.0), TaskStatus::Critical);
    }
}
