use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::models::board::Board;
use crate::models::status_change_log::StatusChangeLog;
use crate::models::task::{Task, TaskStatus};

const MOST_FREQUENT_LIMIT: usize = 5;
const MILLIS_PER_HOUR: f64 = 3_600_000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatistics {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub by_status: BTreeMap<TaskStatus, usize>,
    pub average_warning_hours: f64,
    pub average_critical_hours: f64,
    /// Mean time from last interaction to the warning threshold, in milliseconds.
    pub average_time_to_warning: f64,
    pub average_time_to_critical: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardActivity {
    pub id: String,
    pub name: String,
    pub task_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardStatistics {
    pub total: usize,
    pub total_tasks: usize,
    pub average_tasks_per_board: f64,
    pub most_active_board: Option<BoardActivity>,
    pub least_active_board: Option<BoardActivity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeTypeCounts {
    pub user: usize,
    pub automatic: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequentChange {
    pub task_id: String,
    pub task_name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeStatistics {
    pub total: usize,
    pub by_status: BTreeMap<TaskStatus, usize>,
    pub by_change_type: ChangeTypeCounts,
    /// Mean gap between consecutive changes, in milliseconds.
    pub average_time_between_changes: f64,
    pub most_frequent_changes: Vec<FrequentChange>,
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

pub fn task_statistics(tasks: &[Task]) -> TaskStatistics {
    let mut by_status: BTreeMap<TaskStatus, usize> =
        TaskStatus::ALL.iter().map(|status| (*status, 0)).collect();
    for task in tasks {
        *by_status.entry(task.status).or_insert(0) += 1;
    }
    let active = by_status.get(&TaskStatus::Active).copied().unwrap_or(0);

    TaskStatistics {
        total: tasks.len(),
        active,
        inactive: tasks.len() - active,
        by_status,
        average_warning_hours: mean(tasks.iter().map(|t| t.warning_hours).sum(), tasks.len()),
        average_critical_hours: mean(tasks.iter().map(|t| t.critical_hours).sum(), tasks.len()),
        average_time_to_warning: mean(
            tasks.iter().map(|t| t.warning_hours * MILLIS_PER_HOUR).sum(),
            tasks.len(),
        ),
        average_time_to_critical: mean(
            tasks.iter().map(|t| t.critical_hours * MILLIS_PER_HOUR).sum(),
            tasks.len(),
        ),
    }
}

pub fn board_statistics(boards: &[Board], tasks: &[Task]) -> BoardStatistics {
    let mut activity: Vec<BoardActivity> = boards
        .iter()
        .map(|board| BoardActivity {
            id: board.id.clone(),
            name: board.name.clone(),
            task_count: tasks.iter().filter(|t| t.board_id == board.id).count(),
        })
        .collect();
    // stable: among equal counts the earlier board wins "most active"
    activity.sort_by(|a, b| b.task_count.cmp(&a.task_count));

    BoardStatistics {
        total: boards.len(),
        total_tasks: tasks.len(),
        average_tasks_per_board: mean(tasks.len() as f64, boards.len()),
        most_active_board: activity.first().cloned(),
        least_active_board: activity.last().cloned(),
    }
}

pub fn status_change_statistics(logs: &[StatusChangeLog], tasks: &[Task]) -> StatusChangeStatistics {
    let mut by_status = BTreeMap::new();
    for log in logs {
        *by_status.entry(log.new_status).or_insert(0) += 1;
    }

    let user = logs.iter().filter(|log| log.user_id.is_some()).count();

    let mut timestamps: Vec<i64> = logs.iter().map(|log| log.timestamp.timestamp_millis()).collect();
    timestamps.sort_unstable();
    let gaps: Vec<i64> = timestamps
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .filter(|gap| *gap > 0)
        .collect();

    // first-seen order keeps ties deterministic
    let mut counts: Vec<(&str, &str, usize)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for log in logs {
        match positions.get(log.task_id.as_str()).copied() {
            Some(index) => counts[index].2 += 1,
            None => {
                positions.insert(log.task_id.as_str(), counts.len());
                counts.push((log.task_id.as_str(), log.task_name.as_str(), 1));
            }
        }
    }
    counts.sort_by(|a, b| b.2.cmp(&a.2));
    let most_frequent_changes = counts
        .into_iter()
        .take(MOST_FREQUENT_LIMIT)
        .map(|(task_id, logged_name, count)| FrequentChange {
            task_id: task_id.to_string(),
            task_name: tasks
                .iter()
                .find(|t| t.id == task_id)
                .map(|t| t.name.clone())
                .unwrap_or_else(|| logged_name.to_string()),
            count,
        })
        .collect();

    StatusChangeStatistics {
        total: logs.len(),
        by_status,
        by_change_type: ChangeTypeCounts {
            user,
            automatic: logs.len() - user,
        },
        average_time_between_changes: mean(gaps.iter().sum::<i64>() as f64, gaps.len()),
        most_frequent_changes,
    }
}
