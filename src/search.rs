use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::models::board::Board;
use crate::models::task::{Task, TaskStatus};

#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    pub case_sensitive: bool,
    pub exact_match: bool,
    pub search_in_description: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            case_sensitive: false,
            exact_match: false,
            search_in_description: true,
        }
    }
}

fn matches(text: &str, term: &str, options: &SearchOptions) -> bool {
    if options.case_sensitive {
        if options.exact_match {
            text == term
        } else {
            text.contains(term)
        }
    } else {
        let text = text.to_lowercase();
        let term = term.to_lowercase();
        if options.exact_match {
            text == term
        } else {
            text.contains(&term)
        }
    }
}

pub fn search_boards<'a>(boards: &'a [Board], term: &str, options: &SearchOptions) -> Vec<&'a Board> {
    boards
        .iter()
        .filter(|board| term.is_empty() || matches(&board.name, term, options))
        .collect()
}

pub fn search_tasks<'a>(tasks: &'a [Task], term: &str, options: &SearchOptions) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| {
            term.is_empty()
                || matches(&task.name, term, options)
                || (options.search_in_description
                    && !task.description.is_empty()
                    && matches(&task.description, term, options))
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub statuses: Vec<TaskStatus>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
}

impl TaskFilter {
    pub fn accepts(&self, task: &Task) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&task.status) {
            return false;
        }
        if self.created_from.is_some_and(|from| task.created_at < from) {
            return false;
        }
        if self.created_to.is_some_and(|to| task.created_at > to) {
            return false;
        }
        true
    }
}

pub fn filter_tasks<'a, I>(tasks: I, filter: &TaskFilter) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks.into_iter().filter(|task| filter.accepts(task)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskSortKey {
    Name,
    Status,
    WarningHours,
    CriticalHours,
    CreatedAt,
    LastInteraction,
}

fn compare_by(key: TaskSortKey, a: &Task, b: &Task) -> Ordering {
    match key {
        TaskSortKey::Name => a.name.cmp(&b.name),
        TaskSortKey::Status => a.status.cmp(&b.status),
        TaskSortKey::WarningHours => a.warning_hours.total_cmp(&b.warning_hours),
        TaskSortKey::CriticalHours => a.critical_hours.total_cmp(&b.critical_hours),
        TaskSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        TaskSortKey::LastInteraction => a.last_interaction.cmp(&b.last_interaction),
    }
}

/// Stable sort; equal keys keep their incoming order in both directions.
pub fn sort_tasks(tasks: &mut [&Task], key: TaskSortKey, ascending: bool) {
    tasks.sort_by(|a, b| {
        let ordering = compare_by(key, a, b);
        if ascending {
            ordering
        } else {
            ordering.reverse()
        }
    });
}

pub fn group_tasks_by_status<'a, I>(tasks: I) -> BTreeMap<TaskStatus, Vec<&'a Task>>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut groups: BTreeMap<TaskStatus, Vec<&'a Task>> = BTreeMap::new();
    for task in tasks {
        groups.entry(task.status).or_default().push(task);
    }
    groups
}
