//! Adapter from every blob shape older clients have written to the flat
//! schema the service uses.
//!
//! Older shapes nest tasks inside boards, call the task name `title`, use the
//! `inactive` status, stamp log entries with `changedAt` and sometimes omit
//! `lastStatusChange`/`createdAt`. The adapter works on raw JSON so a canonical
//! blob passes through unchanged.

use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::models::app_state::{AppState, DEFAULT_CRITICAL_HOURS, DEFAULT_WARNING_HOURS};

pub fn parse_state(raw: &str) -> Result<AppState, serde_json::Error> {
    let value: Value = serde_json::from_str(raw)?;
    from_value(value)
}

pub fn from_value(value: Value) -> Result<AppState, serde_json::Error> {
    let state: AppState = serde_json::from_value(upgrade(value))?;
    check_references(&state).map_err(<serde_json::Error as serde::de::Error>::custom)?;
    Ok(state)
}

/// Ids must be unique per collection and every task must sit on a known board.
/// Log entries may outlive their task, so they are not checked against tasks.
fn check_references(state: &AppState) -> Result<(), String> {
    let mut board_ids = HashSet::new();
    for board in &state.boards {
        if !board_ids.insert(board.id.as_str()) {
            return Err(format!("duplicate board id {}", board.id));
        }
    }

    let mut task_ids = HashSet::new();
    for task in &state.tasks {
        if !task_ids.insert(task.id.as_str()) {
            return Err(format!("duplicate task id {}", task.id));
        }
        if !board_ids.contains(task.board_id.as_str()) {
            return Err(format!("task {} refers to unknown board {}", task.id, task.board_id));
        }
    }

    let mut log_ids = HashSet::new();
    for log in &state.status_change_logs {
        if !log_ids.insert(log.id.as_str()) {
            return Err(format!("duplicate log id {}", log.id));
        }
    }
    Ok(())
}

fn upgrade(mut value: Value) -> Value {
    let Some(root) = value.as_object_mut() else {
        return value;
    };

    let settings = root.get("defaultTaskSettings").cloned();
    let default_warning = settings
        .as_ref()
        .and_then(|s| s.get("warningHours"))
        .and_then(Value::as_f64)
        .unwrap_or(DEFAULT_WARNING_HOURS);
    let default_critical = settings
        .as_ref()
        .and_then(|s| s.get("criticalHours"))
        .and_then(Value::as_f64)
        .unwrap_or(DEFAULT_CRITICAL_HOURS);

    let mut tasks = match root.remove("tasks") {
        Some(Value::Array(tasks)) => tasks,
        _ => Vec::new(),
    };

    if let Some(Value::Array(boards)) = root.get_mut("boards") {
        for board in boards.iter_mut() {
            let Some(board) = board.as_object_mut() else {
                continue;
            };
            let board_id = board.get("id").cloned().unwrap_or(Value::Null);
            if let Some(Value::Array(nested)) = board.remove("tasks") {
                for mut task in nested {
                    if let Some(task) = task.as_object_mut() {
                        task.entry("boardId").or_insert_with(|| board_id.clone());
                    }
                    tasks.push(task);
                }
            }
        }
    }

    for task in tasks.iter_mut() {
        if let Some(task) = task.as_object_mut() {
            upgrade_task(task, default_warning, default_critical);
        }
    }
    root.insert("tasks".into(), Value::Array(tasks));

    match root.get_mut("statusChangeLogs") {
        Some(Value::Array(logs)) => {
            for log in logs.iter_mut() {
                if let Some(log) = log.as_object_mut() {
                    upgrade_log(log);
                }
            }
        }
        _ => {
            root.insert("statusChangeLogs".into(), Value::Array(Vec::new()));
        }
    }

    if let Some(Value::Object(settings)) = root.get_mut("defaultTaskSettings") {
        rename_status(settings, "defaultStatus");
        settings
            .entry("defaultStatus")
            .or_insert_with(|| Value::from("active"));
    }

    if !root.contains_key("boards") {
        root.insert("boards".into(), Value::Array(Vec::new()));
    }

    value
}

fn rename_key(object: &mut Map<String, Value>, from: &str, to: &str) {
    if object.contains_key(to) {
        return;
    }
    if let Some(value) = object.remove(from) {
        object.insert(to.to_string(), value);
    }
}

fn rename_status(object: &mut Map<String, Value>, key: &str) {
    if object.get(key).and_then(Value::as_str) == Some("inactive") {
        object.insert(key.to_string(), Value::from("active"));
    }
}

fn upgrade_task(task: &mut Map<String, Value>, default_warning: f64, default_critical: f64) {
    rename_key(task, "title", "name");
    rename_status(task, "status");
    task.entry("status").or_insert_with(|| Value::from("active"));
    task.entry("warningHours")
        .or_insert_with(|| Value::from(default_warning));
    task.entry("criticalHours")
        .or_insert_with(|| Value::from(default_critical));

    if let Some(last) = task.get("lastInteraction").cloned() {
        task.entry("lastStatusChange").or_insert_with(|| last.clone());
        task.entry("createdAt").or_insert(last);
    }
}

fn upgrade_log(log: &mut Map<String, Value>) {
    rename_key(log, "changedAt", "timestamp");
    rename_status(log, "oldStatus");
    rename_status(log, "newStatus");
    log.entry("taskName").or_insert_with(|| Value::from(""));
    if log.get("userId").is_some_and(Value::is_null) {
        log.remove("userId");
    }
}
