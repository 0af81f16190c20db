//! Copy-on-write state transitions.
//!
//! Every mutator borrows the current [`AppState`] and returns a fresh one; the
//! input is never touched, so a failed mutation leaves nothing half-applied.

use chrono::{DateTime, Utc};
use std::time::Duration;
use uuid::Uuid;

use crate::health::{derived_tier, elapsed_hours};
use crate::models::app_state::{AppState, DefaultTaskSettings};
use crate::models::board::Board;
use crate::models::icon::{IconLibrary, FALLBACK_ICON_NAME};
use crate::models::status_change_log::StatusChangeLog;
use crate::models::task::{Task, TaskStatus};
use crate::seed;
use crate::validation::{
    validate_board_name, validate_board_order, validate_task, validate_thresholds, TaskFields,
    ValidationErrors,
};

pub const DEFAULT_USER_ID: &str = "USER";

/// Presses held at least this long open the editor instead of cycling status.
pub const LONG_PRESS_THRESHOLD: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StateError {
    #[error("Board not found: {0}")]
    BoardNotFound(String),
    #[error("Task not found: {0}")]
    TaskNotFound(String),
    #[error("Invalid input: {0}")]
    Invalid(ValidationErrors),
}

impl From<ValidationErrors> for StateError {
    fn from(errors: ValidationErrors) -> Self {
        StateError::Invalid(errors)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewBoard {
    pub name: String,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct BoardPatch {
    pub name: Option<String>,
    pub order: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub name: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub warning_hours: Option<f64>,
    pub critical_hours: Option<f64>,
    pub icon_library: Option<IconLibrary>,
    pub icon_name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub board_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub warning_hours: Option<f64>,
    pub critical_hours: Option<f64>,
    pub icon_library: Option<IconLibrary>,
    pub icon_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Tap,
    LongPress,
}

impl Interaction {
    pub fn from_press(held_for: Duration) -> Interaction {
        if held_for >= LONG_PRESS_THRESHOLD {
            Interaction::LongPress
        } else {
            Interaction::Tap
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub task: Task,
    /// `None` when the requested status equals the current one.
    pub log: Option<StatusChangeLog>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionOutcome {
    StatusChanged(StatusChange),
    EditRequested(Task),
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn require_board(state: &AppState, board_id: &str) -> Result<(), StateError> {
    match state.board(board_id) {
        Some(_) => Ok(()),
        None => Err(StateError::BoardNotFound(board_id.to_string())),
    }
}

fn task_index(state: &AppState, task_id: &str) -> Result<usize, StateError> {
    state
        .tasks
        .iter()
        .position(|task| task.id == task_id)
        .ok_or_else(|| StateError::TaskNotFound(task_id.to_string()))
}

fn log_entry(
    task: &Task,
    old_status: TaskStatus,
    user_id: Option<&str>,
    now: DateTime<Utc>,
) -> StatusChangeLog {
    StatusChangeLog {
        id: new_id(),
        task_id: task.id.clone(),
        task_name: task.name.clone(),
        old_status,
        new_status: task.status,
        timestamp: now,
        user_id: user_id.map(str::to_string),
    }
}

pub fn create_board(
    state: &AppState,
    input: NewBoard,
    now: DateTime<Utc>,
) -> Result<(AppState, Board), StateError> {
    let mut errors = ValidationErrors::new();
    errors.merge_field("name", validate_board_name(&input.name));
    if let Some(order) = input.order {
        errors.merge_field("order", validate_board_order(order));
    }
    errors.into_result()?;

    // stored orders may predate the bound, so the append can still run out of room
    let order = match input.order {
        Some(order) => order,
        None => match state.boards.iter().map(|board| board.order).max() {
            None => 0,
            Some(max) => max.checked_add(1).ok_or_else(|| {
                let mut errors = ValidationErrors::new();
                errors.add("order", "No room left after the last board; reorder boards first");
                StateError::Invalid(errors)
            })?,
        },
    };
    let board = Board {
        id: new_id(),
        name: input.name.trim().to_string(),
        order,
        created_at: now,
    };

    let mut next = state.clone();
    next.boards.push(board.clone());
    Ok((next, board))
}

pub fn update_board(
    state: &AppState,
    board_id: &str,
    patch: BoardPatch,
) -> Result<(AppState, Board), StateError> {
    let index = state
        .boards
        .iter()
        .position(|board| board.id == board_id)
        .ok_or_else(|| StateError::BoardNotFound(board_id.to_string()))?;
    let mut errors = ValidationErrors::new();
    if let Some(name) = &patch.name {
        errors.merge_field("name", validate_board_name(name));
    }
    if let Some(order) = patch.order {
        errors.merge_field("order", validate_board_order(order));
    }
    errors.into_result()?;

    let mut next = state.clone();
    let board = &mut next.boards[index];
    if let Some(name) = patch.name {
        board.name = name.trim().to_string();
    }
    if let Some(order) = patch.order {
        board.order = order;
    }
    let board = board.clone();
    Ok((next, board))
}

/// Removes a board together with its tasks. Log entries for those tasks stay.
pub fn delete_board(state: &AppState, board_id: &str) -> Result<(AppState, Board), StateError> {
    let board = state
        .board(board_id)
        .cloned()
        .ok_or_else(|| StateError::BoardNotFound(board_id.to_string()))?;

    let mut next = state.clone();
    next.boards.retain(|b| b.id != board_id);
    next.tasks.retain(|task| task.board_id != board_id);
    Ok((next, board))
}

/// Assigns display order by position in `ordered_ids`. Boards left out keep
/// their relative order and are placed after the listed ones.
pub fn reorder_boards(state: &AppState, ordered_ids: &[String]) -> Result<AppState, StateError> {
    for id in ordered_ids {
        require_board(state, id)?;
    }

    let mut next = state.clone();
    let listed = ordered_ids.len() as i64;
    let mut unlisted: Vec<&Board> = state
        .boards
        .iter()
        .filter(|board| !ordered_ids.contains(&board.id))
        .collect();
    unlisted.sort_by_key(|board| board.order);
    let unlisted_ids: Vec<String> = unlisted.iter().map(|board| board.id.clone()).collect();

    for board in next.boards.iter_mut() {
        if let Some(position) = ordered_ids.iter().position(|id| *id == board.id) {
            board.order = position as i64;
        } else if let Some(position) = unlisted_ids.iter().position(|id| *id == board.id) {
            board.order = listed + position as i64;
        }
    }
    Ok(next)
}

pub fn create_task(
    state: &AppState,
    board_id: &str,
    input: NewTask,
    now: DateTime<Utc>,
) -> Result<(AppState, Task), StateError> {
    require_board(state, board_id)?;

    let defaults = &state.default_task_settings;
    let task = Task {
        id: new_id(),
        board_id: board_id.to_string(),
        name: input.name.trim().to_string(),
        description: input.description.unwrap_or_default(),
        status: input.status.unwrap_or(defaults.default_status),
        warning_hours: input.warning_hours.unwrap_or(defaults.warning_hours),
        critical_hours: input.critical_hours.unwrap_or(defaults.critical_hours),
        last_interaction: now,
        last_status_change: now,
        created_at: now,
        icon_library: input
            .icon_library
            .or(defaults.default_icon_library)
            .unwrap_or_default(),
        icon_name: input
            .icon_name
            .or_else(|| defaults.default_icon_name.clone())
            .unwrap_or_else(|| FALLBACK_ICON_NAME.to_string()),
    };

    validate_task(&TaskFields {
        name: &task.name,
        description: &task.description,
        icon_name: &task.icon_name,
        warning_hours: task.warning_hours,
        critical_hours: task.critical_hours,
    })
    .into_result()?;

    let mut next = state.clone();
    next.tasks.push(task.clone());
    Ok((next, task))
}

/// Merges the present fields of `patch` into the task and counts as an
/// interaction. A changed status is logged like any other transition.
pub fn update_task(
    state: &AppState,
    task_id: &str,
    patch: TaskPatch,
    user_id: Option<&str>,
    now: DateTime<Utc>,
) -> Result<(AppState, StatusChange), StateError> {
    let index = task_index(state, task_id)?;
    if let Some(board_id) = &patch.board_id {
        require_board(state, board_id)?;
    }

    let mut task = state.tasks[index].clone();
    let old_status = task.status;
    if let Some(board_id) = patch.board_id {
        task.board_id = board_id;
    }
    if let Some(name) = patch.name {
        task.name = name.trim().to_string();
    }
    if let Some(description) = patch.description {
        task.description = description;
    }
    if let Some(status) = patch.status {
        task.status = status;
    }
    if let Some(hours) = patch.warning_hours {
        task.warning_hours = hours;
    }
    if let Some(hours) = patch.critical_hours {
        task.critical_hours = hours;
    }
    if let Some(library) = patch.icon_library {
        task.icon_library = library;
    }
    if let Some(icon_name) = patch.icon_name {
        task.icon_name = icon_name;
    }

    validate_task(&TaskFields {
        name: &task.name,
        description: &task.description,
        icon_name: &task.icon_name,
        warning_hours: task.warning_hours,
        critical_hours: task.critical_hours,
    })
    .into_result()?;

    task.last_interaction = now;
    let log = if task.status != old_status {
        task.last_status_change = now;
        Some(log_entry(&task, old_status, user_id, now))
    } else {
        None
    };

    let mut next = state.clone();
    next.tasks[index] = task.clone();
    if let Some(entry) = &log {
        next.status_change_logs.push(entry.clone());
    }
    Ok((next, StatusChange { task, log }))
}

pub fn change_task_status(
    state: &AppState,
    task_id: &str,
    new_status: TaskStatus,
    user_id: Option<&str>,
    now: DateTime<Utc>,
) -> Result<(AppState, StatusChange), StateError> {
    let index = task_index(state, task_id)?;

    let mut task = state.tasks[index].clone();
    let old_status = task.status;
    task.status = new_status;
    task.last_interaction = now;
    task.last_status_change = now;

    let log = (old_status != new_status).then(|| log_entry(&task, old_status, user_id, now));

    let mut next = state.clone();
    next.tasks[index] = task.clone();
    if let Some(entry) = &log {
        next.status_change_logs.push(entry.clone());
    }
    Ok((next, StatusChange { task, log }))
}

/// A tap advances the status cycle; a long press only asks for the editor and
/// leaves the state as it was.
pub fn interact_with_task(
    state: &AppState,
    task_id: &str,
    interaction: Interaction,
    user_id: Option<&str>,
    now: DateTime<Utc>,
) -> Result<(AppState, InteractionOutcome), StateError> {
    let index = task_index(state, task_id)?;
    let task = &state.tasks[index];

    match interaction {
        Interaction::LongPress => Ok((
            state.clone(),
            InteractionOutcome::EditRequested(task.clone()),
        )),
        Interaction::Tap => {
            let (next, change) =
                change_task_status(state, task_id, task.status.next(), user_id, now)?;
            Ok((next, InteractionOutcome::StatusChanged(change)))
        }
    }
}

pub fn delete_task(state: &AppState, task_id: &str) -> Result<(AppState, Task), StateError> {
    let index = task_index(state, task_id)?;
    let mut next = state.clone();
    let task = next.tasks.remove(index);
    Ok((next, task))
}

fn urgency_rank(status: TaskStatus) -> u8 {
    match status {
        TaskStatus::Active => 0,
        TaskStatus::Warning => 1,
        TaskStatus::Critical => 2,
        TaskStatus::Completed => 3,
    }
}

/// Promotes tasks whose idle time has crossed a threshold. Completed tasks are
/// left alone and nothing is ever demoted. Returns the log entries appended.
pub fn escalate_tasks(state: &AppState, now: DateTime<Utc>) -> (AppState, Vec<StatusChangeLog>) {
    let mut next = state.clone();
    let mut appended = Vec::new();

    for task in next.tasks.iter_mut() {
        if task.status == TaskStatus::Completed {
            continue;
        }
        let elapsed = elapsed_hours(task.last_interaction, now);
        let tier = derived_tier(elapsed, task.warning_hours, task.critical_hours);
        if urgency_rank(tier) > urgency_rank(task.status) {
            let old_status = task.status;
            task.status = tier;
            task.last_status_change = now;
            appended.push(log_entry(task, old_status, None, now));
        }
    }

    next.status_change_logs.extend(appended.iter().cloned());
    (next, appended)
}

pub fn update_default_settings(
    state: &AppState,
    settings: DefaultTaskSettings,
) -> Result<AppState, StateError> {
    let mut errors = ValidationErrors::new();
    validate_thresholds(&mut errors, settings.warning_hours, settings.critical_hours);
    if let Some(name) = &settings.default_icon_name {
        if name.trim().is_empty() {
            errors.add("defaultIconName", "Icon name is required");
        }
    }
    errors.into_result()?;

    let mut next = state.clone();
    next.default_task_settings = settings;
    Ok(next)
}

/// Replaces boards, tasks and the log with the seed data. Default settings
/// survive a reset.
pub fn reset_state(state: &AppState, now: DateTime<Utc>) -> AppState {
    let mut next = seed::initial_state(now);
    next.default_task_settings = state.default_task_settings.clone();
    next
}
