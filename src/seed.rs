use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::app_state::{AppState, DefaultTaskSettings};
use crate::models::board::Board;
use crate::models::icon::random_icon;
use crate::models::task::{Task, TaskStatus};

const DAY: f64 = 24.0;

// (board, [(task, warning hours)]); critical is always twice the warning.
const SEED: &[(&str, &[(&str, f64)])] = &[
    (
        "Health",
        &[
            ("Dental Cleaning", 7.0 * DAY),
            ("Eye Check-up", 30.0 * DAY),
            ("Blood Tests", 14.0 * DAY),
            ("Vitamins", 3.0 * DAY),
        ],
    ),
    (
        "Self Care",
        &[
            ("Haircut", 7.0 * DAY),
            ("Manicure", 3.0 * DAY),
            ("Cosmetics Shopping", 7.0 * DAY),
            ("Skin Care", DAY),
        ],
    ),
    (
        "Home",
        &[
            ("Deep Cleaning", DAY),
            ("Bedding Change", 2.0 * DAY),
            ("Fridge Cleaning", 7.0 * DAY),
            ("Laundry", DAY),
        ],
    ),
    (
        "Sports",
        &[
            ("Upper Body Workout", 2.0 * DAY),
            ("Cardio", 3.0 * DAY),
            ("Stretching/Yoga", 12.0),
            ("Swimming", 2.0 * DAY),
        ],
    ),
];

/// The state a fresh install starts with: four boards of four tasks each.
pub fn initial_state(now: DateTime<Utc>) -> AppState {
    let mut rng = rand::thread_rng();
    let mut boards = Vec::with_capacity(SEED.len());
    let mut tasks = Vec::new();

    for (order, (board_name, board_tasks)) in SEED.iter().enumerate() {
        let board = Board {
            id: Uuid::new_v4().to_string(),
            name: board_name.to_string(),
            order: order as i64,
            created_at: now,
        };

        for (task_name, warning_hours) in board_tasks.iter() {
            let icon = random_icon(&mut rng);
            tasks.push(Task {
                id: Uuid::new_v4().to_string(),
                board_id: board.id.clone(),
                name: task_name.to_string(),
                description: String::new(),
                status: TaskStatus::Active,
                warning_hours: *warning_hours,
                critical_hours: warning_hours * 2.0,
                last_interaction: now,
                last_status_change: now,
                created_at: now,
                icon_library: icon.library,
                icon_name: icon.name.to_string(),
            });
        }
        boards.push(board);
    }

    AppState {
        boards,
        tasks,
        status_change_logs: Vec::new(),
        default_task_settings: DefaultTaskSettings::default(),
    }
}
