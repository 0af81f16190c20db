// src/models/mod.rs

pub mod app_state;
pub mod board;
pub mod icon;
pub mod status_change_log;
pub mod task;
pub mod timestamp;
