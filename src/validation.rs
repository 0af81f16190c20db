use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub const MIN_BOARD_NAME_LENGTH: usize = 3;
pub const MAX_BOARD_NAME_LENGTH: usize = 50;
pub const MIN_TASK_NAME_LENGTH: usize = 3;
pub const MAX_TASK_NAME_LENGTH: usize = 100;
pub const MAX_TASK_DESCRIPTION_LENGTH: usize = 1000;
pub const MIN_THRESHOLD_HOURS: f64 = 1.0;
pub const MAX_BOARD_ORDER: i64 = 1_000_000;

/// Field name to message. Empty means the input passed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn merge_field(&mut self, field: &str, message: Option<String>) {
        if let Some(message) = message {
            self.add(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self
            .0
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect();
        f.write_str(&joined.join("; "))
    }
}

fn validate_length(value: &str, min: usize, max: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some("This field is required".to_string());
    }
    let len = trimmed.chars().count();
    if len < min {
        return Some(format!("Minimum length is {min} characters"));
    }
    if len > max {
        return Some(format!("Maximum length is {max} characters"));
    }
    None
}

pub fn validate_board_name(name: &str) -> Option<String> {
    validate_length(name, MIN_BOARD_NAME_LENGTH, MAX_BOARD_NAME_LENGTH)
}

pub fn validate_board_order(order: i64) -> Option<String> {
    if (0..=MAX_BOARD_ORDER).contains(&order) {
        None
    } else {
        Some(format!("Order must be between 0 and {MAX_BOARD_ORDER}"))
    }
}

pub fn validate_task_name(name: &str) -> Option<String> {
    validate_length(name, MIN_TASK_NAME_LENGTH, MAX_TASK_NAME_LENGTH)
}

pub fn validate_task_description(description: &str) -> Option<String> {
    if description.chars().count() > MAX_TASK_DESCRIPTION_LENGTH {
        Some(format!(
            "Maximum length is {MAX_TASK_DESCRIPTION_LENGTH} characters"
        ))
    } else {
        None
    }
}

/// Threshold checks shared by task creation, task edits and default settings.
pub fn validate_thresholds(errors: &mut ValidationErrors, warning_hours: f64, critical_hours: f64) {
    if warning_hours.is_nan() || warning_hours < MIN_THRESHOLD_HOURS {
        errors.add("warningHours", "Warning hours must be at least 1");
    }
    if critical_hours.is_nan() || critical_hours < MIN_THRESHOLD_HOURS {
        errors.add("criticalHours", "Critical hours must be at least 1");
    } else if critical_hours <= warning_hours {
        errors.add(
            "criticalHours",
            "Critical hours must be greater than warning hours",
        );
    }
}

pub struct TaskFields<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub icon_name: &'a str,
    pub warning_hours: f64,
    pub critical_hours: f64,
}

pub fn validate_task(fields: &TaskFields<'_>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.merge_field("name", validate_task_name(fields.name));
    errors.merge_field("description", validate_task_description(fields.description));
    if fields.icon_name.trim().is_empty() {
        errors.add("iconName", "Icon name is required");
    }
    validate_thresholds(&mut errors, fields.warning_hours, fields.critical_hours);
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields<'a>(name: &'a str, warning: f64, critical: f64) -> TaskFields<'a> {
        TaskFields {
            name,
            description: "",
            icon_name: "FaCar",
            warning_hours: warning,
            critical_hours: critical,
        }
    }

    #[test]
    fn board_name_bounds() {
        assert!(validate_board_name("Home").is_none());
        assert_eq!(
            validate_board_name("   ").as_deref(),
            Some("This field is required")
        );
        assert_eq!(
            validate_board_name("ab").as_deref(),
            Some("Minimum length is 3 characters")
        );
        assert!(validate_board_name(&"x".repeat(51)).is_some());
        // multibyte names count characters, not bytes
        assert!(validate_board_name("Дом").is_none());
    }

    #[test]
    fn board_order_bounds() {
        assert!(validate_board_order(0).is_none());
        assert!(validate_board_order(MAX_BOARD_ORDER).is_none());
        assert!(validate_board_order(-1).is_some());
        assert!(validate_board_order(i64::MAX).is_some());
    }

    #[test]
    fn valid_task_passes() {
        assert!(validate_task(&fields("Laundry", 24.0, 48.0)).is_empty());
    }

    #[test]
    fn critical_must_exceed_warning() {
        let errors = validate_task(&fields("Laundry", 24.0, 24.0));
        assert_eq!(
            errors.get("criticalHours"),
            Some("Critical hours must be greater than warning hours")
        );
    }

    #[test]
    fn thresholds_below_one_hour_are_rejected() {
        let errors = validate_task(&fields("Laundry", 0.0, 0.5));
        assert!(errors.get("warningHours").is_some());
        assert_eq!(errors.get("criticalHours"), Some("Critical hours must be at least 1"));
    }

    #[test]
    fn collects_every_failing_field() {
        let errors = validate_task(&TaskFields {
            name: "x",
            description: &"d".repeat(1001),
            icon_name: " ",
            warning_hours: 2.0,
            critical_hours: 1.0,
        });
        assert!(errors.get("name").is_some());
        assert!(errors.get("description").is_some());
        assert!(errors.get("iconName").is_some());
        assert!(errors.get("criticalHours").is_some());
        assert!(errors.into_result().is_err());
    }
}
