use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;
use shared_models::TimeOfDay;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub specialization: String,
    pub experience_years: i32,
    pub fee_per_consultation: f64,
    pub working_hours: WorkingHours,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Doctor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Daily window in which a doctor accepts appointments. Same-day only:
/// `from_time <= to_time`, no wraparound past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub from_time: TimeOfDay,
    pub to_time: TimeOfDay,
}

impl WorkingHours {
    pub fn new(from_time: TimeOfDay, to_time: TimeOfDay) -> Result<Self, DoctorError> {
        if from_time > to_time {
            return Err(DoctorError::InvalidWorkingHours(format!(
                "start {} is after end {}",
                from_time, to_time
            )));
        }
        Ok(Self { from_time, to_time })
    }

    /// Inclusive at both ends.
    pub fn contains(&self, time: TimeOfDay) -> bool {
        self.from_time <= time && time <= self.to_time
    }

    /// e.g. `09:00 AM to 05:00 PM`
    pub fn display_12_hour(&self) -> String {
        format!("{} to {}", self.from_time.to_12_hour(), self.to_time.to_12_hour())
    }
}

// Raw strings so either accepted time form can be reported precisely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingHoursRequest {
    pub from_time: String,
    pub to_time: String,
}

impl WorkingHoursRequest {
    pub fn parse(&self) -> Result<WorkingHours, DoctorError> {
        let from_time = TimeOfDay::parse(&self.from_time)
            .map_err(|e| DoctorError::InvalidTimeFormat(e.to_string()))?;
        let to_time = TimeOfDay::parse(&self.to_time)
            .map_err(|e| DoctorError::InvalidTimeFormat(e.to_string()))?;
        WorkingHours::new(from_time, to_time)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyDoctorRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub specialization: String,
    pub experience_years: i32,
    pub fee_per_consultation: f64,
    pub working_hours: WorkingHoursRequest,
}

#[derive(Debug, Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("A doctor application already exists for this account")]
    AlreadyApplied,

    #[error("{0}")]
    InvalidTimeFormat(String),

    #[error("Invalid working hours: {0}")]
    InvalidWorkingHours(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<shared_database::StoreError> for DoctorError {
    fn from(err: shared_database::StoreError) -> Self {
        DoctorError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for DoctorError {
    fn from(err: serde_json::Error) -> Self {
        DoctorError::Database(format!("Failed to parse doctor record: {}", err))
    }
}

impl From<DoctorError> for AppError {
    fn from(err: DoctorError) -> Self {
        let message = err.to_string();
        match err {
            DoctorError::NotFound => AppError::NotFound(message),
            DoctorError::AlreadyApplied => AppError::Conflict(message),
            DoctorError::InvalidTimeFormat(_)
            | DoctorError::InvalidWorkingHours(_)
            | DoctorError::ValidationError(_) => AppError::ValidationError(message),
            DoctorError::Database(_) => AppError::Database(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn hours(from: &str, to: &str) -> Result<WorkingHours, DoctorError> {
        WorkingHoursRequest {
            from_time: from.to_string(),
            to_time: to.to_string(),
        }
        .parse()
    }

    #[test]
    fn accepts_mixed_time_forms() {
        let parsed = hours("09:00 AM", "17:00").unwrap();
        assert_eq!(parsed, hours("09:00", "05:00 PM").unwrap());
        assert_eq!(parsed.display_12_hour(), "09:00 AM to 05:00 PM");
    }

    #[test]
    fn zero_length_window_is_allowed() {
        let parsed = hours("12:00", "12:00").unwrap();
        assert!(parsed.contains(TimeOfDay::parse("12:00").unwrap()));
    }

    #[test]
    fn rejects_overnight_window() {
        assert_matches!(hours("22:00", "06:00"), Err(DoctorError::InvalidWorkingHours(_)));
    }

    #[test]
    fn rejects_unparseable_times() {
        assert_matches!(hours("nine", "17:00"), Err(DoctorError::InvalidTimeFormat(_)));
        assert_matches!(hours("09:00", "5pm-ish"), Err(DoctorError::InvalidTimeFormat(_)));
    }

    #[test]
    fn contains_is_inclusive() {
        let window = hours("09:00", "17:00").unwrap();
        let at = |s: &str| TimeOfDay::parse(s).unwrap();

        assert!(window.contains(at("09:00")));
        assert!(window.contains(at("17:00")));
        assert!(!window.contains(at("08:59")));
        assert!(!window.contains(at("17:01")));
    }
}
