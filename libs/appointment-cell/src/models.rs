// libs/appointment-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;
use shared_models::TimeOfDay;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub user_id: String,
    /// Opaque calendar date, matched by exact string equality.
    pub date: String,
    pub time: TimeOfDay,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Rejected,
}

impl AppointmentStatus {
    /// Rejected appointments never block a slot.
    pub fn blocks_slot(self) -> bool {
        !matches!(self, AppointmentStatus::Rejected)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Approved => write!(f, "approved"),
            AppointmentStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// What the availability check needs to know about a booking that already
/// exists for the doctor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingAppointment {
    pub doctor_id: Uuid,
    pub date: String,
    pub time: TimeOfDay,
    pub status: AppointmentStatus,
}

impl From<&Appointment> for ExistingAppointment {
    fn from(appointment: &Appointment) -> Self {
        Self {
            doctor_id: appointment.doctor_id,
            date: appointment.date.clone(),
            time: appointment.time,
            status: appointment.status,
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: String,
    pub date: String,
    /// `HH:mm` or `hh:mm AM/PM`
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAppointmentStatusRequest {
    pub status: AppointmentStatus,
}

// ==============================================================================
// ERRORS
// ==============================================================================

/// Why a requested slot cannot be booked.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    #[error("{0}")]
    InvalidTimeFormat(String),

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Doctor is only available from {window}")]
    OutOfWorkingHours { window: String },

    #[error("Appointments not available at the requested time")]
    SlotConflict,
}

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error(transparent)]
    Unavailable(#[from] AvailabilityError),

    #[error("Appointment not found")]
    NotFound,

    #[error("Appointment cannot move from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Unauthorized access to appointment")]
    Unauthorized,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<shared_database::StoreError> for AppointmentError {
    fn from(err: shared_database::StoreError) -> Self {
        AppointmentError::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for AppointmentError {
    fn from(err: serde_json::Error) -> Self {
        AppointmentError::DatabaseError(format!("Failed to parse appointment record: {}", err))
    }
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        let message = err.to_string();
        match err {
            AppointmentError::Unavailable(reason) => match reason {
                AvailabilityError::InvalidTimeFormat(_) => AppError::ValidationError(message),
                AvailabilityError::DoctorNotFound => AppError::NotFound(message),
                AvailabilityError::OutOfWorkingHours { .. } => AppError::BadRequest(message),
                AvailabilityError::SlotConflict => AppError::Conflict(message),
            },
            AppointmentError::NotFound => AppError::NotFound(message),
            AppointmentError::InvalidStatusTransition { .. } => AppError::BadRequest(message),
            AppointmentError::Unauthorized => AppError::Auth(message),
            AppointmentError::DatabaseError(_) => AppError::Database(message),
        }
    }
}
