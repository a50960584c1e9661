// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use doctor_cell::models::{Doctor, DoctorError};
use doctor_cell::services::DoctorService;
use shared_database::DocumentStore;
use shared_models::auth::User;
use shared_models::notification::{Notification, NotificationKind, Recipient};
use shared_models::TimeOfDay;
use shared_utils::{AppState, Notifier};

use crate::models::{
    Appointment, AppointmentError, AppointmentStatus, AvailabilityError,
    BookAppointmentRequest, ExistingAppointment,
};
use crate::services::conflict::AvailabilityChecker;
use crate::services::lifecycle::AppointmentLifecycleService;

pub const APPOINTMENTS: &str = "appointments";

pub struct AppointmentBookingService {
    store: Arc<DocumentStore>,
    notifier: Arc<dyn Notifier>,
    doctor_service: DoctorService,
    checker: AvailabilityChecker,
    lifecycle_service: AppointmentLifecycleService,
}

impl AppointmentBookingService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            notifier: state.notifier.clone(),
            doctor_service: DoctorService::new(state),
            checker: AvailabilityChecker::new(),
            lifecycle_service: AppointmentLifecycleService::new(),
        }
    }

    /// Answer whether the slot is bookable right now. Reserves nothing.
    pub async fn check_availability(&self, request: &BookAppointmentRequest) -> Result<(), AppointmentError> {
        debug!(
            "Checking availability for doctor {} on {} at {}",
            request.doctor_id, request.date, request.time
        );

        let doctor = self.find_doctor(&request.doctor_id).await?;
        let existing = self.existing_appointments(doctor.id, &request.date).await?;

        self.checker
            .check_availability(&doctor.working_hours, &request.time, &existing)?;

        Ok(())
    }

    /// Check and insert under one store lock, so two overlapping requests
    /// cannot both be accepted.
    pub async fn book_appointment(
        &self,
        user: &User,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Booking appointment for user {} with doctor {}", user.id, request.doctor_id);

        let doctor = self.find_doctor(&request.doctor_id).await?;
        let requested = TimeOfDay::parse(&request.time)
            .map_err(|e| AvailabilityError::InvalidTimeFormat(e.to_string()))?;

        let filter = json!({ "doctor_id": doctor.id, "date": request.date });
        let document = json!({
            "doctor_id": doctor.id,
            "user_id": user.id,
            "date": request.date,
            "time": requested,
            "status": AppointmentStatus::Pending,
        });

        let checker = self.checker;
        let working_hours = doctor.working_hours;

        let stored = self
            .store
            .insert_checked(APPOINTMENTS, &filter, document, |documents| -> Result<(), AppointmentError> {
                let existing = parse_existing(documents)?;
                checker.check_slot(&working_hours, requested, &existing)?;
                Ok(())
            })
            .await?;

        let appointment: Appointment = serde_json::from_value(stored)?;
        info!(
            "Appointment {} booked with doctor {} on {} at {}",
            appointment.id, doctor.id, appointment.date, appointment.time
        );

        self.notifier
            .notify(Notification::new(
                Recipient::User(doctor.user_id.clone()),
                NotificationKind::NewAppointmentRequest,
                format!("A new appointment request has been made by {}", user.display_name()),
                "/doctor/appointments",
            ))
            .await;

        Ok(appointment)
    }

    /// Approve or reject an appointment on behalf of its doctor (or an admin)
    /// and tell the patient.
    pub async fn update_appointment_status(
        &self,
        user: &User,
        appointment_id: &str,
        new_status: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Changing status of appointment {} to {}", appointment_id, new_status);

        let document = self
            .store
            .find_by_id(APPOINTMENTS, appointment_id)
            .await
            .ok_or(AppointmentError::NotFound)?;
        let appointment: Appointment = serde_json::from_value(document)?;

        let doctor = self.find_doctor(&appointment.doctor_id.to_string()).await?;
        if !user.is_admin() && doctor.user_id != user.id {
            return Err(AppointmentError::Unauthorized);
        }

        // transition is checked against the stored status, under the write lock
        let lifecycle_service = &self.lifecycle_service;
        let updated = self
            .store
            .update_checked(
                APPOINTMENTS,
                appointment_id,
                json!({ "status": new_status }),
                |current| -> Result<(), AppointmentError> {
                    let current_status: AppointmentStatus =
                        serde_json::from_value(current["status"].clone())?;
                    lifecycle_service.validate_status_transition(current_status, new_status)
                },
            )
            .await?
            .ok_or(AppointmentError::NotFound)?;
        let appointment: Appointment = serde_json::from_value(updated)?;

        info!("Appointment {} is now {}", appointment.id, appointment.status);

        self.notifier
            .notify(Notification::new(
                Recipient::User(appointment.user_id.clone()),
                NotificationKind::AppointmentStatusChanged,
                format!("Your appointment has been {}", appointment.status),
                "/appointments",
            ))
            .await;

        Ok(appointment)
    }

    async fn find_doctor(&self, doctor_id: &str) -> Result<Doctor, AppointmentError> {
        self.doctor_service
            .get_doctor(doctor_id)
            .await
            .map_err(|e| match e {
                DoctorError::NotFound => AvailabilityError::DoctorNotFound.into(),
                other => AppointmentError::DatabaseError(other.to_string()),
            })
    }

    async fn existing_appointments(
        &self,
        doctor_id: Uuid,
        date: &str,
    ) -> Result<Vec<ExistingAppointment>, AppointmentError> {
        let documents = self
            .store
            .find(APPOINTMENTS, &json!({ "doctor_id": doctor_id, "date": date }))
            .await;
        parse_existing(&documents)
    }
}

fn parse_existing(documents: &[Value]) -> Result<Vec<ExistingAppointment>, AppointmentError> {
    documents
        .iter()
        .map(|document| {
            serde_json::from_value::<Appointment>(document.clone())
                .map(|appointment| ExistingAppointment::from(&appointment))
                .map_err(AppointmentError::from)
        })
        .collect()
}
