use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use shared_database::DocumentStore;
use shared_models::auth::User;
use shared_models::notification::{Notification, NotificationKind, Recipient};
use shared_utils::{AppState, Notifier};

use crate::models::{ApplyDoctorRequest, Doctor, DoctorError};

pub const DOCTORS: &str = "doctors";

pub struct DoctorService {
    store: Arc<DocumentStore>,
    notifier: Arc<dyn Notifier>,
}

impl DoctorService {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            notifier: state.notifier.clone(),
        }
    }

    /// Register the calling user as a doctor and let the admins know.
    pub async fn apply(&self, user: &User, request: ApplyDoctorRequest) -> Result<Doctor, DoctorError> {
        debug!("Doctor application from user: {}", user.id);

        let working_hours = request.working_hours.parse()?;

        if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
            return Err(DoctorError::ValidationError("First and last name are required".to_string()));
        }
        if request.experience_years < 0 {
            return Err(DoctorError::ValidationError("Experience cannot be negative".to_string()));
        }
        if request.fee_per_consultation < 0.0 {
            return Err(DoctorError::ValidationError("Consultation fee cannot be negative".to_string()));
        }

        let doctor_data = json!({
            "user_id": user.id,
            "first_name": request.first_name.trim(),
            "last_name": request.last_name.trim(),
            "email": request.email,
            "phone_number": request.phone_number,
            "specialization": request.specialization,
            "experience_years": request.experience_years,
            "fee_per_consultation": request.fee_per_consultation,
            "working_hours": working_hours,
        });

        let stored = self
            .store
            .insert_checked(DOCTORS, &json!({ "user_id": user.id }), doctor_data, |existing| {
                if existing.is_empty() {
                    Ok(())
                } else {
                    warn!("User {} already has a doctor application", user.id);
                    Err(DoctorError::AlreadyApplied)
                }
            })
            .await?;

        let doctor: Doctor = serde_json::from_value(stored)?;
        info!("Doctor {} registered with hours {}", doctor.id, doctor.working_hours.display_12_hour());

        self.notifier
            .notify(Notification::new(
                Recipient::Admins,
                NotificationKind::NewDoctorRequest,
                format!("{} has applied for a doctor account", doctor.full_name()),
                "/admin/doctors",
            ))
            .await;

        Ok(doctor)
    }

    pub async fn get_doctor(&self, doctor_id: &str) -> Result<Doctor, DoctorError> {
        debug!("Fetching doctor: {}", doctor_id);

        let document = self
            .store
            .find_by_id(DOCTORS, doctor_id)
            .await
            .ok_or(DoctorError::NotFound)?;

        Ok(serde_json::from_value(document)?)
    }
}
