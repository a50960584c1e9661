use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Recipient {
    User(String),
    Admins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewDoctorRequest,
    NewAppointmentRequest,
    AppointmentStatusChanged,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub recipient: Recipient,
    pub kind: NotificationKind,
    pub message: String,
    pub on_click_path: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        recipient: Recipient,
        kind: NotificationKind,
        message: impl Into<String>,
        on_click_path: impl Into<String>,
    ) -> Self {
        Self {
            recipient,
            kind,
            message: message.into(),
            on_click_path: on_click_path.into(),
            created_at: Utc::now(),
        }
    }
}
