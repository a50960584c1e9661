use tracing::debug;

use doctor_cell::models::WorkingHours;
use shared_models::TimeOfDay;

use crate::models::{AvailabilityError, ExistingAppointment};

/// Minutes an existing booking must start before the requested time to stay clear.
pub const BUFFER_BEFORE_MINUTES: i32 = 30;
/// Minutes an existing booking must start after the requested time to stay clear.
pub const BUFFER_AFTER_MINUTES: i32 = 15;

/// Span of start times around a requested slot that block it, in signed
/// minutes since midnight. Either end may fall outside the day; there is no
/// wraparound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictWindow {
    pub start: i32,
    pub end: i32,
}

impl ConflictWindow {
    pub fn around(requested: TimeOfDay) -> Self {
        let minutes = i32::from(requested.minutes());
        Self {
            start: minutes - BUFFER_BEFORE_MINUTES,
            end: minutes + BUFFER_AFTER_MINUTES,
        }
    }

    /// Inclusive at both ends.
    pub fn contains(&self, time: TimeOfDay) -> bool {
        let minutes = i32::from(time.minutes());
        minutes >= self.start && minutes <= self.end
    }
}

/// Decides whether a requested time can be booked against a doctor's working
/// hours and the bookings already recorded for that doctor on that date.
///
/// Pure: no I/O and no reservation. Callers filter `existing` to the right
/// doctor and date beforehand.
#[derive(Debug, Default, Clone, Copy)]
pub struct AvailabilityChecker;

impl AvailabilityChecker {
    pub fn new() -> Self {
        Self
    }

    /// Parse `requested_time` (`HH:mm` or `hh:mm AM/PM`) and check it.
    pub fn check_availability(
        &self,
        working_hours: &WorkingHours,
        requested_time: &str,
        existing: &[ExistingAppointment],
    ) -> Result<TimeOfDay, AvailabilityError> {
        let requested = TimeOfDay::parse(requested_time)
            .map_err(|e| AvailabilityError::InvalidTimeFormat(e.to_string()))?;

        self.check_slot(working_hours, requested, existing)?;
        Ok(requested)
    }

    pub fn check_slot(
        &self,
        working_hours: &WorkingHours,
        requested: TimeOfDay,
        existing: &[ExistingAppointment],
    ) -> Result<(), AvailabilityError> {
        if !working_hours.contains(requested) {
            debug!("Requested time {} outside working hours {:?}", requested, working_hours);
            return Err(AvailabilityError::OutOfWorkingHours {
                window: working_hours.display_12_hour(),
            });
        }

        let window = ConflictWindow::around(requested);

        let conflict = existing
            .iter()
            .filter(|appointment| appointment.status.blocks_slot())
            .find(|appointment| window.contains(appointment.time));

        if let Some(appointment) = conflict {
            debug!(
                "Requested time {} conflicts with booking at {} ({})",
                requested, appointment.time, appointment.status
            );
            return Err(AvailabilityError::SlotConflict);
        }

        Ok(())
    }
}
