use assert_matches::assert_matches;
use uuid::Uuid;

use appointment_cell::models::{AppointmentStatus, AvailabilityError, ExistingAppointment};
use appointment_cell::{AvailabilityChecker, ConflictWindow};
use doctor_cell::models::WorkingHours;
use shared_models::TimeOfDay;

fn at(time: &str) -> TimeOfDay {
    TimeOfDay::parse(time).unwrap()
}

fn hours(from: &str, to: &str) -> WorkingHours {
    WorkingHours::new(at(from), at(to)).unwrap()
}

fn booked(time: &str, status: AppointmentStatus) -> ExistingAppointment {
    ExistingAppointment {
        doctor_id: Uuid::nil(),
        date: "2024-05-01".to_string(),
        time: at(time),
        status,
    }
}

fn pending(times: &[&str]) -> Vec<ExistingAppointment> {
    times.iter().map(|t| booked(t, AppointmentStatus::Pending)).collect()
}

fn from_minutes(minutes: i32) -> TimeOfDay {
    TimeOfDay::from_minutes(minutes as u16).unwrap()
}

#[test]
fn test_clear_slot_is_available() {
    let checker = AvailabilityChecker::new();
    let result = checker.check_availability(&hours("09:00", "17:00"), "10:00", &pending(&["09:20", "11:00"]));
    assert_eq!(result, Ok(at("10:00")));
}

#[test]
fn test_booking_inside_window_conflicts() {
    let checker = AvailabilityChecker::new();
    let result = checker.check_availability(&hours("09:00", "17:00"), "10:00", &pending(&["09:45"]));
    assert_eq!(result, Err(AvailabilityError::SlotConflict));
}

#[test]
fn test_before_opening_reports_12_hour_window() {
    let checker = AvailabilityChecker::new();
    let result = checker.check_availability(&hours("09:00", "17:00"), "08:59", &[]);

    assert_matches!(result, Err(AvailabilityError::OutOfWorkingHours { ref window }) if window == "09:00 AM to 05:00 PM");
    assert_eq!(
        result.unwrap_err().to_string(),
        "Doctor is only available from 09:00 AM to 05:00 PM"
    );
}

#[test]
fn test_window_rendered_in_12_hour_form_for_12_hour_input() {
    let checker = AvailabilityChecker::new();
    let working_hours = hours("09:00 AM", "05:00 PM");

    for requested in ["05:01 PM", "17:01", "12:00 AM", "23:59"] {
        assert_eq!(
            checker.check_availability(&working_hours, requested, &[]),
            Err(AvailabilityError::OutOfWorkingHours {
                window: "09:00 AM to 05:00 PM".to_string()
            }),
            "requested {}",
            requested
        );
    }
}

#[test]
fn test_working_hour_bounds_are_inclusive() {
    let checker = AvailabilityChecker::new();

    for (from, to) in [("09:00", "17:00"), ("00:00", "23:59"), ("12:30", "12:30"), ("06:15", "06:45")] {
        let working_hours = hours(from, to);
        assert!(checker.check_slot(&working_hours, at(from), &[]).is_ok(), "{}-{} at start", from, to);
        assert!(checker.check_slot(&working_hours, at(to), &[]).is_ok(), "{}-{} at end", from, to);
    }
}

#[test]
fn test_strictly_outside_working_hours() {
    let checker = AvailabilityChecker::new();
    let working_hours = hours("09:00", "17:00");

    for minutes in [0, 8 * 60 + 59, 17 * 60 + 1, 1439] {
        assert_matches!(
            checker.check_slot(&working_hours, from_minutes(minutes), &[]),
            Err(AvailabilityError::OutOfWorkingHours { .. })
        );
    }
}

#[test]
fn test_conflict_window_edges() {
    let checker = AvailabilityChecker::new();
    let working_hours = hours("09:00", "17:00");

    for requested in ["10:00", "12:45", "16:59"] {
        let r = i32::from(at(requested).minutes());
        let check = |offset: i32| {
            let existing = vec![ExistingAppointment {
                time: from_minutes(r + offset),
                ..booked("00:00", AppointmentStatus::Approved)
            }];
            checker.check_slot(&working_hours, at(requested), &existing)
        };

        assert_eq!(check(-30), Err(AvailabilityError::SlotConflict), "{} - 30", requested);
        assert_eq!(check(15), Err(AvailabilityError::SlotConflict), "{} + 15", requested);
        assert_eq!(check(0), Err(AvailabilityError::SlotConflict), "{} exact", requested);
        assert_eq!(check(-31), Ok(()), "{} - 31", requested);
        assert_eq!(check(16), Ok(()), "{} + 16", requested);
    }
}

#[test]
fn test_rejected_appointments_never_conflict() {
    let checker = AvailabilityChecker::new();
    let existing = vec![
        booked("10:00", AppointmentStatus::Rejected),
        booked("09:45", AppointmentStatus::Rejected),
    ];

    assert!(checker.check_slot(&hours("09:00", "17:00"), at("10:00"), &existing).is_ok());

    let existing = vec![booked("10:10", AppointmentStatus::Approved)];
    assert_eq!(
        checker.check_slot(&hours("09:00", "17:00"), at("10:00"), &existing),
        Err(AvailabilityError::SlotConflict)
    );
}

#[test]
fn test_window_may_extend_outside_working_hours() {
    let checker = AvailabilityChecker::new();
    // 08:45 booking sits before opening but inside the window of a 09:00 request
    let existing = pending(&["08:45"]);
    assert_eq!(
        checker.check_slot(&hours("09:00", "17:00"), at("09:00"), &existing),
        Err(AvailabilityError::SlotConflict)
    );

    let window = ConflictWindow::around(at("00:10"));
    assert_eq!(window, ConflictWindow { start: -20, end: 25 });
    assert!(!window.contains(at("23:50")));
}

#[test]
fn test_format_equivalence() {
    let checker = AvailabilityChecker::new();
    let cases = [
        (hours("09:00", "17:00"), pending(&[])),
        (hours("09:00", "17:00"), pending(&["14:00"])),
        (hours("09:00", "17:00"), pending(&["14:50"])),
        (hours("15:00", "17:00"), pending(&[])),
    ];

    for (working_hours, existing) in &cases {
        let twelve = checker.check_availability(working_hours, "02:30 PM", existing);
        let twenty_four = checker.check_availability(working_hours, "14:30", existing);
        assert_eq!(twelve, twenty_four);
    }
}

#[test]
fn test_idempotent() {
    let checker = AvailabilityChecker::new();
    let working_hours = hours("09:00", "17:00");
    let existing = pending(&["09:45", "13:00"]);

    for requested in ["10:00", "11:30", "08:00", "bogus"] {
        let first = checker.check_availability(&working_hours, requested, &existing);
        let second = checker.check_availability(&working_hours, requested, &existing);
        assert_eq!(first, second);
    }
}

#[test]
fn test_invalid_time_format() {
    let checker = AvailabilityChecker::new();
    let working_hours = hours("09:00", "17:00");

    for requested in ["", "10", "10:00 XM", "25:00", "ten o'clock", "10:5", "10:00PM"] {
        assert_matches!(
            checker.check_availability(&working_hours, requested, &[]),
            Err(AvailabilityError::InvalidTimeFormat(_)),
            "requested {:?}",
            requested
        );
    }
}
