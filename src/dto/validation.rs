//! Validation helpers for DTOs.

use validator::ValidationError;

use crate::dao::models::AgentDelta;

const MAX_DELTA_MAGNITUDE: i64 = 1000;

/// Validates a counter delta: at least one field present, each within
/// ±1000.
pub fn validate_delta(delta: &AgentDelta) -> Result<(), ValidationError> {
    if delta.is_empty() {
        let mut err = ValidationError::new("delta_empty");
        err.message = Some("Delta must change at least one counter".into());
        return Err(err);
    }

    for value in [delta.submissions, delta.activations, delta.points]
        .into_iter()
        .flatten()
    {
        if value.abs() > MAX_DELTA_MAGNITUDE {
            let mut err = ValidationError::new("delta_magnitude");
            err.message = Some(
                format!("Delta values must stay within ±{MAX_DELTA_MAGNITUDE} (got {value})")
                    .into(),
            );
            return Err(err);
        }
    }

    Ok(())
}

/// Validates a `YYYY-MM-DD` calendar date with a real month/day.
pub fn validate_calendar_date(date: &str) -> Result<(), ValidationError> {
    let format = time::macros::format_description!("[year]-[month]-[day]");
    if time::Date::parse(date, &format).is_err() {
        let mut err = ValidationError::new("date_format");
        err.message = Some(format!("Expected a YYYY-MM-DD date (got `{date}`)").into());
        return Err(err);
    }
    Ok(())
}

/// Validates a booking slot label: either a 12-hour time (`10:30 AM`) or a
/// range of two (`10:30 AM - 11:30 AM`). Membership in the configured slot
/// set is checked separately by the booking service.
pub fn validate_slot_label(slot: &str) -> Result<(), ValidationError> {
    let invalid = || {
        let mut err = ValidationError::new("slot_format");
        err.message = Some(
            format!("Expected a slot label like `10:30 AM - 11:30 AM` (got `{slot}`)").into(),
        );
        err
    };

    let mut parts = slot.split(" - ");
    let (first, second) = (parts.next(), parts.next());
    if parts.next().is_some() {
        return Err(invalid());
    }

    for time in [first, second].into_iter().flatten() {
        validate_clock_time(time).map_err(|_| invalid())?;
    }
    first.map(|_| ()).ok_or_else(invalid)
}

fn validate_clock_time(time: &str) -> Result<(), ()> {
    let (clock, meridiem) = time.split_once(' ').ok_or(())?;
    if meridiem != "AM" && meridiem != "PM" {
        return Err(());
    }

    let (hours, minutes) = clock.split_once(':').ok_or(())?;
    let hours: u8 = hours.parse().map_err(|_| ())?;
    if hours == 0 || hours > 12 || minutes.len() != 2 {
        return Err(());
    }
    let minutes: u8 = minutes.parse().map_err(|_| ())?;
    if minutes > 59 {
        return Err(());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_delta_requires_a_field() {
        assert!(validate_delta(&AgentDelta::default()).is_err());
        assert!(
            validate_delta(&AgentDelta {
                submissions: Some(1),
                ..AgentDelta::default()
            })
            .is_ok()
        );
    }

    #[test]
    fn test_validate_delta_bounds() {
        assert!(
            validate_delta(&AgentDelta {
                points: Some(-1000),
                ..AgentDelta::default()
            })
            .is_ok()
        );
        assert!(
            validate_delta(&AgentDelta {
                points: Some(1001),
                ..AgentDelta::default()
            })
            .is_err()
        );
    }

    #[test]
    fn test_validate_calendar_date() {
        assert!(validate_calendar_date("2026-03-02").is_ok());
        assert!(validate_calendar_date("2026-02-29").is_err()); // not a leap year
        assert!(validate_calendar_date("02-03-2026").is_err());
        assert!(validate_calendar_date("2026-3-2").is_err());
        assert!(validate_calendar_date("").is_err());
    }

    #[test]
    fn test_validate_slot_label() {
        assert!(validate_slot_label("10:30 AM").is_ok());
        assert!(validate_slot_label("10:30 AM - 11:30 AM").is_ok());
        assert!(validate_slot_label("12:30 PM - 01:30 PM").is_ok());
        assert!(validate_slot_label("13:00 AM").is_err()); // 12-hour clock
        assert!(validate_slot_label("10:30").is_err()); // missing meridiem
        assert!(validate_slot_label("10:30 am").is_err()); // lowercase
        assert!(validate_slot_label("10:7 AM").is_err()); // minutes not 2 digits
        assert!(validate_slot_label("10:30 AM - 11:30 AM - 12:30 PM").is_err());
        assert!(validate_slot_label("").is_err());
    }
}
