// Display formatting: durations as clock strings, time-slot labels
use chrono::{Duration, NaiveTime, Timelike};

/// Format a duration in seconds as `HH:MM:SS`. Hours are not capped at 24,
/// fractional seconds are truncated.
pub fn seconds_to_hms(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Format a duration in seconds as `HH:MM` (bar labels on the agent
/// response-time chart).
pub fn seconds_to_hm(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    format!("{:02}:{:02}", total / 3600, (total % 3600) / 60)
}

/// Parse an `HH:MM:SS` string back into seconds. Inverse of
/// [`seconds_to_hms`] for non-negative integer inputs.
pub fn parse_hms(text: &str) -> Option<u64> {
    let mut parts = text.split(':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds: u64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || minutes >= 60 || seconds >= 60 {
        return None;
    }
    Some(hours * 3600 + minutes * 60 + seconds)
}

/// The stored slot start shifted to display time. Slots are stored one hour
/// behind the clock the page shows; midnight wraps around.
pub fn shift_slot(slot: NaiveTime) -> NaiveTime {
    slot.overflowing_add_signed(Duration::hours(1)).0
}

/// Axis label for a (already shifted) slot.
pub fn slot_label(slot: NaiveTime) -> String {
    slot.format("%H:%M").to_string()
}

/// Minutes since midnight, the slot sort key.
pub fn slot_minutes(slot: NaiveTime) -> u32 {
    slot.hour() * 60 + slot.minute()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seconds_to_hms() {
        assert_eq!(seconds_to_hms(0.0), "00:00:00");
        assert_eq!(seconds_to_hms(59.9), "00:00:59");
        assert_eq!(seconds_to_hms(3661.0), "01:01:01");
        // Hours run past a day.
        assert_eq!(seconds_to_hms(90_061.0), "25:01:01");
    }

    #[test]
    fn test_seconds_to_hm() {
        assert_eq!(seconds_to_hm(3720.0), "01:02");
        assert_eq!(seconds_to_hm(59.0), "00:00");
    }

    #[test]
    fn test_hms_round_trip() {
        for secs in [0u64, 1, 59, 60, 3599, 3600, 86_399, 86_400, 123_456] {
            let text = seconds_to_hms(secs as f64);
            assert_eq!(parse_hms(&text), Some(secs), "round trip for {secs}");
        }
    }

    #[test]
    fn test_parse_hms_rejects_malformed() {
        assert_eq!(parse_hms(""), None);
        assert_eq!(parse_hms("01:02"), None);
        assert_eq!(parse_hms("01:75:00"), None);
        assert_eq!(parse_hms("01:02:03:04"), None);
    }

    #[test]
    fn test_slot_shift_wraps_at_midnight() {
        let slot = NaiveTime::from_hms_opt(23, 30, 0).unwrap();
        let shifted = shift_slot(slot);
        assert_eq!(slot_label(shifted), "00:30");
        assert_eq!(slot_minutes(shifted), 30);
    }

    #[test]
    fn test_slot_ordering_is_chronological() {
        let slots = [
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
        ];
        let mut shifted: Vec<_> = slots.iter().map(|s| shift_slot(*s)).collect();
        shifted.sort_by_key(|s| slot_minutes(*s));
        let labels: Vec<_> = shifted.into_iter().map(slot_label).collect();
        assert_eq!(labels, ["09:00", "10:00", "14:00"]);
    }
}
