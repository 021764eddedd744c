use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::errors::BotError;

pub const DEADLINE_HOUR: u32 = 23;

const DEADLINE_TIME: NaiveTime = match NaiveTime::from_hms_opt(DEADLINE_HOUR, 0, 0) {
    Some(time) => time,
    None => panic!("deadline hour out of range"),
};

// Longest clock jump a DST gap can skip.
const MAX_GAP_MINUTES: i64 = 24 * 60;

const DUE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

pub fn parse_timezone(name: &str) -> Result<Tz, BotError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| BotError::Config(format!("Unknown timezone: {}", name)))
}

/// 23:00 local time on the calendar day `received_at` falls on in `tz`.
/// Never rolls over to the next day, even when `received_at` is already later.
///
/// An ambiguous 23:00 resolves to its earlier instant. A 23:00 skipped by a
/// DST gap resolves to the first local time that exists after the gap.
pub fn deadline_in(received_at: DateTime<Utc>, tz: &Tz) -> DateTime<Tz> {
    let target = received_at.with_timezone(tz).date_naive().and_time(DEADLINE_TIME);
    (0..=MAX_GAP_MINUTES)
        .find_map(|minutes| {
            tz.from_local_datetime(&(target + Duration::minutes(minutes)))
                .earliest()
        })
        .unwrap_or_else(|| tz.from_utc_datetime(&target))
}

pub fn format_due_date(deadline: &DateTime<Tz>) -> String {
    deadline.format(DUE_DATE_FORMAT).to_string()
}

pub fn compute_deadline(received_at: DateTime<Utc>, timezone: &str) -> Result<String, BotError> {
    let tz = parse_timezone(timezone)?;
    Ok(format_due_date(&deadline_in(received_at, &tz)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn moscow_morning_message() {
        let due = compute_deadline(at("2024-03-15T10:00:00+03:00"), "Europe/Moscow").unwrap();
        assert_eq!(due, "2024-03-15T23:00:00+03:00");
    }

    #[test]
    fn same_deadline_for_whole_local_day() {
        let times = [
            "2024-03-15T00:00:00+03:00",
            "2024-03-15T08:15:00+03:00",
            "2024-03-15T12:00:00+03:00",
            "2024-03-15T22:59:59+03:00",
        ];
        for t in times {
            assert_eq!(
                compute_deadline(at(t), "Europe/Moscow").unwrap(),
                "2024-03-15T23:00:00+03:00",
                "received at {}",
                t
            );
        }
    }

    #[test]
    fn late_message_keeps_same_day() {
        let due = compute_deadline(at("2024-03-15T23:30:00+03:00"), "Europe/Moscow").unwrap();
        assert_eq!(due, "2024-03-15T23:00:00+03:00");
    }

    #[test]
    fn utc_instant_uses_local_calendar_day() {
        // 22:30 UTC on the 14th is already the 15th in Moscow.
        let due = compute_deadline(at("2024-03-14T22:30:00Z"), "Europe/Moscow").unwrap();
        assert_eq!(due, "2024-03-15T23:00:00+03:00");
    }

    #[test]
    fn offset_follows_daylight_saving() {
        let winter = compute_deadline(at("2024-01-10T12:00:00Z"), "America/New_York").unwrap();
        let summer = compute_deadline(at("2024-07-10T12:00:00Z"), "America/New_York").unwrap();
        assert_eq!(winter, "2024-01-10T23:00:00-05:00");
        assert_eq!(summer, "2024-07-10T23:00:00-04:00");
    }

    #[test]
    fn skipped_deadline_moves_to_end_of_gap() {
        // Nuuk springs from 23:00 -02:00 straight to 00:00 -01:00 on 2024-03-30.
        let due = compute_deadline(at("2024-03-30T12:00:00-02:00"), "America/Nuuk").unwrap();
        assert_eq!(due, "2024-03-31T00:00:00-01:00");
        assert_eq!(
            deadline_in(at("2024-03-30T12:00:00-02:00"), &chrono_tz::America::Nuuk)
                .with_timezone(&Utc),
            at("2024-03-31T01:00:00Z")
        );
    }

    #[test]
    fn ambiguous_deadline_takes_earlier_instant() {
        // Nuuk falls back from 00:00 -01:00 to 23:00 -02:00 on 2024-10-26, so 23:00 happens twice.
        let due = compute_deadline(at("2024-10-26T12:00:00-01:00"), "America/Nuuk").unwrap();
        assert_eq!(due, "2024-10-26T23:00:00-01:00");
    }

    #[test]
    fn utc_default_formats_zero_offset() {
        let due = compute_deadline(at("2024-03-15T05:00:00Z"), "UTC").unwrap();
        assert_eq!(due, "2024-03-15T23:00:00+00:00");
    }

    #[test]
    fn repeated_calls_are_identical() {
        let received = at("2024-03-15T10:00:00+03:00");
        let first = compute_deadline(received, "Europe/Moscow").unwrap();
        let second = compute_deadline(received, "Europe/Moscow").unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn unknown_timezone_is_config_error() {
        let err = compute_deadline(Utc::now(), "Mars/Olympus_Mons").unwrap_err();
        assert!(matches!(err, BotError::Config(_)));
    }
}
