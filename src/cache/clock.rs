//! Wall Clock

use chrono::{DateTime, Duration, Local};
use std::sync::{Mutex, PoisonError};

/// Source of the current local time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// The system's local clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Local>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, now: DateTime<Local>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now = *now + by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The first local midnight strictly after `now`.
///
/// When that midnight does not exist locally (a DST gap), the deadline is
/// one day from `now`.
pub fn next_midnight(now: DateTime<Local>) -> DateTime<Local> {
    now.date_naive()
        .succ_opt()
        .and_then(|tomorrow| tomorrow.and_hms_opt(0, 0, 0))
        .and_then(|midnight| midnight.and_local_timezone(Local).earliest())
        .unwrap_or_else(|| now + Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Timelike};

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, min, 0).single().unwrap()
    }

    #[test]
    fn test_next_midnight_late_evening() {
        let deadline = next_midnight(local(2026, 6, 15, 23, 59));
        assert_eq!(deadline.date_naive(), NaiveDate::from_ymd_opt(2026, 6, 16).unwrap());
        assert_eq!(deadline.hour(), 0);
        assert_eq!(deadline.minute(), 0);
    }

    #[test]
    fn test_next_midnight_at_midnight_is_next_day() {
        let now = local(2026, 6, 15, 0, 0);
        let deadline = next_midnight(now);
        assert!(deadline > now);
        assert_eq!(deadline.date_naive(), NaiveDate::from_ymd_opt(2026, 6, 16).unwrap());
    }

    #[test]
    fn test_next_midnight_crosses_year() {
        let deadline = next_midnight(local(2026, 12, 31, 12, 0));
        assert_eq!(deadline.date_naive(), NaiveDate::from_ymd_opt(2027, 1, 1).unwrap());
    }

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(local(2026, 6, 15, 10, 0));
        clock.advance(Duration::hours(2));
        assert_eq!(clock.now(), local(2026, 6, 15, 12, 0));

        clock.set(local(2026, 6, 20, 8, 0));
        assert_eq!(clock.now().date_naive(), NaiveDate::from_ymd_opt(2026, 6, 20).unwrap());
    }
}
