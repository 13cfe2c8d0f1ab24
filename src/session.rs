//! Session-expiry countdown
//!
//! The portal session is valid until an absolute deadline handed to the
//! client at login. The countdown is displayed as `HH:MM:SS` and the UI
//! shows a farewell screen once it reaches zero.

use chrono::Utc;

/// Countdown against an absolute session deadline.
#[derive(Debug, Clone, Copy)]
pub struct SessionTimer {
    /// Deadline as Unix epoch seconds.
    deadline_secs: i64,
}

impl SessionTimer {
    pub fn new(deadline_secs: i64) -> Self {
        Self { deadline_secs }
    }

    /// Seconds left until the deadline, clamped to zero.
    pub fn remaining_secs(&self) -> i64 {
        self.remaining_at(Utc::now().timestamp())
    }

    fn remaining_at(&self, now_secs: i64) -> i64 {
        (self.deadline_secs - now_secs).max(0)
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_secs() == 0
    }

    /// Remaining time formatted as `HH:MM:SS`.
    pub fn format_hms(&self) -> String {
        format_hms(self.remaining_secs())
    }
}

fn format_hms(mut secs: i64) -> String {
    let hours = secs / 3600;
    secs -= hours * 3600;
    let minutes = secs / 60;
    secs -= minutes * 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_clamped_to_zero() {
        let timer = SessionTimer::new(1000);
        assert_eq!(timer.remaining_at(900), 100);
        assert_eq!(timer.remaining_at(1000), 0);
        assert_eq!(timer.remaining_at(2000), 0);
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(59), "00:00:59");
        assert_eq!(format_hms(61), "00:01:01");
        assert_eq!(format_hms(3600), "01:00:00");
        assert_eq!(format_hms(3661), "01:01:01");
        assert_eq!(format_hms(86399), "23:59:59");
    }
}
