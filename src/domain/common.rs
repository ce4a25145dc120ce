//! Helpers shared by the resource entities

use chrono::{DateTime, Utc};

/// New server-side identifier: 32 lowercase hex characters
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Rounds half away from zero to `precision` decimal places
pub fn round_to(value: f64, precision: i32) -> f64 {
    let factor = 10f64.powi(precision);
    (value * factor).round() / factor
}

/// Whether `check` falls strictly between `start` and `end`
pub fn in_time_span(start: DateTime<Utc>, end: DateTime<Utc>, check: DateTime<Utc>) -> bool {
    check > start && check < end
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_generate_id() {
        let id = generate_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, generate_id());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(12.346, 2), 12.35);
        assert_eq!(round_to(12.344, 2), 12.34);
        assert_eq!(round_to(7.0, 2), 7.0);
        assert_eq!(round_to(0.125, 1), 0.1);
    }

    #[test]
    fn test_in_time_span() {
        let now = Utc::now();
        let start = now - Duration::days(1);
        let end = now + Duration::days(1);

        assert!(in_time_span(start, end, now));
        assert!(!in_time_span(start, end, end + Duration::seconds(1)));
        assert!(!in_time_span(start, end, start));
        assert!(!in_time_span(end, start, now));
    }
}
