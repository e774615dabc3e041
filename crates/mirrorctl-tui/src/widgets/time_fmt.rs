//! Relative time formatting for "last refreshed" labels.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Format the time since `then` as "12s ago" / "3m 5s ago".
///
/// Sub-second precision is dropped. A timestamp in the future reads as
/// "just now".
pub fn fmt_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    match u64::try_from(secs) {
        Ok(0) | Err(_) => "just now".into(),
        Ok(secs) => format!("{} ago", humantime::format_duration(Duration::from_secs(secs))),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    #[test]
    fn formats_elapsed_seconds() {
        let now = Utc::now();
        assert_eq!(fmt_ago(now - TimeDelta::seconds(12), now), "12s ago");
        assert_eq!(fmt_ago(now - TimeDelta::seconds(185), now), "3m 5s ago");
    }

    #[test]
    fn future_and_zero_read_as_just_now() {
        let now = Utc::now();
        assert_eq!(fmt_ago(now, now), "just now");
        assert_eq!(fmt_ago(now + TimeDelta::seconds(5), now), "just now");
    }
}
