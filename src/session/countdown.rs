use std::time::Duration;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    end_time: DateTime<Utc>,
}

impl Countdown {
    pub const fn until(end_time: DateTime<Utc>) -> Self {
        Self { end_time }
    }

    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.end_time - now).to_std().unwrap_or(Duration::ZERO)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.end_time <= now
    }
}

/// `MM:SS` below an hour, `H:MM:SS` from an hour up. Partial seconds round up
/// so the label never shows `00:00` while time is left.
pub fn format_remaining(remaining: Duration) -> String {
    let mut total_secs = remaining.as_secs();
    if remaining.subsec_nanos() > 0 {
        total_secs += 1;
    }
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}
