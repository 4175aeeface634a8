use rand::Rng;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tracing::{debug, warn};

/// Picks a random minute and second inside each configured posting hour of
/// `now`'s UTC day and returns the epoch timestamps in configured order.
///
/// Hours already behind `now` are dropped rather than moved to tomorrow. The
/// hour currently in progress is shifted to the next hour.
pub fn posting_times<R: Rng>(hours: &[u8], now: OffsetDateTime, rng: &mut R) -> Vec<i64> {
    let now = now.to_offset(UtcOffset::UTC);
    let today = now.date();
    let current_hour = now.hour();

    let mut timestamps = Vec::with_capacity(hours.len());
    for &configured in hours {
        if current_hour > configured {
            debug!("Posting hour {} already passed", configured);
            continue;
        }
        let hour = if current_hour == configured {
            configured + 1
        } else {
            configured
        };

        let minute = rng.random_range(1..=59);
        let second = rng.random_range(1..=59);
        match today.with_hms(hour, minute, second) {
            Ok(slot) => timestamps.push(slot.assume_utc().unix_timestamp()),
            Err(_) => warn!("Posting hour {} rolls past midnight, dropping it", configured),
        }
    }
    timestamps
}

/// `YYYY-MM-DD HH:MM:SS` in UTC, for logs.
pub fn format_timestamp(timestamp: i64) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    OffsetDateTime::from_unix_timestamp(timestamp)
        .ok()
        .and_then(|at| at.format(&format).ok())
        .unwrap_or_else(|| timestamp.to_string())
}
