//! Play-time and score helpers derived from session statistics.

use std::time::Duration;

use crate::SessionStats;

/// Wall-clock time represented by a number of ticks at the provided cadence.
#[must_use]
pub fn play_time(ticks: u64, tick_interval: Duration) -> Duration {
    let ticks = u32::try_from(ticks).unwrap_or(u32::MAX);
    tick_interval.saturating_mul(ticks)
}

/// Formats a duration as `mm:ss`. Minutes are not wrapped into hours.
#[must_use]
pub fn format_play_time(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Mean final score over finished games, rounded down.
///
/// Returns `None` until the first game ends.
#[must_use]
pub fn average_score(stats: &SessionStats) -> Option<u64> {
    if stats.games_played == 0 {
        return None;
    }
    Some(stats.total_final_score / u64::from(stats.games_played))
}
