// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

/// Formats a duration in seconds into a `MM:SS` string.
///
/// Minutes are a plain total count, they do not roll over into hours.
///
/// # Arguments
///
/// * `total_seconds` - The duration to format, represented as a 64-bit integer.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(format_time(65), "01:05");
/// assert_eq!(format_time(3600), "60:00");
/// ```
pub(crate) fn format_time(total_seconds: u64) -> String {
    let mins = total_seconds / 60;
    let secs = total_seconds % 60;
    format!("{:02}:{:02}", mins, secs)
}

/// Formats a millisecond position as `MM:SS`, flooring to whole seconds.
pub(crate) fn format_millis(ms: u64) -> String {
    format_time(ms / 1000)
}

/// Parses a user-entered position into milliseconds.
///
/// Accepts `MM:SS` (minutes unbounded), `H:MM:SS`, or a plain number of
/// milliseconds.
pub(crate) fn parse_time(text: &str) -> Option<u64> {
    let text = text.trim();
    if !text.contains(':') {
        return text.parse().ok();
    }

    let mut fields = text.rsplit(':');
    let secs: u64 = fields.next()?.parse().ok()?;
    let mins: u64 = fields.next()?.parse().ok()?;
    let hours: Option<u64> = fields.next().map(str::parse::<u64>).transpose().ok()?;
    if fields.next().is_some() || secs >= 60 || (hours.is_some() && mins >= 60) {
        return None;
    }

    let seconds = hours
        .unwrap_or(0)
        .checked_mul(3600)?
        .checked_add(mins.checked_mul(60)?)?
        .checked_add(secs)?;
    seconds.checked_mul(1000)
}
