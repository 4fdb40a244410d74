// ThreatLens - GPL-3.0-or-later
// This file is part of ThreatLens.
//
// ThreatLens is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// ThreatLens is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with ThreatLens.  If not, see <https://www.gnu.org/licenses/>.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use fancy_regex::Regex;
use std::sync::LazyLock;

// Apache access-log timestamp: 15/Jan/2024:10:30:15 +0000
static APACHE_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{2})/(\w{3})/(\d{4}):(\d{2}):(\d{2}):(\d{2})\s+([+-]\d{4})")
        .expect("valid regex literal")
});

/// Parse a timestamp field from a comma-separated log line.
///
/// Accepts RFC 3339 (`2024-01-15T10:00:00Z`), a naive `YYYY-MM-DD HH:MM:SS`
/// or `YYYY-MM-DDTHH:MM:SS` (treated as UTC), and the Apache bracket format.
/// Returns `None` for anything else; the caller skips the line.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    parse_apache_timestamp(s)
}

/// Parse the Apache/Nginx bracket timestamp `DD/Mon/YYYY:HH:MM:SS +ZZZZ`
/// through an explicit month-name table. An unknown month name yields `None`.
pub fn parse_apache_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let caps = APACHE_TIMESTAMP.captures(s).ok()??;

    let day: u32 = caps[1].parse().ok()?;
    let month = month_number(&caps[2])?;
    let year: i32 = caps[3].parse().ok()?;
    let hour: u32 = caps[4].parse().ok()?;
    let minute: u32 = caps[5].parse().ok()?;
    let second: u32 = caps[6].parse().ok()?;

    let naive = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    let offset = parse_numeric_offset(&caps[7])?;
    let local = offset.from_local_datetime(&naive).single()?;
    Some(local.with_timezone(&Utc))
}

fn month_number(name: &str) -> Option<u32> {
    let number = match name {
        "Jan" => 1,
        "Feb" => 2,
        "Mar" => 3,
        "Apr" => 4,
        "May" => 5,
        "Jun" => 6,
        "Jul" => 7,
        "Aug" => 8,
        "Sep" => 9,
        "Oct" => 10,
        "Nov" => 11,
        "Dec" => 12,
        _ => return None,
    };
    Some(number)
}

// "+0130" -> FixedOffset of 1h30m east
fn parse_numeric_offset(s: &str) -> Option<FixedOffset> {
    let (sign, digits) = s.split_at(1);
    let hours: i32 = digits.get(..2)?.parse().ok()?;
    let minutes: i32 = digits.get(2..4)?.parse().ok()?;
    let seconds = (hours * 60 + minutes) * 60;
    if sign == "-" {
        FixedOffset::west_opt(seconds)
    } else {
        FixedOffset::east_opt(seconds)
    }
}
