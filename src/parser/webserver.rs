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

//! Apache/Nginx combined log dialect:
//! `IP - - [timestamp] "method url protocol" status bytes "referer" "agent"`

use super::record::{LogType, NormalizedLogRecord};
use super::timestamp::{parse_apache_timestamp, parse_timestamp};
use super::SkipReason;
use crate::scoring;
use chrono::{DateTime, Utc};
use fancy_regex::Regex;
use std::sync::LazyLock;

static COMBINED_LOG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\S+) - - \[([^\]]+)\] "(\S+) (\S+) (\S+)" (\d+) (\d+) "([^"]*)" "([^"]*)"$"#)
        .expect("valid regex literal")
});

pub fn parse_line(line: &str) -> Result<NormalizedLogRecord, SkipReason> {
    let caps = COMBINED_LOG
        .captures(line)
        .ok()
        .flatten()
        .ok_or(SkipReason::Grammar)?;

    let timestamp = parse_bracket_timestamp(&caps[2]).ok_or(SkipReason::Timestamp)?;

    let method = &caps[3];
    let url = &caps[4];
    let status_code: u16 = caps[6].parse().unwrap_or(0);
    let bytes_sent: u64 = caps[7].parse().unwrap_or(0);
    let user_agent = &caps[9];

    let verdict = scoring::web::assess(url, method, status_code, user_agent);
    let (threat_category, severity) = verdict.into_parts();

    let mut record = NormalizedLogRecord::new(timestamp, threat_category, severity, LogType::Web);
    record.source_ip = caps[1].to_string();
    // destination is not part of the combined format
    record.user_agent = user_agent.to_string();
    record.url = url.to_string();
    record.action = method.to_string();
    record.status_code = status_code;
    record.bytes_sent = bytes_sent;
    Ok(record)
}

// Bracket timestamps are normally Apache-style; fall back to the shared
// parser for exporters that write ISO timestamps into the brackets
fn parse_bracket_timestamp(s: &str) -> Option<DateTime<Utc>> {
    parse_apache_timestamp(s).or_else(|| parse_timestamp(s))
}
