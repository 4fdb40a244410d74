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

//! Zscaler threat-feed dialect:
//! `timestamp,source_ip,destination_ip,threat_type,threat_name,action,severity`
//!
//! The trailing severity field is a hint from the feed. It is blended into
//! the score (see `scoring::threat`), never copied through as the record's
//! severity.

use super::record::{LogType, NormalizedLogRecord};
use super::timestamp::parse_timestamp;
use super::SkipReason;
use crate::scoring;

const MIN_FIELDS: usize = 7;

pub fn parse_line(line: &str) -> Result<NormalizedLogRecord, SkipReason> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    if parts.len() < MIN_FIELDS {
        return Err(SkipReason::FieldCount);
    }

    let timestamp = parse_timestamp(parts[0]).ok_or(SkipReason::Timestamp)?;

    let verdict = scoring::threat::assess(parts[3], parts[5], parts[6]);
    let (threat_category, severity) = verdict.into_parts();

    let mut record =
        NormalizedLogRecord::new(timestamp, threat_category, severity, LogType::Threat);
    record.source_ip = parts[1].to_string();
    record.destination_ip = parts[2].to_string();
    // threat name doubles as the url column
    record.url = parts[4].to_string();
    record.action = parts[5].to_string();
    Ok(record)
}
