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

//! Zscaler web-proxy dialect:
//! `timestamp,source_ip,destination_ip,user_agent,url,action,status_code,bytes_sent,bytes_received`

use super::record::{LogType, NormalizedLogRecord};
use super::timestamp::parse_timestamp;
use super::SkipReason;
use crate::scoring;

const MIN_FIELDS: usize = 9;

pub fn parse_line(line: &str) -> Result<NormalizedLogRecord, SkipReason> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    if parts.len() < MIN_FIELDS {
        return Err(SkipReason::FieldCount);
    }

    let timestamp = parse_timestamp(parts[0]).ok_or(SkipReason::Timestamp)?;

    let status_code: u16 = parts[6].parse().unwrap_or(0);
    let bytes_sent: u64 = parts[7].parse().unwrap_or(0);
    let bytes_received: u64 = parts[8].parse().unwrap_or(0);

    let verdict = scoring::web::assess(parts[4], parts[5], status_code, parts[3]);
    let (threat_category, severity) = verdict.into_parts();

    let mut record = NormalizedLogRecord::new(timestamp, threat_category, severity, LogType::Web);
    record.source_ip = parts[1].to_string();
    record.destination_ip = parts[2].to_string();
    record.user_agent = parts[3].to_string();
    record.url = parts[4].to_string();
    record.action = parts[5].to_string();
    record.status_code = status_code;
    record.bytes_sent = bytes_sent;
    record.bytes_received = bytes_received;
    Ok(record)
}
