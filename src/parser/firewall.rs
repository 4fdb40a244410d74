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

//! Zscaler firewall dialect:
//! `timestamp,action,protocol,source_ip,source_port,destination_ip,destination_port,rule_name,threat_category`

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

    let source_port: u16 = parts[4].parse().unwrap_or(0);
    let destination_port: u16 = parts[6].parse().unwrap_or(0);

    let verdict = scoring::firewall::assess(parts[1], parts[2], parts[8], destination_port);
    let (threat_category, severity) = verdict.into_parts();

    let mut record =
        NormalizedLogRecord::new(timestamp, threat_category, severity, LogType::Firewall);
    record.source_ip = parts[3].to_string();
    record.destination_ip = parts[5].to_string();
    record.action = parts[1].to_string();
    record.protocol = Some(parts[2].to_string());
    record.source_port = Some(source_port);
    record.destination_port = Some(destination_port);
    record.rule_name = Some(parts[7].to_string());
    Ok(record)
}
