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

//! Zscaler SSL-inspection dialect:
//! `timestamp,source_ip,destination_ip,ssl_version,cipher_suite,certificate_subject,threat_category`

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

    let verdict = scoring::ssl::assess(parts[3], parts[4], parts[5], parts[6]);
    let (threat_category, severity) = verdict.into_parts();

    let mut record = NormalizedLogRecord::new(timestamp, threat_category, severity, LogType::Ssl);
    record.source_ip = parts[1].to_string();
    record.destination_ip = parts[2].to_string();
    record.action = "SSL_CONNECTION".to_string();
    record.ssl_version = Some(parts[3].to_string());
    record.cipher_suite = Some(parts[4].to_string());
    record.certificate_subject = Some(parts[5].to_string());
    Ok(record)
}
