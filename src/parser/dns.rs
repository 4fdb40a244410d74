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

//! Zscaler DNS dialect:
//! `timestamp,source_ip,destination_ip,query_type,query_name,response_code,threat_category`

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

    let verdict = scoring::dns::assess(parts[3], parts[4], parts[5], parts[6]);
    let (threat_category, severity) = verdict.into_parts();

    let mut record = NormalizedLogRecord::new(timestamp, threat_category, severity, LogType::Dns);
    record.source_ip = parts[1].to_string();
    record.destination_ip = parts[2].to_string();
    // query name doubles as the url column so every record has one
    record.url = parts[4].to_string();
    record.action = parts[3].to_string();
    record.query_type = Some(parts[3].to_string());
    record.query_name = Some(parts[4].to_string());
    record.response_code = Some(parts[5].to_string());
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::record::Severity;

    #[test]
    fn test_well_formed_line() {
        let record =
            parse_line("2024-01-15T10:00:00Z,10.0.0.1,8.8.8.8,A,www.example.com,NOERROR,normal")
                .expect("should parse");
        assert_eq!(record.query_type.as_deref(), Some("A"));
        assert_eq!(record.query_name.as_deref(), Some("www.example.com"));
        assert_eq!(record.url, "www.example.com");
        assert_eq!(record.action, "A");
        assert_eq!(record.response_code.as_deref(), Some("NOERROR"));
        assert_eq!(record.log_type, LogType::Dns);
        assert_eq!(record.severity, Severity::Low);
    }

    #[test]
    fn test_c2_query_scored() {
        let record =
            parse_line("2024-01-15T10:00:00Z,10.0.0.1,8.8.8.8,TXT,beacon.bad.tk,NOERROR,normal")
                .expect("should parse");
        // TXT (+2), .tk (+2), beacon (+3)
        assert_eq!(record.severity, Severity::Critical);
        assert_eq!(record.threat_category, "Potential C2 Communication");
    }

    #[test]
    fn test_too_few_fields() {
        assert_eq!(
            parse_line("2024-01-15T10:00:00Z,10.0.0.1,8.8.8.8,A"),
            Err(SkipReason::FieldCount)
        );
    }

    #[test]
    fn test_bad_timestamp() {
        assert_eq!(
            parse_line("soon,10.0.0.1,8.8.8.8,A,www.example.com,NOERROR,normal"),
            Err(SkipReason::Timestamp)
        );
    }
}
