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

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity band assigned by the threat scorer, never copied verbatim
/// from the input (the threat-feed dialect blends an input hint into the
/// score, but the band itself is always derived from the total score).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which family of log the record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    Web,
    Firewall,
    Dns,
    Ssl,
    Threat,
}

impl LogType {
    pub const fn as_str(self) -> &'static str {
        match self {
            LogType::Web => "web",
            LogType::Firewall => "firewall",
            LogType::Dns => "dns",
            LogType::Ssl => "ssl",
            LogType::Threat => "threat",
        }
    }
}

/// Dialect-independent representation of one parsed log line.
///
/// Fields that a dialect does not carry stay at their defaults (empty
/// strings, zero counters, `None` extras). For non-web dialects `url` is
/// repurposed: DNS stores the query name there, the threat feed stores the
/// threat name, so downstream consumers always have one "what was accessed"
/// column to look at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLogRecord {
    pub timestamp: DateTime<Utc>,
    pub source_ip: String,
    pub destination_ip: String,
    pub user_agent: String,
    pub url: String,
    pub action: String,
    pub status_code: u16,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    /// Label assigned by the scorer, not the raw log's own category field
    pub threat_category: String,
    pub severity: Severity,
    pub log_type: LogType,

    // Dialect-specific extras
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cipher_suite: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_subject: Option<String>,
}

impl NormalizedLogRecord {
    /// Create a record with all optional and numeric fields at their
    /// defaults. Parsers fill in whatever their dialect carries.
    pub fn new(
        timestamp: DateTime<Utc>,
        threat_category: String,
        severity: Severity,
        log_type: LogType,
    ) -> Self {
        NormalizedLogRecord {
            timestamp,
            source_ip: String::new(),
            destination_ip: String::new(),
            user_agent: String::new(),
            url: String::new(),
            action: String::new(),
            status_code: 0,
            bytes_sent: 0,
            bytes_received: 0,
            threat_category,
            severity,
            log_type,
            protocol: None,
            source_port: None,
            destination_port: None,
            rule_name: None,
            query_type: None,
            query_name: None,
            response_code: None,
            ssl_version: None,
            cipher_suite: None,
            certificate_subject: None,
        }
    }
}
