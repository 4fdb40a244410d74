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

pub mod dns;
pub mod firewall;
pub mod record;
pub mod ssl;
pub mod threat;
pub mod timestamp;
pub mod web;
pub mod webserver;

use fancy_regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub use record::NormalizedLogRecord;

// Leading ISO-8601 timestamp: 2024-01-15T10:00:00Z
static LEADING_ISO_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z").expect("valid regex literal")
});

// Leading Apache-style timestamp: 15/Jan/2024:10:30:15
static LEADING_APACHE_TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{2}/\w{3}/\d{4}:\d{2}:\d{2}:\d{2}").expect("valid regex literal")
});

/// Recognized log file dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogDialect {
    Webserver,
    ZscalerWeb,
    ZscalerFirewall,
    ZscalerDns,
    ZscalerSsl,
    ZscalerThreat,
    /// Empty or blank input; nothing to parse
    Unknown,
}

impl LogDialect {
    pub const fn as_str(self) -> &'static str {
        match self {
            LogDialect::Webserver => "webserver",
            LogDialect::ZscalerWeb => "zscaler_web",
            LogDialect::ZscalerFirewall => "zscaler_firewall",
            LogDialect::ZscalerDns => "zscaler_dns",
            LogDialect::ZscalerSsl => "zscaler_ssl",
            LogDialect::ZscalerThreat => "zscaler_threat",
            LogDialect::Unknown => "unknown",
        }
    }
}

/// Why a line produced no record. Skips are ordinary control flow, never
/// errors: a partial file still yields a partial analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Comment or column-header line
    Header,
    /// Fewer fields than the dialect requires
    FieldCount,
    /// Timestamp field did not parse (includes unknown month names)
    Timestamp,
    /// Line did not match the dialect grammar
    Grammar,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            SkipReason::Header => "header or comment line",
            SkipReason::FieldCount => "not enough fields",
            SkipReason::Timestamp => "unparsable timestamp",
            SkipReason::Grammar => "line does not match dialect grammar",
        };
        f.write_str(reason)
    }
}

/// One dropped line, kept for observability only
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    /// 1-based position within the non-blank lines of the file
    pub line_number: usize,
    pub reason: SkipReason,
}

/// Result of parsing one file: the surviving records plus diagnostics for
/// every dropped line. Consumers of the public contract use `records`;
/// `skipped` exists so the caller can log what fell out.
#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    pub records: Vec<NormalizedLogRecord>,
    pub skipped: Vec<SkippedLine>,
}

/// Decide which dialect a file speaks by inspecting its first non-blank
/// line, and hand back the non-blank lines for parsing.
///
/// Rules are ordered and the first match wins. Real exports mix header
/// conventions, so explicit header-token checks come first and a positional
/// heuristic on the field count guarantees every comma-separated file lands
/// somewhere. Empty content maps to `Unknown`.
pub fn detect_dialect(content: &str) -> (LogDialect, Vec<&str>) {
    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();

    let Some(&first) = lines.first() else {
        return (LogDialect::Unknown, lines);
    };

    let dialect = classify_first_line(first);
    log::info!("Detected {} dialect from first line", dialect.as_str());
    (dialect, lines)
}

fn classify_first_line(first: &str) -> LogDialect {
    // Space-separated combined log format with brackets and quotes
    if first.contains('[') && first.contains(']') && first.contains('"') && first.contains("HTTP/")
    {
        return LogDialect::Webserver;
    }

    if !first.contains(',') {
        return LogDialect::Webserver;
    }

    // Named header tokens, most specific first
    if first.contains("action") && first.contains("protocol") {
        return LogDialect::ZscalerFirewall;
    }
    if first.contains("query_type") && first.contains("query_name") {
        return LogDialect::ZscalerDns;
    }
    if first.contains("ssl_version") && first.contains("cipher_suite") {
        return LogDialect::ZscalerSsl;
    }
    if first.contains("threat_type") && first.contains("threat_name") {
        return LogDialect::ZscalerThreat;
    }
    if LEADING_ISO_TIMESTAMP.is_match(first).unwrap_or(false) && first.contains("user_agent") {
        return LogDialect::ZscalerWeb;
    }
    if LEADING_APACHE_TIMESTAMP.is_match(first).unwrap_or(false) {
        return LogDialect::ZscalerWeb;
    }

    // Positional fallback on the field layout of the first line
    let parts: Vec<&str> = first.split(',').collect();
    if parts.len() == 9 && !parts[1].contains('.') {
        return LogDialect::ZscalerFirewall;
    }
    if parts.len() == 7 && !parts[3].is_empty() && !parts[3].contains('.') {
        return LogDialect::ZscalerDns;
    }
    if parts.len() == 7 && (parts[3].contains("SSL") || parts[3].contains("TLS")) {
        return LogDialect::ZscalerSsl;
    }
    if parts.len() == 9 && parts[3].contains("Mozilla") {
        return LogDialect::ZscalerWeb;
    }

    LogDialect::ZscalerWeb
}

/// Parse every line under the detected dialect. Malformed lines are
/// dropped, recorded in the output diagnostics and logged at warn level;
/// they never abort the batch.
pub fn parse_lines(dialect: LogDialect, lines: &[&str]) -> ParseOutput {
    let mut output = ParseOutput::default();

    for (index, &line) in lines.iter().enumerate() {
        let line_number = index + 1;

        if is_header_line(dialect, line) {
            output.skipped.push(SkippedLine {
                line_number,
                reason: SkipReason::Header,
            });
            continue;
        }

        let parsed = match dialect {
            LogDialect::Webserver => webserver::parse_line(line),
            LogDialect::ZscalerWeb => web::parse_line(line),
            LogDialect::ZscalerFirewall => firewall::parse_line(line),
            LogDialect::ZscalerDns => dns::parse_line(line),
            LogDialect::ZscalerSsl => ssl::parse_line(line),
            LogDialect::ZscalerThreat => threat::parse_line(line),
            LogDialect::Unknown => continue,
        };

        match parsed {
            Ok(record) => output.records.push(record),
            Err(reason) => {
                log::warn!("Skipping line {line_number} ({reason}): {line}");
                output.skipped.push(SkippedLine {
                    line_number,
                    reason,
                });
            }
        }
    }

    log::info!(
        "Parsed {} records from {} lines as {} ({} skipped)",
        output.records.len(),
        lines.len(),
        dialect.as_str(),
        output.skipped.len()
    );
    output
}

// Column-header and comment lines that exporters prepend to the data
fn is_header_line(dialect: LogDialect, line: &str) -> bool {
    if line.starts_with('#') {
        return true;
    }
    match dialect {
        LogDialect::ZscalerFirewall => {
            line.contains("timestamp,action") || line.contains("action,protocol")
        }
        LogDialect::Webserver
        | LogDialect::ZscalerWeb
        | LogDialect::ZscalerDns
        | LogDialect::ZscalerSsl
        | LogDialect::ZscalerThreat => {
            line.contains("timestamp,source_ip") || line.contains("source_ip,destination_ip")
        }
        LogDialect::Unknown => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_webserver() {
        let content = r#"192.168.1.1 - - [15/Jan/2024:10:30:15 +0000] "GET /index.html HTTP/1.1" 200 1024 "-" "Mozilla/5.0""#;
        let (dialect, lines) = detect_dialect(content);
        assert_eq!(dialect, LogDialect::Webserver);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_detect_firewall_by_header_tokens() {
        let content = "timestamp,action,protocol,source_ip,source_port,destination_ip,destination_port,rule_name,threat_category\n2024-01-15T10:00:00Z,allow,tcp,10.0.0.1,53211,8.8.8.8,443,default,normal";
        let (dialect, _) = detect_dialect(content);
        assert_eq!(dialect, LogDialect::ZscalerFirewall);
    }

    #[test]
    fn test_detect_dns_by_header_tokens() {
        let content = "timestamp,source_ip,destination_ip,query_type,query_name,response_code,threat_category\n2024-01-15T10:00:00Z,10.0.0.1,8.8.8.8,A,example.com,NOERROR,normal";
        let (dialect, _) = detect_dialect(content);
        assert_eq!(dialect, LogDialect::ZscalerDns);
    }

    #[test]
    fn test_detect_ssl_by_header_tokens() {
        let content = "timestamp,source_ip,destination_ip,ssl_version,cipher_suite,certificate_subject,threat_category";
        let (dialect, _) = detect_dialect(content);
        assert_eq!(dialect, LogDialect::ZscalerSsl);
    }

    #[test]
    fn test_detect_threat_by_header_tokens() {
        let content = "timestamp,source_ip,destination_ip,threat_type,threat_name,action,severity";
        let (dialect, _) = detect_dialect(content);
        assert_eq!(dialect, LogDialect::ZscalerThreat);
    }

    #[test]
    fn test_positional_fallback_firewall() {
        // 9 comma-separated fields, second field is not an IP
        let content = "2024-01-15 10:00:00,allow,tcp,10.0.0.1,53211,8.8.8.8,443,default,normal";
        let (dialect, _) = detect_dialect(content);
        assert_eq!(dialect, LogDialect::ZscalerFirewall);
    }

    #[test]
    fn test_positional_fallback_dns() {
        let content = "2024-01-15 10:00:00,10.0.0.1,8.8.8.8,A,example.com,NOERROR,normal";
        let (dialect, _) = detect_dialect(content);
        assert_eq!(dialect, LogDialect::ZscalerDns);
    }

    #[test]
    fn test_positional_fallback_ssl() {
        let content =
            "2024-01-15 10:00:00,10.0.0.1,93.184.216.34,TLSv1.2,ECDHE-RSA-AES128,CN=example.org,normal";
        let (dialect, _) = detect_dialect(content);
        assert_eq!(dialect, LogDialect::ZscalerSsl);
    }

    #[test]
    fn test_positional_fallback_web() {
        let content =
            "2024-01-15T10:00:00Z,1.2.3.4,5.6.7.8,Mozilla/5.0,/index.html,GET,200,512,1024";
        let (dialect, _) = detect_dialect(content);
        assert_eq!(dialect, LogDialect::ZscalerWeb);
    }

    #[test]
    fn test_comma_separated_defaults_to_web() {
        let content = "a,b,c";
        let (dialect, _) = detect_dialect(content);
        assert_eq!(dialect, LogDialect::ZscalerWeb);
    }

    #[test]
    fn test_no_commas_defaults_to_webserver() {
        let content = "some free-form log line without structure";
        let (dialect, _) = detect_dialect(content);
        assert_eq!(dialect, LogDialect::Webserver);
    }

    #[test]
    fn test_empty_content_is_unknown() {
        let (dialect, lines) = detect_dialect("");
        assert_eq!(dialect, LogDialect::Unknown);
        assert!(lines.is_empty());

        let (dialect, lines) = detect_dialect("\n   \n\t\n");
        assert_eq!(dialect, LogDialect::Unknown);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_parse_lines_collects_skips() {
        let lines = vec![
            "# exported 2024-01-15",
            "2024-01-15T10:00:00Z,1.2.3.4,5.6.7.8,Mozilla/5.0,/index.html,GET,200,512,1024",
            "not,enough,fields",
        ];
        let output = parse_lines(LogDialect::ZscalerWeb, &lines);
        assert_eq!(output.records.len(), 1);
        assert_eq!(output.skipped.len(), 2);
        assert_eq!(output.skipped[0].reason, SkipReason::Header);
        assert_eq!(output.skipped[1].reason, SkipReason::FieldCount);
        assert_eq!(output.skipped[1].line_number, 3);
    }

    #[test]
    fn test_unknown_dialect_yields_nothing() {
        let output = parse_lines(LogDialect::Unknown, &["anything"]);
        assert!(output.records.is_empty());
        assert!(output.skipped.is_empty());
    }
}
