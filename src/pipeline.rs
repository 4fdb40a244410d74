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

//! The detect → parse/score → summarize pipeline.
//!
//! `analyze` is a pure function over the file content: no shared state, no
//! I/O, deterministic output. Callers are free to run it synchronously in a
//! request handler or push it onto a background thread; nothing here cares.

use crate::analysis::{self, AnalysisSummary};
use crate::parser::{self, LogDialect, NormalizedLogRecord, SkippedLine};
use serde::Serialize;

/// Everything one analyzed file produces
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub dialect: LogDialect,
    pub records: Vec<NormalizedLogRecord>,
    pub summary: AnalysisSummary,
    /// Diagnostics for dropped lines; not part of the summary contract
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedLine>,
}

/// Run the full pipeline over raw file content.
///
/// Malformed lines are dropped (fail-open); empty content yields an empty
/// report rather than an error. Calling this twice on identical input
/// produces an identical report.
pub fn analyze(content: &str) -> AnalysisReport {
    let (dialect, lines) = parser::detect_dialect(content);
    let output = parser::parse_lines(dialect, &lines);
    let summary = analysis::summarize(&output.records);

    AnalysisReport {
        dialect,
        records: output.records,
        summary,
        skipped: output.skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::record::Severity;

    const WEB_SAMPLE: &str = "\
2024-01-15T10:00:00Z,1.2.3.4,5.6.7.8,Mozilla/5.0,/index.html,GET,200,512,1024
2024-01-15T10:01:00Z,1.2.3.4,5.6.7.8,Mozilla/5.0,/files/cmd.exe,GET,200,512,1024
2024-01-15T10:02:00Z,9.9.9.9,5.6.7.8,curl/8.0,/admin/login,POST,403,0,128";

    #[test]
    fn test_end_to_end_web_sample() {
        let report = analyze(WEB_SAMPLE);
        assert_eq!(report.dialect, LogDialect::ZscalerWeb);
        assert_eq!(report.records.len(), 3);
        assert_eq!(report.summary.total_entries, 3);
        assert_eq!(report.records[0].severity, Severity::Low);
        assert_eq!(report.records[1].threat_category, "Suspicious File Access");
        // curl (+2), 4xx (+1), admin POST (+2)
        assert_eq!(report.records[2].severity, Severity::High);
    }

    #[test]
    fn test_idempotent() {
        let first = serde_json::to_string(&analyze(WEB_SAMPLE).summary).expect("serializable");
        let second = serde_json::to_string(&analyze(WEB_SAMPLE).summary).expect("serializable");
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input() {
        let report = analyze("");
        assert_eq!(report.dialect, LogDialect::Unknown);
        assert!(report.records.is_empty());
        assert_eq!(report.summary.total_entries, 0);
        assert_eq!(report.summary.time_range, "No data");
        assert_eq!(report.summary.threat_summary, "No threats detected");
    }

    #[test]
    fn test_partial_file_still_analyzed() {
        let content = "\
2024-01-15T10:00:00Z,1.2.3.4,5.6.7.8,Mozilla/5.0,/index.html,GET,200,512,1024
garbage line that is not a record
bad-timestamp,1.2.3.4,5.6.7.8,Mozilla/5.0,/index.html,GET,200,512,1024";
        let report = analyze(content);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.summary.total_entries, 1);
    }

    #[test]
    fn test_firewall_scenario() {
        let content = "\
2024-01-15T10:00:00Z,block,telnet,10.0.0.1,53211,93.184.216.34,23,deny-legacy,normal";
        let report = analyze(content);
        assert_eq!(report.dialect, LogDialect::ZscalerFirewall);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].severity, Severity::Critical);
    }

    #[test]
    fn test_webserver_grammar() {
        let content = r#"192.168.1.10 - - [15/Jan/2024:10:30:15 +0000] "GET /index.html HTTP/1.1" 200 1024 "-" "Mozilla/5.0""#;
        let report = analyze(content);
        assert_eq!(report.dialect, LogDialect::Webserver);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].source_ip, "192.168.1.10");
    }

    #[test]
    fn test_severity_histogram_sums() {
        let report = analyze(WEB_SAMPLE);
        let sum: u64 = report.summary.severity_distribution.values().sum();
        assert_eq!(sum as usize, report.summary.total_entries);
    }
}
