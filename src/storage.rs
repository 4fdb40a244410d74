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

//! Persistence collaborator.
//!
//! The pipeline itself never touches storage; callers hand it an
//! [`AnalysisSink`] explicitly. A sink failure is a hard error for the
//! upload, but the computed report stays valid and can be re-persisted:
//! the pipeline is idempotent given the same input text.

use crate::parser::record::NormalizedLogRecord;
use crate::pipeline::AnalysisReport;
use anyhow::Context;
use fancy_regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static IPV4: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$")
        .expect("valid regex literal")
});

static IPV6: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}$").expect("valid regex literal")
});

/// Where a finished report goes
pub trait AnalysisSink {
    fn persist(&mut self, report: &AnalysisReport) -> anyhow::Result<()>;
}

/// Reject placeholders and anything that is not a literal IPv4/IPv6 address
pub fn validate_ip(ip: &str) -> Option<&str> {
    if ip.is_empty() || ip == "N/A" || ip == "unknown" || ip.len() > 45 {
        return None;
    }
    let valid =
        IPV4.is_match(ip).unwrap_or(false) || IPV6.is_match(ip).unwrap_or(false);
    valid.then_some(ip)
}

/// Writes `<stem>.records.json` and `<stem>.summary.json` next to the
/// given stem path
pub struct JsonFileSink {
    stem: PathBuf,
}

impl JsonFileSink {
    pub fn new(stem: impl Into<PathBuf>) -> Self {
        JsonFileSink { stem: stem.into() }
    }

    fn path_with_suffix(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .stem
            .file_name()
            .map_or_else(|| "analysis".to_string(), |n| n.to_string_lossy().into_owned());
        name.push_str(suffix);
        self.stem.with_file_name(name)
    }

    pub fn records_path(&self) -> PathBuf {
        self.path_with_suffix(".records.json")
    }

    pub fn summary_path(&self) -> PathBuf {
        self.path_with_suffix(".summary.json")
    }
}

impl AnalysisSink for JsonFileSink {
    fn persist(&mut self, report: &AnalysisReport) -> anyhow::Result<()> {
        let stored: Vec<serde_json::Value> = report
            .records
            .iter()
            .map(sanitized_record)
            .collect::<anyhow::Result<_>>()?;

        write_json(&self.records_path(), &stored)?;
        write_json(&self.summary_path(), &report.summary)?;
        log::info!(
            "Persisted {} records and summary to {}",
            report.records.len(),
            self.summary_path().display()
        );
        Ok(())
    }
}

// Records are persisted verbatim except for the IP columns, which become
// null when they fail validation (the analyzer itself keeps the raw strings)
fn sanitized_record(record: &NormalizedLogRecord) -> anyhow::Result<serde_json::Value> {
    let mut value = serde_json::to_value(record).context("serializing record")?;
    if let serde_json::Value::Object(map) = &mut value {
        if validate_ip(&record.source_ip).is_none() {
            map.insert("source_ip".to_string(), serde_json::Value::Null);
        }
        if validate_ip(&record.destination_ip).is_none() {
            map.insert("destination_ip".to_string(), serde_json::Value::Null);
        }
    }
    Ok(value)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("serializing {}", path.display()))?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::analyze;

    #[test]
    fn test_validate_ip() {
        assert_eq!(validate_ip("192.168.1.1"), Some("192.168.1.1"));
        assert_eq!(
            validate_ip("2001:0db8:0000:0000:0000:0000:0000:0001"),
            Some("2001:0db8:0000:0000:0000:0000:0000:0001")
        );
        assert_eq!(validate_ip("999.1.1.1"), None);
        assert_eq!(validate_ip("N/A"), None);
        assert_eq!(validate_ip("unknown"), None);
        assert_eq!(validate_ip(""), None);
        assert_eq!(validate_ip("internal-host"), None);
    }

    #[test]
    fn test_persist_round_trip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let report = analyze(
            "2024-01-15T10:00:00Z,1.2.3.4,5.6.7.8,Mozilla/5.0,/index.html,GET,200,512,1024",
        );

        let mut sink = JsonFileSink::new(dir.path().join("upload"));
        sink.persist(&report).expect("persist should succeed");

        let summary_json =
            std::fs::read_to_string(sink.summary_path()).expect("summary file written");
        let parsed: crate::analysis::AnalysisSummary =
            serde_json::from_str(&summary_json).expect("summary deserializes");
        assert_eq!(parsed.total_entries, 1);

        let records_json =
            std::fs::read_to_string(sink.records_path()).expect("records file written");
        assert!(records_json.contains("\"source_ip\": \"1.2.3.4\""));
    }

    #[test]
    fn test_invalid_ip_stored_as_null() {
        let dir = tempfile::tempdir().expect("temp dir");
        let report = analyze(
            "2024-01-15T10:00:00Z,not-an-ip,5.6.7.8,Mozilla/5.0,/index.html,GET,200,512,1024",
        );

        let mut sink = JsonFileSink::new(dir.path().join("upload"));
        sink.persist(&report).expect("persist should succeed");

        let records_json =
            std::fs::read_to_string(sink.records_path()).expect("records file written");
        assert!(records_json.contains("\"source_ip\": null"));
    }

    #[test]
    fn test_unwritable_path_is_hard_error() {
        let mut sink = JsonFileSink::new("/nonexistent-dir/upload");
        let report = analyze("");
        assert!(sink.persist(&report).is_err());
    }
}
