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

//! Batch aggregation: reduce one file's records to an analyst summary.

use crate::parser::record::{NormalizedLogRecord, Severity};
use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

const TOP_TALKERS: usize = 10;

/// One summary per analyzed file, immutable once computed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub total_entries: usize,
    /// `"<min ISO> to <max ISO>"`, or `"No data"` for an empty batch
    pub time_range: String,
    pub threat_summary: String,
    /// Up to ten source addresses by descending frequency, ties kept in
    /// first-encountered order
    pub top_sources: Vec<String>,
    pub top_destinations: Vec<String>,
    pub threat_categories: IndexMap<String, u64>,
    pub severity_distribution: IndexMap<Severity, u64>,
}

impl AnalysisSummary {
    fn empty() -> Self {
        AnalysisSummary {
            total_entries: 0,
            time_range: "No data".to_string(),
            threat_summary: "No threats detected".to_string(),
            top_sources: Vec::new(),
            top_destinations: Vec::new(),
            threat_categories: IndexMap::new(),
            severity_distribution: IndexMap::new(),
        }
    }
}

/// Reduce a batch of records to its summary. Pure and deterministic: the
/// same records always produce the identical summary, narrative string
/// included. An empty batch is a valid summary, not an error.
pub fn summarize(records: &[NormalizedLogRecord]) -> AnalysisSummary {
    if records.is_empty() {
        return AnalysisSummary::empty();
    }

    let mut earliest = records[0].timestamp;
    let mut latest = records[0].timestamp;
    let mut threat_categories: IndexMap<String, u64> = IndexMap::new();
    let mut severity_distribution: IndexMap<Severity, u64> = IndexMap::new();
    let mut source_counts: IndexMap<&str, u64> = IndexMap::new();
    let mut destination_counts: IndexMap<&str, u64> = IndexMap::new();

    for record in records {
        earliest = earliest.min(record.timestamp);
        latest = latest.max(record.timestamp);

        *threat_categories
            .entry(record.threat_category.clone())
            .or_insert(0) += 1;
        *severity_distribution.entry(record.severity).or_insert(0) += 1;

        if !record.source_ip.is_empty() {
            *source_counts.entry(record.source_ip.as_str()).or_insert(0) += 1;
        }
        if !record.destination_ip.is_empty() {
            *destination_counts
                .entry(record.destination_ip.as_str())
                .or_insert(0) += 1;
        }
    }

    let time_range = format!("{} to {}", format_iso(earliest), format_iso(latest));
    let threat_summary = narrative(records.len(), &severity_distribution);

    AnalysisSummary {
        total_entries: records.len(),
        time_range,
        threat_summary,
        top_sources: top_talkers(source_counts),
        top_destinations: top_talkers(destination_counts),
        threat_categories,
        severity_distribution,
    }
}

fn format_iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// Descending by count; sort_by is stable, so equal counts keep the
// insertion (first-encountered) order
fn top_talkers(counts: IndexMap<&str, u64>) -> Vec<String> {
    let mut entries: Vec<(&str, u64)> = counts.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
        .into_iter()
        .take(TOP_TALKERS)
        .map(|(ip, _)| ip.to_string())
        .collect()
}

// One clause per non-zero severity bucket, critical first. The closing
// all-clear clause appears only when neither critical nor high events exist.
fn narrative(total: usize, severity_distribution: &IndexMap<Severity, u64>) -> String {
    let count = |severity| severity_distribution.get(&severity).copied().unwrap_or(0);
    let critical = count(Severity::Critical);
    let high = count(Severity::High);
    let medium = count(Severity::Medium);
    let low = count(Severity::Low);

    let mut clauses = vec![format!("Analysis of {total} log entries.")];
    if critical > 0 {
        clauses.push(format!("{critical} critical threats detected."));
    }
    if high > 0 {
        clauses.push(format!("{high} high severity events."));
    }
    if medium > 0 {
        clauses.push(format!("{medium} medium severity events."));
    }
    if low > 0 {
        clauses.push(format!("{low} low severity events."));
    }
    if critical == 0 && high == 0 {
        clauses.push("No high-priority threats detected.".to_string());
    }
    clauses.join(" ")
}
