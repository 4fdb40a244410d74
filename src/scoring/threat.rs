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

use super::Verdict;

const CRITICAL_TYPES: [&str; 4] = [
    "MALWARE_DETECTED",
    "BOTNET_COMMUNICATION",
    "COMMAND_INJECTION",
    "RANSOMWARE",
];

const HIGH_TYPES: [&str; 4] = [
    "PHISHING_ATTEMPT",
    "SUSPICIOUS_DOWNLOAD",
    "SQL_INJECTION",
    "DATA_EXFILTRATION",
];

const MEDIUM_TYPES: [&str; 3] = ["XSS_ATTACK", "BRUTE_FORCE_ATTEMPT", "SUSPICIOUS_ACTIVITY"];

/// Score one threat-feed event.
///
/// The verdict starts from the feed's own threat type as the label (or
/// "Unknown Threat" when empty). Rule order: critical type (+4), high type
/// (+3), medium type (+2), blocked action (+1, label untouched), then the
/// feed's severity hint blended into the score (+3/+2/+1 for
/// critical/high/medium). This is the only dialect that lets an input
/// severity influence the score; the final band is still derived from the
/// total.
pub fn assess(threat_type: &str, action: &str, severity_hint: &str) -> Verdict {
    let initial = if threat_type.is_empty() {
        "Unknown Threat"
    } else {
        threat_type
    };
    let mut verdict = Verdict::with_category(initial);

    if CRITICAL_TYPES.iter().any(|t| threat_type.contains(t)) {
        verdict.add(4, "Critical Threat");
    }

    if HIGH_TYPES.iter().any(|t| threat_type.contains(t)) {
        verdict.add(3, "High Threat");
    }

    if MEDIUM_TYPES.iter().any(|t| threat_type.contains(t)) {
        verdict.add(2, "Medium Threat");
    }

    if action.eq_ignore_ascii_case("blocked") {
        verdict.add_points(1);
    }

    match severity_hint.to_lowercase().as_str() {
        "critical" => verdict.add_points(3),
        "high" => verdict.add_points(2),
        "medium" => verdict.add_points(1),
        _ => {}
    }

    verdict
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::record::Severity;

    #[test]
    fn test_ransomware_blocked_critical_hint() {
        let verdict = assess("RANSOMWARE", "blocked", "critical");
        // type (+4), blocked (+1), hint (+3)
        assert_eq!(verdict.score(), 8);
        let (category, severity) = verdict.into_parts();
        assert_eq!(category, "Critical Threat");
        assert_eq!(severity, Severity::Critical);
    }

    #[test]
    fn test_phishing_allowed_low_hint() {
        let verdict = assess("PHISHING_ATTEMPT", "allowed", "low");
        assert_eq!(verdict.score(), 3);
        let (category, severity) = verdict.into_parts();
        assert_eq!(category, "High Threat");
        assert_eq!(severity, Severity::Medium);
    }

    #[test]
    fn test_unrecognized_type_keeps_raw_label() {
        let verdict = assess("PORT_SCAN", "blocked", "low");
        assert_eq!(verdict.score(), 1);
        let (category, severity) = verdict.into_parts();
        assert_eq!(category, "PORT_SCAN");
        assert_eq!(severity, Severity::Low);
    }

    #[test]
    fn test_empty_type_is_unknown_threat() {
        let verdict = assess("", "allowed", "low");
        let (category, _) = verdict.into_parts();
        assert_eq!(category, "Unknown Threat");
    }

    #[test]
    fn test_severity_hint_alone_never_reaches_its_own_band() {
        // A "critical" hint contributes +3: the derived band is medium, so
        // the input severity is never copied through verbatim
        let verdict = assess("PORT_SCAN", "allowed", "critical");
        assert_eq!(verdict.severity(), Severity::Medium);
    }

    #[test]
    fn test_brute_force_medium() {
        let verdict = assess("BRUTE_FORCE_ATTEMPT", "blocked", "medium");
        // type (+2), blocked (+1), hint (+1)
        assert_eq!(verdict.score(), 4);
        assert_eq!(verdict.severity(), Severity::High);
    }
}
