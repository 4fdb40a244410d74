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
use fancy_regex::Regex;
use std::sync::LazyLock;

// Free and abuse-heavy TLDs
static LOW_REPUTATION_TLD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(tk|ml|ga|cf|gq|xyz|top|club|online|site)$").expect("valid regex literal")
});

// Names that suggest command-and-control or staging infrastructure
static C2_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)command|control|beacon|malware|trojan|backdoor|exfil|data")
        .expect("valid regex literal")
});

/// Score one DNS query.
///
/// Rule order (later matches overwrite the category): TXT/ANY query type
/// (+2), low-reputation TLD (+2), C2 keyword in the name (+3), NXDOMAIN
/// response (+1), non-normal input category (+3, label copied from the
/// input).
pub fn assess(
    query_type: &str,
    query_name: &str,
    response_code: &str,
    input_category: &str,
) -> Verdict {
    let mut verdict = Verdict::new();

    if query_type == "TXT" || query_type == "ANY" {
        verdict.add(2, "Suspicious DNS Query Type");
    }

    if LOW_REPUTATION_TLD.is_match(query_name).unwrap_or(false) {
        verdict.add(2, "Suspicious Domain");
    }

    if C2_KEYWORD.is_match(query_name).unwrap_or(false) {
        verdict.add(3, "Potential C2 Communication");
    }

    if response_code == "NXDOMAIN" {
        verdict.add(1, "DNS Resolution Failure");
    }

    if !input_category.is_empty() && !input_category.eq_ignore_ascii_case("normal") {
        verdict.add(3, input_category);
    }

    verdict
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::record::Severity;

    #[test]
    fn test_ordinary_lookup_is_low() {
        let verdict = assess("A", "www.example.com", "NOERROR", "normal");
        let (category, severity) = verdict.into_parts();
        assert_eq!(category, "Normal");
        assert_eq!(severity, Severity::Low);
    }

    #[test]
    fn test_txt_query_is_medium() {
        let verdict = assess("TXT", "www.example.com", "NOERROR", "normal");
        let (category, severity) = verdict.into_parts();
        assert_eq!(category, "Suspicious DNS Query Type");
        assert_eq!(severity, Severity::Medium);
    }

    #[test]
    fn test_c2_name_on_throwaway_tld() {
        let verdict = assess("A", "beacon.evil.tk", "NOERROR", "normal");
        // TLD (+2) then keyword (+3); label from the later rule
        assert_eq!(verdict.score(), 5);
        let (category, severity) = verdict.into_parts();
        assert_eq!(category, "Potential C2 Communication");
        assert_eq!(severity, Severity::High);
    }

    #[test]
    fn test_nxdomain_alone_is_low() {
        let verdict = assess("A", "typo.example.com", "NXDOMAIN", "normal");
        assert_eq!(verdict.score(), 1);
        let (category, severity) = verdict.into_parts();
        assert_eq!(category, "DNS Resolution Failure");
        assert_eq!(severity, Severity::Low);
    }

    #[test]
    fn test_any_query_with_input_category_stacks() {
        let verdict = assess("ANY", "cdn.example.com", "NOERROR", "DGA Domain");
        assert_eq!(verdict.score(), 5);
        let (category, severity) = verdict.into_parts();
        assert_eq!(category, "DGA Domain");
        assert_eq!(severity, Severity::High);
    }
}
