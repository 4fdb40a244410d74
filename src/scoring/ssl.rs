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

const DEPRECATED_VERSIONS: [&str; 3] = ["SSLv2", "SSLv3", "TLSv1.0"];

const WEAK_CIPHER_TOKENS: [&str; 6] = ["RC4", "DES", "3DES", "MD5", "NULL", "EXPORT"];

static SUSPICIOUS_SUBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)self-signed|invalid|expired|revoked|unknown|test|example")
        .expect("valid regex literal")
});

/// Score one SSL-inspection event.
///
/// Rule order (later matches overwrite the category): deprecated protocol
/// version (+3), weak cipher token (+2), suspicious certificate subject
/// (+2), non-normal input category (+3, label copied from the input).
pub fn assess(
    ssl_version: &str,
    cipher_suite: &str,
    certificate_subject: &str,
    input_category: &str,
) -> Verdict {
    let mut verdict = Verdict::new();

    if DEPRECATED_VERSIONS.iter().any(|v| ssl_version.contains(v)) {
        verdict.add(3, "Weak SSL/TLS Version");
    }

    if WEAK_CIPHER_TOKENS.iter().any(|t| cipher_suite.contains(t)) {
        verdict.add(2, "Weak Cipher Suite");
    }

    if SUSPICIOUS_SUBJECT
        .is_match(certificate_subject)
        .unwrap_or(false)
    {
        verdict.add(2, "Suspicious Certificate");
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
    fn test_modern_handshake_is_low() {
        let verdict = assess(
            "TLSv1.3",
            "TLS_AES_256_GCM_SHA384",
            "CN=www.example.com",
            "normal",
        );
        let (category, severity) = verdict.into_parts();
        assert_eq!(category, "Normal");
        assert_eq!(severity, Severity::Low);
    }

    #[test]
    fn test_sslv3_with_rc4_is_high() {
        let verdict = assess("SSLv3", "RC4-SHA", "CN=www.example.com", "normal");
        // version (+3), cipher (+2)
        assert_eq!(verdict.score(), 5);
        let (category, severity) = verdict.into_parts();
        assert_eq!(category, "Weak Cipher Suite");
        assert_eq!(severity, Severity::High);
    }

    #[test]
    fn test_self_signed_subject() {
        let verdict = assess(
            "TLSv1.2",
            "ECDHE-RSA-AES128-GCM-SHA256",
            "CN=self-signed.local",
            "normal",
        );
        let (category, severity) = verdict.into_parts();
        assert_eq!(category, "Suspicious Certificate");
        assert_eq!(severity, Severity::Medium);
    }

    #[test]
    fn test_everything_weak_is_critical() {
        let verdict = assess("TLSv1.0", "DES-CBC3-SHA", "CN=expired.test", "Malware C2");
        // version (+3), cipher (+2), subject (+2), input category (+3)
        assert_eq!(verdict.score(), 10);
        let (category, severity) = verdict.into_parts();
        assert_eq!(category, "Malware C2");
        assert_eq!(severity, Severity::Critical);
    }
}
