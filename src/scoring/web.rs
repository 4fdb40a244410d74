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

// Executable/script extensions and shell-invocation fragments in the URL
static SUSPICIOUS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\.(exe|bat|cmd|ps1|vbs|js|php|asp|jsp)$|cmd\.exe|powershell|eval\(|script|javascript:|data:|vbscript:",
    )
    .expect("valid regex literal")
});

// Download tools and scanners that rarely show up in legitimate browsing
static SCANNER_USER_AGENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)curl|wget|python|perl|nmap|sqlmap|nikto|dirb|gobuster|hydra")
        .expect("valid regex literal")
});

/// Score one web-proxy or web-server request.
///
/// Rule order (later matches overwrite the category):
/// suspicious URL (+3), 4xx (+1) / 5xx (+2), scanner user agent (+2),
/// POST to an admin URL (+2), PUT/DELETE (+1).
pub fn assess(url: &str, action: &str, status_code: u16, user_agent: &str) -> Verdict {
    let mut verdict = Verdict::new();

    if SUSPICIOUS_URL.is_match(url).unwrap_or(false) {
        verdict.add(3, "Suspicious File Access");
    }

    if (400..500).contains(&status_code) {
        verdict.add(1, "Client Error");
    } else if status_code >= 500 {
        verdict.add(2, "Server Error");
    }

    if SCANNER_USER_AGENT.is_match(user_agent).unwrap_or(false) {
        verdict.add(2, "Suspicious User Agent");
    }

    if action.eq_ignore_ascii_case("POST") && url.contains("admin") {
        verdict.add(2, "Admin Access Attempt");
    }

    if action.eq_ignore_ascii_case("PUT") || action.eq_ignore_ascii_case("DELETE") {
        verdict.add(1, "Modification Attempt");
    }

    verdict
}
