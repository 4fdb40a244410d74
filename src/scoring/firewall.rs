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

// Legacy cleartext protocols that should not cross a modern perimeter
const SUSPICIOUS_PROTOCOLS: [&str; 5] = ["telnet", "ftp", "smtp", "pop3", "imap"];

// Remote-access and mail ports that attackers probe first
const SUSPICIOUS_PORTS: [u16; 8] = [22, 23, 25, 110, 143, 3389, 5900, 8080];

/// Score one firewall event.
///
/// Rule order (later matches overwrite the category): block/deny action
/// (+3), legacy protocol (+2), suspicious destination port (+2), non-normal
/// input category (+3, label copied from the input).
pub fn assess(action: &str, protocol: &str, input_category: &str, destination_port: u16) -> Verdict {
    let mut verdict = Verdict::new();

    let action = action.to_lowercase();
    if action == "block" || action == "deny" {
        verdict.add(3, "Blocked Traffic");
    }

    if SUSPICIOUS_PROTOCOLS.contains(&protocol.to_lowercase().as_str()) {
        verdict.add(2, "Suspicious Protocol");
    }

    if SUSPICIOUS_PORTS.contains(&destination_port) {
        verdict.add(2, "Suspicious Port Access");
    }

    if !input_category.is_empty() && !input_category.eq_ignore_ascii_case("normal") {
        verdict.add(3, input_category);
    }

    verdict
}
