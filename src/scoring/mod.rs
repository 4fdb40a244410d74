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

//! Heuristic threat scoring.
//!
//! Each dialect module exposes an `assess` function that walks its rule
//! table in a fixed order and accumulates points into a [`Verdict`]. All
//! dialects share the same severity banding. The category label follows a
//! last-match-wins policy: every matching rule overwrites the label while
//! the points keep adding up, so the final label is decided by rule order,
//! not by rule weight.

pub mod dns;
pub mod firewall;
pub mod ssl;
pub mod threat;
pub mod web;

use crate::parser::record::Severity;

/// Accumulated threat score plus the category label of the last rule that
/// matched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    score: u32,
    category: String,
}

impl Verdict {
    /// Start from the neutral "Normal" category
    pub fn new() -> Self {
        Self::with_category("Normal")
    }

    /// Start from a dialect-supplied default label (the threat feed seeds
    /// the verdict with the raw threat type)
    pub fn with_category(category: &str) -> Self {
        Verdict {
            score: 0,
            category: category.to_string(),
        }
    }

    /// Add points and overwrite the category label
    pub fn add(&mut self, points: u32, category: &str) {
        self.score += points;
        category.clone_into(&mut self.category);
    }

    /// Add points without touching the label
    pub fn add_points(&mut self, points: u32) {
        self.score += points;
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Map the accumulated score onto the four severity bands
    pub const fn severity(&self) -> Severity {
        if self.score >= 6 {
            Severity::Critical
        } else if self.score >= 4 {
            Severity::High
        } else if self.score >= 2 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    /// Consume the verdict into the `(category, severity)` pair stored on
    /// the record
    pub fn into_parts(self) -> (String, Severity) {
        let severity = self.severity();
        (self.category, severity)
    }
}

impl Default for Verdict {
    fn default() -> Self {
        Self::new()
    }
}
