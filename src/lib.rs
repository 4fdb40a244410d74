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

//! Security log triage: dialect detection, per-line heuristic threat
//! scoring and batch aggregation.
//!
//! The core is [`pipeline::analyze`], a pure function from raw log text to
//! an [`pipeline::AnalysisReport`]. Storage and AI summarization are
//! collaborators layered on top; the pipeline works without either.

pub mod ai;
pub mod analysis;
pub mod parser;
pub mod pipeline;
pub mod scoring;
pub mod storage;

pub use analysis::{summarize, AnalysisSummary};
pub use parser::record::{LogType, NormalizedLogRecord, Severity};
pub use parser::{detect_dialect, parse_lines, LogDialect};
pub use pipeline::{analyze, AnalysisReport};
