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

//! Optional AI-summarization collaborator.
//!
//! A reduced view of up to [`MAX_AI_RECORDS`] records is sent to an
//! OpenAI-compatible chat-completions endpoint for an analyst-facing
//! assessment. The pipeline never depends on this module: any failure
//! (missing key, network, malformed response) degrades to a local
//! heuristic assessment, and the summary narrative produced by
//! `analysis::summarize` stays valid either way.

use crate::parser::record::{NormalizedLogRecord, Severity};
use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Write as _;
use std::time::Duration;

/// Upper bound on records shared with the external service
pub const MAX_AI_RECORDS: usize = 100;

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// The per-record view exposed to the AI collaborator
#[derive(Debug, Clone, Serialize)]
pub struct RecordView {
    pub timestamp: String,
    pub source_ip: String,
    pub destination_ip: String,
    pub url: String,
    pub action: String,
    pub status_code: u16,
    pub user_agent: String,
    pub threat_category: String,
    pub severity: Severity,
}

impl RecordView {
    fn from_record(record: &NormalizedLogRecord) -> Self {
        RecordView {
            timestamp: record.timestamp.to_rfc3339(),
            source_ip: record.source_ip.clone(),
            destination_ip: record.destination_ip.clone(),
            url: record.url.clone(),
            action: record.action.clone(),
            status_code: record.status_code,
            user_agent: record.user_agent.clone(),
            threat_category: record.threat_category.clone(),
            severity: record.severity,
        }
    }
}

/// Build the reduced view handed to the collaborator
pub fn record_views(records: &[NormalizedLogRecord]) -> Vec<RecordView> {
    records
        .iter()
        .take(MAX_AI_RECORDS)
        .map(RecordView::from_record)
        .collect()
}

/// Structured assessment returned by the AI service (or synthesized
/// locally when the service is unreachable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiAssessment {
    #[serde(default = "default_threat_level")]
    pub threat_level: Severity,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub ioc_indicators: Vec<String>,
    #[serde(default)]
    pub attack_patterns: Vec<String>,
}

const fn default_threat_level() -> Severity {
    Severity::Low
}

const fn default_confidence() -> f64 {
    0.5
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Client for the chat-completions collaborator
pub struct AiAnalyzer {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl AiAnalyzer {
    /// Reads `OPENAI_API_KEY`; without it every assessment uses the local
    /// fallback
    pub fn from_env() -> Self {
        Self::new(std::env::var("OPENAI_API_KEY").ok())
    }

    pub fn new(api_key: Option<String>) -> Self {
        AiAnalyzer {
            client: reqwest::blocking::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Assess a batch of record views. Never fails: any problem with the
    /// external service degrades to [`fallback_assessment`].
    pub fn assess(&self, views: &[RecordView]) -> AiAssessment {
        match self.request_assessment(views) {
            Ok(assessment) => assessment,
            Err(error) => {
                log::warn!("AI analysis unavailable, using local fallback: {error:#}");
                fallback_assessment(views)
            }
        }
    }

    fn request_assessment(&self, views: &[RecordView]) -> anyhow::Result<AiAssessment> {
        let api_key = self.api_key.as_deref().context("no API key configured")?;

        let prompt = build_prompt(views);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "You are a cybersecurity expert specializing in log analysis and \
                              threat detection. Provide accurate, actionable insights for SOC \
                              analysts."
                        .to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.3,
            max_tokens: 1000,
        };

        let response: ChatResponse = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .timeout(Duration::from_secs(30))
            .json(&request)
            .send()
            .context("sending chat-completions request")?
            .error_for_status()
            .context("chat-completions request rejected")?
            .json()
            .context("decoding chat-completions response")?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .context("no response content from AI service")?;

        serde_json::from_str(&content).context("AI response is not the expected JSON shape")
    }
}

fn build_prompt(views: &[RecordView]) -> String {
    format!(
        "You are a cybersecurity expert analyzing web proxy logs for threat detection. \
         Analyze the following log data and provide insights:\n\n\
         LOG SUMMARY:\n{}\n\n\
         Please provide analysis in the following JSON format:\n\
         {{\n\
           \"threat_level\": \"low|medium|high|critical\",\n\
           \"confidence\": 0.85,\n\
           \"insights\": [\"insight1\", \"insight2\"],\n\
           \"recommendations\": [\"recommendation1\", \"recommendation2\"],\n\
           \"ioc_indicators\": [\"indicator1\", \"indicator2\"],\n\
           \"attack_patterns\": [\"pattern1\", \"pattern2\"]\n\
         }}\n\n\
         Focus on:\n\
         1. Suspicious patterns and behaviors\n\
         2. Potential attack vectors\n\
         3. Indicators of compromise (IOCs)\n\
         4. Recommended actions for SOC analysts\n\
         5. Threat actor techniques and procedures",
        prepare_log_summary(views)
    )
}

/// Condensed text block describing the batch, embedded into the prompt
pub fn prepare_log_summary(views: &[RecordView]) -> String {
    if views.is_empty() {
        return "No log entries to analyze.".to_string();
    }

    let unique_ips: HashSet<&str> = views.iter().map(|v| v.source_ip.as_str()).collect();
    let unique_urls: HashSet<&str> = views.iter().map(|v| v.url.as_str()).collect();

    let mut severity_counts: IndexMap<Severity, usize> = IndexMap::new();
    let mut category_counts: IndexMap<&str, usize> = IndexMap::new();
    for view in views {
        *severity_counts.entry(view.severity).or_insert(0) += 1;
        *category_counts
            .entry(view.threat_category.as_str())
            .or_insert(0) += 1;
    }

    let suspicious_urls = views
        .iter()
        .filter(|v| {
            let url = &v.url;
            url.contains(".exe")
                || url.contains("cmd.exe")
                || url.contains("powershell")
                || url.contains("javascript:")
                || url.contains("data:")
        })
        .count();
    let suspicious_agents = views
        .iter()
        .filter(|v| {
            let agent = v.user_agent.to_lowercase();
            agent.contains("curl")
                || agent.contains("wget")
                || agent.contains("nmap")
                || agent.contains("sqlmap")
        })
        .count();
    let error_responses = views.iter().filter(|v| v.status_code >= 400).count();

    let mut summary = String::new();
    let _ = writeln!(summary, "Total Log Entries: {}", views.len());
    let _ = writeln!(summary, "Unique Source IPs: {}", unique_ips.len());
    let _ = writeln!(summary, "Unique URLs: {}", unique_urls.len());
    let _ = writeln!(summary, "\nSeverity Distribution:");
    for (severity, count) in &severity_counts {
        let _ = writeln!(summary, "- {severity}: {count}");
    }
    let _ = writeln!(summary, "\nThreat Categories:");
    for (category, count) in &category_counts {
        let _ = writeln!(summary, "- {category}: {count}");
    }
    let _ = writeln!(summary, "\nSuspicious Indicators:");
    let _ = writeln!(summary, "- Suspicious URLs: {suspicious_urls}");
    let _ = writeln!(summary, "- Suspicious User Agents: {suspicious_agents}");
    let _ = writeln!(summary, "- Error Responses (4xx/5xx): {error_responses}");
    let _ = writeln!(summary, "\nSample Suspicious Entries:");
    for view in views
        .iter()
        .filter(|v| v.severity >= Severity::High)
        .take(5)
    {
        let _ = writeln!(
            summary,
            "- {}: {} -> {} ({})",
            view.timestamp, view.source_ip, view.url, view.severity
        );
    }
    summary
}

/// Local heuristic assessment used whenever the AI service cannot answer
pub fn fallback_assessment(views: &[RecordView]) -> AiAssessment {
    let critical = views
        .iter()
        .filter(|v| v.severity == Severity::Critical)
        .count();
    let high = views.iter().filter(|v| v.severity == Severity::High).count();

    let threat_level = if critical > 0 {
        Severity::Critical
    } else if high > 5 {
        Severity::High
    } else if high > 0 {
        Severity::Medium
    } else {
        Severity::Low
    };

    let ioc_indicators = views
        .iter()
        .filter(|v| v.severity >= Severity::High)
        .take(10)
        .map(|v| format!("{} - {}", v.source_ip, v.url))
        .collect();

    AiAssessment {
        threat_level,
        confidence: 0.7,
        insights: vec![
            format!("Detected {critical} critical and {high} high severity events"),
            "Manual review recommended for suspicious patterns".to_string(),
        ],
        recommendations: vec![
            "Review high and critical severity events".to_string(),
            "Check for patterns in source IPs and URLs".to_string(),
            "Monitor for similar activity in the future".to_string(),
        ],
        ioc_indicators,
        attack_patterns: vec![
            "Basic pattern detection active".to_string(),
            "AI analysis unavailable".to_string(),
        ],
    }
}

/// Render an assessment as analyst-facing markdown
pub fn executive_summary(assessment: &AiAssessment) -> String {
    let bullet_list = |items: &[String]| {
        items
            .iter()
            .map(|item| format!("- {item}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "## Security Analysis Summary\n\n\
         **Threat Level**: {} (Confidence: {:.1}%)\n\n\
         ### Key Insights:\n{}\n\n\
         ### Recommendations:\n{}\n\n\
         ### Indicators of Compromise (IOCs):\n{}\n\n\
         ### Attack Patterns Detected:\n{}",
        assessment.threat_level.as_str().to_uppercase(),
        assessment.confidence * 100.0,
        bullet_list(&assessment.insights),
        bullet_list(&assessment.recommendations),
        bullet_list(&assessment.ioc_indicators),
        bullet_list(&assessment.attack_patterns),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::analyze;

    fn views_from(content: &str) -> Vec<RecordView> {
        record_views(&analyze(content).records)
    }

    #[test]
    fn test_views_capped_at_limit() {
        let mut content = String::new();
        for i in 0..150 {
            content.push_str(&format!(
                "2024-01-15T10:{:02}:{:02}Z,1.2.3.4,5.6.7.8,Mozilla/5.0,/page,GET,200,512,1024\n",
                i / 60,
                i % 60
            ));
        }
        let views = views_from(&content);
        assert_eq!(views.len(), MAX_AI_RECORDS);
    }

    #[test]
    fn test_fallback_low_for_clean_batch() {
        let views =
            views_from("2024-01-15T10:00:00Z,1.2.3.4,5.6.7.8,Mozilla/5.0,/index.html,GET,200,512,1024");
        let assessment = fallback_assessment(&views);
        assert_eq!(assessment.threat_level, Severity::Low);
        assert!(assessment.ioc_indicators.is_empty());
    }

    #[test]
    fn test_fallback_critical_when_critical_present() {
        // block + telnet + port 23 scores critical
        let views = views_from(
            "2024-01-15T10:00:00Z,block,telnet,10.0.0.1,53211,93.184.216.34,23,deny,normal",
        );
        let assessment = fallback_assessment(&views);
        assert_eq!(assessment.threat_level, Severity::Critical);
        assert_eq!(assessment.confidence, 0.7);
        assert_eq!(assessment.ioc_indicators.len(), 1);
    }

    #[test]
    fn test_missing_key_degrades_to_fallback() {
        let analyzer = AiAnalyzer::new(None);
        let views =
            views_from("2024-01-15T10:00:00Z,1.2.3.4,5.6.7.8,Mozilla/5.0,/index.html,GET,200,512,1024");
        let assessment = analyzer.assess(&views);
        assert_eq!(
            assessment.attack_patterns,
            vec!["Basic pattern detection active", "AI analysis unavailable"]
        );
    }

    #[test]
    fn test_prepare_log_summary_counts() {
        let views = views_from(
            "2024-01-15T10:00:00Z,1.2.3.4,5.6.7.8,curl/8.0,/files/cmd.exe,GET,404,512,1024",
        );
        let summary = prepare_log_summary(&views);
        assert!(summary.contains("Total Log Entries: 1"));
        assert!(summary.contains("- Suspicious URLs: 1"));
        assert!(summary.contains("- Suspicious User Agents: 1"));
        assert!(summary.contains("- Error Responses (4xx/5xx): 1"));
    }

    #[test]
    fn test_assessment_parses_partial_json() {
        let assessment: AiAssessment =
            serde_json::from_str(r#"{"threat_level":"high"}"#).expect("partial JSON accepted");
        assert_eq!(assessment.threat_level, Severity::High);
        assert_eq!(assessment.confidence, 0.5);
        assert!(assessment.insights.is_empty());
    }

    #[test]
    fn test_executive_summary_rendering() {
        let views = views_from(
            "2024-01-15T10:00:00Z,block,telnet,10.0.0.1,53211,93.184.216.34,23,deny,normal",
        );
        let rendered = executive_summary(&fallback_assessment(&views));
        assert!(rendered.contains("**Threat Level**: CRITICAL"));
        assert!(rendered.contains("### Indicators of Compromise"));
    }
}
