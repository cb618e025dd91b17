//! Prompt Builder
//!
//! Every prompt embeds the whole document text. Nothing here truncates or
//! chunks, and the same inputs always give the same prompt.

use serde::{Deserialize, Serialize};

use crate::types::{AppError, AppResult};

/// Which template to use for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    #[default]
    #[serde(rename = "qa", alias = "question_answering")]
    QuestionAnswering,
    Summary,
    KeyPoints,
    #[serde(rename = "report", alias = "full_report")]
    FullReport,
}

impl AnalysisMode {
    pub fn label(&self) -> &'static str {
        match self {
            AnalysisMode::QuestionAnswering => "Q&A",
            AnalysisMode::Summary => "Summary",
            AnalysisMode::KeyPoints => "Key Points",
            AnalysisMode::FullReport => "Report",
        }
    }
}

impl std::str::FromStr for AnalysisMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "qa" | "q&a" | "question" | "question_answering" => Ok(AnalysisMode::QuestionAnswering),
            "summary" => Ok(AnalysisMode::Summary),
            "key_points" | "keypoints" => Ok(AnalysisMode::KeyPoints),
            "report" | "full_report" => Ok(AnalysisMode::FullReport),
            other => Err(AppError::InvalidRequest(format!("unknown analysis mode: {}", other))),
        }
    }
}

/// Summary length hint. Unrecognized hints are kept so they can fall back to "concisely".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SummaryLength {
    Short,
    #[default]
    Medium,
    Long,
    Other(String),
}

impl SummaryLength {
    pub fn parse(hint: &str) -> Self {
        match hint {
            "short" => SummaryLength::Short,
            "medium" => SummaryLength::Medium,
            "long" => SummaryLength::Long,
            other => SummaryLength::Other(other.to_string()),
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self {
            SummaryLength::Short => "in 2-3 sentences",
            SummaryLength::Medium => "in one paragraph (5-7 sentences)",
            SummaryLength::Long => "in 2-3 paragraphs",
            SummaryLength::Other(_) => "concisely",
        }
    }
}

impl From<Option<&str>> for SummaryLength {
    fn from(hint: Option<&str>) -> Self {
        hint.map(SummaryLength::parse).unwrap_or_default()
    }
}

pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the prompt for `mode`. Summary uses the default (medium) length.
    pub fn build(document_text: &str, mode: AnalysisMode, question: Option<&str>) -> AppResult<String> {
        match mode {
            AnalysisMode::QuestionAnswering => {
                let question = question
                    .map(str::trim)
                    .filter(|q| !q.is_empty())
                    .ok_or(AppError::MissingQuestion)?;
                Ok(Self::question_prompt(document_text, question))
            }
            AnalysisMode::Summary => Ok(Self::summary_prompt(document_text, &SummaryLength::default())),
            AnalysisMode::KeyPoints => Ok(Self::key_points_prompt(document_text)),
            AnalysisMode::FullReport => Ok(Self::report_prompt(document_text)),
        }
    }

    pub fn build_summary(document_text: &str, length: &SummaryLength) -> String {
        Self::summary_prompt(document_text, length)
    }

    fn question_prompt(document_text: &str, question: &str) -> String {
        format!(
            "Here is a document:\n\n<document>\n{document_text}\n</document>\n\nPlease answer this question about the document: {question}"
        )
    }

    fn summary_prompt(document_text: &str, length: &SummaryLength) -> String {
        format!(
            "Please summarize the following text {}:\n\n{}",
            length.instruction(),
            document_text
        )
    }

    fn key_points_prompt(document_text: &str) -> String {
        format!(
            "Please list the 3-5 key points of this document as bullet points.\n\nDocument:\n{document_text}"
        )
    }

    fn report_prompt(document_text: &str) -> String {
        format!(
            r#"Please analyze this document and provide:
1. A brief summary
2. Key points (3-5 bullet points)
3. Main topics covered

Document:
{document_text}"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "The quick brown fox.\nIt jumps over the lazy dog.";

    #[test]
    fn test_question_prompt_embeds_document_and_question() {
        let prompt = PromptBuilder::build(DOC, AnalysisMode::QuestionAnswering, Some("What jumps?")).unwrap();
        assert!(prompt.contains(DOC));
        assert!(prompt.contains("What jumps?"));
        assert!(prompt.contains("<document>"));
        assert!(prompt.ends_with("Please answer this question about the document: What jumps?"));
    }

    #[test]
    fn test_question_required() {
        for question in [None, Some(""), Some("   ")] {
            let err = PromptBuilder::build(DOC, AnalysisMode::QuestionAnswering, question).unwrap_err();
            assert!(matches!(err, AppError::MissingQuestion));
        }
    }

    #[test]
    fn test_summary_phrases() {
        let short = PromptBuilder::build_summary(DOC, &SummaryLength::parse("short"));
        assert!(short.contains("2-3 sentences"));
        assert!(short.ends_with(DOC));

        let medium = PromptBuilder::build_summary(DOC, &SummaryLength::from(None));
        assert!(medium.contains("in one paragraph (5-7 sentences)"));

        let long = PromptBuilder::build_summary(DOC, &SummaryLength::parse("long"));
        assert!(long.contains("in 2-3 paragraphs"));

        let odd = PromptBuilder::build_summary(DOC, &SummaryLength::parse("epic"));
        assert!(odd.contains("concisely"));
    }

    #[test]
    fn test_summary_mode_defaults_to_medium() {
        let prompt = PromptBuilder::build(DOC, AnalysisMode::Summary, None).unwrap();
        assert!(prompt.starts_with("Please summarize the following text in one paragraph (5-7 sentences):"));
    }

    #[test]
    fn test_report_sections_in_order() {
        let prompt = PromptBuilder::build(DOC, AnalysisMode::FullReport, None).unwrap();
        let summary = prompt.find("1. A brief summary").unwrap();
        let points = prompt.find("2. Key points (3-5 bullet points)").unwrap();
        let topics = prompt.find("3. Main topics covered").unwrap();
        assert!(summary < points && points < topics);
        assert!(prompt.contains(DOC));
    }

    #[test]
    fn test_key_points_prompt() {
        let prompt = PromptBuilder::build(DOC, AnalysisMode::KeyPoints, Some("ignored")).unwrap();
        assert!(prompt.contains("3-5 key points"));
        assert!(prompt.contains("bullet points"));
        assert!(prompt.contains(DOC));
        assert!(!prompt.contains("ignored"));
    }

    #[test]
    fn test_no_truncation_and_deterministic() {
        let big = "lorem ipsum ".repeat(50_000);
        let a = PromptBuilder::build(&big, AnalysisMode::KeyPoints, None).unwrap();
        let b = PromptBuilder::build(&big, AnalysisMode::KeyPoints, None).unwrap();
        assert!(a.contains(&big));
        assert_eq!(a, b);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("Q&A".parse::<AnalysisMode>().unwrap(), AnalysisMode::QuestionAnswering);
        assert_eq!("key-points".parse::<AnalysisMode>().unwrap(), AnalysisMode::KeyPoints);
        assert_eq!("Key Points".parse::<AnalysisMode>().unwrap(), AnalysisMode::KeyPoints);
        assert_eq!("report".parse::<AnalysisMode>().unwrap(), AnalysisMode::FullReport);
        assert!("poem".parse::<AnalysisMode>().is_err());
    }

    #[test]
    fn test_mode_serde_names() {
        assert_eq!(serde_json::to_string(&AnalysisMode::QuestionAnswering).unwrap(), "\"qa\"");
        assert_eq!(serde_json::to_string(&AnalysisMode::KeyPoints).unwrap(), "\"key_points\"");
        let mode: AnalysisMode = serde_json::from_str("\"report\"").unwrap();
        assert_eq!(mode, AnalysisMode::FullReport);
    }
}
