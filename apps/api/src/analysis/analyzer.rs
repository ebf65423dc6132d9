//! Résumé analysis for one request.
//!
//! Flow: extract text → heuristic score → one AI call → normalize → merge.
//!
//! Holds no per-request state; concurrent calls are independent.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::analysis::extractor::extract_text;
use crate::analysis::interview::{parse_question_pairs, InterviewQuestion};
use crate::analysis::normalizer::{
    fallback_hr_questions, fallback_tips, normalize_response, AiAnalysis,
};
use crate::analysis::prompts::{build_analysis_prompt, build_interview_prompt};
use crate::analysis::scoring::score_resume;
use crate::errors::AppError;
use crate::llm_client::TextGenerator;

/// What `/analyze` returns and what is stored as the `result` of a history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub algorithm_score: u32,
    /// Raw model text when the response could not be structured; empty otherwise.
    pub ai_analysis: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<String>,
    pub hr_questions: Vec<String>,
    pub tips: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_id: Option<Uuid>,
}

impl AnalysisResult {
    pub fn merge(algorithm_score: u32, analysis: AiAnalysis) -> Self {
        match analysis {
            AiAnalysis::Structured(c) => Self {
                algorithm_score,
                ai_analysis: String::new(),
                strengths: c.strengths,
                weaknesses: c.weaknesses,
                missing_keywords: c.missing_keywords,
                suggestions: c.suggestions,
                hr_questions: c.hr_questions,
                tips: c.tips,
                history_id: None,
            },
            AiAnalysis::Raw(raw) => Self {
                algorithm_score,
                ai_analysis: raw,
                strengths: vec![],
                weaknesses: vec![],
                missing_keywords: vec![],
                suggestions: vec![],
                hr_questions: fallback_hr_questions(),
                tips: fallback_tips(),
                history_id: None,
            },
        }
    }
}

/// Output of `ResumeAnalyzer::analyze`: the merged result plus the text it
/// was computed from, which the caller persists.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub text: String,
    pub result: AnalysisResult,
}

#[derive(Clone)]
pub struct ResumeAnalyzer {
    generator: Arc<dyn TextGenerator>,
}

impl ResumeAnalyzer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Analyzes an uploaded PDF.
    ///
    /// Errors: unreadable document → `Validation`; failed AI call → `Llm`.
    /// A response that cannot be parsed is not an error.
    pub async fn analyze(&self, document: &[u8]) -> Result<Analysis, AppError> {
        let bytes = document.to_vec();
        let text = tokio::task::spawn_blocking(move || extract_text(&bytes))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))?
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.analyze_text(text).await
    }

    /// Scores and critiques already-extracted text.
    pub async fn analyze_text(&self, text: String) -> Result<Analysis, AppError> {
        let score = score_resume(&text);

        let response = self
            .generator
            .generate(&build_analysis_prompt(&text))
            .await
            .map_err(|e| AppError::Llm(format!("Analysis call failed: {e}")))?;
        let analysis = normalize_response(&response);

        info!(
            "Analyzed resume: score={score}, words={}, structured={}",
            text.split_whitespace().count(),
            analysis.is_structured()
        );

        Ok(Analysis {
            result: AnalysisResult::merge(score, analysis),
            text,
        })
    }

    /// Generates interview questions with expected answers for `resume_text`.
    /// Empty input short-circuits without an AI call.
    pub async fn generate_interview_questions(
        &self,
        resume_text: &str,
    ) -> Result<Vec<InterviewQuestion>, AppError> {
        if resume_text.is_empty() {
            return Ok(vec![]);
        }

        let response = self
            .generator
            .generate(&build_interview_prompt(resume_text))
            .await
            .map_err(|e| AppError::Llm(format!("Interview question call failed: {e}")))?;

        let pairs = parse_question_pairs(&response);
        info!("Generated {} interview questions", pairs.len());
        Ok(pairs)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns a canned response and records every prompt it receives.
    pub(crate) struct FakeGenerator {
        response: Result<String, u16>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl FakeGenerator {
        pub(crate) fn replying(response: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(response.to_string()),
                prompts: Mutex::new(vec![]),
            })
        }

        pub(crate) fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                response: Err(status),
                prompts: Mutex::new(vec![]),
            })
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.response {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    message: "quota exhausted".to_string(),
                }),
            }
        }
    }

    const RESUME: &str = "Experience: developed Python services for 4 years, cut latency 40%. \
                          Education: BSc Computer Science.";

    #[tokio::test]
    async fn test_structured_response_merged() {
        let generator = FakeGenerator::replying(
            r#"```json
            {"strengths": ["Metrics"], "weaknesses": [], "missing_keywords": ["Docker"],
             "suggestions": ["Add links"], "hr_questions": ["Why us?"], "tips": ["Be concise"]}
            ```"#,
        );
        let analyzer = ResumeAnalyzer::new(generator.clone());

        let analysis = analyzer.analyze_text(RESUME.to_string()).await.unwrap();
        let result = analysis.result;

        assert_eq!(result.algorithm_score, score_resume(RESUME));
        assert_eq!(result.ai_analysis, "");
        assert_eq!(result.strengths, vec!["Metrics"]);
        assert_eq!(result.missing_keywords, vec!["Docker"]);
        assert_eq!(result.hr_questions, vec!["Why us?"]);
        assert_eq!(result.tips, vec!["Be concise"]);
        assert_eq!(analysis.text, RESUME);
        assert_eq!(generator.calls(), 1);
        assert!(generator.prompts.lock().unwrap()[0].contains(RESUME));
    }

    #[tokio::test]
    async fn test_unparseable_response_falls_back() {
        let analyzer = ResumeAnalyzer::new(FakeGenerator::replying("not json at all"));
        let result = analyzer.analyze_text(RESUME.to_string()).await.unwrap().result;

        assert_eq!(result.ai_analysis, "not json at all");
        assert!(result.strengths.is_empty());
        assert!(result.weaknesses.is_empty());
        assert!(result.missing_keywords.is_empty());
        assert!(result.suggestions.is_empty());
        assert_eq!(result.hr_questions, fallback_hr_questions());
        assert_eq!(result.tips, fallback_tips());
    }

    #[tokio::test]
    async fn test_failed_call_is_fatal() {
        let analyzer = ResumeAnalyzer::new(FakeGenerator::failing(429));
        let err = analyzer.analyze_text(RESUME.to_string()).await.unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }

    #[tokio::test]
    async fn test_unreadable_document_is_validation_error() {
        let generator = FakeGenerator::replying("{}");
        let analyzer = ResumeAnalyzer::new(generator.clone());
        let err = analyzer.analyze(b"plain text, not a pdf").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_interview_questions_parsed() {
        let generator = FakeGenerator::replying(
            "1. Question: What is ownership?\n   Expected Answer: Single owner per value.\n\
             2. Question: Unanswered?",
        );
        let analyzer = ResumeAnalyzer::new(generator.clone());

        let pairs = analyzer.generate_interview_questions(RESUME).await.unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].question, "What is ownership?");
        assert_eq!(pairs[0].expected_answer, "Single owner per value.");
        assert!(generator.prompts.lock().unwrap()[0].contains("Expected Answer:"));
    }

    #[tokio::test]
    async fn test_empty_resume_skips_ai_call() {
        let generator = FakeGenerator::replying("1. Question: Q?\nExpected Answer: A.");
        let analyzer = ResumeAnalyzer::new(generator.clone());

        let pairs = analyzer.generate_interview_questions("").await.unwrap();
        assert!(pairs.is_empty());
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_whitespace_resume_still_calls_ai() {
        let generator = FakeGenerator::replying("1. Question: Q?\nExpected Answer: A.");
        let analyzer = ResumeAnalyzer::new(generator.clone());

        let pairs = analyzer.generate_interview_questions("   ").await.unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(generator.calls(), 1);
    }

    #[test]
    fn test_history_id_omitted_until_persisted() {
        let result = AnalysisResult::merge(10, AiAnalysis::Raw("x".to_string()));
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("history_id").is_none());
        assert_eq!(json["algorithm_score"], 10);
    }
}
