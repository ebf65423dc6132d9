//! Résumé analysis: text extraction, heuristic scoring, AI critique
//! normalization, interview questions, and per-user history.

pub mod analyzer;
pub mod extractor;
pub mod handlers;
pub mod history;
pub mod interview;
pub mod normalizer;
pub mod prompts;
pub mod scoring;
