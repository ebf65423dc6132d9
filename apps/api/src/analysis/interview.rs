//! Parses the line-oriented interview question format:
//!
//! ```text
//! 1. Question: ...
//!    Expected Answer: ...
//! ```
//!
//! Lines matching neither pattern are ignored. An answer only counts once its
//! question has been seen, and a question without an answer is dropped.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static QUESTION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+\.\s*Question:\s*(.+)").expect("valid regex"));
static ANSWER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*Expected Answer:\s*(.+)").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub question: String,
    pub expected_answer: String,
}

pub fn parse_question_pairs(text: &str) -> Vec<InterviewQuestion> {
    let mut pairs = Vec::new();
    let mut current_q: Option<String> = None;
    let mut current_a: Option<String> = None;

    for line in text.lines() {
        if let Some(caps) = QUESTION_LINE.captures(line) {
            flush(&mut pairs, current_q.take(), current_a.take());
            current_q = non_empty(&caps[1]);
        } else if let Some(caps) = ANSWER_LINE.captures(line) {
            if current_q.is_some() {
                current_a = non_empty(&caps[1]);
            }
        }
    }
    flush(&mut pairs, current_q, current_a);

    pairs
}

fn flush(pairs: &mut Vec<InterviewQuestion>, question: Option<String>, answer: Option<String>) {
    if let (Some(question), Some(expected_answer)) = (question, answer) {
        pairs.push(InterviewQuestion {
            question,
            expected_answer,
        });
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pair() {
        let pairs = parse_question_pairs("1. Question: What is X?\n   Expected Answer: It is Y.");
        assert_eq!(
            pairs,
            vec![InterviewQuestion {
                question: "What is X?".to_string(),
                expected_answer: "It is Y.".to_string(),
            }]
        );
    }

    #[test]
    fn test_multiple_pairs_in_order() {
        let text = "Here are your questions:\n\
                    1. Question: Why Rust?\n\
                    \x20  Expected Answer: Memory safety.\n\
                    \n\
                    2. Question: Describe a conflict.\n\
                    \x20  Expected Answer: Use STAR.\n";
        let pairs = parse_question_pairs(text);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].question, "Why Rust?");
        assert_eq!(pairs[1].expected_answer, "Use STAR.");
    }

    #[test]
    fn test_unanswered_question_dropped() {
        let text = "1. Question: First?\n\
                    2. Question: Second?\n\
                    Expected Answer: Only for second.";
        let pairs = parse_question_pairs(text);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].question, "Second?");
    }

    #[test]
    fn test_trailing_unanswered_question_dropped() {
        let text = "1. Question: A?\nExpected Answer: a.\n2. Question: B?";
        let pairs = parse_question_pairs(text);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].question, "A?");
    }

    #[test]
    fn test_answer_before_any_question_ignored() {
        let text = "Expected Answer: orphan\n1. Question: Q?\nExpected Answer: A.";
        let pairs = parse_question_pairs(text);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].expected_answer, "A.");
    }

    #[test]
    fn test_later_answer_replaces_earlier() {
        let text = "1. Question: Q?\nExpected Answer: first\nExpected Answer: second";
        assert_eq!(parse_question_pairs(text)[0].expected_answer, "second");
    }

    #[test]
    fn test_unrelated_text_yields_nothing() {
        assert!(parse_question_pairs("Sorry, I can't help with that.").is_empty());
        assert!(parse_question_pairs("").is_empty());
    }
}
