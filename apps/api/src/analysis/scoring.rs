//! Heuristic résumé score: a deterministic, rule-based 0–100 estimate.
//!
//! Independent of the AI critique. All matching is case-insensitive.
//!
//! | rule | per match | cap |
//! |---|---|---|
//! | skill vocabulary present | 3 | 20 |
//! | quantified achievement (`30%`, `5+`) | 4 | 20 |
//! | experience duration (`3 years`) | 5 | 20 |
//! | action verb present | 2 | 10 |
//! | word count > 300 / > 200 | 15 / 10 | 15 |
//! | mentions both experience and education | 15 | 15 |

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const MAX_SCORE: u32 = 100;

const SKILLS: &[&str] = &[
    "python",
    "java",
    "c++",
    "machine learning",
    "sql",
    "aws",
    "react",
];

const ACTION_VERBS: &[&str] = &["developed", "built", "designed", "implemented", "optimized"];

static QUANTIFIED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+%|\d+\+").expect("valid regex"));
static YEARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+\s+years").expect("valid regex"));

/// Per-rule breakdown. `total` is the clamped sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub skills: u32,
    pub quantified: u32,
    pub experience_years: u32,
    pub action_verbs: u32,
    pub length: u32,
    pub structure: u32,
    pub total: u32,
}

/// Computes the heuristic score for extracted résumé text.
pub fn score_resume(text: &str) -> u32 {
    score_breakdown(text).total
}

pub fn score_breakdown(text: &str) -> ScoreBreakdown {
    let lower = text.to_lowercase();

    let skill_count = SKILLS.iter().filter(|s| lower.contains(*s)).count() as u32;
    let skills = (skill_count * 3).min(20);

    let quantified_count = QUANTIFIED.find_iter(&lower).count() as u32;
    let quantified = (quantified_count * 4).min(20);

    let years_count = YEARS.find_iter(&lower).count() as u32;
    let experience_years = (years_count * 5).min(20);

    let verb_count = ACTION_VERBS.iter().filter(|v| lower.contains(*v)).count() as u32;
    let action_verbs = (verb_count * 2).min(10);

    let word_count = lower.split_whitespace().count();
    let length = if word_count > 300 {
        15
    } else if word_count > 200 {
        10
    } else {
        0
    };

    let structure = if lower.contains("experience") && lower.contains("education") {
        15
    } else {
        0
    };

    let total =
        (skills + quantified + experience_years + action_verbs + length + structure).min(MAX_SCORE);

    ScoreBreakdown {
        skills,
        quantified,
        experience_years,
        action_verbs,
        length,
        structure,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filler(words: usize) -> String {
        vec!["lorem"; words].join(" ")
    }

    #[test]
    fn test_empty_text_scores_zero() {
        assert_eq!(score_resume(""), 0);
    }

    #[test]
    fn test_skills_counted_once_each() {
        let b = score_breakdown("Python python PYTHON and SQL");
        assert_eq!(b.skills, 6);
    }

    #[test]
    fn test_skills_capped_at_20() {
        let b = score_breakdown("python java c++ machine learning sql aws react");
        assert_eq!(b.skills, 20);
    }

    #[test]
    fn test_quantified_matches_percent_and_plus() {
        let b = score_breakdown("Cut costs by 30% across 5+ teams");
        assert_eq!(b.quantified, 8);
    }

    #[test]
    fn test_quantified_capped_at_20() {
        let b = score_breakdown("1% 2% 3% 4% 5% 6% 7+");
        assert_eq!(b.quantified, 20);
    }

    #[test]
    fn test_years_requires_digits_then_whitespace() {
        assert_eq!(score_breakdown("3 years of Rust").experience_years, 5);
        assert_eq!(score_breakdown("3years of Rust").experience_years, 0);
        assert_eq!(score_breakdown("three years of Rust").experience_years, 0);
        assert_eq!(score_breakdown("10 YEARS\tand 2  years").experience_years, 10);
    }

    #[test]
    fn test_action_verbs_capped_at_10() {
        let b = score_breakdown("developed built designed implemented optimized developed");
        assert_eq!(b.action_verbs, 10);
    }

    #[test]
    fn test_length_bonus_thresholds() {
        assert_eq!(score_breakdown(&filler(200)).length, 0);
        assert_eq!(score_breakdown(&filler(201)).length, 10);
        assert_eq!(score_breakdown(&filler(300)).length, 10);
        assert_eq!(score_breakdown(&filler(301)).length, 15);
    }

    #[test]
    fn test_structure_bonus_needs_both_sections() {
        assert_eq!(score_breakdown("Experience only").structure, 0);
        assert_eq!(score_breakdown("EDUCATION and experience").structure, 15);
    }

    #[test]
    fn test_score_is_case_insensitive() {
        let text = "Developed and implemented a system using Python and SQL with 3 years \
                    experience, improved performance by 30%. Experience section. Education section.";
        assert_eq!(score_resume(text), score_resume(&text.to_uppercase()));
    }

    #[test]
    fn test_end_to_end_example() {
        let text = format!(
            "Developed and implemented a system using Python and SQL with 3+ years experience, \
             improved performance by 30%. Experience section. Education section. {}",
            filler(300)
        );
        let b = score_breakdown(&text);
        assert_eq!(b.skills, 6);
        assert_eq!(b.quantified, 8);
        assert_eq!(b.experience_years, 0); // "3+ years" has no whitespace between digits and "years"
        assert_eq!(b.action_verbs, 4);
        assert_eq!(b.length, 15);
        assert_eq!(b.structure, 15);
        assert_eq!(b.total, 48);
        assert_eq!(score_resume(&text), score_resume(&text));
    }

    #[test]
    fn test_total_clamped_to_100() {
        let text = format!(
            "python java c++ machine learning sql aws react \
             10% 20% 30% 40% 50% 60+ \
             1 years 2 years 3 years 4 years 5 years \
             developed built designed implemented optimized \
             experience education {}",
            filler(400)
        );
        let b = score_breakdown(&text);
        assert_eq!(b.skills + b.quantified + b.experience_years, 60);
        assert_eq!(b.total, MAX_SCORE);
    }

    #[test]
    fn test_adding_a_match_never_lowers_score() {
        let mut text = String::from("Experience and education.");
        let mut previous = score_resume(&text);
        for _ in 0..8 {
            text.push_str(" Grew revenue 12%.");
            let current = score_resume(&text);
            assert!(current >= previous);
            previous = current;
        }
    }
}
