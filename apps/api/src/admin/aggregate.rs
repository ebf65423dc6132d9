use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

pub const TOP_LABELS: usize = 10;

pub const SCORE_BUCKET_LABELS: [&str; 5] = ["0-19", "20-39", "40-59", "60-79", "80-100"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsReport {
    pub common_weaknesses: Vec<LabelCount>,
    pub missing_keywords: Vec<LabelCount>,
    pub top_strengths: Vec<LabelCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBucket {
    pub range: &'static str,
    pub count: i64,
}

/// Frequency counter that remembers first-seen order, so ties rank in the
/// order labels were first encountered.
#[derive(Debug, Default)]
pub struct LabelTally {
    index: HashMap<String, usize>,
    counts: Vec<(String, u64)>,
}

impl LabelTally {
    pub fn add(&mut self, label: &str) {
        match self.index.get(label) {
            Some(&i) => self.counts[i].1 += 1,
            None => {
                self.index.insert(label.to_string(), self.counts.len());
                self.counts.push((label.to_string(), 1));
            }
        }
    }

    pub fn top(mut self, n: usize) -> Vec<LabelCount> {
        // sort_by is stable
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts
            .into_iter()
            .take(n)
            .map(|(label, count)| LabelCount { label, count })
            .collect()
    }
}

/// Tallies weaknesses, missing keywords and strengths across stored
/// analysis results. Non-string entries and non-array fields are skipped.
pub fn analytics_report<'a>(results: impl IntoIterator<Item = &'a Value>) -> AnalyticsReport {
    let mut weaknesses = LabelTally::default();
    let mut keywords = LabelTally::default();
    let mut strengths = LabelTally::default();

    for result in results {
        tally_field(&mut weaknesses, result, "weaknesses");
        tally_field(&mut keywords, result, "missing_keywords");
        tally_field(&mut strengths, result, "strengths");
    }

    AnalyticsReport {
        common_weaknesses: weaknesses.top(TOP_LABELS),
        missing_keywords: keywords.top(TOP_LABELS),
        top_strengths: strengths.top(TOP_LABELS),
    }
}

fn tally_field(tally: &mut LabelTally, result: &Value, field: &str) {
    let Some(items) = result.get(field).and_then(|v| v.as_array()) else {
        return;
    };
    for label in items.iter().filter_map(|v| v.as_str()) {
        tally.add(label);
    }
}

/// Turns `(score / 20 capped at 4, count)` rows into labelled buckets,
/// skipping indices outside the label table.
pub fn score_distribution(rows: impl IntoIterator<Item = (i32, i64)>) -> Vec<ScoreBucket> {
    rows.into_iter()
        .filter_map(|(bucket, count)| {
            let label = SCORE_BUCKET_LABELS.get(usize::try_from(bucket).ok()?)?;
            Some(ScoreBucket {
                range: label,
                count,
            })
        })
        .collect()
}

/// Rounds to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
