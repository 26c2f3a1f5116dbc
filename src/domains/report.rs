use serde::{Deserialize, Serialize};

pub const PASS_SCORE: u8 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub headline: String,
    pub score: u8,
    pub explanation: String,
    pub evaluator_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub links: Vec<String>,
}

impl EvaluationResult {
    pub fn passed(&self) -> bool {
        self.score >= PASS_SCORE
    }
}

/// Report returned by the remote service for a single check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckReport {
    #[serde(default)]
    pub evaluation_results: Vec<EvaluationResult>,
    pub summary_score: u8,
    #[serde(default)]
    pub summary_explanation: String,
}

impl CheckReport {
    pub fn passed(&self) -> bool {
        self.summary_score >= PASS_SCORE
    }

    pub fn failures(&self) -> impl Iterator<Item = &EvaluationResult> {
        self.evaluation_results.iter().filter(|result| !result.passed())
    }
}
