//! decision.rs: verdict and score result types.
//!
//! `ScoreResult` is the shape the API and CLI return unchanged to callers:
//! a clamped 0..=100 score, a verdict derived only from that score, and the
//! reasons of every rule that fired, in evaluation order.

use serde::{Deserialize, Serialize};

/// Minimum score (inclusive) for an INVEST verdict.
pub const INVEST_THRESHOLD: u8 = 65;
/// Minimum score (inclusive) for a DEFER verdict.
pub const DEFER_THRESHOLD: u8 = 50;

/// Investment verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Invest,
    Defer,
    Pass,
}

impl Verdict {
    /// Classify an already clamped score.
    pub fn from_score(score: u8) -> Self {
        if score >= INVEST_THRESHOLD {
            Verdict::Invest
        } else if score >= DEFER_THRESHOLD {
            Verdict::Defer
        } else {
            Verdict::Pass
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Invest => "INVEST",
            Verdict::Defer => "DEFER",
            Verdict::Pass => "PASS",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u8,
    pub verdict: Verdict,
    pub reasons: Vec<String>,
}

impl ScoreResult {
    /// Build from an unclamped running total. The score is clamped to 0..=100
    /// before classification.
    pub fn from_raw(raw: i32, reasons: Vec<String>) -> Self {
        let score = raw.clamp(0, 100) as u8;
        Self {
            score,
            verdict: Verdict::from_score(score),
            reasons,
        }
    }
}
