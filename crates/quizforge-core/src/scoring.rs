//! Final score and result tier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result message bucket, derived from the share of correct answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultTier {
    /// Every answer correct.
    Perfect,
    /// At least 70%.
    Good,
    /// At least 40%.
    Average,
    /// Below 40%.
    Poor,
}

impl ResultTier {
    /// Tier for `score` correct answers out of `total`.
    ///
    /// Integer comparisons keep the boundaries exact: 7 of 10 is `Good`,
    /// 4 of 10 is `Average`.
    pub fn for_score(score: usize, total: usize) -> Self {
        if score == total {
            ResultTier::Perfect
        } else if score * 10 >= total * 7 {
            ResultTier::Good
        } else if score * 10 >= total * 4 {
            ResultTier::Average
        } else {
            ResultTier::Poor
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ResultTier::Perfect => "🎯 Genius! Did you eat the syllabus for breakfast?",
            ResultTier::Good => "👍 Not bad! You clearly paid some attention.",
            ResultTier::Average => "😅 You survived, but barely. Maybe read a bit more?",
            ResultTier::Poor => "🤦 Did you click answers at random?",
        }
    }
}

impl fmt::Display for ResultTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultTier::Perfect => write!(f, "perfect"),
            ResultTier::Good => write!(f, "good"),
            ResultTier::Average => write!(f, "average"),
            ResultTier::Poor => write!(f, "poor"),
        }
    }
}

/// Outcome of a finished quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
    pub tier: ResultTier,
}

impl QuizResult {
    pub fn new(score: usize, total: usize) -> Self {
        Self {
            score,
            total,
            tier: ResultTier::for_score(score, total),
        }
    }

    /// Share of correct answers in `[0, 1]`.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.score as f64 / self.total as f64
    }
}
