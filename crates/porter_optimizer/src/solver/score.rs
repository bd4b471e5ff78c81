use std::{
    cmp::Ordering,
    iter,
    ops::{Add, AddAssign, Sub, SubAssign},
};

use fxhash::FxHashMap;
use serde::Serialize;

use super::score_level::ScoreLevel;

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Score {
    pub hard_score: f64,
    pub soft_score: f64,
}

impl Score {
    pub const MAX: Score = Score {
        hard_score: f64::MAX,
        soft_score: f64::MAX,
    };

    pub const ZERO: Score = Score {
        hard_score: 0.0,
        soft_score: 0.0,
    };

    pub fn new(hard_score: f64, soft_score: f64) -> Self {
        Score {
            hard_score,
            soft_score,
        }
    }

    pub fn of(level: ScoreLevel, score: f64) -> Self {
        match level {
            ScoreLevel::Hard => Score::hard(score),
            ScoreLevel::Soft => Score::soft(score),
        }
    }

    pub fn hard(hard_score: f64) -> Self {
        Score {
            hard_score,
            soft_score: 0.0,
        }
    }

    pub fn soft(soft_score: f64) -> Self {
        Score {
            hard_score: 0.0,
            soft_score,
        }
    }

    pub fn zero() -> Self {
        Score::ZERO
    }

    pub fn is_failure(&self) -> bool {
        self.hard_score > 0.0
    }
}

impl Eq for Score {}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hard_score
            .total_cmp(&other.hard_score)
            .then_with(|| self.soft_score.total_cmp(&other.soft_score))
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl iter::Sum for Score {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, score| acc + score)
    }
}

impl Add<Score> for Score {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Score {
            hard_score: self.hard_score + other.hard_score,
            soft_score: self.soft_score + other.soft_score,
        }
    }
}

impl AddAssign<Score> for Score {
    fn add_assign(&mut self, other: Score) {
        self.hard_score += other.hard_score;
        self.soft_score += other.soft_score;
    }
}

impl Sub<Score> for Score {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Score {
            hard_score: self.hard_score - other.hard_score,
            soft_score: self.soft_score - other.soft_score,
        }
    }
}

impl SubAssign<Score> for Score {
    fn sub_assign(&mut self, other: Score) {
        self.hard_score -= other.hard_score;
        self.soft_score -= other.soft_score;
    }
}

/// Per-constraint score breakdown, used for diagnostics.
#[derive(Default, Clone, Debug, Serialize)]
pub struct ScoreAnalysis {
    pub scores: FxHashMap<&'static str, Score>,
}

impl ScoreAnalysis {
    pub fn total_score(&self) -> Score {
        self.scores.values().copied().sum()
    }

    pub fn failing_constraints(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.scores
            .iter()
            .filter(|(_, score)| score.is_failure())
            .map(|(&name, _)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_addition() {
        let score1 = Score::hard(10.0);
        let score2 = Score::soft(5.0);
        let result = score1 + score2;
        assert_eq!(result.hard_score, 10.0);
        assert_eq!(result.soft_score, 5.0);
    }

    #[test]
    fn test_score_sum() {
        let scores = vec![Score::hard(10.0), Score::soft(5.0), Score::hard(-3.0)];
        let total: Score = scores.into_iter().sum();
        assert_eq!(total.hard_score, 7.0);
        assert_eq!(total.soft_score, 5.0);
    }

    #[test]
    fn test_score_cmp_hard_dominates() {
        let feasible_expensive = Score::soft(100000.0);
        let infeasible_cheap = Score::new(1.0, 0.0);

        assert!(feasible_expensive < infeasible_cheap);
        assert!(!feasible_expensive.is_failure());
        assert!(infeasible_cheap.is_failure());
    }

    #[test]
    fn test_score_cmp_soft_breaks_ties() {
        assert!(Score::soft(5.0) < Score::soft(6.0));
        assert_eq!(
            Score::new(2.0, 1.0).cmp(&Score::new(2.0, 1.0)),
            std::cmp::Ordering::Equal
        );
    }
}
