use rand::Rng;
use rand::rngs::SmallRng;

const MINIMUM_WEIGHT: f64 = 0.1;

/// Roulette-wheel operator selection with segment-wise weight adaptation:
/// operators that keep producing accepted or improving solutions get picked
/// more often.
pub(crate) struct OperatorWeights<T> {
    strategies: Vec<T>,
    weights: Vec<f64>,
    scores: Vec<f64>,
    uses: Vec<usize>,
}

impl<T: Copy + PartialEq> OperatorWeights<T> {
    pub fn new(strategies: Vec<T>) -> Self {
        let len = strategies.len();
        assert!(len > 0, "At least one strategy is required");

        OperatorWeights {
            strategies,
            weights: vec![1.0; len],
            scores: vec![0.0; len],
            uses: vec![0; len],
        }
    }

    pub fn select(&self, rng: &mut SmallRng) -> T {
        let total: f64 = self.weights.iter().sum();
        let mut remaining = rng.random_range(0.0..total);

        for (index, &weight) in self.weights.iter().enumerate() {
            if remaining < weight {
                return self.strategies[index];
            }
            remaining -= weight;
        }

        self.strategies[self.strategies.len() - 1]
    }

    pub fn reward(&mut self, strategy: T, amount: f64) {
        if let Some(index) = self.strategies.iter().position(|&s| s == strategy) {
            self.scores[index] += amount;
            self.uses[index] += 1;
        }
    }

    /// Blends the segment's average rewards into the weights and starts a new
    /// segment.
    pub fn update(&mut self, reaction_factor: f64) {
        for index in 0..self.strategies.len() {
            if self.uses[index] > 0 {
                let average = self.scores[index] / self.uses[index] as f64;
                self.weights[index] = ((1.0 - reaction_factor) * self.weights[index]
                    + reaction_factor * average)
                    .max(MINIMUM_WEIGHT);
            }
            self.scores[index] = 0.0;
            self.uses[index] = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_rewarded_strategy_gains_weight() {
        let mut weights = OperatorWeights::new(vec!["a", "b"]);
        for _ in 0..10 {
            weights.reward("a", 30.0);
            weights.reward("b", 0.0);
        }
        weights.update(0.5);

        let mut rng = SmallRng::seed_from_u64(1);
        let picks_a = (0..1000).filter(|_| weights.select(&mut rng) == "a").count();
        assert!(picks_a > 900);
    }

    #[test]
    fn test_selection_is_seed_deterministic() {
        let weights = OperatorWeights::new(vec![1, 2, 3]);
        let run = |seed: u64| {
            let mut rng = SmallRng::seed_from_u64(seed);
            (0..50).map(|_| weights.select(&mut rng)).collect::<Vec<_>>()
        };

        assert_eq!(run(42), run(42));
    }
}
