//! Fitness-proportional selection (grounded on `original_source/genetics.py`'s
//! `GeneticAlgo._select` and `_normalize_data`).

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

/// A scored individual: the evaluated program plus its fitness.
pub struct Scored {
    pub program: Vec<u8>,
    pub score: i64,
}

/// Min-max normalises raw scores into `[0, 1]` selection weights. When every
/// score is equal (including a population of one) every weight is `1.0`,
/// matching `_normalize_data`'s single-bucket special case.
fn normalize_weights(scores: &[i64]) -> Vec<f64> {
    let min = *scores.iter().min().unwrap();
    let max = *scores.iter().max().unwrap();
    if min == max {
        return vec![1.0; scores.len()];
    }
    let span = (max - min) as f64;
    scores.iter().map(|&s| (s - min) as f64 / span).collect()
}

/// Draws two parallel samples of size `ceil(n/2)` with replacement, weighted
/// by normalised fitness, and pairs them off.
pub fn select_pairs(population: &[Scored], rng: &mut impl Rng) -> Vec<(Vec<u8>, Vec<u8>)> {
    let scores: Vec<i64> = population.iter().map(|s| s.score).collect();
    let weights = normalize_weights(&scores);
    let dist = WeightedIndex::new(&weights).expect("at least one positive weight");

    let pair_count = population.len().div_ceil(2);
    let p1: Vec<usize> = (0..pair_count).map(|_| dist.sample(rng)).collect();
    let p2: Vec<usize> = (0..pair_count).map(|_| dist.sample(rng)).collect();

    p1.into_iter()
        .zip(p2)
        .map(|(a, b)| (population[a].program.clone(), population[b].program.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn equal_scores_give_uniform_weights() {
        let weights = normalize_weights(&[7, 7, 7]);
        assert_eq!(weights, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn min_and_max_scores_land_at_zero_and_one() {
        let weights = normalize_weights(&[10, 20, 30]);
        assert_eq!(weights[0], 0.0);
        assert_eq!(weights[2], 1.0);
    }

    #[test]
    fn selection_produces_ceil_half_pairs() {
        let population = vec![
            Scored { program: vec![1], score: 0 },
            Scored { program: vec![2], score: 100 },
            Scored { program: vec![3], score: 50 },
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let pairs = select_pairs(&population, &mut rng);
        assert_eq!(pairs.len(), 2);
    }
}
