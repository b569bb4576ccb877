use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Row indices of a shuffled train/evaluation partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainEvalSplit {
    pub train: Vec<usize>,
    pub eval: Vec<usize>,
}

/// Shuffles `0..rows` with a seeded RNG and takes the first
/// `ceil(rows * test_fraction)` indices as the evaluation subset.
/// Identical inputs always produce identical partitions.
pub fn train_eval_split(rows: usize, test_fraction: f64, seed: u64) -> TrainEvalSplit {
    let fraction = test_fraction.clamp(0.0, 1.0);
    let eval_len = ((rows as f64) * fraction).ceil() as usize;
    let eval_len = eval_len.min(rows);

    let mut indices: Vec<usize> = (0..rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(eval_len);
    TrainEvalSplit {
        train,
        eval: indices,
    }
}

/// Gathers the rows at `indices`
pub fn select<T: Clone>(values: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&i| values[i].clone()).collect()
}
