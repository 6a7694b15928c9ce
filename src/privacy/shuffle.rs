use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Permutes attribute values among the members of each equivalence class
#[derive(Debug, Clone)]
pub struct GroupShuffler {
    rng: StdRng,
}

impl GroupShuffler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Shuffle `values` independently inside every class of more than one row.
    /// Classes are row-index lists and must be visited in a stable order.
    pub fn shuffle_within<T: Clone>(&mut self, classes: &[Vec<usize>], values: &mut [T]) {
        for members in classes.iter().filter(|m| m.len() > 1) {
            let mut bucket: Vec<T> = members.iter().map(|&idx| values[idx].clone()).collect();
            bucket.shuffle(&mut self.rng);
            for (&idx, value) in members.iter().zip(bucket) {
                values[idx] = value;
            }
        }
    }
}
