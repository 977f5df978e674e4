use std::ops::Range;

use rand::Rng;

/// Fisher-Yates, walking from the last slot down to index 1.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

pub fn shuffled_indices<R: Rng + ?Sized>(range: Range<usize>, rng: &mut R) -> Vec<usize> {
    let mut indices: Vec<usize> = range.collect();
    shuffle(&mut indices, rng);
    indices
}
