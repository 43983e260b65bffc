//! Single-point crossover (grounded on `original_source/genetics.py`'s
//! `GeneticAlgo._crossover`).
//!
//! The cut point is drawn from `[0, min(len(a), len(b)) / 2]` and then
//! doubled, so it can only ever land in the *first half* of the shorter
//! parent. The original flags this as a likely bug (a true single-point
//! crossover should range over the whole shorter parent) but never fixes it;
//! this keeps the same narrowed range rather than silently correcting it.

use rand::Rng;

/// With probability `crossover_rate`, swaps the tails of `a` and `b` at a
/// random even cut point confined to the first half of the shorter parent.
/// Otherwise returns the parents unchanged.
pub fn crossover(a: &[u8], b: &[u8], crossover_rate: f64, rng: &mut impl Rng) -> (Vec<u8>, Vec<u8>) {
    if !rng.gen_bool(crossover_rate.clamp(0.0, 1.0)) {
        return (a.to_vec(), b.to_vec());
    }

    let half = a.len().min(b.len()) / 2;
    let cut = rng.gen_range(0..=half) * 2;

    let child_a = [&a[..cut], &b[cut..]].concat();
    let child_b = [&b[..cut], &a[cut..]].concat();
    (child_a, child_b)
}
