//! Triple-mode bit mutation (grounded on `original_source/genetics.py`'s
//! `GeneticAlgo._mutate`/`_point_mutate`/`_insert_mutate`/`_delete_mutate`,
//! which drive Python's `bitarray` the same way this drives `bitvec::BitVec`).

use bitvec::order::Lsb0;
use bitvec::vec::BitVec;
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MutationKind {
    Flip,
    Insert,
    Delete,
}

fn choose_kind(rng: &mut impl Rng) -> MutationKind {
    match rng.gen_range(0..3) {
        0 => MutationKind::Flip,
        1 => MutationKind::Insert,
        _ => MutationKind::Delete,
    }
}

/// Walks `program`'s bits; at each position, with probability `mutation_rate`,
/// flips the bit and then additionally applies one of flip/insert/delete
/// (mirroring the original's double-flip-by-default-plus-maybe-insert-or-
/// delete control flow). The cursor advances on insert, rewinds on delete, so
/// a single pass can both grow and shrink the bit string.
pub fn mutate(program: &[u8], mutation_rate: f64, rng: &mut impl Rng) -> Vec<u8> {
    if mutation_rate == 0.0 {
        return program.to_vec();
    }

    let mut bits: BitVec<u8, Lsb0> = BitVec::from_slice(program);

    let mut i = 0usize;
    while i < bits.len() {
        if rng.gen_bool(mutation_rate.clamp(0.0, 1.0)) {
            let value = bits[i];
            bits.set(i, !value);
            match choose_kind(rng) {
                MutationKind::Flip => {
                    let value = bits[i];
                    bits.set(i, !value);
                }
                MutationKind::Insert => {
                    let bit = rng.gen_bool(0.5);
                    bits.insert(i, bit);
                    i += 1;
                }
                MutationKind::Delete => {
                    bits.remove(i);
                    if i > 0 {
                        i -= 1;
                    } else {
                        continue;
                    }
                }
            }
        }
        i += 1;
    }

    bits.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn zero_rate_leaves_the_program_untouched() {
        let program = vec![0xAA, 0x55];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(mutate(&program, 0.0, &mut rng), program);
    }

    #[test]
    fn mutation_always_yields_a_whole_number_of_bytes() {
        let program = vec![0x12, 0x34, 0x56];
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mutated = mutate(&program, 0.3, &mut rng);
        assert!(!mutated.is_empty());
    }

    #[test]
    fn full_rate_changes_the_program() {
        let program = vec![0x00, 0x00, 0x00, 0x00];
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mutated = mutate(&program, 1.0, &mut rng);
        assert_ne!(mutated, program);
    }
}
