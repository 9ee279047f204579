//! Constant time scalar multiplication with a fixed window of four bits.
//!
//! The sequence of group operations depends only on the requested bit length,
//! never on the scalar, and table entries are read with a masked scan over
//! the whole table.
use subtle::{ConditionallySelectable, ConstantTimeEq};

/// The group operations the ladder needs.
pub(crate) trait WindowGroup: Copy + ConditionallySelectable {
    fn identity() -> Self;

    fn double(&self) -> Self;

    fn add(&self, other: &Self) -> Self;
}

const WINDOW_BITS: usize = 4;
const TABLE_SIZE: usize = 1 << WINDOW_BITS;

/// Multiply `base` by the integer with little-endian limbs `limbs`, reading
/// only its lowest `num_bits` bits, rounded up to a whole window. The bit
/// length is clamped to the number of bits in `limbs`.
pub(crate) fn mul_fixed_window<G: WindowGroup>(base: &G, limbs: &[u64], num_bits: usize) -> G {
    let mut table = [G::identity(); TABLE_SIZE];
    for i in 1..TABLE_SIZE {
        table[i] = table[i - 1].add(base);
    }

    let num_bits = num_bits.min(limbs.len() * 64);
    let num_windows = (num_bits + WINDOW_BITS - 1) / WINDOW_BITS;

    let mut acc = G::identity();
    for w in (0..num_windows).rev() {
        for _ in 0..WINDOW_BITS {
            acc = acc.double();
        }
        let bit = w * WINDOW_BITS;
        let digit = (limbs[bit / 64] >> (bit % 64)) & (TABLE_SIZE as u64 - 1);
        let mut entry = G::identity();
        for (j, candidate) in table.iter().enumerate() {
            entry.conditional_assign(candidate, (j as u64).ct_eq(&digit));
        }
        acc = acc.add(&entry);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::cell::RefCell;
    use subtle::Choice;

    thread_local! {
        static TRACE: RefCell<Vec<char>> = RefCell::new(Vec::new());
    }

    // Integers modulo 2^64 under addition, recording every operation.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    struct Traced(u64);

    impl ConditionallySelectable for Traced {
        fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
            Traced(u64::conditional_select(&a.0, &b.0, choice))
        }
    }

    impl WindowGroup for Traced {
        fn identity() -> Self { Traced(0) }

        fn double(&self) -> Self {
            TRACE.with(|t| t.borrow_mut().push('D'));
            Traced(self.0.wrapping_add(self.0))
        }

        fn add(&self, other: &Self) -> Self {
            TRACE.with(|t| t.borrow_mut().push('A'));
            Traced(self.0.wrapping_add(other.0))
        }
    }

    fn traced_mul(base: u64, limbs: &[u64], num_bits: usize) -> (u64, Vec<char>) {
        TRACE.with(|t| t.borrow_mut().clear());
        let res = mul_fixed_window(&Traced(base), limbs, num_bits);
        (res.0, TRACE.with(|t| t.borrow().clone()))
    }

    #[test]
    fn test_window_product() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..100 {
            let base: u64 = rng.gen();
            let k: u64 = rng.gen();
            assert_eq!(traced_mul(base, &[k], 64).0, base.wrapping_mul(k));
            assert_eq!(traced_mul(base, &[k, 0], 128).0, base.wrapping_mul(k));
            let small = k >> 32;
            assert_eq!(traced_mul(base, &[small], 32).0, base.wrapping_mul(small));
        }
        assert_eq!(traced_mul(7, &[5], 3).0, 35);
        assert_eq!(traced_mul(7, &[], 64).0, 0);
    }

    #[test]
    fn test_operation_sequence_is_scalar_independent() {
        for &num_bits in &[32usize, 128, 256] {
            let zero = traced_mul(3, &[0; 4], num_bits).1;
            let ones = traced_mul(3, &[u64::MAX; 4], num_bits).1;
            let mixed = traced_mul(3, &[0x0123_4567_89ab_cdef, 1, 0, u64::MAX], num_bits).1;
            assert_eq!(zero, ones);
            assert_eq!(zero, mixed);
            // table, then four doublings and one addition per window
            assert_eq!(zero.len(), (TABLE_SIZE - 1) + num_bits / 4 * 5);
        }
    }
}
