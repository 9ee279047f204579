//! Multi-precision arithmetic on little-endian `u64` limbs, shared by the
//! base field `Fp` and the scalar field. Every function in this module runs in
//! time independent of the limb values.

/// Compute a + b + carry, returning the result and the new carry over.
#[inline(always)]
pub(crate) const fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let ret = (a as u128) + (b as u128) + (carry as u128);
    (ret as u64, (ret >> 64) as u64)
}

/// Compute a - (b + borrow), returning the result and the new borrow. The
/// borrow is either 0 or `u64::MAX`.
#[inline(always)]
pub(crate) const fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let ret = (a as u128).wrapping_sub((b as u128) + ((borrow >> 63) as u128));
    (ret as u64, (ret >> 64) as u64)
}

/// Compute a + (b * c) + carry, returning the result and the new carry over.
#[inline(always)]
pub(crate) const fn mac(a: u64, b: u64, c: u64, carry: u64) -> (u64, u64) {
    let ret = (a as u128) + ((b as u128) * (c as u128)) + (carry as u128);
    (ret as u64, (ret >> 64) as u64)
}

/// Selects `a` when `mask` is all ones and `b` when it is zero.
#[inline(always)]
fn select<const N: usize>(a: &[u64; N], b: &[u64; N], mask: u64) -> [u64; N] {
    let mut out = [0u64; N];
    for i in 0..N {
        out[i] = (a[i] & mask) | (b[i] & !mask);
    }
    out
}

/// Reduces `hi * 2^(64N) + t` by one subtraction of the modulus. The input
/// must be smaller than twice the modulus.
#[inline(always)]
fn reduce_once<const N: usize>(t: &[u64; N], hi: u64, modulus: &[u64; N]) -> [u64; N] {
    let mut r = [0u64; N];
    let mut borrow = 0;
    for i in 0..N {
        let (v, b) = sbb(t[i], modulus[i], borrow);
        r[i] = v;
        borrow = b;
    }
    let (_, borrow) = sbb(hi, 0, borrow);
    // borrow is all ones exactly when t < modulus
    select(t, &r, borrow)
}

/// Montgomery multiplication `a * b * 2^(-64N) mod modulus`, using the
/// coarsely integrated operand scanning method. `inv` is
/// `-modulus^(-1) mod 2^64`. The product `a * b` must be below
/// `modulus * 2^(64N)`, which holds whenever one factor is reduced.
#[inline]
pub(crate) fn mont_mul<const N: usize>(
    a: &[u64; N],
    b: &[u64; N],
    modulus: &[u64; N],
    inv: u64,
) -> [u64; N] {
    let mut t = [0u64; N];
    let mut t_hi = 0u64;
    for i in 0..N {
        let mut carry = 0;
        for j in 0..N {
            let (v, c) = mac(t[j], a[j], b[i], carry);
            t[j] = v;
            carry = c;
        }
        let (hi, extra) = adc(t_hi, carry, 0);

        let m = t[0].wrapping_mul(inv);
        let (_, mut carry) = mac(t[0], m, modulus[0], 0);
        for j in 1..N {
            let (v, c) = mac(t[j], m, modulus[j], carry);
            t[j - 1] = v;
            carry = c;
        }
        let (v, c) = adc(hi, carry, 0);
        t[N - 1] = v;
        t_hi = extra + c;
    }
    reduce_once(&t, t_hi, modulus)
}

/// Modular addition of two reduced values.
#[inline]
pub(crate) fn add_mod<const N: usize>(a: &[u64; N], b: &[u64; N], modulus: &[u64; N]) -> [u64; N] {
    let mut s = [0u64; N];
    let mut carry = 0;
    for i in 0..N {
        let (v, c) = adc(a[i], b[i], carry);
        s[i] = v;
        carry = c;
    }
    reduce_once(&s, carry, modulus)
}

/// Modular subtraction of two reduced values.
#[inline]
pub(crate) fn sub_mod<const N: usize>(a: &[u64; N], b: &[u64; N], modulus: &[u64; N]) -> [u64; N] {
    let mut d = [0u64; N];
    let mut borrow = 0;
    for i in 0..N {
        let (v, bo) = sbb(a[i], b[i], borrow);
        d[i] = v;
        borrow = bo;
    }
    // add the modulus back if we underflowed
    let mut carry = 0;
    for i in 0..N {
        let (v, c) = adc(d[i], modulus[i] & borrow, carry);
        d[i] = v;
        carry = c;
    }
    d
}

/// Modular negation of a reduced value. Zero maps to zero.
#[inline]
pub(crate) fn neg_mod<const N: usize>(a: &[u64; N], modulus: &[u64; N]) -> [u64; N] {
    let mut d = [0u64; N];
    let mut borrow = 0;
    let mut any = 0;
    for i in 0..N {
        let (v, bo) = sbb(modulus[i], a[i], borrow);
        d[i] = v;
        borrow = bo;
        any |= a[i];
    }
    let mask = ((any == 0) as u64).wrapping_sub(1);
    for limb in d.iter_mut() {
        *limb &= mask;
    }
    d
}

/// Returns 1 if `a < modulus` and 0 otherwise.
#[inline]
pub(crate) fn is_below<const N: usize>(a: &[u64; N], modulus: &[u64; N]) -> u8 {
    let mut borrow = 0;
    for i in 0..N {
        let (_, bo) = sbb(a[i], modulus[i], borrow);
        borrow = bo;
    }
    (borrow & 1) as u8
}

/// Returns 1 if `a > b` and 0 otherwise.
#[inline]
pub(crate) fn is_above<const N: usize>(a: &[u64; N], b: &[u64; N]) -> u8 {
    let mut borrow = 0;
    for i in 0..N {
        let (_, bo) = sbb(b[i], a[i], borrow);
        borrow = bo;
    }
    (borrow & 1) as u8
}

/// Reads big-endian bytes into little-endian limbs. The length of `bytes` must
/// be `8 * N`.
#[inline]
pub(crate) fn limbs_from_be_bytes<const N: usize>(bytes: &[u8]) -> [u64; N] {
    debug_assert_eq!(bytes.len(), 8 * N);
    let mut limbs = [0u64; N];
    for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks_exact(8).rev()) {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(chunk);
        *limb = u64::from_be_bytes(buf);
    }
    limbs
}

/// Writes little-endian limbs as big-endian bytes. The length of `out` must be
/// `8 * N`.
#[inline]
pub(crate) fn limbs_to_be_bytes<const N: usize>(limbs: &[u64; N], out: &mut [u8]) {
    debug_assert_eq!(out.len(), 8 * N);
    for (limb, chunk) in limbs.iter().rev().zip(out.chunks_exact_mut(8)) {
        chunk.copy_from_slice(&limb.to_be_bytes());
    }
}
