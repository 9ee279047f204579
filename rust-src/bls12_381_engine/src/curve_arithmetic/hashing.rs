//! Message expansion and hashing to the base fields, shared by the hash to
//! curve functions of [G1](super::G1) and [G2](super::G2).
use super::{Fp, Fp2};
use sha2::{Digest, Sha256};
use std::borrow::Cow;

/// Output size of SHA-256 in bytes.
const B_IN_BYTES: usize = 32;
/// Input block size of SHA-256 in bytes.
const S_IN_BYTES: usize = 64;
/// The largest output expand_message_xmd can produce.
pub const MAX_EXPAND_LENGTH: usize = 255 * B_IN_BYTES;
/// Number of uniform bytes used per base field element. This is
/// `ceil((ceil(log2(p)) + 128) / 8)` for the 381 bit prime p.
pub const L: usize = 64;

const OVERSIZE_DST_PREFIX: &[u8] = b"H2C-OVERSIZE-DST-";

/// Shorten a domain separation tag longer than 255 bytes by hashing it.
/// Implements https://www.rfc-editor.org/rfc/rfc9380#section-5.3.3
fn reduce_dst(dst: &[u8]) -> Cow<[u8]> {
    if dst.len() <= 255 {
        Cow::Borrowed(dst)
    } else {
        let mut h = Sha256::new();
        h.update(OVERSIZE_DST_PREFIX);
        h.update(dst);
        Cow::Owned(h.finalize().to_vec())
    }
}

/// Implements https://www.rfc-editor.org/rfc/rfc9380#section-5.3.1 with
/// SHA-256. Returns `None` if more than [MAX_EXPAND_LENGTH] bytes are
/// requested.
pub fn expand_message_xmd(msg: &[u8], dst: &[u8], len_in_bytes: usize) -> Option<Vec<u8>> {
    if len_in_bytes > MAX_EXPAND_LENGTH {
        return None;
    }
    let mut out = vec![0u8; len_in_bytes];
    expand_into(msg, dst, &mut out);
    Some(out)
}

/// Fill `out` with `out.len()` uniform bytes. The length must be at most
/// [MAX_EXPAND_LENGTH].
pub(crate) fn expand_into(msg: &[u8], dst: &[u8], out: &mut [u8]) {
    debug_assert!(out.len() <= MAX_EXPAND_LENGTH);
    let dst = reduce_dst(dst);
    // DST_prime = DST || I2OSP(len(DST), 1)
    let dst_len = [dst.len() as u8];
    // l_i_b_str = I2OSP(len_in_bytes, 2)
    let len_in_bytes = (out.len() as u16).to_be_bytes();

    // b_0 = H(Z_pad || msg || l_i_b_str || I2OSP(0, 1) || DST_prime)
    let mut h = Sha256::new();
    h.update([0u8; S_IN_BYTES]);
    h.update(msg);
    h.update(len_in_bytes);
    h.update([0u8]);
    h.update(&dst);
    h.update(dst_len);
    let b_0 = h.finalize();

    // b_1 = H(b_0 || I2OSP(1, 1) || DST_prime)
    let mut h = Sha256::new();
    h.update(b_0);
    h.update([1u8]);
    h.update(&dst);
    h.update(dst_len);
    let mut b_i = h.finalize();

    for (i, chunk) in out.chunks_mut(B_IN_BYTES).enumerate() {
        if i > 0 {
            // b_i = H(strxor(b_0, b_(i - 1)) || I2OSP(i, 1) || DST_prime)
            let mut xor = [0u8; B_IN_BYTES];
            for (x, (a, b)) in xor.iter_mut().zip(b_0.iter().zip(b_i.iter())) {
                *x = a ^ b;
            }
            let mut h = Sha256::new();
            h.update(xor);
            h.update([(i + 1) as u8]);
            h.update(&dst);
            h.update(dst_len);
            b_i = h.finalize();
        }
        chunk.copy_from_slice(&b_i[..chunk.len()]);
    }
}

/// A field that hash_to_field can produce elements of.
pub trait FromUniformBytes: Sized {
    /// Number of uniform bytes consumed per element.
    const UNIFORM_LENGTH: usize;

    /// Reduce exactly [FromUniformBytes::UNIFORM_LENGTH] bytes to an element.
    fn from_uniform_bytes(bytes: &[u8]) -> Self;
}

impl FromUniformBytes for Fp {
    const UNIFORM_LENGTH: usize = L;

    fn from_uniform_bytes(bytes: &[u8]) -> Self {
        let mut wide = [0u8; L];
        wide.copy_from_slice(bytes);
        Fp::from_bytes_wide(&wide)
    }
}

impl FromUniformBytes for Fp2 {
    const UNIFORM_LENGTH: usize = 2 * L;

    fn from_uniform_bytes(bytes: &[u8]) -> Self {
        Fp2 {
            c0: Fp::from_uniform_bytes(&bytes[..L]),
            c1: Fp::from_uniform_bytes(&bytes[L..]),
        }
    }
}

/// Implements https://www.rfc-editor.org/rfc/rfc9380#section-5.2 with
/// expand_message_xmd over SHA-256. Produces `N` field elements, where `N` is
/// 1 or 2 in all uses in this crate.
pub fn hash_to_field<F: FromUniformBytes, const N: usize>(msg: &[u8], dst: &[u8]) -> [F; N] {
    let mut uniform = vec![0u8; N * F::UNIFORM_LENGTH];
    expand_into(msg, dst, &mut uniform);
    let len = F::UNIFORM_LENGTH;
    std::array::from_fn(|i| F::from_uniform_bytes(&uniform[i * len..(i + 1) * len]))
}
