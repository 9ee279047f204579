//! The group G2, the prime order subgroup of the sextic twist
//! y^2 = x^3 + 4 (1 + u) over Fp2.
//!
//! Subgroup membership and cofactor clearing use the endomorphism psi, the
//! composition of the untwist, the Frobenius map and the twist, which acts on
//! G2 as multiplication by the curve parameter x.
use super::{
    bls12_381_g2hash,
    fp::Fp,
    fp2::Fp2,
    point::{Affine, Projective},
    Curve,
};

/// Marker type for G2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct G2;

pub type G2Affine = Affine<G2>;
pub type G2Projective = Projective<G2>;

/// Size in bytes of a compressed G2 point.
pub const G2_COMPRESSED_SIZE: usize = 96;
/// Size in bytes of an uncompressed G2 point.
pub const G2_UNCOMPRESSED_SIZE: usize = 192;

const B: Fp2 = Fp2 {
    c0: Fp::from_raw_unchecked([
        0xaa270000000cfff3,
        0x53cc0032fc34000a,
        0x478fe97a6b0a807f,
        0xb1d37ebee6ba24d7,
        0x8ec9733bbf78ab2f,
        0x09d645513d83de7e,
    ]),
    c1: Fp::from_raw_unchecked([
        0xaa270000000cfff3,
        0x53cc0032fc34000a,
        0x478fe97a6b0a807f,
        0xb1d37ebee6ba24d7,
        0x8ec9733bbf78ab2f,
        0x09d645513d83de7e,
    ]),
};

const B3: Fp2 = Fp2 {
    c0: Fp::from_raw_unchecked([
        0x447600000027552e,
        0xdcb8009a43480020,
        0x6f7ee9ce4a6e8b59,
        0xb10330b7c0a95bc6,
        0x6140b1fcfb1e54b7,
        0x0381be097f0bb4e1,
    ]),
    c1: Fp::from_raw_unchecked([
        0x447600000027552e,
        0xdcb8009a43480020,
        0x6f7ee9ce4a6e8b59,
        0xb10330b7c0a95bc6,
        0x6140b1fcfb1e54b7,
        0x0381be097f0bb4e1,
    ]),
};

const GENERATOR_X: Fp2 = Fp2 {
    c0: Fp::from_raw_unchecked([
        0xf5f28fa202940a10,
        0xb3f5fb2687b4961a,
        0xa1a893b53e2ae580,
        0x9894999d1a3caee9,
        0x6f67b7631863366b,
        0x058191924350bcd7,
    ]),
    c1: Fp::from_raw_unchecked([
        0xa5a9c0759e23f606,
        0xaaa0c59dbccd60c3,
        0x3bb17e18e2867806,
        0x1b1ab6cc8541b367,
        0xc2b6ed0ef2158547,
        0x11922a097360edf3,
    ]),
};

const GENERATOR_Y: Fp2 = Fp2 {
    c0: Fp::from_raw_unchecked([
        0x4c730af860494c4a,
        0x597cfa1f5e369c5a,
        0xe7e6856caa0a635a,
        0xbbefb5e96e0d495f,
        0x07d3a975f0ef25a2,
        0x0083fd8e7e80dae5,
    ]),
    c1: Fp::from_raw_unchecked([
        0xadc0fc92df64b05d,
        0x18aa270a2b1461dc,
        0x86adac6a3be4eba0,
        0x79495c4ec93da33a,
        0xe7175850a43ccaed,
        0x0b2bc2a163de1bf2,
    ]),
};

// 1 / (u + 1)^((p - 1) / 3)
const PSI_COEFF_X: Fp2 = Fp2 {
    c0: Fp::from_raw_unchecked([
        0x0000000000000000,
        0x0000000000000000,
        0x0000000000000000,
        0x0000000000000000,
        0x0000000000000000,
        0x0000000000000000,
    ]),
    c1: Fp::from_raw_unchecked([
        0x890dc9e4867545c3,
        0x2af322533285a5d5,
        0x50880866309b7e2c,
        0xa20d1b8c7e881024,
        0x14e4f04fe2db9068,
        0x14e56d3f1564853a,
    ]),
};

// 1 / (u + 1)^((p - 1) / 2)
const PSI_COEFF_Y: Fp2 = Fp2 {
    c0: Fp::from_raw_unchecked([
        0x3e2f585da55c9ad1,
        0x4294213d86c18183,
        0x382844c88b623732,
        0x92ad2afd19103e18,
        0x1d794e4fac7cf0b9,
        0x0bd592fc7d825ec8,
    ]),
    c1: Fp::from_raw_unchecked([
        0x7bcfa7a25aa30fda,
        0xdc17dec12a927e7c,
        0x2f088dd86b4ebef1,
        0xd1ca2087da74d4a7,
        0x2da2596696cebc1d,
        0x0e2b7eedbbfd87d2,
    ]),
};

// The x coefficient of psi^2, which lies in Fp. The y coefficient is -1.
const PSI2_COEFF_X: Fp = Fp::from_raw_unchecked([
    0xcd03c9e48671f071,
    0x5dab22461fcda5d2,
    0x587042afd3851b95,
    0x8eb60ebe01bacb9e,
    0x03f97d6e83d050d2,
    0x18f0206554638741,
]);

/// The absolute value of the curve parameter x, which is negative.
const X_ABS: u64 = 0xd201000000010000;

/// psi(x, y) = (conj(x) * PSI_COEFF_X, conj(y) * PSI_COEFF_Y)
fn psi(p: &G2Projective) -> G2Projective {
    Projective {
        x: p.x.frobenius_map() * PSI_COEFF_X,
        y: p.y.frobenius_map() * PSI_COEFF_Y,
        z: p.z.frobenius_map(),
    }
}

/// psi^2(x, y) = (x * PSI2_COEFF_X, -y)
fn psi2(p: &G2Projective) -> G2Projective {
    Projective {
        x: p.x.mul_by_fp(&PSI2_COEFF_X),
        y: -p.y,
        z: p.z,
    }
}

/// Multiplication by the curve parameter x.
fn mul_by_x(p: &G2Projective) -> G2Projective { p.mul_vartime(&[X_ABS]).neg() }

impl Curve for G2 {
    type Base = Fp2;

    const GROUP_ELEMENT_LENGTH: usize = G2_COMPRESSED_SIZE;
    const NAME: &'static str = "G2";
    const UNCOMPRESSED_LENGTH: usize = G2_UNCOMPRESSED_SIZE;

    fn b() -> Fp2 { B }

    fn b3() -> Fp2 { B3 }

    fn generator() -> G2Affine { Affine::from_xy_unchecked(GENERATOR_X, GENERATOR_Y) }

    /// A point on the twist is in G2 iff psi(P) = [x]P.
    fn is_torsion_free(p: &G2Projective) -> bool { psi(p) == mul_by_x(p) }

    /// Computes [h_eff]P for the effective cofactor h_eff of the hash to curve
    /// suites, as
    /// [x^2 - x - 1]P + [x - 1]psi(P) + psi^2(2P).
    fn clear_cofactor(p: &G2Projective) -> G2Projective {
        let t1 = mul_by_x(p); // [x]P
        let t2 = psi(p);
        let t3 = psi2(&p.double()) - t2; // psi^2(2P) - psi(P)
        let t2 = mul_by_x(&(t1 + t2)); // [x^2]P + [x]psi(P)
        t3 + t2 - t1 - *p
    }

    fn hash_to_curve(msg: &[u8], dst: &[u8]) -> G2Projective { bls12_381_g2hash::hash_to_curve(msg, dst) }

    fn encode_to_curve(msg: &[u8], dst: &[u8]) -> G2Projective {
        bls12_381_g2hash::encode_to_curve(msg, dst)
    }
}
