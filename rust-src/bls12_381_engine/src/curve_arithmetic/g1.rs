//! The group G1, the prime order subgroup of the curve y^2 = x^3 + 4 over Fp.
use super::{
    bls12_381_g1hash,
    fp::Fp,
    point::{Affine, Projective},
    scalar, Curve,
};

/// Marker type for G1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct G1;

pub type G1Affine = Affine<G1>;
pub type G1Projective = Projective<G1>;

/// Size in bytes of a compressed G1 point.
pub const G1_COMPRESSED_SIZE: usize = 48;
/// Size in bytes of an uncompressed G1 point.
pub const G1_UNCOMPRESSED_SIZE: usize = 96;

const B: Fp = Fp::from_raw_unchecked([
    0xaa270000000cfff3,
    0x53cc0032fc34000a,
    0x478fe97a6b0a807f,
    0xb1d37ebee6ba24d7,
    0x8ec9733bbf78ab2f,
    0x09d645513d83de7e,
]);

const B3: Fp = Fp::from_raw_unchecked([
    0x447600000027552e,
    0xdcb8009a43480020,
    0x6f7ee9ce4a6e8b59,
    0xb10330b7c0a95bc6,
    0x6140b1fcfb1e54b7,
    0x0381be097f0bb4e1,
]);

const GENERATOR_X: Fp = Fp::from_raw_unchecked([
    0x5cb38790fd530c16,
    0x7817fc679976fff5,
    0x154f95c7143ba1c1,
    0xf0ae6acdf3d0e747,
    0xedce6ecc21dbf440,
    0x120177419e0bfb75,
]);

const GENERATOR_Y: Fp = Fp::from_raw_unchecked([
    0xbaac93d50ce72271,
    0x8c22631a7918fd8e,
    0xdd595f13570725ce,
    0x51ac582950405194,
    0x0e1c8c3fad0059c0,
    0x0bbc3efc5008a26a,
]);

/// The effective cofactor `1 - x` of the hash to curve suites, where x is the
/// curve parameter.
const H_EFF: u64 = 0xd201000000010001;

impl Curve for G1 {
    type Base = Fp;

    const GROUP_ELEMENT_LENGTH: usize = G1_COMPRESSED_SIZE;
    const NAME: &'static str = "G1";
    const UNCOMPRESSED_LENGTH: usize = G1_UNCOMPRESSED_SIZE;

    fn b() -> Fp { B }

    fn b3() -> Fp { B3 }

    fn generator() -> G1Affine { Affine::from_xy_unchecked(GENERATOR_X, GENERATOR_Y) }

    fn is_torsion_free(p: &G1Projective) -> bool { bool::from(p.mul_vartime(&scalar::MODULUS).is_identity()) }

    fn clear_cofactor(p: &G1Projective) -> G1Projective { p.mul_vartime(&[H_EFF]) }

    fn hash_to_curve(msg: &[u8], dst: &[u8]) -> G1Projective { bls12_381_g1hash::hash_to_curve(msg, dst) }

    fn encode_to_curve(msg: &[u8], dst: &[u8]) -> G1Projective {
        bls12_381_g1hash::encode_to_curve(msg, dst)
    }
}
