//! Binary encodings of field elements, scalars and group elements. Points use
//! the compressed form and are checked to be in the prime order subgroup when
//! read.
use super::serialize::*;
use crate::curve_arithmetic::{Affine, Curve, Fp, Fp2, Projective, Scalar};
use anyhow::Context;
use byteorder::ReadBytesExt;

impl Serial for Fp {
    fn serial<B: Buffer>(&self, out: &mut B) { self.to_bytes()[..].serial(out) }
}

impl Deserial for Fp {
    fn deserial<R: ReadBytesExt>(source: &mut R) -> ParseResult<Self> {
        let mut buf = [0u8; 48];
        source.read_exact(&mut buf)?;
        Option::<Fp>::from(Fp::from_bytes(&buf)).context("Not a canonical field element.")
    }
}

impl Serial for Fp2 {
    fn serial<B: Buffer>(&self, out: &mut B) { self.to_bytes()[..].serial(out) }
}

impl Deserial for Fp2 {
    fn deserial<R: ReadBytesExt>(source: &mut R) -> ParseResult<Self> {
        let mut buf = [0u8; 96];
        source.read_exact(&mut buf)?;
        Option::<Fp2>::from(Fp2::from_bytes(&buf)).context("Not a canonical field element.")
    }
}

impl Serial for Scalar {
    fn serial<B: Buffer>(&self, out: &mut B) { self.to_bytes_be()[..].serial(out) }
}

impl Deserial for Scalar {
    fn deserial<R: ReadBytesExt>(source: &mut R) -> ParseResult<Self> {
        let mut buf = [0u8; 32];
        source.read_exact(&mut buf)?;
        Option::<Scalar>::from(Scalar::from_bytes_be(&buf)).context("Not a canonical scalar.")
    }
}

impl<C: Curve> Serial for Affine<C> {
    fn serial<B: Buffer>(&self, out: &mut B) { self.to_compressed()[..].serial(out) }
}

impl<C: Curve> Deserial for Affine<C> {
    fn deserial<R: ReadBytesExt>(source: &mut R) -> ParseResult<Self> {
        let buf = deserial_bytes(source, C::GROUP_ELEMENT_LENGTH)?;
        Ok(Affine::from_compressed(&buf)?)
    }
}

impl<C: Curve> Serial for Projective<C> {
    fn serial<B: Buffer>(&self, out: &mut B) { self.to_affine().serial(out) }
}

impl<C: Curve> Deserial for Projective<C> {
    fn deserial<R: ReadBytesExt>(source: &mut R) -> ParseResult<Self> {
        Ok(Affine::<C>::deserial(source)?.to_projective())
    }
}
