use crate::curve_arithmetic::CurveDecodingError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateSigError {
    #[error("Invalid point: {0}")]
    InvalidPoint(#[from] CurveDecodingError),
    #[error("The lists have different lengths, {0} and {1}.")]
    LengthMismatch(usize, usize),
    #[error("Cannot aggregate an empty list.")]
    EmptyInput,
    #[error("The point at infinity is not allowed here.")]
    IdentityPoint,
    #[error("The point is not in the prime order subgroup.")]
    NotInSubgroup,
    #[error("Key material must be at least {min} bytes, got {actual}.")]
    InsufficientKeyMaterial { min: usize, actual: usize },
    #[error("Not a valid secret key encoding.")]
    InvalidSecretKey,
    #[error("Key derivation failed.")]
    KeyDerivation,
    #[error("Accumulators with different domain separation tags cannot be merged.")]
    DstMismatch,
}
