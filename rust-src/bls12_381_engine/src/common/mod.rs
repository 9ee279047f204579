//! Binary serialization of keys, signatures and group elements, and helpers
//! for their JSON representation.
#[cfg(test)]
mod helpers;
mod impls;
mod serialize;

#[cfg(test)]
pub use self::helpers::serialize_deserialize;
pub use self::serialize::*;

// Reexport for ease of use.
pub use byteorder::{ReadBytesExt, WriteBytesExt};

/// Implement [serde::Serialize] and [serde::Deserialize] for a type generic
/// over the signature scheme, as the base 16 encoding of its binary
/// serialization.
macro_rules! serde_base16 {
    ($t:ident) => {
        impl<S: $crate::aggregate_sig::SignatureScheme> serde::Serialize for $t<S> {
            fn serialize<Ser: serde::Serializer>(&self, ser: Ser) -> Result<Ser::Ok, Ser::Error> {
                $crate::common::base16_encode(self, ser)
            }
        }

        impl<'de, S: $crate::aggregate_sig::SignatureScheme> serde::Deserialize<'de> for $t<S> {
            fn deserialize<D: serde::Deserializer<'de>>(des: D) -> Result<Self, D::Error> {
                $crate::common::base16_decode(des)
            }
        }
    };
}

pub(crate) use serde_base16;
