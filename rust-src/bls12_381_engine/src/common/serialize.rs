use byteorder::{ReadBytesExt, WriteBytesExt};

/// Result when deserializing a value. This is a simple wrapper around `Result`
/// that fixes the error type to be [anyhow::Error].
pub type ParseResult<T> = anyhow::Result<T>;

/// Trait for types which can be recovered from byte sources.
pub trait Deserial: Sized {
    fn deserial<R: ReadBytesExt>(source: &mut R) -> ParseResult<Self>;
}

/// Read exactly `l` bytes.
/// NB: This allocates a buffer of the given length, so `l` must be bounded.
/// Group elements are read with their fixed encoding length.
pub fn deserial_bytes<R: ReadBytesExt>(reader: &mut R, l: usize) -> ParseResult<Vec<u8>> {
    let mut svec = vec![0; l];
    reader.read_exact(&mut svec)?;
    Ok(svec)
}

/// Trait for writers which will not fail in normal operation with
/// small amounts of data, e.g., Vec<u8>.
pub trait Buffer: Sized + WriteBytesExt {
    type Result;
    fn start() -> Self;
    fn result(self) -> Self::Result;
}

impl Buffer for Vec<u8> {
    type Result = Vec<u8>;

    fn start() -> Vec<u8> { Vec::new() }

    fn result(self) -> Self::Result { self }
}

/// Trait implemented by types which can be encoded into byte arrays.
/// The intention is that the encoding is binary and not human readable.
pub trait Serial {
    fn serial<B: Buffer>(&self, _out: &mut B);
}

/// Raw bytes, without a length prefix.
impl Serial for [u8] {
    #[inline]
    fn serial<B: Buffer>(&self, out: &mut B) {
        out.write_all(self).expect("Writing to a buffer should not fail.");
    }
}

/// Dual to [Deserial::deserial] on the writing side. It allows writing
/// `sink.put(value)` in contrast to `value.serial(sink)`.
pub trait Put<A> {
    fn put(&mut self, _v: &A);
}

impl<R: Buffer, A: Serial> Put<A> for R {
    #[inline]
    fn put(&mut self, v: &A) { v.serial(self) }
}

/// A convenient way to refer to both [Serial] and [Deserial] together.
pub trait Serialize: Serial + Deserial {}

impl<A: Deserial + Serial> Serialize for A {}

/// Directly serialize to a vector of bytes.
#[inline]
pub fn to_bytes<A: Serial>(x: &A) -> Vec<u8> {
    let mut buf = Vec::<u8>::start();
    buf.put(x);
    buf.result()
}

// Helpers for json serialization

use hex::{decode, encode};
use serde::{de, de::Visitor, Deserializer, Serializer};
use std::{fmt, io::Cursor};

/// Encode the given value into a byte array using its [Serial] instance, and
/// then encode that byte array as a hex string into the provided serde
/// Serializer.
pub fn base16_encode<S: Serializer, T: Serial>(v: &T, ser: S) -> Result<S::Ok, S::Error> {
    let b16_str = encode(to_bytes(v));
    ser.serialize_str(&b16_str)
}

/// Dual to [base16_encode]. Trailing bytes after the value are rejected.
pub fn base16_decode<'de, D: Deserializer<'de>, T: Deserial>(des: D) -> Result<T, D::Error> {
    struct Base16Visitor<D>(std::marker::PhantomData<D>);

    impl<'de, D: Deserial> Visitor<'de> for Base16Visitor<D> {
        type Value = D;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            write!(formatter, "A base 16 string.")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let bytes = decode(v).map_err(de::Error::custom)?;
            let mut cursor = Cursor::new(&bytes);
            let value = D::deserial(&mut cursor).map_err(de::Error::custom)?;
            if cursor.position() != bytes.len() as u64 {
                return Err(de::Error::custom("Trailing bytes after the value."));
            }
            Ok(value)
        }
    }

    des.deserialize_str(Base16Visitor(Default::default()))
}
