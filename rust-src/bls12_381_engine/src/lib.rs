//! A pairing engine for the BLS12-381 curve and the BLS signature scheme
//! built on it.
//!
//! - [curve_arithmetic] has the field tower, the groups G1 and G2, the
//!   pairing, hashing to the curve and multi-scalar multiplication.
//! - [aggregate_sig] has keys, signatures and their aggregation.
//! - [common] has the binary and JSON encodings.
//! - [parallel] has the execution context that bounds the worker threads
//!   used by batch operations.
pub mod aggregate_sig;
pub mod common;
pub mod curve_arithmetic;
pub mod parallel;
