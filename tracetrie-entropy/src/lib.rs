// tracetrie-entropy/src/lib.rs
//! Numeric primitives shared by `tracetrie-core`'s string classifier.
//!
//! This crate is deliberately tiny and `no_std`: it owns the two pieces of
//! arithmetic that don't need `std` — Shannon entropy over a byte histogram,
//! and the "does this look like a randomly generated token" heuristic used to
//! decide the `RANDOM` string-class modifier. Everything else (tokenizing,
//! classifying, building and matching tries) lives in `tracetrie-core` and
//! depends on this crate only for these two functions.
#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod entropy;
pub mod randomness;

/// Common type definitions.
pub type EntropyScore = f64;
