//! # tessera-crypto
//!
//! Cryptographic primitives for the Tessera EVM.
//!
//! - Keccak-256 hashing, the function behind the `SHA3` opcode

#![warn(missing_docs)]
#![warn(clippy::all)]

mod hash;

pub use hash::keccak256;
