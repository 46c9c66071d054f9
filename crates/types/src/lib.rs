//! Core types shared by the Threadmill workload generator.
//!
//! This crate defines the vocabulary of the content store the generator
//! exercises:
//!
//! - **Hashing**: [`Hash`], a 32-byte Blake3 content hash.
//! - **References**: [`BoardKey`], [`ThreadRef`], [`PostRef`] — opaque
//!   identities for containers in the store.
//! - **Crypto**: [`KeyPair`], [`PublicKey`], [`Signature`] — Ed25519
//!   signing for authored content.
//! - **Records**: [`Post`], [`Vote`] and their signed forms
//!   [`SignedPost`], [`SignedVote`], plus [`UserIdentity`] for the
//!   simulated authors.

pub mod crypto;
pub mod hash;
pub mod records;
pub mod refs;
pub mod signing;

pub use crypto::{KeyPair, PublicKey, Signature};
pub use hash::{Hash, HexError};
pub use records::{Post, PostEntry, SignedPost, SignedVote, UserIdentity, Vote, VoteMode};
pub use refs::{BoardKey, PostRef, ThreadRef};
pub use signing::SignError;
