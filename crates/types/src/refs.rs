//! Opaque references for containers in the content store.

use crate::crypto::PublicKey;
use crate::hash::Hash;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a board, derived from the board's deterministic keypair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BoardKey(PublicKey);

impl BoardKey {
    /// Create a board key from the board keypair's public key.
    pub fn new(key: PublicKey) -> Self {
        Self(key)
    }

    /// The underlying public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.0
    }
}

impl fmt::Display for BoardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.0)
    }
}

/// Opaque reference to a thread within a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ThreadRef(Hash);

impl ThreadRef {
    /// Wrap a content hash as a thread reference.
    pub fn new(hash: Hash) -> Self {
        Self(hash)
    }

    /// The underlying content hash.
    pub fn hash(&self) -> &Hash {
        &self.0
    }
}

impl fmt::Display for ThreadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Thread({}..)", &self.0.to_hex()[..8])
    }
}

/// Opaque reference to a post within a thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PostRef(Hash);

impl PostRef {
    /// Wrap a content hash as a post reference.
    pub fn new(hash: Hash) -> Self {
        Self(hash)
    }

    /// The underlying content hash.
    pub fn hash(&self) -> &Hash {
        &self.0
    }
}

impl fmt::Display for PostRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Post({}..)", &self.0.to_hex()[..8])
    }
}
