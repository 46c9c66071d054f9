//! Domain-separated signing messages for authored records.
//!
//! Each signable record type has a unique domain tag prefix, so a
//! signature produced for one record kind can never be replayed as
//! another:
//!
//! | Tag | Purpose |
//! |-----|---------|
//! | `post:` | Threaded posts |
//! | `vote:` | Votes on posts or threads |
//!
//! The signing message is the domain tag followed by the record's fields;
//! variable-length fields are length-prefixed to keep the encoding
//! unambiguous.

use crate::records::{Post, Vote};

/// Domain tag for post records.
///
/// Format: `post:` || len(title) || title || body
pub const DOMAIN_POST: &[u8] = b"post:";

/// Domain tag for vote records.
///
/// Format: `vote:` || mode
pub const DOMAIN_VOTE: &[u8] = b"vote:";

/// Build the signing message for a post.
pub fn post_message(post: &Post) -> Vec<u8> {
    let mut message =
        Vec::with_capacity(DOMAIN_POST.len() + 8 + post.title.len() + post.body.len());
    message.extend_from_slice(DOMAIN_POST);
    message.extend_from_slice(&(post.title.len() as u64).to_le_bytes());
    message.extend_from_slice(post.title.as_bytes());
    message.extend_from_slice(post.body.as_bytes());
    message
}

/// Build the signing message for a vote.
pub fn vote_message(vote: &Vote) -> Vec<u8> {
    let mut message = Vec::with_capacity(DOMAIN_VOTE.len() + 1);
    message.extend_from_slice(DOMAIN_VOTE);
    message.push(vote.mode.as_i8() as u8);
    message
}

/// Errors that can occur when constructing a signed record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignError {
    /// The supplied public key does not belong to the signing keypair.
    #[error("public key does not match the signing keypair")]
    KeyMismatch,
}
