//! Content records and the simulated identities that author them.

use crate::crypto::{KeyPair, PublicKey, Signature};
use crate::refs::PostRef;
use crate::signing::{self, SignError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A simulated user: a display alias plus the keypair that authors its
/// signed actions.
#[derive(Clone)]
pub struct UserIdentity {
    /// Human-readable alias used in generated content.
    pub alias: String,
    keypair: KeyPair,
}

impl UserIdentity {
    /// Create an identity from an alias and keypair.
    pub fn new(alias: impl Into<String>, keypair: KeyPair) -> Self {
        Self {
            alias: alias.into(),
            keypair,
        }
    }

    /// The identity's public key.
    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    /// The identity's signing keypair.
    pub fn keypair(&self) -> &KeyPair {
        &self.keypair
    }
}

impl fmt::Debug for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserIdentity({} {})", self.alias, self.public_key())
    }
}

/// An unsigned post body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Post title.
    pub title: String,
    /// Post body text.
    pub body: String,
}

/// Sentiment expressed by a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteMode {
    /// -1: disapprove.
    Down,
    /// 0: retract / no sentiment.
    Neutral,
    /// +1: approve.
    Up,
}

impl VoteMode {
    /// Map a drawn integer in `[-1, 1]` to a mode.
    pub fn from_i8(mode: i8) -> Option<Self> {
        match mode {
            -1 => Some(VoteMode::Down),
            0 => Some(VoteMode::Neutral),
            1 => Some(VoteMode::Up),
            _ => None,
        }
    }

    /// The wire representation of this mode.
    pub fn as_i8(self) -> i8 {
        match self {
            VoteMode::Down => -1,
            VoteMode::Neutral => 0,
            VoteMode::Up => 1,
        }
    }
}

/// An unsigned vote record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// The expressed sentiment.
    pub mode: VoteMode,
}

/// A post signed by its author, ready for submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedPost {
    /// The post content.
    pub post: Post,
    /// The author's public key.
    pub author: PublicKey,
    /// Signature over the post's signing message.
    pub signature: Signature,
}

impl SignedPost {
    /// Sign a post with the author's keypair.
    ///
    /// Fails with [`SignError::KeyMismatch`] if `author` is not the
    /// public half of `keypair`.
    pub fn create(post: Post, author: &PublicKey, keypair: &KeyPair) -> Result<Self, SignError> {
        if keypair.public_key() != *author {
            return Err(SignError::KeyMismatch);
        }
        let signature = keypair.sign(&signing::post_message(&post));
        Ok(Self {
            post,
            author: *author,
            signature,
        })
    }

    /// Check the signature against the recorded author key.
    pub fn verify(&self) -> bool {
        self.author
            .verify(&signing::post_message(&self.post), &self.signature)
    }
}

/// A vote signed by its voter, ready for submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedVote {
    /// The vote content.
    pub vote: Vote,
    /// The voter's public key.
    pub voter: PublicKey,
    /// Signature over the vote's signing message.
    pub signature: Signature,
}

impl SignedVote {
    /// Sign a vote with the voter's keypair.
    ///
    /// Fails with [`SignError::KeyMismatch`] if `voter` is not the
    /// public half of `keypair`.
    pub fn create(vote: Vote, voter: &PublicKey, keypair: &KeyPair) -> Result<Self, SignError> {
        if keypair.public_key() != *voter {
            return Err(SignError::KeyMismatch);
        }
        let signature = keypair.sign(&signing::vote_message(&vote));
        Ok(Self {
            vote,
            voter: *voter,
            signature,
        })
    }

    /// Check the signature against the recorded voter key.
    pub fn verify(&self) -> bool {
        self.voter
            .verify(&signing::vote_message(&self.vote), &self.signature)
    }
}

/// A stored post together with the reference it is retrievable under.
#[derive(Debug, Clone)]
pub struct PostEntry {
    /// Reference assigned by the store.
    pub reference: PostRef,
    /// The stored record.
    pub post: SignedPost,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_post() -> Post {
        Post {
            title: "Test Post 1".into(),
            body: "This is a test post by test user alpha.".into(),
        }
    }

    #[test]
    fn test_signed_post_roundtrip() {
        let keypair = KeyPair::generate();
        let signed =
            SignedPost::create(test_post(), &keypair.public_key(), &keypair).unwrap();

        assert!(signed.verify());
    }

    #[test]
    fn test_signed_post_rejects_mismatched_key() {
        let keypair = KeyPair::generate();
        let other = KeyPair::generate();

        let result = SignedPost::create(test_post(), &other.public_key(), &keypair);
        assert_eq!(result.unwrap_err(), SignError::KeyMismatch);
    }

    #[test]
    fn test_tampered_post_fails_verification() {
        let keypair = KeyPair::generate();
        let mut signed =
            SignedPost::create(test_post(), &keypair.public_key(), &keypair).unwrap();

        signed.post.body = "edited".into();
        assert!(!signed.verify());
    }

    #[test]
    fn test_signed_vote_roundtrip() {
        let keypair = KeyPair::generate();
        let vote = Vote { mode: VoteMode::Up };
        let signed = SignedVote::create(vote, &keypair.public_key(), &keypair).unwrap();

        assert!(signed.verify());
    }

    #[test]
    fn test_signed_vote_rejects_mismatched_key() {
        let keypair = KeyPair::generate();
        let other = KeyPair::generate();
        let vote = Vote {
            mode: VoteMode::Down,
        };

        let result = SignedVote::create(vote, &other.public_key(), &keypair);
        assert_eq!(result.unwrap_err(), SignError::KeyMismatch);
    }

    #[test]
    fn test_vote_mode_wire_mapping() {
        assert_eq!(VoteMode::from_i8(-1), Some(VoteMode::Down));
        assert_eq!(VoteMode::from_i8(0), Some(VoteMode::Neutral));
        assert_eq!(VoteMode::from_i8(1), Some(VoteMode::Up));
        assert_eq!(VoteMode::from_i8(2), None);

        for mode in [VoteMode::Down, VoteMode::Neutral, VoteMode::Up] {
            assert_eq!(VoteMode::from_i8(mode.as_i8()), Some(mode));
        }
    }
}
