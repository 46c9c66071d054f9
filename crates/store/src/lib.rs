//! Content store gateway consumed by the workload generator.
//!
//! The generator never talks to a concrete store; it is written against
//! [`ContentStore`], which covers exactly the surface the workload
//! needs: a user registry with a current acting identity, board/thread
//! provisioning from a seed, post listing/submission/removal, and vote
//! submission. Implementations are expected to provide their own
//! internal concurrency safety — every method takes `&self` and may be
//! called from concurrent tasks.

use threadmill_types::{
    BoardKey, PostEntry, PostRef, PublicKey, SignedPost, SignedVote, ThreadRef, UserIdentity,
};

/// Gateway to a threaded content store.
pub trait ContentStore: Send + Sync {
    /// Register a simulated user.
    ///
    /// The user's keypair is derived deterministically from `seed`, so
    /// re-registering the same seed yields the same identity (and fails
    /// with [`StoreError::DuplicateUser`]).
    fn add_user(&self, alias: &str, seed: &str) -> Result<UserIdentity, StoreError>;

    /// List all registered users, in registration order.
    fn users(&self) -> Result<Vec<UserIdentity>, StoreError>;

    /// The identity whose keys sign subsequent authored operations.
    fn current_user(&self) -> Result<UserIdentity, StoreError>;

    /// Select the acting identity by public key.
    fn set_current_user(&self, key: &PublicKey) -> Result<(), StoreError>;

    /// Create a fully populated board from a seed string.
    ///
    /// The board key is derived deterministically from `seed`. The board
    /// contains `threads` threads, each seeded with `posts_per_thread`
    /// posts and `replies_per_post` replies per post, all authored by
    /// the board's own identity.
    fn seed_board(
        &self,
        seed: &str,
        threads: usize,
        posts_per_thread: usize,
        replies_per_post: usize,
    ) -> Result<BoardKey, StoreError>;

    /// List the threads of a board, in creation order.
    fn threads(&self, board: &BoardKey) -> Result<Vec<ThreadRef>, StoreError>;

    /// List the posts of a thread, in submission order.
    fn posts(&self, board: &BoardKey, thread: &ThreadRef) -> Result<Vec<PostEntry>, StoreError>;

    /// Submit a signed post to a thread, returning its assigned reference.
    ///
    /// Fails with [`StoreError::BadSignature`] if the record does not
    /// verify against its recorded author.
    fn add_post(
        &self,
        board: &BoardKey,
        thread: &ThreadRef,
        post: SignedPost,
    ) -> Result<PostRef, StoreError>;

    /// Remove a post from a thread by reference.
    fn remove_post(
        &self,
        board: &BoardKey,
        thread: &ThreadRef,
        post: &PostRef,
    ) -> Result<(), StoreError>;

    /// Submit a signed vote against a post.
    fn vote_on_post(
        &self,
        board: &BoardKey,
        post: &PostRef,
        vote: SignedVote,
    ) -> Result<(), StoreError>;

    /// Submit a signed vote against a thread.
    fn vote_on_thread(
        &self,
        board: &BoardKey,
        thread: &ThreadRef,
        vote: SignedVote,
    ) -> Result<(), StoreError>;
}

/// Errors surfaced by content store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The referenced board does not exist.
    #[error("unknown board {0}")]
    UnknownBoard(BoardKey),

    /// The referenced thread does not exist in the board.
    #[error("unknown thread {0}")]
    UnknownThread(ThreadRef),

    /// The referenced post does not exist in the thread.
    #[error("unknown post {0}")]
    UnknownPost(PostRef),

    /// No user is registered under the given key.
    #[error("no user registered for key {0}")]
    UnknownUser(PublicKey),

    /// A user with the same key is already registered.
    #[error("user already registered for key {0}")]
    DuplicateUser(PublicKey),

    /// No acting identity has been selected yet.
    #[error("no acting user selected")]
    NoCurrentUser,

    /// A submitted record failed signature verification.
    #[error("signature rejected for record by {0}")]
    BadSignature(PublicKey),
}
