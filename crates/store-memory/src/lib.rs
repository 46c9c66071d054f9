//! In-memory reference implementation of the content store gateway.
//!
//! `MemoryStore` keeps the whole board topology behind one `RwLock`, so
//! it is safe to share between the generator's scheduler task and any
//! other concurrent caller. Iteration order is deterministic: users,
//! threads, and posts are held in insertion-ordered maps.
//!
//! Writes are verified: a post or vote whose signature does not check
//! out against its recorded author is rejected, which is exactly the
//! data-integrity surface the workload generator is meant to exercise.

use indexmap::IndexMap;
use parking_lot::RwLock;
use threadmill_store::{ContentStore, StoreError};
use threadmill_types::{
    BoardKey, Hash, KeyPair, Post, PostEntry, PostRef, PublicKey, SignedPost, SignedVote,
    ThreadRef, UserIdentity,
};
use tracing::debug;

/// In-memory content store with interior locking.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    users: IndexMap<PublicKey, UserIdentity>,
    current: Option<PublicKey>,
    boards: IndexMap<BoardKey, Board>,
}

#[derive(Default)]
struct Board {
    threads: IndexMap<ThreadRef, ThreadState>,
    // Monotonic counter mixed into post references so identical records
    // never collide.
    post_counter: u64,
}

#[derive(Default)]
struct ThreadState {
    posts: IndexMap<PostRef, PostState>,
    votes: Vec<SignedVote>,
}

struct PostState {
    post: SignedPost,
    votes: Vec<SignedVote>,
}

impl Board {
    fn assign_ref(&mut self, post: &SignedPost) -> PostRef {
        self.post_counter += 1;
        PostRef::new(Hash::from_parts(&[
            &self.post_counter.to_le_bytes(),
            post.author.as_bytes(),
            post.signature.as_bytes(),
        ]))
    }
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Votes recorded against a post (inspection helper).
    pub fn post_votes(
        &self,
        board: &BoardKey,
        post: &PostRef,
    ) -> Result<Vec<SignedVote>, StoreError> {
        let inner = self.inner.read();
        let board_state = inner
            .boards
            .get(board)
            .ok_or(StoreError::UnknownBoard(*board))?;
        for thread in board_state.threads.values() {
            if let Some(state) = thread.posts.get(post) {
                return Ok(state.votes.clone());
            }
        }
        Err(StoreError::UnknownPost(*post))
    }

    /// Votes recorded against a thread (inspection helper).
    pub fn thread_votes(
        &self,
        board: &BoardKey,
        thread: &ThreadRef,
    ) -> Result<Vec<SignedVote>, StoreError> {
        let inner = self.inner.read();
        inner
            .boards
            .get(board)
            .ok_or(StoreError::UnknownBoard(*board))?
            .threads
            .get(thread)
            .map(|t| t.votes.clone())
            .ok_or(StoreError::UnknownThread(*thread))
    }
}

impl ContentStore for MemoryStore {
    fn add_user(&self, alias: &str, seed: &str) -> Result<UserIdentity, StoreError> {
        let keypair = KeyPair::from_seed_phrase(seed);
        let key = keypair.public_key();

        let mut inner = self.inner.write();
        if inner.users.contains_key(&key) {
            return Err(StoreError::DuplicateUser(key));
        }

        let identity = UserIdentity::new(alias, keypair);
        debug!(alias, key = %key, "registered user");
        inner.users.insert(key, identity.clone());
        Ok(identity)
    }

    fn users(&self) -> Result<Vec<UserIdentity>, StoreError> {
        Ok(self.inner.read().users.values().cloned().collect())
    }

    fn current_user(&self) -> Result<UserIdentity, StoreError> {
        let inner = self.inner.read();
        let key = inner.current.ok_or(StoreError::NoCurrentUser)?;
        inner
            .users
            .get(&key)
            .cloned()
            .ok_or(StoreError::UnknownUser(key))
    }

    fn set_current_user(&self, key: &PublicKey) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if !inner.users.contains_key(key) {
            return Err(StoreError::UnknownUser(*key));
        }
        inner.current = Some(*key);
        Ok(())
    }

    fn seed_board(
        &self,
        seed: &str,
        threads: usize,
        posts_per_thread: usize,
        replies_per_post: usize,
    ) -> Result<BoardKey, StoreError> {
        let keypair = KeyPair::from_seed_phrase(seed);
        let board_key = BoardKey::new(keypair.public_key());

        let mut board = Board::default();
        for t in 0..threads {
            let reference = ThreadRef::new(Hash::from_parts(&[
                seed.as_bytes(),
                &(t as u64).to_le_bytes(),
            ]));
            let mut state = ThreadState::default();

            for p in 0..posts_per_thread {
                let post = Post {
                    title: format!("Seed Post {t}.{p}"),
                    body: format!("Seeded content for thread {t}."),
                };
                let signed = SignedPost::create(post, &keypair.public_key(), &keypair)
                    .expect("board keypair signs with its own key");
                let post_ref = board.assign_ref(&signed);
                state.posts.insert(
                    post_ref,
                    PostState {
                        post: signed,
                        votes: Vec::new(),
                    },
                );

                for r in 0..replies_per_post {
                    let reply = Post {
                        title: format!("Seed Reply {t}.{p}.{r}"),
                        body: format!("Seeded reply in thread {t}."),
                    };
                    let signed = SignedPost::create(reply, &keypair.public_key(), &keypair)
                        .expect("board keypair signs with its own key");
                    let reply_ref = board.assign_ref(&signed);
                    state.posts.insert(
                        reply_ref,
                        PostState {
                            post: signed,
                            votes: Vec::new(),
                        },
                    );
                }
            }

            board.threads.insert(reference, state);
        }

        debug!(board = %board_key, threads, "seeded board");
        self.inner.write().boards.insert(board_key, board);
        Ok(board_key)
    }

    fn threads(&self, board: &BoardKey) -> Result<Vec<ThreadRef>, StoreError> {
        let inner = self.inner.read();
        inner
            .boards
            .get(board)
            .map(|b| b.threads.keys().copied().collect())
            .ok_or(StoreError::UnknownBoard(*board))
    }

    fn posts(&self, board: &BoardKey, thread: &ThreadRef) -> Result<Vec<PostEntry>, StoreError> {
        let inner = self.inner.read();
        let thread_state = inner
            .boards
            .get(board)
            .ok_or(StoreError::UnknownBoard(*board))?
            .threads
            .get(thread)
            .ok_or(StoreError::UnknownThread(*thread))?;

        Ok(thread_state
            .posts
            .iter()
            .map(|(reference, state)| PostEntry {
                reference: *reference,
                post: state.post.clone(),
            })
            .collect())
    }

    fn add_post(
        &self,
        board: &BoardKey,
        thread: &ThreadRef,
        post: SignedPost,
    ) -> Result<PostRef, StoreError> {
        if !post.verify() {
            return Err(StoreError::BadSignature(post.author));
        }

        let mut inner = self.inner.write();
        let board_state = inner
            .boards
            .get_mut(board)
            .ok_or(StoreError::UnknownBoard(*board))?;
        if !board_state.threads.contains_key(thread) {
            return Err(StoreError::UnknownThread(*thread));
        }

        let post_ref = board_state.assign_ref(&post);
        let thread_state = board_state
            .threads
            .get_mut(thread)
            .expect("thread presence checked above");
        thread_state.posts.insert(
            post_ref,
            PostState {
                post,
                votes: Vec::new(),
            },
        );
        Ok(post_ref)
    }

    fn remove_post(
        &self,
        board: &BoardKey,
        thread: &ThreadRef,
        post: &PostRef,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let thread_state = inner
            .boards
            .get_mut(board)
            .ok_or(StoreError::UnknownBoard(*board))?
            .threads
            .get_mut(thread)
            .ok_or(StoreError::UnknownThread(*thread))?;

        thread_state
            .posts
            .shift_remove(post)
            .map(|_| ())
            .ok_or(StoreError::UnknownPost(*post))
    }

    fn vote_on_post(
        &self,
        board: &BoardKey,
        post: &PostRef,
        vote: SignedVote,
    ) -> Result<(), StoreError> {
        if !vote.verify() {
            return Err(StoreError::BadSignature(vote.voter));
        }

        let mut inner = self.inner.write();
        let board_state = inner
            .boards
            .get_mut(board)
            .ok_or(StoreError::UnknownBoard(*board))?;
        for thread in board_state.threads.values_mut() {
            if let Some(state) = thread.posts.get_mut(post) {
                state.votes.push(vote);
                return Ok(());
            }
        }
        Err(StoreError::UnknownPost(*post))
    }

    fn vote_on_thread(
        &self,
        board: &BoardKey,
        thread: &ThreadRef,
        vote: SignedVote,
    ) -> Result<(), StoreError> {
        if !vote.verify() {
            return Err(StoreError::BadSignature(vote.voter));
        }

        let mut inner = self.inner.write();
        inner
            .boards
            .get_mut(board)
            .ok_or(StoreError::UnknownBoard(*board))?
            .threads
            .get_mut(thread)
            .ok_or(StoreError::UnknownThread(*thread))?
            .votes
            .push(vote);
        Ok(())
    }
}
