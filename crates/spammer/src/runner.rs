//! The generator itself: setup phase, scheduler loop, and action handlers.

use crate::actions::Action;
use crate::config::{ConfigError, SpammerConfig};
use crate::random::Entropy;
use crate::shutdown::StopHandle;
use std::sync::Arc;
use std::time::Duration;
use threadmill_store::{ContentStore, StoreError};
use threadmill_types::{
    BoardKey, Post, PostRef, SignedPost, SignedVote, ThreadRef, UserIdentity, Vote, VoteMode,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Synthetic workload generator for a threaded content store.
///
/// Construction runs the setup phase synchronously: the user pool is
/// topped up to `user_count` members and a fresh board with
/// `thread_count` threads is seeded into the store. [`Spammer::start`]
/// then consumes the generator and spawns its scheduler loop, so an
/// instance can never be restarted after it stops.
pub struct Spammer {
    config: SpammerConfig,
    store: Arc<dyn ContentStore>,
    entropy: Entropy,
    board: BoardKey,
    thread_refs: Vec<ThreadRef>,
    users: Vec<UserIdentity>,
    post_cap_enabled: bool,
    post_seq: u64,
    post_count: u64,
    stats: RunStats,
}

impl Spammer {
    /// Create a generator and run its setup phase against the store.
    pub fn new(config: SpammerConfig, store: Arc<dyn ContentStore>) -> Result<Self, SpammerError> {
        config.validate()?;

        let mut entropy = match config.seed {
            Some(seed) => Entropy::seeded(seed),
            None => Entropy::from_clock(),
        };

        info!(goal = config.user_count, "setting up simulated users");
        let existing = store.users()?.len();
        for _ in existing..config.user_count {
            let alias = entropy.alias();
            let seed = entropy.seed_phrase();
            store.add_user(&alias, &seed)?;
        }
        let users = store.users()?;
        info!(users = users.len(), "user pool ready");

        info!(threads = config.thread_count, "setting up test board");
        let board_seed = entropy.seed_phrase();
        let board = store.seed_board(&board_seed, config.thread_count, 1, 1)?;
        let thread_refs = store.threads(&board)?;
        info!(board = %board, threads = thread_refs.len(), "test board ready");

        Ok(Self {
            post_cap_enabled: config.post_cap_enabled(),
            config,
            store,
            entropy,
            board,
            thread_refs,
            users,
            post_seq: 1,
            post_count: 0,
            stats: RunStats::default(),
        })
    }

    /// Spawn the scheduler loop (and the timeout watcher, if enabled).
    ///
    /// Must be called from within a tokio runtime. The returned handle
    /// is the only way to stop the generator or collect its statistics.
    pub fn start(self) -> SpammerHandle {
        let (tx, rx) = mpsc::channel(1);
        let patience = self.config.max_interval();
        let timeout = self.config.timeout();

        if let Some(timeout) = timeout {
            let watcher = StopHandle::new(tx.clone(), patience);
            tokio::spawn(async move {
                info!(secs = timeout.as_secs(), "run timeout armed");
                tokio::select! {
                    _ = watcher.closed() => {}
                    _ = tokio::time::sleep(timeout) => {
                        info!("run timeout reached; requesting stop");
                        watcher.stop().await;
                    }
                }
            });
        }

        let join = tokio::spawn(self.service(rx));
        SpammerHandle {
            stop: StopHandle::new(tx, patience),
            join,
        }
    }

    /// The scheduler loop. One action per cycle until stopped.
    async fn service(mut self, mut stop_rx: mpsc::Receiver<()>) -> RunStats {
        loop {
            let pause = self.draw_pause();
            debug!(secs = pause.as_secs(), "pausing between cycles");
            tokio::select! {
                _ = tokio::time::sleep(pause) => {}
                Some(()) = stop_rx.recv() => {
                    info!("stop requested; closing");
                    break;
                }
            }

            // A stop that raced the end of the pause still wins: nothing
            // is dispatched in a cycle with a stop pending at wake.
            if stop_rx.try_recv().is_ok() {
                info!("stop requested; closing");
                break;
            }

            self.stats.cycles += 1;

            // The draw happens regardless of what the user switch does,
            // and a failed draw still leaves the user switched.
            let draw = self.entropy.int_between(0, Action::DRAW_MAX);
            self.switch_user();
            match draw {
                Ok(outcome) => {
                    if let Some(action) = Action::from_draw(outcome) {
                        self.dispatch(action);
                    }
                }
                Err(e) => {
                    warn!(error = %e, "action draw failed; no action this cycle");
                    self.stats.errors += 1;
                }
            }
        }

        info!(cycles = self.stats.cycles, "generator stopped");
        self.stats
    }

    fn dispatch(&mut self, action: Action) {
        debug!(?action, "dispatching action");
        match action {
            Action::NewPost => self.action_new_post(),
            Action::DeletePost => self.action_delete_post(),
            Action::VotePost => self.action_vote_post(),
            Action::VoteThread => self.action_vote_thread(),
        }
    }

    /// Draw the inter-cycle pause; fail-soft to one second.
    fn draw_pause(&mut self) -> Duration {
        let min = self.config.min_interval_secs as i64;
        let max = self.config.max_interval_secs as i64;
        match self.entropy.int_between(min, max) {
            Ok(secs) => Duration::from_secs(secs as u64),
            Err(e) => {
                warn!(error = %e, "interval draw failed; defaulting to 1s");
                self.stats.errors += 1;
                Duration::from_secs(1)
            }
        }
    }

    /// Switch the acting user to a random pool member.
    fn switch_user(&mut self) {
        let idx = match self.entropy.int_between(0, self.users.len() as i64 - 1) {
            Ok(idx) => idx as usize,
            Err(e) => {
                warn!(error = %e, "user draw failed; keeping current user");
                self.stats.errors += 1;
                return;
            }
        };
        let user = &self.users[idx];
        if let Err(e) = self.store.set_current_user(&user.public_key()) {
            warn!(error = %e, "failed to switch acting user");
            self.stats.errors += 1;
        }
    }

    fn random_thread(&mut self) -> Option<ThreadRef> {
        match self
            .entropy
            .int_between(0, self.thread_refs.len() as i64 - 1)
        {
            Ok(idx) => Some(self.thread_refs[idx as usize]),
            Err(e) => {
                warn!(error = %e, "thread draw failed");
                self.stats.errors += 1;
                None
            }
        }
    }

    /// Pick a random post from a thread; `None` when the thread is empty
    /// (a legitimate no-op, not an error).
    fn random_post(&mut self, thread: &ThreadRef) -> Option<PostRef> {
        let posts = match self.store.posts(&self.board, thread) {
            Ok(posts) => posts,
            Err(e) => {
                warn!(error = %e, "failed to list posts");
                self.stats.errors += 1;
                return None;
            }
        };
        if posts.is_empty() {
            return None;
        }
        match self.entropy.int_between(0, posts.len() as i64 - 1) {
            Ok(idx) => Some(posts[idx as usize].reference),
            Err(e) => {
                warn!(error = %e, "post draw failed");
                self.stats.errors += 1;
                None
            }
        }
    }

    /// Next value of the monotonic post numbering; never reused.
    fn next_post_seq(&mut self) -> u64 {
        let seq = self.post_seq;
        self.post_seq += 1;
        seq
    }

    fn action_new_post(&mut self) {
        if self.post_cap_enabled && self.post_count >= self.config.post_cap as u64 {
            debug!(cap = self.config.post_cap, "post cap reached; skipping");
            return;
        }
        let user = match self.store.current_user() {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "no acting user for post");
                self.stats.errors += 1;
                return;
            }
        };
        let Some(thread) = self.random_thread() else {
            return;
        };

        let post = Post {
            title: format!("Test Post {}", self.next_post_seq()),
            body: format!("This is a test post by test user {}.", user.alias),
        };
        debug!(title = %post.title, author = %user.alias, thread = %thread, "submitting post");

        let signed = match SignedPost::create(post, &user.public_key(), user.keypair()) {
            Ok(signed) => signed,
            Err(e) => {
                warn!(error = %e, "failed to sign post");
                self.stats.errors += 1;
                return;
            }
        };
        match self.store.add_post(&self.board, &thread, signed) {
            Ok(_) => {
                self.post_count += 1;
                self.stats.posts_created += 1;
            }
            Err(e) => {
                warn!(error = %e, "failed to submit post");
                self.stats.errors += 1;
            }
        }
    }

    fn action_delete_post(&mut self) {
        let Some(thread) = self.random_thread() else {
            return;
        };
        let Some(post) = self.random_post(&thread) else {
            debug!(thread = %thread, "no posts here; skipping delete");
            return;
        };
        debug!(post = %post, thread = %thread, "removing post");
        match self.store.remove_post(&self.board, &thread, &post) {
            Ok(()) => self.stats.posts_deleted += 1,
            Err(e) => {
                warn!(error = %e, "failed to remove post");
                self.stats.errors += 1;
            }
        }
    }

    fn action_vote_post(&mut self) {
        let user = match self.store.current_user() {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "no acting user for vote");
                self.stats.errors += 1;
                return;
            }
        };
        let Some(thread) = self.random_thread() else {
            return;
        };
        let Some(post) = self.random_post(&thread) else {
            debug!(thread = %thread, "no posts here; skipping vote");
            return;
        };
        let Some(mode) = self.draw_vote_mode() else {
            return;
        };
        debug!(post = %post, mode = mode.as_i8(), voter = %user.alias, "voting on post");

        let signed = match SignedVote::create(Vote { mode }, &user.public_key(), user.keypair()) {
            Ok(signed) => signed,
            Err(e) => {
                warn!(error = %e, "failed to sign vote");
                self.stats.errors += 1;
                return;
            }
        };
        match self.store.vote_on_post(&self.board, &post, signed) {
            Ok(()) => self.stats.post_votes += 1,
            Err(e) => {
                warn!(error = %e, "failed to submit post vote");
                self.stats.errors += 1;
            }
        }
    }

    fn action_vote_thread(&mut self) {
        let user = match self.store.current_user() {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "no acting user for vote");
                self.stats.errors += 1;
                return;
            }
        };
        let Some(thread) = self.random_thread() else {
            return;
        };
        let Some(mode) = self.draw_vote_mode() else {
            return;
        };
        debug!(thread = %thread, mode = mode.as_i8(), voter = %user.alias, "voting on thread");

        let signed = match SignedVote::create(Vote { mode }, &user.public_key(), user.keypair()) {
            Ok(signed) => signed,
            Err(e) => {
                warn!(error = %e, "failed to sign vote");
                self.stats.errors += 1;
                return;
            }
        };
        match self.store.vote_on_thread(&self.board, &thread, signed) {
            Ok(()) => self.stats.thread_votes += 1,
            Err(e) => {
                warn!(error = %e, "failed to submit thread vote");
                self.stats.errors += 1;
            }
        }
    }

    fn draw_vote_mode(&mut self) -> Option<VoteMode> {
        match self.entropy.int_between(-1, 1) {
            Ok(mode) => VoteMode::from_i8(mode as i8),
            Err(e) => {
                warn!(error = %e, "vote mode draw failed");
                self.stats.errors += 1;
                None
            }
        }
    }
}

/// Handle to a running generator.
pub struct SpammerHandle {
    stop: StopHandle,
    join: JoinHandle<RunStats>,
}

impl SpammerHandle {
    /// Request a stop (bounded, best-effort; see [`StopHandle::stop`]).
    pub async fn stop(&self) -> bool {
        self.stop.stop().await
    }

    /// A detachable handle for stopping the generator from elsewhere.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Wait for the scheduler loop to exit and collect its statistics.
    pub async fn join(self) -> RunStats {
        match self.join.await {
            Ok(stats) => stats,
            Err(e) => {
                error!(error = %e, "generator task failed");
                RunStats::default()
            }
        }
    }
}

/// Counters collected over a generator run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Action cycles completed (woken, stop-checked, dispatched).
    pub cycles: u64,
    /// Posts successfully created.
    pub posts_created: u64,
    /// Posts successfully deleted.
    pub posts_deleted: u64,
    /// Votes successfully cast on posts.
    pub post_votes: u64,
    /// Votes successfully cast on threads.
    pub thread_votes: u64,
    /// Failed randomness draws and store calls (all non-fatal).
    pub errors: u64,
}

impl RunStats {
    /// Print a human-readable summary to stdout.
    pub fn print(&self) {
        println!("\n=== Spammer Report ===");
        println!("Cycles: {}", self.cycles);
        println!("Posts created: {}", self.posts_created);
        println!("Posts deleted: {}", self.posts_deleted);
        println!("Post votes: {}", self.post_votes);
        println!("Thread votes: {}", self.thread_votes);
        println!("Errors: {}", self.errors);
    }
}

/// Errors that can abort generator construction.
#[derive(Debug, thiserror::Error)]
pub enum SpammerError {
    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A setup-phase store call failed.
    #[error("setup failed: {0}")]
    Setup(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use threadmill_store_memory::MemoryStore;

    fn test_config() -> SpammerConfig {
        SpammerConfig::new()
            .with_thread_count(3)
            .with_user_count(5)
            .with_seed(7)
    }

    fn test_spammer(config: SpammerConfig) -> (Spammer, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let spammer = Spammer::new(config, store.clone()).unwrap();
        (spammer, store)
    }

    fn acting_user(spammer: &Spammer) {
        spammer
            .store
            .set_current_user(&spammer.users[0].public_key())
            .unwrap();
    }

    fn generated_titles(spammer: &Spammer, store: &MemoryStore) -> Vec<u64> {
        let mut numbers = Vec::new();
        for thread in store.threads(&spammer.board).unwrap() {
            for entry in store.posts(&spammer.board, &thread).unwrap() {
                if let Some(n) = entry.post.post.title.strip_prefix("Test Post ") {
                    numbers.push(n.parse().unwrap());
                }
            }
        }
        numbers.sort_unstable();
        numbers
    }

    fn drain_posts(spammer: &Spammer, store: &MemoryStore) {
        for thread in store.threads(&spammer.board).unwrap() {
            for entry in store.posts(&spammer.board, &thread).unwrap() {
                store
                    .remove_post(&spammer.board, &thread, &entry.reference)
                    .unwrap();
            }
        }
    }

    #[test]
    fn test_setup_provisions_users_and_board() {
        let (spammer, store) = test_spammer(test_config());

        assert_eq!(store.users().unwrap().len(), 5);
        assert_eq!(spammer.users.len(), 5);
        assert_eq!(spammer.thread_refs.len(), 3);

        // Each thread is seeded with one post and one reply.
        for thread in &spammer.thread_refs {
            assert_eq!(store.posts(&spammer.board, thread).unwrap().len(), 2);
        }
    }

    #[test]
    fn test_setup_adds_no_users_when_pool_is_full() {
        let store = Arc::new(MemoryStore::new());
        let _first = Spammer::new(test_config(), store.clone()).unwrap();
        assert_eq!(store.users().unwrap().len(), 5);

        let _second = Spammer::new(test_config(), store.clone()).unwrap();
        assert_eq!(store.users().unwrap().len(), 5);
    }

    #[test]
    fn test_setup_rejects_invalid_config() {
        let store = Arc::new(MemoryStore::new());
        let config = test_config().with_intervals(9, 1);
        assert!(matches!(
            Spammer::new(config, store),
            Err(SpammerError::Config(ConfigError::IntervalsReversed {
                min: 9,
                max: 1
            }))
        ));
    }

    #[test]
    fn test_post_titles_are_monotonic() {
        let (mut spammer, store) = test_spammer(test_config());
        acting_user(&spammer);

        for _ in 0..5 {
            spammer.action_new_post();
        }

        assert_eq!(spammer.stats.posts_created, 5);
        assert_eq!(generated_titles(&spammer, &store), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_post_cap_limits_creates() {
        let (mut spammer, _store) = test_spammer(test_config().with_post_cap(3));
        acting_user(&spammer);

        for _ in 0..10 {
            spammer.action_new_post();
        }

        assert_eq!(spammer.stats.posts_created, 3);
        assert_eq!(spammer.stats.errors, 0);
    }

    #[test]
    fn test_zero_post_cap_blocks_every_create() {
        let (mut spammer, _store) = test_spammer(test_config().with_post_cap(0));
        acting_user(&spammer);

        for _ in 0..10 {
            spammer.action_new_post();
        }

        assert_eq!(spammer.stats.posts_created, 0);
        // The sequence counter is untouched by capped-out cycles.
        assert_eq!(spammer.post_seq, 1);
    }

    #[test]
    fn test_delete_and_vote_noop_on_empty_threads() {
        let (mut spammer, store) = test_spammer(test_config());
        acting_user(&spammer);
        drain_posts(&spammer, &store);

        spammer.action_delete_post();
        spammer.action_vote_post();

        assert_eq!(spammer.stats.posts_deleted, 0);
        assert_eq!(spammer.stats.post_votes, 0);
        assert_eq!(spammer.stats.errors, 0);
    }

    #[test]
    fn test_delete_and_votes_land_in_store() {
        let (mut spammer, store) = test_spammer(test_config());
        acting_user(&spammer);

        spammer.action_delete_post();
        assert_eq!(spammer.stats.posts_deleted, 1);

        spammer.action_vote_post();
        assert_eq!(spammer.stats.post_votes, 1);

        spammer.action_vote_thread();
        assert_eq!(spammer.stats.thread_votes, 1);

        // One of the seeded posts is gone.
        let remaining: usize = store
            .threads(&spammer.board)
            .unwrap()
            .iter()
            .map(|t| store.posts(&spammer.board, t).unwrap().len())
            .sum();
        assert_eq!(remaining, 5);
    }

    #[test]
    fn test_draw_pause_stays_in_bounds() {
        let (mut spammer, _store) = test_spammer(test_config().with_intervals(2, 9));

        for _ in 0..200 {
            let pause = spammer.draw_pause();
            assert!((2..=9).contains(&pause.as_secs()), "pause {pause:?}");
        }
        assert_eq!(spammer.stats.errors, 0);
    }

    #[test]
    fn test_switch_user_changes_acting_identity() {
        let (mut spammer, store) = test_spammer(test_config());

        spammer.switch_user();
        let first = store.current_user().unwrap().public_key();

        // Over many switches some draw must land on a different member.
        let mut changed = false;
        for _ in 0..50 {
            spammer.switch_user();
            if store.current_user().unwrap().public_key() != first {
                changed = true;
                break;
            }
        }
        assert!(changed);
        assert_eq!(spammer.stats.errors, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_stops_generator_before_first_action() {
        let config = test_config().with_intervals(100, 100).with_timeout(2);
        let (spammer, _store) = test_spammer(config);

        let stats = spammer.start().join().await;
        assert_eq!(stats.cycles, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_during_sleep_prevents_next_dispatch() {
        let config = test_config().with_intervals(50, 50);
        let (spammer, _store) = test_spammer(config);

        let handle = spammer.start();
        assert!(handle.stop().await);

        let stats = handle.join().await;
        assert_eq!(stats.cycles, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_after_exit_is_noop() {
        let config = test_config().with_intervals(10, 10).with_timeout(0);
        let (spammer, _store) = test_spammer(config);

        let handle = spammer.start();
        // Let the watcher fire at t=0 and the loop observe the stop.
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(!handle.stop().await);
        assert_eq!(handle.join().await.cycles, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_soak_run_dispatches_and_stops() {
        let config = test_config().with_intervals(1, 3).with_timeout(30);
        let (spammer, store) = test_spammer(config);
        let board = spammer.board;

        let stats = spammer.start().join().await;

        // Pauses are 1-3s over a 30s run; even all-3s pacing completes 9
        // cycles before the timeout lands.
        assert!(stats.cycles >= 9, "cycles: {}", stats.cycles);
        let performed =
            stats.posts_created + stats.posts_deleted + stats.post_votes + stats.thread_votes;
        assert!(performed > 0);
        assert!(performed <= stats.cycles);

        // Generated titles never repeat, even across deletions.
        let mut titles = Vec::new();
        for thread in store.threads(&board).unwrap() {
            for entry in store.posts(&board, &thread).unwrap() {
                if entry.post.post.title.starts_with("Test Post ") {
                    titles.push(entry.post.post.title.clone());
                }
            }
        }
        let unique: std::collections::HashSet<_> = titles.iter().collect();
        assert_eq!(unique.len(), titles.len());
    }
}
