//! Session-scoped state shared by the curator.

use std::{collections::HashMap, sync::Arc};

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::{
    achievement::{JitterSource, SeededJitter, ThreadJitter},
    models::Achievement,
};

/// State for one player's browsing session.
///
/// Holds the per-game achievement cache and the jitter source used by the
/// heuristic scorer. Clones share the same state.
#[derive(Clone)]
pub struct PlayerSession {
    inner: Arc<RwLock<Inner>>,
    jitter: Arc<Mutex<Box<dyn JitterSource>>>,
}

struct Inner {
    steam_id: String,
    cache: HashMap<String, Vec<Achievement>>,
}

impl PlayerSession {
    /// Session for `steam_id` drawing jitter from `jitter`.
    pub fn new(steam_id: impl Into<String>, jitter: Box<dyn JitterSource>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                steam_id: steam_id.into(),
                cache: HashMap::new(),
            })),
            jitter: Arc::new(Mutex::new(jitter)),
        }
    }

    /// Session with reproducible jitter.
    pub fn seeded(steam_id: impl Into<String>, seed: u64) -> Self {
        Self::new(steam_id, Box::new(SeededJitter::new(seed)))
    }

    /// Session using the thread RNG, or a seeded stream when `seed` is set.
    pub fn with_optional_seed(steam_id: impl Into<String>, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(steam_id, seed),
            None => Self::new(steam_id, Box::new(ThreadJitter)),
        }
    }

    /// Steam id the session belongs to.
    pub fn steam_id(&self) -> String {
        self.inner.read().steam_id.clone()
    }

    /// Cached achievements for a game, if any.
    pub fn cached(&self, game_id: &str) -> Option<Vec<Achievement>> {
        self.inner.read().cache.get(game_id).cloned()
    }

    /// Store a computed list. An existing entry is replaced.
    pub fn store(&self, game_id: &str, achievements: Vec<Achievement>) {
        debug!(game_id, count = achievements.len(), "caching achievements");
        self.inner
            .write()
            .cache
            .insert(game_id.to_string(), achievements);
    }

    /// Number of games with cached achievements.
    pub fn cached_games(&self) -> usize {
        self.inner.read().cache.len()
    }

    /// All cached achievements across games, in no particular order.
    pub fn cached_pool(&self) -> Vec<Achievement> {
        self.inner
            .read()
            .cache
            .values()
            .flat_map(|list| list.iter().cloned())
            .collect()
    }

    /// Run `f` with exclusive access to the jitter source.
    pub fn with_jitter<T>(&self, f: impl FnOnce(&mut dyn JitterSource) -> T) -> T {
        let mut jitter = self.jitter.lock();
        f(jitter.as_mut())
    }
}
