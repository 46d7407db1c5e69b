//! Revision-keyed memoization
//!
//! [`RevisionCache`] stores a computed value under a key built from the
//! context identity and the revision of every contributing layer. There is
//! no eviction and nothing is invalidated in place: a layer edit bumps its
//! revision, the next query builds a different key, and the stale entry is
//! simply never looked up again.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;

/// One primitive component of a cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheToken {
    Str(String),
    Int(i64),
}

impl From<&str> for CacheToken {
    fn from(s: &str) -> Self {
        CacheToken::Str(s.to_string())
    }
}

impl From<String> for CacheToken {
    fn from(s: String) -> Self {
        CacheToken::Str(s)
    }
}

impl From<i64> for CacheToken {
    fn from(i: i64) -> Self {
        CacheToken::Int(i)
    }
}

impl From<u64> for CacheToken {
    fn from(i: u64) -> Self {
        CacheToken::Int(i as i64)
    }
}

impl fmt::Display for CacheToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheToken::Str(s) => write!(f, "{:?}", s),
            CacheToken::Int(i) => write!(f, "{}", i),
        }
    }
}

/// Ordered sequence of tokens identifying one cached computation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(Vec<CacheToken>);

impl CacheKey {
    pub fn new<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<CacheToken>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    /// Append a token (builder style)
    pub fn with(mut self, token: impl Into<CacheToken>) -> Self {
        self.0.push(token.into());
        self
    }

    pub fn tokens(&self) -> &[CacheToken] {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", token)?;
        }
        f.write_str(")")
    }
}

/// Hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Unbounded memo table keyed by [`CacheKey`].
///
/// `V` should be cheap to clone (typically an `Arc`). No borrow is held while
/// `compute` runs, so a computation may itself consult the cache.
#[derive(Debug)]
pub struct RevisionCache<V> {
    entries: RefCell<HashMap<CacheKey, V>>,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl<V> Default for RevisionCache<V> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(HashMap::new()),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }
}

impl<V: Clone> RevisionCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the value stored under `key`, computing and storing it first if
    /// this key has never been seen.
    pub fn ensure<F>(&self, key: CacheKey, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(&key) {
            self.hits.set(self.hits.get() + 1);
            tracing::trace!(%key, "revision cache hit");
            return value;
        }

        self.misses.set(self.misses.get() + 1);
        tracing::debug!(%key, "revision cache miss");
        let value = compute();
        self.entries.borrow_mut().insert(key, value.clone());
        value
    }

    /// Store `value` under `key` without computing, replacing nothing that is
    /// already there.
    pub fn prime(&self, key: CacheKey, value: V) {
        self.entries.borrow_mut().entry(key).or_insert(value);
    }

    pub fn get(&self, key: &CacheKey) -> Option<V> {
        self.entries.borrow().get(key).cloned()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.get(),
            misses: self.misses.get(),
        }
    }
}
