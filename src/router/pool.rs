//! Reusable parameter buffers.
//!
//! Every search that crosses a parameter segment needs somewhere to put the
//! extracted values. Rather than allocate a fresh `Vec` per request, the trie
//! draws a cleared buffer from a [`ParamPool`] and hands it back when the
//! search result is dropped.
//!
//! Buffers are sized to the largest parameter count seen at registration, so
//! a pooled buffer never reallocates while a search fills it.

use parking_lot::Mutex;
use std::ops::Deref;
use std::sync::Arc;

use super::params::{Param, Params};

/// Pool of cleared `Vec<Param>` buffers
#[derive(Debug)]
pub struct ParamPool {
    idle: Mutex<Vec<Vec<Param>>>,
    capacity: usize,
    max_idle: usize,
}

impl ParamPool {
    /// Create a pool whose buffers hold at least `capacity` params.
    ///
    /// At most `max_idle` released buffers are retained; extra ones are dropped.
    #[must_use]
    pub fn new(capacity: usize, max_idle: usize) -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
            capacity,
            max_idle,
        }
    }

    /// Take an empty buffer from the pool, allocating one if none is idle
    #[must_use]
    pub fn acquire(&self) -> PooledParams<'_> {
        let buf = self
            .idle
            .lock()
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(self.capacity));
        PooledParams {
            buf,
            pool: Some(self),
        }
    }

    /// Return a buffer to the pool. The buffer is cleared first.
    pub fn release(&self, mut buf: Vec<Param>) {
        buf.clear();
        if buf.capacity() < self.capacity {
            buf.reserve_exact(self.capacity);
        }
        let mut idle = self.idle.lock();
        if idle.len() < self.max_idle {
            idle.push(buf);
        }
    }

    /// Minimum capacity of buffers handed out
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of buffers currently waiting for reuse
    #[must_use]
    pub fn idle(&self) -> usize {
        self.idle.lock().len()
    }
}

/// A parameter buffer on loan from a [`ParamPool`].
///
/// Dropping the guard returns the buffer, so every exit path of a search
/// releases it. A guard created with [`PooledParams::unpooled`] owns a plain
/// buffer and releases nothing.
#[derive(Debug)]
pub struct PooledParams<'p> {
    buf: Vec<Param>,
    pool: Option<&'p ParamPool>,
}

impl<'p> PooledParams<'p> {
    /// A buffer that is not backed by any pool
    #[must_use]
    pub fn unpooled() -> Self {
        Self {
            buf: Vec::new(),
            pool: None,
        }
    }

    pub(crate) fn push(&mut self, param: Param) {
        self.buf.push(param);
    }

    /// Move the extracted parameters into an owned [`Params`].
    ///
    /// Values are taken rather than cloned, leaving empty strings behind; the
    /// buffer itself still returns to the pool on drop.
    pub fn take_into_params(&mut self) -> Params {
        self.buf
            .iter_mut()
            .map(|p| Param {
                key: Arc::clone(&p.key),
                value: std::mem::take(&mut p.value),
            })
            .collect()
    }

    /// Whether this buffer goes back to a pool on drop
    #[must_use]
    pub fn is_pooled(&self) -> bool {
        self.pool.is_some()
    }
}

impl Deref for PooledParams<'_> {
    type Target = [Param];

    fn deref(&self) -> &[Param] {
        &self.buf
    }
}

impl Drop for PooledParams<'_> {
    fn drop(&mut self) {
        if let Some(pool) = self.pool {
            pool.release(std::mem::take(&mut self.buf));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_returns_empty_buffer_with_capacity() {
        let pool = ParamPool::new(4, 16);
        let params = pool.acquire();
        assert!(params.is_empty());
        assert!(params.is_pooled());
        assert!(params.buf.capacity() >= 4);
    }

    #[test]
    fn test_release_on_drop_clears_buffer() {
        let pool = ParamPool::new(2, 16);
        {
            let mut params = pool.acquire();
            params.push(Param::new("id", "123"));
            params.push(Param::new("name", "john"));
            assert_eq!(params.len(), 2);
        }
        assert_eq!(pool.idle(), 1);

        let reused = pool.acquire();
        assert!(reused.is_empty());
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn test_max_idle_bounds_retained_buffers() {
        let pool = ParamPool::new(1, 2);
        let a = pool.acquire();
        let b = pool.acquire();
        let c = pool.acquire();
        drop(a);
        drop(b);
        drop(c);
        assert_eq!(pool.idle(), 2);
    }

    #[test]
    fn test_take_into_params_moves_values() {
        let pool = ParamPool::new(2, 16);
        let mut params = pool.acquire();
        params.push(Param::new("id", "123"));
        params.push(Param::new("name", "john"));

        let owned = params.take_into_params();
        assert_eq!(owned.get("id"), Some("123"));
        assert_eq!(owned.get("name"), Some("john"));
        assert!(params.iter().all(|p| p.value.is_empty()));

        drop(params);
        assert_eq!(pool.idle(), 1);
        assert!(pool.acquire().is_empty());
    }

    #[test]
    fn test_unpooled_buffer() {
        let mut params = PooledParams::unpooled();
        params.push(Param::new("id", "1"));
        assert!(!params.is_pooled());
        assert_eq!(params[0].value, "1");
    }
}
