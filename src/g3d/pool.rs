//! Scratch buffer pool for per-frame screen-space arrays.
//!
//! Buffers are checked out by power-of-two size class and come back to the
//! pool when their [`PoolGuard`] drops, on every exit path. Buffers only
//! grow; a class never shrinks once a large mesh has been seen.

use std::cell::{Cell, RefCell};
use std::ops::{Deref, DerefMut};

use rustc_hash::FxHashMap;

use super::ScreenPoint;

/// Smallest size class handed out.
const MIN_CLASS: usize = 16;

/// A pool of reusable `Vec<T>` buffers.
#[derive(Debug, Default)]
pub struct ScratchPool<T> {
    free: RefCell<FxHashMap<usize, Vec<Vec<T>>>>,
    outstanding: Cell<usize>,
}

/// Pool of projected screen points.
pub type ScreenPool = ScratchPool<ScreenPoint>;

impl<T: Copy + Default> ScratchPool<T> {
    /// Empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            free: RefCell::new(FxHashMap::default()),
            outstanding: Cell::new(0),
        }
    }

    /// Check out a buffer of exactly `len` default-initialised elements.
    pub fn acquire(&self, len: usize) -> PoolGuard<'_, T> {
        let class = size_class(len);
        let reused = self
            .free
            .borrow_mut()
            .get_mut(&class)
            .and_then(Vec::pop);
        let mut buf = reused.unwrap_or_else(|| Vec::with_capacity(class));
        buf.clear();
        buf.resize(len, T::default());
        self.outstanding.set(self.outstanding.get() + 1);
        PoolGuard {
            pool: self,
            class,
            buf,
        }
    }

    /// Guards currently checked out.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.outstanding.get()
    }

    /// Buffers resting in the pool.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.free.borrow().values().map(Vec::len).sum()
    }

    fn release(&self, class: usize, buf: Vec<T>) {
        self.free.borrow_mut().entry(class).or_default().push(buf);
        self.outstanding.set(self.outstanding.get().saturating_sub(1));
    }
}

fn size_class(len: usize) -> usize {
    len.max(MIN_CLASS).next_power_of_two()
}

/// A checked-out buffer. Returned to its pool on drop.
#[derive(Debug)]
pub struct PoolGuard<'a, T: Copy + Default> {
    pool: &'a ScratchPool<T>,
    class: usize,
    buf: Vec<T>,
}

impl<T: Copy + Default> Deref for PoolGuard<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.buf
    }
}

impl<T: Copy + Default> DerefMut for PoolGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.buf
    }
}

impl<T: Copy + Default> Drop for PoolGuard<'_, T> {
    fn drop(&mut self) {
        let buf = std::mem::take(&mut self.buf);
        self.pool.release(self.class, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(pool: &ScratchPool<i32>, fail: bool) -> Result<i32, ()> {
        let mut buf = pool.acquire(40);
        buf[39] = 7;
        if fail {
            return Err(());
        }
        Ok(buf[39])
    }

    #[test]
    fn guards_release_on_every_path() {
        let pool = ScratchPool::<i32>::new();
        assert_eq!(fill(&pool, false), Ok(7));
        assert_eq!(fill(&pool, true), Err(()));
        assert_eq!(pool.outstanding(), 0);
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn buffers_are_reused_and_zeroed() {
        let pool = ScratchPool::<i32>::new();
        {
            let mut a = pool.acquire(20);
            a.fill(5);
        }
        let b = pool.acquire(30);
        assert_eq!(b.len(), 30);
        assert!(b.iter().all(|&v| v == 0));
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn concurrent_guards_are_counted() {
        let pool = ScratchPool::<u8>::new();
        let a = pool.acquire(3);
        let b = pool.acquire(3000);
        assert_eq!(pool.outstanding(), 2);
        drop(a);
        drop(b);
        assert_eq!(pool.outstanding(), 0);
        assert_eq!(size_class(3000), 4096);
    }
}
