use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::error::AcquireError;

#[derive(Debug)]
struct PoolState {
    tokens: usize,
    closed: bool,
}

/// Counting semaphore over `capacity` interchangeable tokens.
///
/// Invariants:
/// - `0 <= tokens <= capacity`
/// - once closed, every current and future `acquire*` returns
///   [`AcquireError::Closed`]; `release` keeps working so late completions
///   can still return their tokens harmlessly.
#[derive(Debug)]
pub struct TokenPool {
    capacity: usize,
    state: Mutex<PoolState>,
    available: Condvar,
}

impl TokenPool {
    /// Creates a pool with all `capacity` tokens available.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "TokenPool capacity must be non-zero");
        Self {
            capacity,
            state: Mutex::new(PoolState {
                tokens: capacity,
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Tokens not currently held.
    pub fn available(&self) -> usize {
        self.state.lock().tokens
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Takes one token, waiting indefinitely until one is released.
    pub fn acquire(&self) -> Result<(), AcquireError> {
        let mut state = self.state.lock();
        loop {
            if state.closed {
                return Err(AcquireError::Closed);
            }
            if state.tokens > 0 {
                state.tokens -= 1;
                return Ok(());
            }
            self.available.wait(&mut state);
        }
    }

    /// Takes one token, giving up after `timeout`.
    pub fn acquire_timeout(&self, timeout: Duration) -> Result<(), AcquireError> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        loop {
            if state.closed {
                return Err(AcquireError::Closed);
            }
            if state.tokens > 0 {
                state.tokens -= 1;
                return Ok(());
            }
            if self.available.wait_until(&mut state, deadline).timed_out() {
                // A release may have raced the deadline.
                if !state.closed && state.tokens > 0 {
                    state.tokens -= 1;
                    return Ok(());
                }
                return Err(if state.closed {
                    AcquireError::Closed
                } else {
                    AcquireError::Timeout { waited: timeout }
                });
            }
        }
    }

    /// Takes one token if available without blocking.
    pub fn try_acquire(&self) -> bool {
        let mut state = self.state.lock();
        if state.closed || state.tokens == 0 {
            return false;
        }
        state.tokens -= 1;
        true
    }

    /// Returns one token and wakes a waiter.
    ///
    /// Panics when more tokens are released than were acquired.
    pub fn release(&self) {
        let mut state = self.state.lock();
        assert!(
            state.tokens < self.capacity,
            "TokenPool::release: released more tokens than were acquired (capacity {})",
            self.capacity
        );
        state.tokens += 1;
        drop(state);
        self.available.notify_one();
    }

    /// Cancels the pool and wakes every waiter with [`AcquireError::Closed`].
    pub fn close(&self) {
        let mut state = self.state.lock();
        if state.closed {
            return;
        }
        state.closed = true;
        drop(state);
        self.available.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::mpsc;
    use std::thread;

    const SETTLE: Duration = Duration::from_millis(50);

    // ── counting ──────────────────────────────────────────────────────────

    #[test]
    fn starts_full_and_drains() {
        let pool = TokenPool::new(3);
        assert_eq!(pool.available(), 3);
        for _ in 0..3 {
            assert!(pool.try_acquire());
        }
        assert!(!pool.try_acquire());
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn release_restores_token() {
        let pool = TokenPool::new(1);
        pool.acquire().unwrap();
        pool.release();
        assert_eq!(pool.available(), 1);
        assert!(pool.try_acquire());
    }

    #[test]
    #[should_panic(expected = "released more tokens")]
    fn over_release_panics() {
        let pool = TokenPool::new(2);
        pool.release();
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn zero_capacity_panics() {
        let _ = TokenPool::new(0);
    }

    // ── blocking ──────────────────────────────────────────────────────────

    #[test]
    fn acquire_blocks_until_release() {
        let pool = Arc::new(TokenPool::new(1));
        pool.acquire().unwrap();

        let (tx, rx) = mpsc::channel();
        let waiter = {
            let pool = Arc::clone(&pool);
            thread::spawn(move || {
                let r = pool.acquire();
                tx.send(()).unwrap();
                r
            })
        };

        assert!(rx.recv_timeout(SETTLE).is_err(), "acquire returned without a token");

        pool.release();
        rx.recv_timeout(Duration::from_secs(5)).expect("waiter never woke");
        assert_eq!(waiter.join().unwrap(), Ok(()));
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn close_wakes_waiters_with_closed() {
        let pool = Arc::new(TokenPool::new(1));
        pool.acquire().unwrap();

        let waiters: Vec<_> = (0..2)
            .map(|_| {
                let pool = Arc::clone(&pool);
                thread::spawn(move || pool.acquire())
            })
            .collect();

        thread::sleep(SETTLE);
        pool.close();

        for w in waiters {
            assert_eq!(w.join().unwrap(), Err(AcquireError::Closed));
        }
        assert!(pool.is_closed());
    }

    #[test]
    fn release_after_close_is_harmless() {
        let pool = TokenPool::new(1);
        pool.acquire().unwrap();
        pool.close();
        pool.release();
        assert_eq!(pool.acquire(), Err(AcquireError::Closed));
        assert!(!pool.try_acquire());
    }

    // ── timeout ───────────────────────────────────────────────────────────

    #[test]
    fn acquire_timeout_expires() {
        let pool = TokenPool::new(1);
        pool.acquire().unwrap();
        let waited = Duration::from_millis(20);
        assert_eq!(pool.acquire_timeout(waited), Err(AcquireError::Timeout { waited }));
    }

    #[test]
    fn acquire_timeout_succeeds_when_available() {
        let pool = TokenPool::new(1);
        assert_eq!(pool.acquire_timeout(Duration::from_millis(1)), Ok(()));
        assert_eq!(pool.available(), 0);
    }
}
