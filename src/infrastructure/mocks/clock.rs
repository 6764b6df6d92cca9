//! Mock clock for testing.

use crate::application::ports::Clock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Mock clock for testing.
///
/// Allows tests to control time progression explicitly, enabling
/// deterministic testing of window and expiry behavior.
///
/// # Examples
///
/// ```
/// use quota_guard::infrastructure::mocks::MockClock;
/// use quota_guard::Clock;
/// use std::time::Duration;
///
/// let clock = MockClock::new(1_000);
/// assert_eq!(clock.now_millis(), 1_000);
///
/// clock.advance(Duration::from_secs(10));
/// assert_eq!(clock.now_millis(), 11_000);
///
/// clock.set(500);
/// assert_eq!(clock.now_millis(), 500);
/// ```
///
/// # Thread Safety
///
/// `MockClock` is thread-safe and can be cloned to share across tasks.
/// All clones share the same underlying time value, so advancing time in
/// one clone affects all clones.
#[derive(Debug, Clone)]
pub struct MockClock {
    now_millis: Arc<AtomicU64>,
}

impl MockClock {
    /// Create a mock clock starting at the given epoch-millisecond instant.
    pub fn new(start_millis: u64) -> Self {
        Self {
            now_millis: Arc::new(AtomicU64::new(start_millis)),
        }
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, duration: Duration) {
        self.now_millis
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
    }

    /// Set the clock to a specific epoch-millisecond instant.
    pub fn set(&self, millis: u64) {
        self.now_millis.store(millis, Ordering::SeqCst);
    }
}

impl Clock for MockClock {
    fn now_millis(&self) -> u64 {
        self.now_millis.load(Ordering::SeqCst)
    }
}
