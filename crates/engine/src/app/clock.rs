use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

/// Source of wall-clock time, independent of the simulation tick rate.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<RwLock<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self {
            now: Arc::new(RwLock::new(Instant::now())),
        }
    }
}

impl ManualClock {
    pub fn advance(&self, by: Duration) {
        let mut guard = match self.now.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        match self.now.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

struct Deferred<E> {
    due: Instant,
    event: E,
}

/// Events posted for later consumption on the main loop.
///
/// Nothing runs on another thread; the owner drains due events from its own
/// update. Scheduled events cannot be cancelled.
pub struct DeferredQueue<E> {
    pending: VecDeque<Deferred<E>>,
}

impl<E> Default for DeferredQueue<E> {
    fn default() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }
}

impl<E> fmt::Debug for DeferredQueue<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredQueue")
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl<E> DeferredQueue<E> {
    pub fn schedule(&mut self, due: Instant, event: E) {
        // Keep ordering by due time; equal deadlines stay in posting order.
        let index = self
            .pending
            .iter()
            .position(|deferred| deferred.due > due)
            .unwrap_or(self.pending.len());
        self.pending.insert(index, Deferred { due, event });
    }

    pub fn drain_due_into(&mut self, now: Instant, out: &mut Vec<E>) {
        while self
            .pending
            .front()
            .is_some_and(|deferred| deferred.due <= now)
        {
            if let Some(deferred) = self.pending.pop_front() {
                out.push(deferred.event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
