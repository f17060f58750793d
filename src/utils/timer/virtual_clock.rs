use std::{
    cell::RefCell,
    collections::BTreeMap,
    future::Future,
    pin::Pin,
    rc::{Rc, Weak},
    task::{Context, Poll, Waker},
    time::Duration,
};

use futures::future::{FutureExt, LocalBoxFuture};
use slabmap::SlabMap;

use super::Clock;

/// Manually advanced [`Clock`] for tests and headless hosts.
///
/// Time only moves when [`advance_to`](Self::advance_to) or [`advance`](Self::advance) is
/// called. Sleeps due at the same instant wake in registration order.
#[derive(Clone, Default)]
pub struct VirtualClock(Rc<RefCell<VirtualQueue>>);

struct VirtualQueue {
    now: Duration,
    next_seq: u64,
    order: BTreeMap<(Duration, u64), usize>,
    entries: SlabMap<Option<Sleeper>>,
}
impl Default for VirtualQueue {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            order: BTreeMap::new(),
            entries: SlabMap::new(),
        }
    }
}

struct Sleeper {
    waker: Option<Waker>,
    key: (Duration, u64),
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since the clock was created.
    pub fn now(&self) -> Duration {
        self.0.borrow().now
    }

    /// Earliest pending deadline, if any sleep is registered.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.0.borrow().order.first_key_value().map(|(key, _)| key.0)
    }

    /// Number of sleeps that have not fired or been dropped yet.
    pub fn pending(&self) -> usize {
        self.0.borrow().order.len()
    }

    /// Moves time forward to `at` and wakes every sleep due by then.
    ///
    /// Moving backwards is ignored.
    pub fn advance_to(&self, at: Duration) {
        let mut wakes = Vec::new();
        {
            let mut q = self.0.borrow_mut();
            if at > q.now {
                q.now = at;
            }
            let now = q.now;
            while let Some(first) = q.order.first_entry() {
                if first.key().0 > now {
                    break;
                }
                let id = first.remove();
                if let Some(Some(sleeper)) = q.entries.get_mut(id).map(Option::take) {
                    wakes.extend(sleeper.waker);
                }
            }
        }
        for waker in wakes {
            waker.wake();
        }
    }

    pub fn advance(&self, duration: Duration) {
        self.advance_to(self.now() + duration);
    }
}

impl Clock for VirtualClock {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        let id = if duration.is_zero() {
            None
        } else {
            let mut q = self.0.borrow_mut();
            let key = (q.now + duration, q.next_seq);
            q.next_seq += 1;
            let id = q.entries.insert(Some(Sleeper { waker: None, key }));
            q.order.insert(key, id);
            Some(id)
        };
        VirtualSleep {
            queue: Rc::downgrade(&self.0),
            id,
        }
        .boxed_local()
    }
}

struct VirtualSleep {
    queue: Weak<RefCell<VirtualQueue>>,
    id: Option<usize>,
}

impl Future for VirtualSleep {
    type Output = ();
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let Some(id) = this.id else {
            return Poll::Ready(());
        };
        // A dropped clock can never fire; the sleep stays pending until it is dropped.
        let Some(queue) = this.queue.upgrade() else {
            return Poll::Pending;
        };
        let mut q = queue.borrow_mut();
        if let Some(sleeper) = &mut q.entries[id] {
            sleeper.waker = Some(cx.waker().clone());
            Poll::Pending
        } else {
            q.entries.remove(id);
            this.id = None;
            Poll::Ready(())
        }
    }
}

impl Drop for VirtualSleep {
    fn drop(&mut self) {
        let (Some(id), Some(queue)) = (self.id, self.queue.upgrade()) else {
            return;
        };
        let mut q = queue.borrow_mut();
        if let Some(Some(sleeper)) = q.entries.remove(id) {
            q.order.remove(&sleeper.key);
        }
    }
}
