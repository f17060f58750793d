use std::{
    collections::BTreeMap,
    future::Future,
    pin::Pin,
    sync::{Condvar, LazyLock, Mutex, MutexGuard, PoisonError},
    task::{Context, Poll, Waker},
    time::{Duration, Instant},
};

use futures::future::{FutureExt, LocalBoxFuture};
use slabmap::SlabMap;

mod virtual_clock;

pub use virtual_clock::VirtualClock;


/// Source of settle delays and auto-play ticks.
pub trait Clock {
    /// Completes once `duration` has elapsed on this clock.
    ///
    /// Dropping the returned future cancels the wait.
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

/// Wall-clock [`Clock`] backed by a shared timer thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        sleep(duration).boxed_local()
    }
}

static TIMER: LazyLock<TimerThread> = LazyLock::new(|| TimerThread {
    queue: Mutex::new(DeadlineQueue::new()),
    condvar: Condvar::new(),
});

struct TimerThread {
    queue: Mutex<DeadlineQueue>,
    condvar: Condvar,
}
impl TimerThread {
    fn lock(&self) -> MutexGuard<'_, DeadlineQueue> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn run(&self) {
        let mut wakes = Vec::new();
        let mut queue = self.lock();
        loop {
            let now = Instant::now();
            queue.take_due(now, &mut wakes);
            if !wakes.is_empty() {
                drop(queue);
                for waker in wakes.drain(..) {
                    waker.wake();
                }
                queue = self.lock();
                continue;
            }
            queue = match queue.first_deadline() {
                Some(deadline) => {
                    let wait = deadline.saturating_duration_since(now);
                    self.condvar
                        .wait_timeout(queue, wait)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
                None => self
                    .condvar
                    .wait(queue)
                    .unwrap_or_else(PoisonError::into_inner),
            };
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Key {
    deadline: Instant,
    seq: u64,
}

struct Entry {
    waker: Waker,
    key: Key,
}

struct DeadlineQueue {
    next_seq: u64,
    order: BTreeMap<Key, usize>,
    entries: SlabMap<Option<Entry>>,
    thread_running: bool,
}

impl DeadlineQueue {
    fn new() -> Self {
        Self {
            next_seq: 0,
            order: BTreeMap::new(),
            entries: SlabMap::new(),
            thread_running: false,
        }
    }

    /// Registers a deadline; returns its id and whether the timer thread must re-evaluate.
    fn insert(&mut self, deadline: Instant, waker: Waker) -> (usize, bool) {
        self.ensure_thread_running();
        let key = Key {
            deadline,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        let earliest = self.order.first_key_value().is_none_or(|(first, _)| key < *first);
        let id = self.entries.insert(Some(Entry { waker, key }));
        self.order.insert(key, id);
        (id, earliest)
    }

    fn ensure_thread_running(&mut self) {
        if !self.thread_running {
            self.thread_running = true;
            std::thread::spawn(|| TIMER.run());
        }
    }

    fn first_deadline(&self) -> Option<Instant> {
        self.order.first_key_value().map(|(key, _)| key.deadline)
    }

    fn take_due(&mut self, now: Instant, wakes: &mut Vec<Waker>) {
        while let Some(first) = self.order.first_entry() {
            if first.key().deadline > now {
                break;
            }
            let id = first.remove();
            if let Some(entry) = self.entries[id].take() {
                wakes.push(entry.waker);
            }
        }
    }

    fn poll_or_remove(&mut self, id: usize, cx: &Context) -> Poll<()> {
        if let Some(entry) = &mut self.entries[id] {
            if !entry.waker.will_wake(cx.waker()) {
                entry.waker = cx.waker().clone();
            }
            Poll::Pending
        } else {
            self.entries.remove(id);
            Poll::Ready(())
        }
    }

    fn remove(&mut self, id: usize) {
        if let Some(Some(entry)) = self.entries.remove(id) {
            self.order.remove(&entry.key);
        }
    }
}

struct Deadline {
    id: Option<usize>,
}

impl Deadline {
    fn schedule(deadline: Instant, waker: Waker) -> Self {
        let (id, notify) = TIMER.lock().insert(deadline, waker);
        if notify {
            TIMER.condvar.notify_one();
        }
        Self { id: Some(id) }
    }
}

impl Future for Deadline {
    type Output = ();
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match this.id {
            Some(id) => {
                let poll = TIMER.lock().poll_or_remove(id, cx);
                if poll.is_ready() {
                    this.id = None;
                }
                poll
            }
            None => Poll::Ready(()),
        }
    }
}

impl Drop for Deadline {
    fn drop(&mut self) {
        if let Some(id) = self.id {
            TIMER.lock().remove(id);
        }
    }
}

/// Wall-clock sleep usable from any executor.
pub async fn sleep(duration: Duration) {
    if duration > Duration::ZERO {
        sleep_until(Instant::now() + duration).await
    }
}

pub async fn sleep_until(deadline: Instant) {
    if deadline > Instant::now() {
        Deadline::schedule(deadline, Waker::noop().clone()).await
    }
}
