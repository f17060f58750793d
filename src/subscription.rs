use std::{
    any::Any,
    mem::take,
    rc::{Rc, Weak},
};

#[cfg(test)]
mod tests;

/// Guard for a registered listener. Dropping it unregisters the listener.
#[derive(Default)]
#[must_use]
pub struct Subscription(RawSubscription);

impl Subscription {
    pub fn empty() -> Self {
        Subscription(RawSubscription::Empty)
    }
    pub fn from_fn(f: impl FnOnce() + 'static) -> Self {
        Subscription(RawSubscription::Fn(Box::new(f)))
    }

    /// Calls `unsubscribe` on drop, unless `owner` is already gone.
    pub fn from_weak_fn<T: 'static>(
        owner: Weak<T>,
        unsubscribe: impl FnOnce(Rc<T>) + 'static,
    ) -> Self {
        let owner: Weak<dyn Any> = owner;
        Subscription(RawSubscription::WeakFn {
            owner,
            unsubscribe: Box::new(move |owner| {
                if let Ok(owner) = owner.downcast::<T>() {
                    unsubscribe(owner)
                }
            }),
        })
    }

    /// Keeps the listener registered for the lifetime of its owner.
    pub fn detach(mut self) {
        self.0 = RawSubscription::Empty;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        match take(&mut self.0) {
            RawSubscription::Empty => {}
            RawSubscription::Fn(f) => f(),
            RawSubscription::WeakFn { owner, unsubscribe } => {
                if let Some(owner) = owner.upgrade() {
                    unsubscribe(owner)
                }
            }
        }
    }
}

#[derive(Default)]
enum RawSubscription {
    #[default]
    Empty,
    Fn(Box<dyn FnOnce() + 'static>),
    WeakFn {
        owner: Weak<dyn Any>,
        unsubscribe: Box<dyn FnOnce(Rc<dyn Any>)>,
    },
}
