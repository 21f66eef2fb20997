//! Listener lists and RAII subscription tokens.
//!
//! Every observable in the crate stores its listeners in a [`Listeners`] list.
//! Subscribing returns a [`Subscription`]; dropping the token removes the
//! listener, so a detached owner can never receive a stale notification.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

// ---------------------------------------------------------------------------
// Listeners
// ---------------------------------------------------------------------------

type Callback<E> = Rc<dyn Fn(&E)>;

struct ListenerSlots<E> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, Callback<E>)>>,
}

/// An ordered list of callbacks receiving `&E`.
///
/// Value observables use `Listeners<()>`: the notification carries no payload
/// and listeners re-pull the current value.
pub struct Listeners<E: 'static = ()> {
    slots: Rc<ListenerSlots<E>>,
}

impl<E: 'static> Listeners<E> {
    /// Create an empty listener list.
    pub fn new() -> Self {
        Self {
            slots: Rc::new(ListenerSlots {
                next_id: Cell::new(0),
                entries: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Register `callback`. It stays registered until the returned token drops.
    pub fn subscribe(&self, callback: impl Fn(&E) + 'static) -> Subscription {
        let id = self.slots.next_id.get();
        self.slots.next_id.set(id + 1);
        self.slots
            .entries
            .borrow_mut()
            .push((id, Rc::new(callback)));

        let weak: Weak<ListenerSlots<E>> = Rc::downgrade(&self.slots);
        Subscription::new(move || {
            if let Some(slots) = weak.upgrade() {
                slots.entries.borrow_mut().retain(|(entry, _)| *entry != id);
            }
        })
    }

    /// Call every listener in subscription order.
    ///
    /// The list is snapshotted first, so listeners may subscribe or unsubscribe
    /// while being notified. A listener removed by an earlier callback in the
    /// same pass is skipped.
    pub fn notify(&self, event: &E) {
        let snapshot: Vec<(u64, Callback<E>)> = self
            .slots
            .entries
            .borrow()
            .iter()
            .map(|(id, cb)| (*id, cb.clone()))
            .collect();

        for (id, callback) in snapshot {
            let still_registered = self
                .slots
                .entries
                .borrow()
                .iter()
                .any(|(entry, _)| *entry == id);
            if still_registered {
                callback(event);
            }
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.slots.entries.borrow().len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.slots.entries.borrow().is_empty()
    }
}

impl<E: 'static> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners").field("len", &self.len()).finish()
    }
}

// ---------------------------------------------------------------------------
// Subscription
// ---------------------------------------------------------------------------

/// A live registration. Dropping it (or calling [`cancel`](Self::cancel))
/// removes the listener.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// A token that owns `cancel` and runs it exactly once on drop.
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A token for sources that never notify (constants).
    pub fn empty() -> Self {
        Self { cancel: None }
    }

    /// Unsubscribe now.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    /// Whether this token still has something to cancel.
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_calls_in_subscription_order() {
        let listeners: Listeners<i32> = Listeners::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (log.clone(), log.clone());
        let _s1 = listeners.subscribe(move |v| a.borrow_mut().push(("a", *v)));
        let _s2 = listeners.subscribe(move |v| b.borrow_mut().push(("b", *v)));

        listeners.notify(&7);
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let listeners: Listeners = Listeners::new();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let sub = listeners.subscribe(move |_| c.set(c.get() + 1));
        listeners.notify(&());
        drop(sub);
        listeners.notify(&());
        assert_eq!(count.get(), 1);
        assert!(listeners.is_empty());
    }

    #[test]
    fn cancel_is_explicit_drop() {
        let listeners: Listeners = Listeners::new();
        let sub = listeners.subscribe(|_| {});
        assert_eq!(listeners.len(), 1);
        sub.cancel();
        assert_eq!(listeners.len(), 0);
    }

    #[test]
    fn listener_removed_mid_notify_is_skipped() {
        let listeners: Listeners = Listeners::new();
        let count = Rc::new(Cell::new(0));
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let v = victim.clone();
        let _killer = listeners.subscribe(move |_| {
            v.borrow_mut().take();
        });
        let c = count.clone();
        *victim.borrow_mut() = Some(listeners.subscribe(move |_| c.set(c.get() + 1)));

        listeners.notify(&());
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn subscription_outliving_list_is_harmless() {
        let sub = {
            let listeners: Listeners = Listeners::new();
            listeners.subscribe(|_| {})
        };
        drop(sub);
    }

    #[test]
    fn empty_subscription_is_inactive() {
        assert!(!Subscription::empty().is_active());
    }
}
