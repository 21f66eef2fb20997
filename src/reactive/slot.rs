//! Settable value cells.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::binding::{Binding, Observable, ReadOnly};
use super::propagation::batch;
use super::subscription::{Listeners, Subscription};
use crate::error::Result;

struct SlotCell<T> {
    value: RefCell<T>,
    listeners: Listeners,
    stale: Listeners,
}

impl<T: Clone + PartialEq + 'static> SlotCell<T> {
    fn replace(&self, value: T) -> bool {
        {
            let mut current = self.value.borrow_mut();
            if *current == value {
                return false;
            }
            *current = value;
        }
        batch(|| {
            self.stale.notify(&());
            self.listeners.notify(&());
        });
        true
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> for SlotCell<T> {
    fn get(&self) -> T {
        self.value.borrow().clone()
    }

    fn subscribe(&self, listener: Rc<dyn Fn()>) -> Subscription {
        self.listeners.subscribe(move |_| listener())
    }

    fn subscribe_stale(&self, listener: Rc<dyn Fn()>) -> Subscription {
        self.stale.subscribe(move |_| listener())
    }

    fn set(&self, value: T) -> Result<()> {
        self.replace(value);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Slot
// ---------------------------------------------------------------------------

/// A mutable, shared, observable value.
///
/// Writes that compare equal to the current value are dropped without
/// notifying.
pub struct Slot<T: 'static> {
    cell: Rc<SlotCell<T>>,
}

impl<T: 'static> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Slot<T> {
    pub fn new(value: T) -> Self {
        Self {
            cell: Rc::new(SlotCell {
                value: RefCell::new(value),
                listeners: Listeners::new(),
                stale: Listeners::new(),
            }),
        }
    }

    pub fn get(&self) -> T {
        self.cell.get()
    }

    /// Store `value`. Returns `true` when it differed and listeners ran.
    pub fn set(&self, value: T) -> bool {
        self.cell.replace(value)
    }

    /// Modify in place, notifying if the result differs from the old value.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> bool {
        let mut next = self.get();
        f(&mut next);
        self.set(next)
    }

    /// A writable binding over this slot.
    pub fn binding(&self) -> Binding<T> {
        Binding::from_rc(self.cell.clone())
    }

    /// A read-only handle sharing this slot's storage.
    pub fn read_only(&self) -> ReadOnlySlot<T> {
        ReadOnlySlot { slot: self.clone() }
    }

    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        self.cell.listeners.subscribe(move |_| listener())
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.cell.listeners.len()
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for Slot<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq + fmt::Debug + 'static> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Slot").field(&self.get()).finish()
    }
}

// ---------------------------------------------------------------------------
// ReadOnlySlot
// ---------------------------------------------------------------------------

/// A view on a [`Slot`] that can be observed but not written.
pub struct ReadOnlySlot<T: 'static> {
    slot: Slot<T>,
}

impl<T: 'static> Clone for ReadOnlySlot<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> ReadOnlySlot<T> {
    pub fn get(&self) -> T {
        self.slot.get()
    }

    /// A binding over the slot. Writes through it fail with `Unsupported`.
    pub fn binding(&self) -> Binding<T> {
        Binding::new(ReadOnly(self.slot.cell.clone()))
    }

    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        self.slot.subscribe(listener)
    }
}

impl<T: Clone + PartialEq + fmt::Debug + 'static> fmt::Debug for ReadOnlySlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReadOnlySlot").field(&self.get()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::Cell;

    #[test]
    fn set_notifies_only_on_change() {
        let slot = Slot::new(1);
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let _sub = slot.subscribe(move || c.set(c.get() + 1));

        assert!(!slot.set(1));
        assert_eq!(count.get(), 0);
        assert!(slot.set(2));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn listeners_see_new_value() {
        let slot = Slot::new(String::from("a"));
        let seen = Rc::new(RefCell::new(String::new()));
        let (s, out) = (slot.clone(), seen.clone());
        let _sub = slot.subscribe(move || *out.borrow_mut() = s.get());
        slot.set("b".into());
        assert_eq!(*seen.borrow(), "b");
    }

    #[test]
    fn update_in_place() {
        let slot = Slot::new(vec![1, 2]);
        assert!(slot.update(|v| v.push(3)));
        assert!(!slot.update(|_| {}));
        assert_eq!(slot.get(), vec![1, 2, 3]);
    }

    #[test]
    fn binding_writes_through() {
        let slot = Slot::new(0);
        slot.binding().set(4).unwrap();
        assert_eq!(slot.get(), 4);
    }

    #[test]
    fn read_only_binding_refuses_writes() {
        let slot = Slot::new(0);
        let view = slot.read_only();
        assert!(matches!(view.binding().set(1), Err(Error::Unsupported(_))));
        slot.set(2);
        assert_eq!(view.get(), 2);
    }
}
