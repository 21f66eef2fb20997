//! `Property<T>`: local > style > default resolution with an activation-scoped
//! cache.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::Result;
use crate::reactive::{Binding, Listeners, Observable, Subscription};

static NEXT_KEY: AtomicU64 = AtomicU64::new(1);

/// Identity of one property instance. Style rules and property lists match
/// properties by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyKey(u64);

impl PropertyKey {
    fn next() -> Self {
        Self(NEXT_KEY.fetch_add(1, Ordering::Relaxed))
    }
}

struct ActiveState<T> {
    active: bool,
    cached: Option<T>,
    // Listener on the current target. Present only while active.
    subscription: Option<Subscription>,
}

pub(crate) struct PropertyCell<T: 'static> {
    this: Weak<PropertyCell<T>>,
    key: PropertyKey,
    name: &'static str,
    default: Binding<T>,
    style: RefCell<Option<Binding<T>>>,
    local: RefCell<Option<Binding<T>>>,
    target: RefCell<Binding<T>>,
    state: RefCell<ActiveState<T>>,
    listeners: Listeners,
}

/// A three-tier value cell: the local binding wins over the style binding,
/// which wins over the default binding.
///
/// While inactive, [`get`](Self::get) reads the target binding directly.
/// While active (its owner is attached), the value is cached and the cache is
/// refreshed on activation, on every target notification, and whenever the
/// target binding is swapped. Listeners are only notified while active, and
/// only when the new value differs from the cached one.
pub struct Property<T: 'static> {
    pub(crate) cell: Rc<PropertyCell<T>>,
}

impl<T: 'static> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Property<T> {
    /// A property whose default is the constant `default`.
    pub fn new(name: &'static str, default: T) -> Self {
        Self::with_default_binding(name, Binding::constant(default))
    }

    /// A property whose default follows `default`.
    pub fn with_default_binding(name: &'static str, default: Binding<T>) -> Self {
        Self {
            cell: Rc::new_cyclic(|this| PropertyCell {
                this: this.clone(),
                key: PropertyKey::next(),
                name,
                target: RefCell::new(default.clone()),
                default,
                style: RefCell::new(None),
                local: RefCell::new(None),
                state: RefCell::new(ActiveState {
                    active: false,
                    cached: None,
                    subscription: None,
                }),
                listeners: Listeners::new(),
            }),
        }
    }

    pub fn key(&self) -> PropertyKey {
        self.cell.key
    }

    pub fn name(&self) -> &'static str {
        self.cell.name
    }

    /// Effective value.
    pub fn get(&self) -> T {
        self.cell.value()
    }

    /// Set a constant local value.
    pub fn set_value(&self, value: T) {
        self.set_binding(Binding::constant(value));
    }

    /// Set the local binding.
    pub fn set_binding(&self, binding: Binding<T>) {
        *self.cell.local.borrow_mut() = Some(binding);
        self.cell.retarget();
    }

    /// Write `value` through the local binding when it is writable, otherwise
    /// replace the local binding with a constant.
    pub fn set(&self, value: T) -> Result<()> {
        let local = self.cell.local.borrow().clone();
        match local {
            Some(binding) if !binding.is_constant() => binding.set(value),
            _ => {
                self.set_value(value);
                Ok(())
            }
        }
    }

    /// Drop the local binding; style or default takes over.
    pub fn clear(&self) {
        let had_local = self.cell.local.borrow_mut().take().is_some();
        if had_local {
            self.cell.retarget();
        }
    }

    pub fn local_binding(&self) -> Option<Binding<T>> {
        self.cell.local.borrow().clone()
    }

    pub fn style_binding(&self) -> Option<Binding<T>> {
        self.cell.style.borrow().clone()
    }

    pub fn default_binding(&self) -> Binding<T> {
        self.cell.default.clone()
    }

    /// The binding currently supplying the value.
    pub fn target(&self) -> Binding<T> {
        self.cell.target.borrow().clone()
    }

    /// Set or clear the style binding.
    pub fn set_style(&self, binding: Option<Binding<T>>) {
        *self.cell.style.borrow_mut() = binding;
        self.cell.retarget();
    }

    pub fn activate(&self) {
        self.cell.activate();
    }

    pub fn deactivate(&self) {
        self.cell.deactivate();
    }

    pub fn is_active(&self) -> bool {
        self.cell.state.borrow().active
    }

    /// Listen for effective value changes (only raised while active).
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        self.cell.listeners.subscribe(move |_| listener())
    }

    /// The effective value as a read-only binding.
    pub fn binding(&self) -> Binding<T> {
        Binding::from_rc(self.cell.clone())
    }

    /// Whether both handles are the same property.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }
}

impl<T: Clone + PartialEq + 'static> PropertyCell<T> {
    fn value(&self) -> T {
        {
            let state = self.state.borrow();
            if let (true, Some(value)) = (state.active, state.cached.as_ref()) {
                return value.clone();
            }
        }
        self.target.borrow().get()
    }

    fn subscribe_target(&self) -> Subscription {
        let weak = self.this.clone();
        self.target.borrow().subscribe_rc(Rc::new(move || {
            if let Some(cell) = weak.upgrade() {
                cell.refresh();
            }
        }))
    }

    /// Recompute the target. Only an identity change resubscribes.
    fn retarget(&self) {
        let next = self
            .local
            .borrow()
            .clone()
            .or_else(|| self.style.borrow().clone())
            .unwrap_or_else(|| self.default.clone());
        if next.ptr_eq(&self.target.borrow()) {
            return;
        }
        *self.target.borrow_mut() = next;

        if !self.state.borrow().active {
            return;
        }
        // Drop the old listener before attaching the new one.
        self.state.borrow_mut().subscription.take();
        let subscription = self.subscribe_target();
        self.state.borrow_mut().subscription = Some(subscription);
        self.refresh();
    }

    fn refresh(&self) {
        let value = self.target.borrow().get();
        {
            let mut state = self.state.borrow_mut();
            if !state.active || state.cached.as_ref() == Some(&value) {
                return;
            }
            state.cached = Some(value);
        }
        self.listeners.notify(&());
    }

    fn activate(&self) {
        if self.state.borrow().active {
            return;
        }
        let value = self.target.borrow().get();
        let subscription = self.subscribe_target();
        let mut state = self.state.borrow_mut();
        state.active = true;
        state.cached = Some(value);
        state.subscription = Some(subscription);
    }

    fn deactivate(&self) {
        let subscription = {
            let mut state = self.state.borrow_mut();
            state.active = false;
            state.cached = None;
            state.subscription.take()
        };
        drop(subscription);
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> for PropertyCell<T> {
    fn get(&self) -> T {
        self.value()
    }

    fn subscribe(&self, listener: Rc<dyn Fn()>) -> Subscription {
        self.listeners.subscribe(move |_| listener())
    }
}

impl<T: Clone + PartialEq + fmt::Debug + 'static> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name())
            .field("value", &self.get())
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Slot;
    use std::cell::Cell;

    fn watch<T: Clone + PartialEq + 'static>(p: &Property<T>) -> (Rc<Cell<usize>>, Subscription) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let sub = p.subscribe(move || c.set(c.get() + 1));
        (count, sub)
    }

    #[test]
    fn precedence_local_over_style_over_default() {
        let p = Property::new("width", 1);
        assert_eq!(p.get(), 1);
        p.set_style(Some(Binding::constant(2)));
        assert_eq!(p.get(), 2);
        p.set_value(3);
        assert_eq!(p.get(), 3);
        p.clear();
        assert_eq!(p.get(), 2);
        p.set_style(None);
        assert_eq!(p.get(), 1);
    }

    #[test]
    fn inactive_reads_target_directly() {
        let slot = Slot::new(5);
        let p = Property::new("n", 0);
        p.set_binding(slot.binding());
        slot.set(6);
        assert_eq!(p.get(), 6);
        assert!(!p.is_active());
    }

    #[test]
    fn inactive_property_does_not_notify() {
        let slot = Slot::new(1);
        let p = Property::new("n", 0);
        p.set_binding(slot.binding());
        let (count, _sub) = watch(&p);
        slot.set(2);
        assert_eq!(count.get(), 0);
        assert_eq!(slot.listener_count(), 0);
    }

    #[test]
    fn active_notifies_once_per_real_change() {
        let slot = Slot::new(1);
        let p = Property::new("n", 0);
        p.set_binding(slot.binding());
        p.activate();
        let (count, _sub) = watch(&p);

        slot.set(2);
        slot.set(2);
        assert_eq!(count.get(), 1);
        assert_eq!(p.get(), 2);
    }

    #[test]
    fn swapping_to_equal_value_does_not_notify() {
        let p = Property::new("n", 7);
        p.activate();
        let (count, _sub) = watch(&p);
        p.set_value(7);
        assert_eq!(count.get(), 0);
        p.set_value(8);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn retarget_drops_old_listener() {
        let a = Slot::new(1);
        let b = Slot::new(2);
        let p = Property::new("n", 0);
        p.set_binding(a.binding());
        p.activate();
        assert_eq!(a.listener_count(), 1);

        p.set_binding(b.binding());
        assert_eq!(a.listener_count(), 0);
        assert_eq!(b.listener_count(), 1);
        assert_eq!(p.get(), 2);

        let (count, _sub) = watch(&p);
        a.set(10);
        assert_eq!(count.get(), 0);
        b.set(20);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn same_binding_identity_is_not_resubscribed() {
        let slot = Slot::new(1);
        let binding = slot.binding();
        let p = Property::new("n", 0);
        p.set_binding(binding.clone());
        p.activate();
        let target = p.target();
        p.set_binding(binding);
        assert!(p.target().ptr_eq(&target));
        assert_eq!(slot.listener_count(), 1);
    }

    #[test]
    fn deactivate_then_activate_rebuilds_cache() {
        let slot = Slot::new(1);
        let p = Property::new("n", 0);
        p.set_binding(slot.binding());
        p.activate();
        p.deactivate();
        assert_eq!(slot.listener_count(), 0);
        slot.set(42);
        p.activate();
        assert_eq!(p.get(), 42);
        assert_eq!(p.get(), p.target().get());
    }

    #[test]
    fn set_writes_through_two_way_local() {
        let slot = Slot::new(1);
        let p = Property::new("n", 0);
        p.set_binding(slot.binding());
        p.set(9).unwrap();
        assert_eq!(slot.get(), 9);

        let q = Property::new("m", 0);
        q.set(4).unwrap();
        assert_eq!(q.get(), 4);
    }

    #[test]
    fn binding_view_follows_effective_value() {
        let p = Property::new("n", 1);
        p.activate();
        let view = p.binding();
        let derived = view.map(|v| v * 10);
        let (count, _sub) = {
            let count = Rc::new(Cell::new(0));
            let c = count.clone();
            (count, derived.subscribe(move || c.set(c.get() + 1)))
        };
        p.set_value(2);
        assert_eq!(derived.get(), 20);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn keys_are_unique() {
        let a = Property::new("a", ());
        let b = Property::new("a", ());
        assert_ne!(a.key(), b.key());
    }
}
