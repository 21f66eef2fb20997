//! Observable values and the `Binding<T>` handle.
//!
//! An [`Observable`] is pull-read (`get`) and push-notified (`subscribe`).
//! Notifications carry no payload; listeners re-pull the value they need.
//! [`Binding`] is the shared, cloneable handle the rest of the crate passes
//! around. Derived bindings ([`Binding::map`], [`Binding::map2`],
//! [`Binding::function`]) are backed by a [`Computed`] cell.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use super::propagation::{self, Settle};
use super::subscription::{Listeners, Subscription};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Observable
// ---------------------------------------------------------------------------

/// A value source: synchronous pull plus change notification.
pub trait Observable<T> {
    /// Current value.
    fn get(&self) -> T;

    /// Register `listener` for change notifications.
    fn subscribe(&self, listener: Rc<dyn Fn()>) -> Subscription;

    /// Register `listener` to hear that a change is on its way. Sources raise
    /// it ahead of their change notification and derived values forward it,
    /// so the whole downstream graph is marked before anyone re-reads.
    fn subscribe_stale(&self, _listener: Rc<dyn Fn()>) -> Subscription {
        Subscription::empty()
    }

    /// Write through to the underlying storage.
    fn set(&self, _value: T) -> Result<()> {
        Err(Error::Unsupported("write to a read-only binding"))
    }

    /// Whether this source can never change.
    fn is_constant(&self) -> bool {
        false
    }
}

struct Constant<T>(T);

impl<T: Clone> Observable<T> for Constant<T> {
    fn get(&self) -> T {
        self.0.clone()
    }

    fn subscribe(&self, _listener: Rc<dyn Fn()>) -> Subscription {
        Subscription::empty()
    }

    fn is_constant(&self) -> bool {
        true
    }
}

/// Forwards reads and notifications but refuses writes.
pub(crate) struct ReadOnly<T>(pub(crate) Rc<dyn Observable<T>>);

impl<T> Observable<T> for ReadOnly<T> {
    fn get(&self) -> T {
        self.0.get()
    }

    fn subscribe(&self, listener: Rc<dyn Fn()>) -> Subscription {
        self.0.subscribe(listener)
    }

    fn subscribe_stale(&self, listener: Rc<dyn Fn()>) -> Subscription {
        self.0.subscribe_stale(listener)
    }

    fn is_constant(&self) -> bool {
        self.0.is_constant()
    }
}

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

/// A shared observable value. Cloning shares the source.
///
/// Identity is by source: two bindings are the "same" binding only when they
/// wrap the same source object ([`Binding::ptr_eq`]).
pub struct Binding<T: 'static> {
    source: Rc<dyn Observable<T>>,
}

impl<T: 'static> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
        }
    }
}

impl<T: Clone + 'static> Binding<T> {
    /// A binding that always yields `value` and never notifies.
    pub fn constant(value: T) -> Self {
        Self {
            source: Rc::new(Constant(value)),
        }
    }

    /// Wrap a custom observable.
    pub fn new(source: impl Observable<T> + 'static) -> Self {
        Self {
            source: Rc::new(source),
        }
    }

    /// Wrap an already shared observable.
    pub fn from_rc(source: Rc<dyn Observable<T>>) -> Self {
        Self { source }
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.source.get()
    }

    /// Write through to the source, if it is writable.
    pub fn set(&self, value: T) -> Result<()> {
        self.source.set(value)
    }

    /// Listen for changes. The listener stays registered while the token lives.
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription {
        self.source.subscribe(Rc::new(listener))
    }

    pub(crate) fn subscribe_rc(&self, listener: Rc<dyn Fn()>) -> Subscription {
        self.source.subscribe(listener)
    }

    /// Whether the source can never change.
    pub fn is_constant(&self) -> bool {
        self.source.is_constant()
    }

    /// Whether both bindings wrap the same source.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.source), Rc::as_ptr(&other.source))
    }

    /// A read-only view of this binding.
    pub fn read_only(&self) -> Self {
        Self {
            source: Rc::new(ReadOnly(self.source.clone())),
        }
    }

    /// The change-notification half of this binding, for use as an input to
    /// [`Binding::function`].
    pub fn dependency(&self) -> Dependency {
        let (source, stale) = (self.source.clone(), self.source.clone());
        Dependency {
            subscribe: Rc::new(move |listener| source.subscribe(listener)),
            stale: Some(Rc::new(move |listener| stale.subscribe_stale(listener))),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Binding<T> {
    /// A derived binding recomputed by `getter` whenever any of `inputs`
    /// notifies. It only notifies its own listeners when the recomputed value
    /// differs from the previous one.
    pub fn function(getter: impl Fn() -> T + 'static, inputs: Vec<Dependency>) -> Self {
        Self::new_computed(Computed::new(getter, inputs))
    }

    /// Like [`function`](Self::function), with writes forwarded to `setter`.
    pub fn two_way(
        getter: impl Fn() -> T + 'static,
        setter: impl Fn(T) -> Result<()> + 'static,
        inputs: Vec<Dependency>,
    ) -> Self {
        Self::new_computed(Computed::with_setter(getter, setter, inputs))
    }

    fn new_computed(computed: Computed<T>) -> Self {
        Self {
            source: computed.inner,
        }
    }

    /// Derive a binding by transforming this one.
    pub fn map<U: Clone + PartialEq + 'static>(
        &self,
        f: impl Fn(T) -> U + 'static,
    ) -> Binding<U> {
        if self.is_constant() {
            return Binding::constant(f(self.get()));
        }
        let input = self.clone();
        Binding::function(move || f(input.get()), vec![self.dependency()])
    }

    /// Derive a binding from this one and `other`.
    pub fn map2<U, V>(&self, other: &Binding<U>, f: impl Fn(T, U) -> V + 'static) -> Binding<V>
    where
        U: Clone + PartialEq + 'static,
        V: Clone + PartialEq + 'static,
    {
        if self.is_constant() && other.is_constant() {
            return Binding::constant(f(self.get(), other.get()));
        }
        let (a, b) = (self.clone(), other.clone());
        Binding::function(
            move || f(a.get(), b.get()),
            vec![self.dependency(), other.dependency()],
        )
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("value", &self.get())
            .field("constant", &self.is_constant())
            .finish()
    }
}

impl<T: Clone + 'static> From<T> for Binding<T> {
    fn from(value: T) -> Self {
        Self::constant(value)
    }
}

// ---------------------------------------------------------------------------
// Dependency
// ---------------------------------------------------------------------------

type SubscribeFn = Rc<dyn Fn(Rc<dyn Fn()>) -> Subscription>;

/// A type-erased change source used as an input of a computed binding.
#[derive(Clone)]
pub struct Dependency {
    subscribe: SubscribeFn,
    stale: Option<SubscribeFn>,
}

impl Dependency {
    /// Build a dependency from any subscribe function. Such a dependency has
    /// no stale channel; its change notification marks dependents directly.
    pub fn new(subscribe: impl Fn(Rc<dyn Fn()>) -> Subscription + 'static) -> Self {
        Self {
            subscribe: Rc::new(subscribe),
            stale: None,
        }
    }

    /// Listen for changes of the underlying source.
    pub fn subscribe(&self, listener: Rc<dyn Fn()>) -> Subscription {
        (self.subscribe)(listener)
    }

    /// Listen for the advance notice of a change, when the source has one.
    pub fn subscribe_stale(&self, listener: Rc<dyn Fn()>) -> Subscription {
        match &self.stale {
            Some(stale) => stale(listener),
            None => Subscription::empty(),
        }
    }
}

impl fmt::Debug for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Dependency")
    }
}

// ---------------------------------------------------------------------------
// Computed
// ---------------------------------------------------------------------------

/// A derived value cell.
///
/// While nobody listens, `get` recomputes on every read and holds no upstream
/// subscriptions. The first listener connects it to its inputs and caches the
/// value. An input notification only marks the cell stale; it recomputes once
/// when the surrounding [`batch`](super::batch) settles, compares against the
/// cache and notifies only on a real change. Reading a stale cell computes
/// from the inputs. The last listener leaving disconnects it again.
pub struct Computed<T: 'static> {
    inner: Rc<ComputedInner<T>>,
}

struct ComputedInner<T: 'static> {
    this: Weak<ComputedInner<T>>,
    compute: Box<dyn Fn() -> T>,
    setter: Option<Box<dyn Fn(T) -> Result<()>>>,
    inputs: Vec<Dependency>,
    cache: RefCell<Option<T>>,
    /// Marked by an input, cleared when settled. Also the "queued" flag.
    stale: Cell<bool>,
    upstream: RefCell<Vec<Subscription>>,
    listeners: Listeners,
    stale_listeners: Listeners,
}

impl<T: Clone + PartialEq + 'static> Computed<T> {
    /// A computed cell over `inputs`.
    pub fn new(compute: impl Fn() -> T + 'static, inputs: Vec<Dependency>) -> Self {
        Self::build(Box::new(compute), None, inputs)
    }

    /// A computed cell whose writes are forwarded to `setter`.
    pub fn with_setter(
        compute: impl Fn() -> T + 'static,
        setter: impl Fn(T) -> Result<()> + 'static,
        inputs: Vec<Dependency>,
    ) -> Self {
        Self::build(Box::new(compute), Some(Box::new(setter)), inputs)
    }

    fn build(
        compute: Box<dyn Fn() -> T>,
        setter: Option<Box<dyn Fn(T) -> Result<()>>>,
        inputs: Vec<Dependency>,
    ) -> Self {
        Self {
            inner: Rc::new_cyclic(|this| ComputedInner {
                this: this.clone(),
                compute,
                setter,
                inputs,
                cache: RefCell::new(None),
                stale: Cell::new(false),
                upstream: RefCell::new(Vec::new()),
                listeners: Listeners::new(),
                stale_listeners: Listeners::new(),
            }),
        }
    }

    /// Wrap into a [`Binding`].
    pub fn into_binding(self) -> Binding<T> {
        Binding::new_computed(self)
    }
}

impl<T: Clone + PartialEq + 'static> ComputedInner<T> {
    fn is_connected(&self) -> bool {
        self.cache.borrow().is_some()
    }

    fn connect(&self) {
        let value = (self.compute)();
        *self.cache.borrow_mut() = Some(value);

        let weak = self.this.clone();
        let mark: Rc<dyn Fn()> = Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                Self::mark_stale(&inner);
            }
        });
        let mut subs = Vec::with_capacity(self.inputs.len() * 2);
        for input in &self.inputs {
            subs.push(input.subscribe(mark.clone()));
            subs.push(input.subscribe_stale(mark.clone()));
        }
        *self.upstream.borrow_mut() = subs;
    }

    /// Mark this cell and everything derived from it, queueing each once.
    fn mark_stale(this: &Rc<Self>) {
        if this.stale.replace(true) {
            return;
        }
        propagation::batch(|| {
            propagation::schedule(this.clone());
            this.stale_listeners.notify(&());
        });
    }

    fn disconnect(&self) {
        let subs = std::mem::take(&mut *self.upstream.borrow_mut());
        drop(subs);
        self.stale.set(false);
        self.cache.borrow_mut().take();
    }

    fn recompute(&self) {
        if !self.is_connected() {
            return;
        }
        let value = (self.compute)();
        let changed = self.cache.borrow().as_ref() != Some(&value);
        if changed {
            *self.cache.borrow_mut() = Some(value);
            self.listeners.notify(&());
        }
    }
}

impl<T: Clone + PartialEq + 'static> Settle for ComputedInner<T> {
    fn settle(&self) {
        if self.stale.replace(false) {
            self.recompute();
        }
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> for ComputedInner<T> {
    fn get(&self) -> T {
        if self.stale.get() {
            return (self.compute)();
        }
        if let Some(value) = self.cache.borrow().as_ref() {
            return value.clone();
        }
        (self.compute)()
    }

    fn subscribe(&self, listener: Rc<dyn Fn()>) -> Subscription {
        if !self.is_connected() {
            self.connect();
        }
        let sub = self.listeners.subscribe(move |_| listener());
        let weak = self.this.clone();
        Subscription::new(move || {
            drop(sub);
            if let Some(inner) = weak.upgrade() {
                if inner.listeners.is_empty() {
                    inner.disconnect();
                }
            }
        })
    }

    fn subscribe_stale(&self, listener: Rc<dyn Fn()>) -> Subscription {
        self.stale_listeners.subscribe(move |_| listener())
    }

    fn set(&self, value: T) -> Result<()> {
        match &self.setter {
            Some(setter) => setter(value),
            None => Err(Error::Unsupported("write to a computed binding")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Slot;
    use std::cell::Cell;

    fn counter() -> (Rc<Cell<usize>>, impl Fn() + 'static) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        (count, move || c.set(c.get() + 1))
    }

    #[test]
    fn constant_never_notifies() {
        let b = Binding::constant(3);
        let sub = b.subscribe(|| panic!("constant notified"));
        assert!(!sub.is_active());
        assert_eq!(b.get(), 3);
        assert!(b.is_constant());
    }

    #[test]
    fn constant_rejects_writes() {
        let b = Binding::constant("a");
        assert_eq!(b.set("b"), Err(Error::Unsupported("write to a read-only binding")));
    }

    #[test]
    fn ptr_eq_is_identity() {
        let a = Binding::constant(1);
        let b = a.clone();
        let c = Binding::constant(1);
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
    }

    #[test]
    fn map_follows_source() {
        let slot = Slot::new(2);
        let doubled = slot.binding().map(|v| v * 2);
        assert_eq!(doubled.get(), 4);
        slot.set(5);
        assert_eq!(doubled.get(), 10);
    }

    #[test]
    fn map_notifies_only_on_change() {
        let slot = Slot::new(1);
        let parity = slot.binding().map(|v| v % 2);
        let (count, bump) = counter();
        let _sub = parity.subscribe(bump);

        slot.set(3); // parity unchanged
        assert_eq!(count.get(), 0);
        slot.set(4);
        assert_eq!(count.get(), 1);
        assert_eq!(parity.get(), 0);
    }

    #[test]
    fn map2_recomputes_when_either_input_changes() {
        let pressed = Slot::new(false);
        let base = Slot::new("grey");
        let background = pressed
            .binding()
            .map2(&base.binding(), |p, b| if p { "blue" } else { b });
        let (count, bump) = counter();
        let _sub = background.subscribe(bump);

        assert_eq!(background.get(), "grey");
        pressed.set(true);
        assert_eq!(background.get(), "blue");
        base.set("white"); // masked by pressed
        assert_eq!(count.get(), 1);
        pressed.set(false);
        assert_eq!(background.get(), "white");
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn map_of_constant_is_constant() {
        let b = Binding::constant(2).map(|v| v + 1);
        assert!(b.is_constant());
        assert_eq!(b.get(), 3);
    }

    #[test]
    fn computed_disconnects_when_unobserved() {
        let slot = Slot::new(1);
        let derived = slot.binding().map(|v| v + 1);
        let sub = derived.subscribe(|| {});
        assert_eq!(slot.listener_count(), 1);
        drop(sub);
        assert_eq!(slot.listener_count(), 0);
        slot.set(9);
        assert_eq!(derived.get(), 10);
    }

    #[test]
    fn two_way_forwards_writes() {
        let slot = Slot::new(10);
        let s = slot.clone();
        let s2 = slot.clone();
        let halved = Binding::two_way(
            move || s.get() / 2,
            move |v| {
                s2.set(v * 2);
                Ok(())
            },
            vec![slot.binding().dependency()],
        );
        halved.set(7).unwrap();
        assert_eq!(slot.get(), 14);
        assert_eq!(halved.get(), 7);
    }

    #[test]
    fn function_without_setter_rejects_writes() {
        let b = Binding::function(|| 1, Vec::new());
        assert!(matches!(b.set(2), Err(Error::Unsupported(_))));
    }

    #[test]
    fn read_only_view_rejects_writes() {
        let slot = Slot::new(1);
        let view = slot.binding().read_only();
        assert!(view.set(2).is_err());
        let (count, bump) = counter();
        let _sub = view.subscribe(bump);
        slot.set(3);
        assert_eq!(count.get(), 1);
        assert_eq!(view.get(), 3);
    }

    fn record(binding: &Binding<i32>) -> (Rc<RefCell<Vec<i32>>>, Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (log, reader) = (seen.clone(), binding.read_only());
        let sub = binding.subscribe(move || log.borrow_mut().push(reader.get()));
        (seen, sub)
    }

    #[test]
    fn diamond_notifies_once_with_the_settled_value() {
        let a = Slot::new(1);
        let b = a.binding().map(|v| v + 1);
        let c = a.binding().map(|v| v * 2);
        let d = b.map2(&c, |x, y| x + y);
        let (seen, _sub) = record(&d);

        a.set(2);
        assert_eq!(*seen.borrow(), vec![7]);
        a.set(3);
        assert_eq!(*seen.borrow(), vec![7, 10]);
    }

    #[test]
    fn diamond_reading_an_unsettled_input_stays_consistent() {
        // `d` subscribes to `a` before `b` does, so it settles first and has
        // to read `b` while it is still stale.
        let a = Slot::new(1);
        let b = a.binding().map(|v| v * 10);
        let d = a.binding().map2(&b, |x, y| x + y);
        let (seen, _sub) = record(&d);

        a.set(2);
        assert_eq!(*seen.borrow(), vec![22]);
        assert_eq!(b.get(), 20);
    }

    #[test]
    fn plain_listener_sees_settled_derived_values() {
        let a = Slot::new(1);
        let b = a.binding().map(|v| v + 1);
        let c = b.map(|v| v * 2);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (log, reader) = (seen.clone(), c.clone());
        let _sub = a.subscribe(move || log.borrow_mut().push(reader.get()));
        let _keep = c.subscribe(|| {});

        a.set(4);
        assert_eq!(*seen.borrow(), vec![10]);
        assert_eq!(c.get(), 10);
    }
}
