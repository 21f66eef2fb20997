//! Change propagation through derived values.
//!
//! A source write (a [`Slot`](super::Slot) or [`ListSlot`](super::ListSlot)
//! change) runs inside a [`batch`]. While the batch is open, derived
//! [`Computed`](super::Computed) cells only mark themselves stale and queue up;
//! when the outermost batch closes the queue is drained and every stale cell
//! recomputes once, compares and notifies. A stale cell read in the meantime
//! computes from its inputs instead of returning its cache, so no listener
//! ever observes a value mixing old and new inputs.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// A queued derived value.
pub(crate) trait Settle {
    /// Recompute if still stale and notify on a real change.
    fn settle(&self);
}

struct Propagation {
    /// Open `batch` calls.
    depth: usize,
    /// Set while the queue is being drained.
    draining: bool,
    pending: VecDeque<Rc<dyn Settle>>,
}

thread_local! {
    static PROPAGATION: RefCell<Propagation> = const {
        RefCell::new(Propagation {
            depth: 0,
            draining: false,
            pending: VecDeque::new(),
        })
    };
}

/// Run `f` with derived values held back, then settle them all at once.
///
/// Writes inside `f` notify plain listeners immediately; derived bindings
/// recompute (and notify) once, after the outermost batch returns.
pub fn batch<R>(f: impl FnOnce() -> R) -> R {
    PROPAGATION.with(|p| p.borrow_mut().depth += 1);
    let result = f();
    PROPAGATION.with(|p| p.borrow_mut().depth -= 1);
    drain();
    result
}

/// Queue `node`; settles right away when no batch is open.
pub(crate) fn schedule(node: Rc<dyn Settle>) {
    PROPAGATION.with(|p| p.borrow_mut().pending.push_back(node));
    drain();
}

fn drain() {
    let start = PROPAGATION.with(|p| {
        let mut p = p.borrow_mut();
        if p.depth > 0 || p.draining {
            return false;
        }
        p.draining = true;
        true
    });
    if !start {
        return;
    }
    // Nodes queued while settling are picked up by the same loop.
    while let Some(node) = PROPAGATION.with(|p| p.borrow_mut().pending.pop_front()) {
        node.settle();
    }
    PROPAGATION.with(|p| p.borrow_mut().draining = false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Slot;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    #[test]
    fn batch_returns_the_closure_result() {
        assert_eq!(batch(|| 7), 7);
    }

    #[test]
    fn derived_value_settles_once_per_batch() {
        let width = Slot::new(1);
        let height = Slot::new(1);
        let area = width.binding().map2(&height.binding(), |w, h| w * h);
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let _sub = area.subscribe(move || c.set(c.get() + 1));

        batch(|| {
            width.set(3);
            height.set(4);
            // Read while stale: computed from the current inputs.
            assert_eq!(area.get(), 12);
            assert_eq!(count.get(), 0);
        });
        assert_eq!(count.get(), 1);
        assert_eq!(area.get(), 12);
    }

    #[test]
    fn nested_batches_settle_at_the_outermost() {
        let source = Slot::new(0);
        let doubled = source.binding().map(|v| v * 2);
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let _sub = doubled.subscribe(move || c.set(c.get() + 1));

        batch(|| {
            batch(|| {
                source.set(1);
            });
            assert_eq!(count.get(), 0);
            source.set(2);
        });
        assert_eq!(count.get(), 1);
        assert_eq!(doubled.get(), 4);
    }

    #[test]
    fn write_and_revert_inside_a_batch_is_silent() {
        let source = Slot::new(5);
        let derived = source.binding().map(|v| v + 1);
        let _sub = derived.subscribe(|| panic!("notified without a change"));
        batch(|| {
            source.set(6);
            source.set(5);
        });
        assert_eq!(derived.get(), 6);
    }
}
