//! Deferred tree-structural work raised from binding callbacks.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::base::ControlId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Work {
    /// Rebuild the visualization.
    Visualize(ControlId),
    /// Re-resolve styling.
    Restyle(ControlId),
    /// Reconcile children with a bound collection.
    SyncChildren(ControlId),
}

impl Work {
    fn control(self) -> ControlId {
        match self {
            Work::Visualize(id) | Work::Restyle(id) | Work::SyncChildren(id) => id,
        }
    }
}

/// Shared FIFO of [`Work`]; listeners hold clones and push, the `Ui` drains.
/// Duplicate entries are dropped on push.
#[derive(Clone, Default)]
pub(crate) struct WorkQueue {
    items: Rc<RefCell<VecDeque<Work>>>,
}

impl WorkQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, work: Work) {
        let mut items = self.items.borrow_mut();
        if !items.contains(&work) {
            items.push_back(work);
        }
    }

    pub(crate) fn pop(&self) -> Option<Work> {
        self.items.borrow_mut().pop_front()
    }

    /// Drop a queued entry made redundant by work done directly.
    pub(crate) fn cancel(&self, work: Work) {
        self.items.borrow_mut().retain(|w| *w != work);
    }

    /// Drop everything queued for `control`.
    pub(crate) fn forget(&self, control: ControlId) {
        self.items.borrow_mut().retain(|w| w.control() != control);
    }

    pub(crate) fn clear(&self) {
        self.items.borrow_mut().clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn duplicates_are_dropped_and_order_kept() {
        let mut ids: SlotMap<ControlId, ()> = SlotMap::with_key();
        let (a, b) = (ids.insert(()), ids.insert(()));
        let queue = WorkQueue::new();
        queue.push(Work::Visualize(a));
        queue.push(Work::Restyle(b));
        queue.push(Work::Visualize(a));
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop(), Some(Work::Visualize(a)));
        assert_eq!(queue.pop(), Some(Work::Restyle(b)));
        assert!(queue.is_empty());
    }

    #[test]
    fn forget_drops_one_control() {
        let mut ids: SlotMap<ControlId, ()> = SlotMap::with_key();
        let (a, b) = (ids.insert(()), ids.insert(()));
        let queue = WorkQueue::new();
        queue.push(Work::Visualize(a));
        queue.push(Work::SyncChildren(a));
        queue.push(Work::Restyle(b));
        queue.forget(a);
        assert_eq!(queue.pop(), Some(Work::Restyle(b)));
        assert_eq!(queue.pop(), None);
    }
}
