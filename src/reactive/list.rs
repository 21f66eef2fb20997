//! Observable ordered collections.
//!
//! [`ListSlot`] raises a [`ListChange`] for every structural mutation. Index
//! conventions: `Add` and `Move` indices refer to the list *after* the
//! mutation, `Remove` indices to the list *before* it.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use super::binding::{Binding, Observable};
use super::propagation::batch;
use super::subscription::{Listeners, Subscription};
use crate::error::{Error, Result};

/// A structural change to a [`ListSlot`].
#[derive(Debug, Clone, PartialEq)]
pub enum ListChange<T> {
    /// `items` now occupy `index..index + items.len()`.
    Add { index: usize, items: Vec<T> },
    /// `items` occupied `index..index + items.len()` before removal.
    Remove { index: usize, items: Vec<T> },
    /// `old` at `index` was replaced by `new`.
    Replace { index: usize, old: Vec<T>, new: Vec<T> },
    /// `items` moved from `old_index` to `new_index`.
    Move {
        old_index: usize,
        new_index: usize,
        items: Vec<T>,
    },
    /// Same items, different order.
    Reorder,
}

struct ListCell<T: 'static> {
    items: RefCell<Vec<T>>,
    changes: Listeners<ListChange<T>>,
    stale: Listeners,
}

impl<T: Clone + 'static> Observable<Vec<T>> for ListCell<T> {
    fn get(&self) -> Vec<T> {
        self.items.borrow().clone()
    }

    fn subscribe(&self, listener: Rc<dyn Fn()>) -> Subscription {
        self.changes.subscribe(move |_| listener())
    }

    fn subscribe_stale(&self, listener: Rc<dyn Fn()>) -> Subscription {
        self.stale.subscribe(move |_| listener())
    }
}

/// A mutable, shared, observable list.
///
/// A handle obtained from [`ListSlot::read_only`] shares the storage but
/// rejects every structural operation with [`Error::Unsupported`].
pub struct ListSlot<T: 'static> {
    cell: Rc<ListCell<T>>,
    writable: bool,
}

impl<T: 'static> Clone for ListSlot<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
            writable: self.writable,
        }
    }
}

impl<T: Clone + 'static> ListSlot<T> {
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            cell: Rc::new(ListCell {
                items: RefCell::new(items),
                changes: Listeners::new(),
                stale: Listeners::new(),
            }),
            writable: true,
        }
    }

    /// A handle over the same storage that refuses structural writes.
    pub fn read_only(&self) -> Self {
        Self {
            cell: self.cell.clone(),
            writable: false,
        }
    }

    pub fn is_read_only(&self) -> bool {
        !self.writable
    }

    /// Whether both handles share storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }

    pub fn len(&self) -> usize {
        self.cell.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cell.items.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<T> {
        self.cell.items.borrow().get(index).cloned()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.cell.items.borrow().clone()
    }

    pub fn push(&self, item: T) -> Result<()> {
        let index = self.len();
        self.insert(index, item)
    }

    pub fn insert(&self, index: usize, item: T) -> Result<()> {
        self.check_writable("insert into a read-only list")?;
        {
            let mut items = self.cell.items.borrow_mut();
            if index > items.len() {
                return Err(Error::IndexOutOfRange {
                    index,
                    len: items.len(),
                });
            }
            items.insert(index, item.clone());
        }
        self.raise(ListChange::Add {
            index,
            items: vec![item],
        });
        Ok(())
    }

    pub fn remove(&self, index: usize) -> Result<T> {
        self.check_writable("remove from a read-only list")?;
        let item = {
            let mut items = self.cell.items.borrow_mut();
            if index >= items.len() {
                return Err(Error::IndexOutOfRange {
                    index,
                    len: items.len(),
                });
            }
            items.remove(index)
        };
        self.raise(ListChange::Remove {
            index,
            items: vec![item.clone()],
        });
        Ok(item)
    }

    /// Remove the first item equal to `item`. Returns whether one was found.
    pub fn remove_item(&self, item: &T) -> Result<bool>
    where
        T: PartialEq,
    {
        self.check_writable("remove from a read-only list")?;
        let position = self.cell.items.borrow().iter().position(|x| x == item);
        match position {
            Some(index) => self.remove(index).map(|_| true),
            None => Ok(false),
        }
    }

    /// Indexed write. Returns the previous item.
    pub fn replace(&self, index: usize, item: T) -> Result<T> {
        self.check_writable("indexed write on a read-only list")?;
        let old = {
            let mut items = self.cell.items.borrow_mut();
            let len = items.len();
            match items.get_mut(index) {
                Some(slot) => std::mem::replace(slot, item.clone()),
                None => return Err(Error::IndexOutOfRange { index, len }),
            }
        };
        self.raise(ListChange::Replace {
            index,
            old: vec![old.clone()],
            new: vec![item],
        });
        Ok(old)
    }

    /// Move the item at `old_index` so that it ends up at `new_index`.
    pub fn move_item(&self, old_index: usize, new_index: usize) -> Result<()> {
        self.check_writable("move on a read-only list")?;
        let item = {
            let mut items = self.cell.items.borrow_mut();
            let len = items.len();
            for index in [old_index, new_index] {
                if index >= len {
                    return Err(Error::IndexOutOfRange { index, len });
                }
            }
            if old_index == new_index {
                return Ok(());
            }
            let item = items.remove(old_index);
            items.insert(new_index, item.clone());
            item
        };
        self.raise(ListChange::Move {
            old_index,
            new_index,
            items: vec![item],
        });
        Ok(())
    }

    /// Stable sort; raises `Reorder`.
    pub fn sort_by(&self, compare: impl FnMut(&T, &T) -> Ordering) -> Result<()> {
        self.check_writable("sort on a read-only list")?;
        let mut items = self.to_vec();
        items.sort_by(compare);
        *self.cell.items.borrow_mut() = items;
        self.raise(ListChange::Reorder);
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.check_writable("clear on a read-only list")?;
        let items = std::mem::take(&mut *self.cell.items.borrow_mut());
        if !items.is_empty() {
            self.raise(ListChange::Remove { index: 0, items });
        }
        Ok(())
    }

    /// Listen for structural changes.
    pub fn subscribe_changes(&self, listener: impl Fn(&ListChange<T>) + 'static) -> Subscription {
        self.cell.changes.subscribe(listener)
    }

    /// The whole list as a binding that notifies on every change.
    pub fn binding(&self) -> Binding<Vec<T>> {
        Binding::from_rc(self.cell.clone())
    }

    fn check_writable(&self, operation: &'static str) -> Result<()> {
        if self.writable {
            Ok(())
        } else {
            Err(Error::Unsupported(operation))
        }
    }

    fn raise(&self, change: ListChange<T>) {
        batch(|| {
            self.cell.stale.notify(&());
            self.cell.changes.notify(&change);
        });
    }
}

impl<T: Clone + 'static> Default for ListSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> FromIterator<T> for ListSlot<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for ListSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListSlot")
            .field("items", &*self.cell.items.borrow())
            .field("writable", &self.writable)
            .finish()
    }
}
