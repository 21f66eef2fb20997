//! Routes: the chain of visuals from a target up to the root, with pooled
//! storage.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::visual::{VisualId, VisualTree};

/// Default number of spare route buffers a pool keeps.
pub const DEFAULT_POOL_CAPACITY: usize = 8;

#[derive(Default)]
struct PoolState {
    free: Vec<Vec<VisualId>>,
    capacity: usize,
    created: usize,
}

/// Free list of route buffers. Clones share the same list.
#[derive(Clone)]
pub struct RoutePool {
    state: Rc<RefCell<PoolState>>,
}

impl RoutePool {
    /// A pool keeping at most `capacity` spare buffers.
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Rc::new(RefCell::new(PoolState {
                capacity,
                ..PoolState::default()
            })),
        }
    }

    /// The route from `target` up to the root of its tree.
    pub fn create(&self, tree: &VisualTree, target: VisualId) -> Route {
        let mut items = {
            let mut state = self.state.borrow_mut();
            match state.free.pop() {
                Some(items) => items,
                None => {
                    state.created += 1;
                    Vec::new()
                }
            }
        };
        items.extend(tree.ancestors(target));
        Route {
            items,
            pool: Some(self.state.clone()),
        }
    }

    /// Spare buffers ready for reuse.
    pub fn available(&self) -> usize {
        self.state.borrow().free.len()
    }

    /// Buffers allocated because the pool was empty.
    pub fn allocations(&self) -> usize {
        self.state.borrow().created
    }
}

impl Default for RoutePool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_CAPACITY)
    }
}

impl fmt::Debug for RoutePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("RoutePool")
            .field("available", &state.free.len())
            .field("capacity", &state.capacity)
            .finish()
    }
}

/// Visuals from a target (bottom) to the root (top).
///
/// Dropping the route hands its buffer back to the pool it came from.
pub struct Route {
    items: Vec<VisualId>,
    pool: Option<Rc<RefCell<PoolState>>>,
}

impl Route {
    /// An unpooled route built from `target` upward.
    pub fn create(tree: &VisualTree, target: VisualId) -> Self {
        let mut route = RoutePool::new(0).create(tree, target);
        route.pool = None;
        route
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The route's target.
    pub fn target(&self) -> Option<VisualId> {
        self.items.first().copied()
    }

    /// `index` counted from the target.
    pub fn get_from_bottom(&self, index: usize) -> Option<VisualId> {
        self.items.get(index).copied()
    }

    /// `index` counted from the root.
    pub fn get_from_top(&self, index: usize) -> Option<VisualId> {
        let from_bottom = self.items.len().checked_sub(index + 1)?;
        self.items.get(from_bottom).copied()
    }

    /// Root to target.
    pub fn iter_from_top(&self) -> impl Iterator<Item = VisualId> + '_ {
        self.items.iter().rev().copied()
    }

    /// Target to root.
    pub fn iter_from_bottom(&self) -> impl Iterator<Item = VisualId> + '_ {
        self.items.iter().copied()
    }

    /// First index, counted from the root, where the two routes differ.
    /// Equal to the shorter length when one route is a prefix of the other.
    pub fn find_first_difference_from_top(&self, other: &Route) -> usize {
        self.iter_from_top()
            .zip(other.iter_from_top())
            .take_while(|(a, b)| a == b)
            .count()
    }

    pub fn contains(&self, id: VisualId) -> bool {
        self.items.contains(&id)
    }
}

impl Drop for Route {
    fn drop(&mut self) {
        let Some(pool) = self.pool.take() else {
            return;
        };
        let mut state = pool.borrow_mut();
        if state.free.len() < state.capacity {
            let mut items = std::mem::take(&mut self.items);
            items.clear();
            state.free.push(items);
        }
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::Frame;
    use pretty_assertions::assert_eq;

    fn chain(tree: &mut VisualTree, depth: usize) -> Vec<VisualId> {
        let mut ids = vec![tree.insert(Frame::new())];
        for _ in 1..depth {
            let child = tree.insert(Frame::new());
            tree.append_child(*ids.last().unwrap(), child).unwrap();
            ids.push(child);
        }
        ids
    }

    #[test]
    fn top_and_bottom_walks_mirror_the_parent_chain() {
        let mut tree = VisualTree::new();
        let ids = chain(&mut tree, 4);
        let route = Route::create(&tree, ids[3]);
        assert_eq!(route.len(), 4);
        let from_top: Vec<_> = (0..route.len()).map(|i| route.get_from_top(i).unwrap()).collect();
        let from_bottom: Vec<_> = (0..route.len())
            .map(|i| route.get_from_bottom(i).unwrap())
            .collect();
        assert_eq!(from_top, ids);
        assert_eq!(from_bottom, ids.iter().rev().copied().collect::<Vec<_>>());
        assert_eq!(route.get_from_top(4), None);
        assert_eq!(route.target(), Some(ids[3]));
    }

    #[test]
    fn first_difference_from_top() {
        let mut tree = VisualTree::new();
        let ids = chain(&mut tree, 3);
        let sibling = tree.insert(Frame::new());
        tree.append_child(ids[1], sibling).unwrap();

        let a = Route::create(&tree, ids[2]);
        let b = Route::create(&tree, sibling);
        assert_eq!(a.find_first_difference_from_top(&b), 2);
        let parent = Route::create(&tree, ids[1]);
        assert_eq!(a.find_first_difference_from_top(&parent), 2);
        assert_eq!(a.find_first_difference_from_top(&a), 3);
    }

    #[test]
    fn dropped_routes_return_their_buffer() {
        let mut tree = VisualTree::new();
        let ids = chain(&mut tree, 3);
        let pool = RoutePool::new(2);
        {
            let _a = pool.create(&tree, ids[2]);
            let _b = pool.create(&tree, ids[1]);
            assert_eq!(pool.available(), 0);
        }
        assert_eq!(pool.available(), 2);
        assert_eq!(pool.allocations(), 2);

        let reused = pool.create(&tree, ids[2]);
        assert_eq!(pool.allocations(), 2);
        assert_eq!(reused.len(), 3);
    }

    #[test]
    fn pool_keeps_at_most_its_capacity() {
        let mut tree = VisualTree::new();
        let ids = chain(&mut tree, 2);
        let pool = RoutePool::new(1);
        let routes: Vec<_> = (0..3).map(|_| pool.create(&tree, ids[1])).collect();
        drop(routes);
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn unknown_target_gives_empty_route() {
        let mut tree = VisualTree::new();
        let id = tree.insert(Frame::new());
        tree.destroy(id);
        assert!(Route::create(&tree, id).is_empty());
    }
}
