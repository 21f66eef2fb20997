//! Routed input dispatch: hit-testing, tunnel and bubble phases, hover.

use tracing::{debug, trace};

use super::cx::{FocusRequest, InputCx};
use super::event::{InputEvent, Phase, RoutedInput};
use super::focus::{Focus, FocusTarget};
use super::route::{Route, RoutePool};
use crate::control::Ui;
use crate::geometry::Point;
use crate::visual::{Visual, VisualId, VisualTree};

/// Delivers input events to the visuals of a [`Ui`].
///
/// Keyboard events go to the keyboard focus and are dropped without one.
/// Pointer events go to the pointer focus (capture) if set, otherwise to the
/// deepest visual under the pointer. Each event tunnels from the root to the
/// target through `on_input_preview`, then bubbles back through `on_input`;
/// the first handler that marks it handled ends the dispatch.
#[derive(Debug, Default)]
pub struct InputHandler {
    keyboard: Focus,
    pointer: Focus,
    hovered: Option<VisualId>,
    hover_route: Option<Route>,
    last_pointer: Option<Point>,
    pool: RoutePool,
}

impl InputHandler {
    pub fn new(pool: RoutePool) -> Self {
        Self {
            pool,
            ..Self::default()
        }
    }

    pub fn keyboard_focus(&self) -> &Focus {
        &self.keyboard
    }

    pub fn pointer_focus(&self) -> &Focus {
        &self.pointer
    }

    /// The visual currently under the pointer (or capturing it).
    pub fn hovered(&self) -> Option<VisualId> {
        self.hovered
    }

    pub fn pool(&self) -> &RoutePool {
        &self.pool
    }

    pub fn set_keyboard_focus(&mut self, target: impl Into<FocusTarget>) -> bool {
        self.keyboard.set(target)
    }

    pub fn unset_keyboard_focus(&mut self, target: impl Into<FocusTarget>) -> bool {
        self.keyboard.unset(target)
    }

    pub fn set_pointer_focus(&mut self, ui: &mut Ui, target: impl Into<FocusTarget>) -> bool {
        let changed = self.pointer.set(target);
        if changed {
            self.update_hover(ui);
        }
        changed
    }

    pub fn unset_pointer_focus(&mut self, ui: &mut Ui, target: impl Into<FocusTarget>) -> bool {
        let changed = self.pointer.unset(target);
        if changed {
            self.update_hover(ui);
        }
        changed
    }

    /// Deliver `event` (in layout coordinates). Returns whether a handler
    /// marked it handled.
    pub fn handle(&mut self, ui: &mut Ui, event: InputEvent) -> bool {
        ui.flush();
        let target = if event.is_keyboard() {
            let Some(target) = self.keyboard.resolve(ui) else {
                trace!(?event, "no keyboard focus; dropped");
                return false;
            };
            target
        } else {
            let Some(position) = event.position() else {
                return false;
            };
            if matches!(event, InputEvent::PointerMove { .. }) {
                self.last_pointer = Some(position);
                self.update_hover(ui);
            }
            let target = self
                .pointer
                .resolve(ui)
                .or_else(|| ui.visuals().hit_test(ui.root_visual(), position));
            let Some(target) = target else {
                trace!(?event, "no pointer target; dropped");
                return false;
            };
            target
        };

        let handled = self.dispatch(ui, event, target);
        ui.flush();
        handled
    }

    fn dispatch(&mut self, ui: &mut Ui, event: InputEvent, target: VisualId) -> bool {
        let route = self.pool.create(ui.visuals(), target);
        let mut input = RoutedInput::new(event, target);
        let mut requests = Vec::new();
        trace!(len = route.len(), "dispatch");

        for id in route.iter_from_top() {
            call(ui.visuals_mut(), id, &mut requests, |visual, cx| {
                visual.on_input_preview(cx, &mut input)
            });
            if input.is_handled() {
                break;
            }
        }
        if !input.is_handled() {
            input.set_phase(Phase::Bubble);
            for id in route.iter_from_bottom() {
                call(ui.visuals_mut(), id, &mut requests, |visual, cx| {
                    visual.on_input(cx, &mut input)
                });
                if input.is_handled() {
                    break;
                }
            }
        }
        drop(route);

        if self.apply(requests) {
            self.update_hover(ui);
        }
        input.is_handled()
    }

    /// Apply focus requests. Returns whether the pointer focus changed.
    fn apply(&mut self, requests: Vec<FocusRequest>) -> bool {
        let mut pointer_changed = false;
        for request in requests {
            match request {
                FocusRequest::CapturePointer(target) => pointer_changed |= self.pointer.set(target),
                FocusRequest::ReleasePointer(target) => {
                    pointer_changed |= self.pointer.unset(target)
                }
                FocusRequest::FocusKeyboard(target) => {
                    if self.keyboard.set(target) {
                        debug!(?target, "keyboard focus");
                    }
                }
                FocusRequest::BlurKeyboard(target) => {
                    if self.keyboard.unset(target) {
                        debug!(?target, "keyboard focus cleared");
                    }
                }
            }
        }
        pointer_changed
    }

    /// Recompute the hovered visual and raise leave/enter along the parts of
    /// the old and new routes below their common ancestors.
    fn update_hover(&mut self, ui: &mut Ui) {
        let target = self.pointer.resolve(ui).or_else(|| {
            self.last_pointer
                .and_then(|p| ui.visuals().hit_test(ui.root_visual(), p))
        });
        if target == self.hovered {
            return;
        }
        trace!(?target, "hover");

        let new_route = target.map(|t| self.pool.create(ui.visuals(), t));
        let old_route = self.hover_route.take();
        let divergence = match (&old_route, &new_route) {
            (Some(old), Some(new)) => old.find_first_difference_from_top(new),
            _ => 0,
        };

        let mut requests = Vec::new();
        if let Some(old) = &old_route {
            for id in old.iter_from_top().skip(divergence) {
                call(ui.visuals_mut(), id, &mut requests, |visual, cx| {
                    visual.on_pointer_leave(cx)
                });
            }
        }
        if let Some(new) = &new_route {
            for id in new.iter_from_top().skip(divergence) {
                call(ui.visuals_mut(), id, &mut requests, |visual, cx| {
                    visual.on_pointer_enter(cx)
                });
            }
        }
        self.hovered = target;
        self.hover_route = new_route;
        // Captures requested from enter/leave apply from the next event on.
        self.apply(requests);
    }
}

/// Call a hook of `id` with an [`InputCx`]. Visuals that no longer exist are
/// skipped.
fn call(
    tree: &mut VisualTree,
    id: VisualId,
    requests: &mut Vec<FocusRequest>,
    f: impl FnOnce(&mut dyn Visual, &mut InputCx<'_>),
) {
    tree.with_visual(id, |visual, tree| {
        let mut cx = InputCx::new(id, tree, requests);
        f(visual, &mut cx);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Size, Vector};
    use crate::visual::LinearLayout;
    use pretty_assertions::assert_eq;
    use std::any::Any;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Spy {
        name: &'static str,
        log: Log,
    }

    impl Visual for Spy {
        fn type_name(&self) -> &'static str {
            "Spy"
        }

        fn on_input(&mut self, cx: &mut InputCx<'_>, input: &mut RoutedInput) {
            let own = input.source() == cx.id();
            self.log
                .borrow_mut()
                .push(format!("{} input own={own}", self.name));
        }

        fn on_pointer_enter(&mut self, _cx: &mut InputCx<'_>) {
            self.log.borrow_mut().push(format!("{} enter", self.name));
        }

        fn on_pointer_leave(&mut self, _cx: &mut InputCx<'_>) {
            self.log.borrow_mut().push(format!("{} leave", self.name));
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn spy(ui: &mut Ui, parent: VisualId, name: &'static str, log: &Log) -> VisualId {
        let id = ui.visuals_mut().insert(Spy {
            name,
            log: log.clone(),
        });
        ui.visuals_mut().append_child(parent, id).unwrap();
        id
    }

    fn move_to(handler: &mut InputHandler, ui: &mut Ui, position: Point) {
        handler.handle(
            ui,
            InputEvent::PointerMove {
                position,
                delta: Vector::ZERO,
            },
        );
    }

    #[test]
    fn last_child_wins_among_overlapping_siblings() {
        let log = Log::default();
        let mut ui = Ui::default();
        let root = ui.root_visual();
        let outer = spy(&mut ui, root, "outer", &log);
        let a = spy(&mut ui, outer, "a", &log);
        let b = spy(&mut ui, outer, "b", &log);
        ui.update_layout(Size::new(10.0, 4.0), None);
        assert_eq!(ui.visuals().bounds(a), ui.visuals().bounds(b));

        let center = ui.visuals().bounds(b).center();
        assert_eq!(ui.visuals().hit_test(root, center), Some(b));

        let mut handler = InputHandler::default();
        assert!(!handler.handle(&mut ui, InputEvent::pointer_down(center)));
        assert_eq!(*log.borrow(), vec!["b input own=true", "outer input own=false"]);
    }

    #[test]
    fn source_is_the_deepest_visual_under_the_pointer() {
        let log = Log::default();
        let mut ui = Ui::default();
        let root = ui.root_visual();
        let outer = spy(&mut ui, root, "outer", &log);
        let middle = spy(&mut ui, outer, "middle", &log);
        let inner = spy(&mut ui, middle, "inner", &log);
        ui.update_layout(Size::new(6.0, 2.0), None);

        let mut handler = InputHandler::default();
        let center = ui.visuals().bounds(inner).center();
        handler.handle(&mut ui, InputEvent::pointer_up(center));
        assert_eq!(
            *log.borrow(),
            vec![
                "inner input own=true",
                "middle input own=false",
                "outer input own=false",
            ]
        );
    }

    #[test]
    fn moving_between_siblings_only_crosses_below_the_shared_ancestor() {
        let log = Log::default();
        let mut ui = Ui::default();
        let root = ui.root_visual();
        let outer = spy(&mut ui, root, "outer", &log);
        let row = ui.visuals_mut().insert(LinearLayout::horizontal());
        ui.visuals_mut().append_child(outer, row).unwrap();
        let a = spy(&mut ui, row, "a", &log);
        let b = spy(&mut ui, row, "b", &log);
        ui.update_layout(Size::new(10.0, 4.0), None);
        assert_ne!(ui.visuals().bounds(a), ui.visuals().bounds(b));

        let hover = |log: &Log| -> Vec<String> {
            log.borrow()
                .iter()
                .filter(|entry| entry.ends_with("enter") || entry.ends_with("leave"))
                .cloned()
                .collect()
        };

        let (to_a, to_b) = (ui.visuals().bounds(a).center(), ui.visuals().bounds(b).center());
        let mut handler = InputHandler::default();
        move_to(&mut handler, &mut ui, to_a);
        assert_eq!(hover(&log), vec!["outer enter", "a enter"]);
        assert_eq!(handler.hovered(), Some(a));

        log.borrow_mut().clear();
        move_to(&mut handler, &mut ui, to_b);
        assert_eq!(hover(&log), vec!["a leave", "b enter"]);
        assert_eq!(handler.hovered(), Some(b));
    }
}
