//! End-to-end behavior: controls on a headless canvas driven by the Pilot.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use pretty_assertions::assert_eq;

use weft::control::{
    Button, ButtonVisual, Command, ContentControl, ContentTemplate, Control, ControlBase, Label,
    StackPanel, Template,
};
use weft::geometry::{Point, Rect};
use weft::input::{FocusTarget, InputCx, Key, Phase, RoutePool, RoutedInput};
use weft::reactive::{ListSlot, Slot};
use weft::style::Resources;
use weft::testing::Pilot;
use weft::visual::{TextBlock, Visual, VisualId};

// ---------------------------------------------------------------------------
// Nested: a control whose template records input hooks
// ---------------------------------------------------------------------------

type Log = Rc<RefCell<Vec<String>>>;

struct Recorder {
    name: &'static str,
    log: Log,
    handle_in: Option<Phase>,
}

impl Recorder {
    fn record(&self, input: &mut RoutedInput) {
        self.log
            .borrow_mut()
            .push(format!("{} {:?}", self.name, input.phase()));
        if self.handle_in == Some(input.phase()) {
            input.handle();
        }
    }
}

impl Visual for Recorder {
    fn type_name(&self) -> &'static str {
        "Recorder"
    }

    fn on_input_preview(&mut self, _cx: &mut InputCx<'_>, input: &mut RoutedInput) {
        self.record(input);
    }

    fn on_input(&mut self, _cx: &mut InputCx<'_>, input: &mut RoutedInput) {
        self.record(input);
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

/// Builds an `outer` recorder with an `inner` recorder child.
struct Nested {
    base: ControlBase,
    log: Log,
    inner_handles_in: Option<Phase>,
}

impl Nested {
    fn new(inner_handles_in: Option<Phase>) -> Self {
        Self {
            base: ControlBase::new(Template::new(|nested: &Nested, cx| {
                let outer = cx.insert(Recorder {
                    name: "outer",
                    log: nested.log.clone(),
                    handle_in: None,
                });
                cx.insert_child(
                    outer,
                    Recorder {
                        name: "inner",
                        log: nested.log.clone(),
                        handle_in: nested.inner_handles_in,
                    },
                );
                outer
            })),
            log: Log::default(),
            inner_handles_in,
        }
    }
}

impl Control for Nested {
    fn type_name(&self) -> &'static str {
        "Nested"
    }

    fn base(&self) -> &ControlBase {
        &self.base
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn nested_log(pilot: &Pilot, id: weft::control::ControlId) -> Vec<String> {
    pilot.ui().control::<Nested>(id).unwrap().log.borrow().clone()
}

fn counting_command() -> (Command, Rc<Cell<u32>>) {
    let count = Rc::new(Cell::new(0));
    let counter = count.clone();
    (Command::new(move || counter.set(counter.get() + 1)), count)
}

// ---------------------------------------------------------------------------
// Button
// ---------------------------------------------------------------------------

#[test]
fn clicking_a_button_runs_its_command() {
    let (command, count) = counting_command();
    let mut pilot = Pilot::new(20.0, 5.0);
    let button = pilot
        .mount(Button::new("Ok".to_string()).with_command(command))
        .unwrap();

    assert!(pilot.click_control(button));
    assert_eq!(count.get(), 1);

    // The press gave the button keyboard focus.
    assert_eq!(
        pilot.canvas().input().keyboard_focus().target(),
        Some(FocusTarget::Control(button))
    );
    assert!(pilot.press_key(Key::Enter));
    assert_eq!(count.get(), 2);
}

#[test]
fn releasing_outside_the_button_does_not_run_its_command() {
    let (command, count) = counting_command();
    let mut pilot = Pilot::new(20.0, 5.0);
    let panel = pilot.mount(StackPanel::vertical()).unwrap();
    let button = pilot
        .ui_mut()
        .add(Button::new("Ok".to_string()).with_command(command));
    pilot.ui_mut().add_child(panel, button).unwrap();

    let visual = pilot.ui().visualization(button).unwrap();
    pilot.canvas_mut().layout();
    assert_eq!(pilot.ui().visuals().bounds(visual), Rect::new(0.0, 0.0, 20.0, 1.0));

    assert!(pilot.press(Point::new(5.0, 0.5)));
    assert!(pilot.ui().visuals().get::<ButtonVisual>(visual).unwrap().is_pressed());
    assert_eq!(
        pilot.canvas().input().pointer_focus().target(),
        Some(FocusTarget::Visual(visual))
    );

    // Captured: the release reaches the button although it is outside.
    assert!(pilot.release(Point::new(5.0, 3.0)));
    assert_eq!(count.get(), 0);
    assert!(!pilot.ui().visuals().get::<ButtonVisual>(visual).unwrap().is_pressed());
    assert!(!pilot.canvas().input().pointer_focus().is_set());
}

#[test]
fn disabled_command_is_not_run() {
    let (command, count) = counting_command();
    let enabled = Slot::new(false);
    let command = command.with_can_execute(enabled.binding());
    let mut pilot = Pilot::new(20.0, 5.0);
    let button = pilot
        .mount(Button::new("Ok".to_string()).with_command(command))
        .unwrap();

    pilot.click_control(button);
    assert_eq!(count.get(), 0);
    enabled.set(true);
    pilot.click_control(button);
    assert_eq!(count.get(), 1);
}

// ---------------------------------------------------------------------------
// Content templating
// ---------------------------------------------------------------------------

#[test]
fn content_is_presented_through_the_context_template() {
    let resources = Resources::new().with_content_template(ContentTemplate::new(
        |text: &String, cx| cx.insert(TextBlock::new(text.clone())),
    ));
    let mut pilot = Pilot::with_resources(20.0, 5.0, resources);
    let id = pilot
        .mount(ContentControl::new(Some("hello".to_string())))
        .unwrap();
    pilot.render();
    assert_eq!(pilot.renderer().texts(), vec!["hello".to_string()]);

    pilot
        .ui_mut()
        .update(id, |c: &ContentControl<String>| {
            c.content_template.set_value(Some(ContentTemplate::new(|text: &String, cx| {
                cx.insert(TextBlock::new(format!("local {text}")))
            })))
        })
        .unwrap();
    pilot.render();
    assert_eq!(pilot.renderer().texts(), vec!["local hello".to_string()]);

    pilot
        .ui_mut()
        .update(id, |c: &ContentControl<String>| c.content.set_value(None))
        .unwrap();
    let presenter = pilot.ui().visualization(id).unwrap();
    assert!(pilot.ui().visuals().children(presenter).is_empty());
    pilot.render();
    assert!(pilot.renderer().texts().is_empty());
}

#[test]
fn content_without_any_template_shows_nothing() {
    let mut pilot = Pilot::new(20.0, 5.0);
    let id = pilot.mount(ContentControl::new(Some(42_u32))).unwrap();
    let presenter = pilot.ui().visualization(id).unwrap();
    assert!(pilot.ui().visuals().children(presenter).is_empty());
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[test]
fn input_tunnels_then_bubbles() {
    let mut pilot = Pilot::new(20.0, 5.0);
    let nested = pilot.mount(Nested::new(None)).unwrap();
    assert!(!pilot.press(Point::new(1.0, 1.0)));
    assert_eq!(
        nested_log(&pilot, nested),
        vec!["outer Tunnel", "inner Tunnel", "inner Bubble", "outer Bubble"]
    );
}

#[test]
fn handling_stops_the_route() {
    let mut pilot = Pilot::new(20.0, 5.0);
    let nested = pilot.mount(Nested::new(Some(Phase::Tunnel))).unwrap();
    assert!(pilot.press(Point::new(1.0, 1.0)));
    assert_eq!(nested_log(&pilot, nested), vec!["outer Tunnel", "inner Tunnel"]);

    let mut pilot = Pilot::new(20.0, 5.0);
    let nested = pilot.mount(Nested::new(Some(Phase::Bubble))).unwrap();
    assert!(pilot.press(Point::new(1.0, 1.0)));
    assert_eq!(
        nested_log(&pilot, nested),
        vec!["outer Tunnel", "inner Tunnel", "inner Bubble"]
    );
}

#[test]
fn pointer_outside_the_canvas_is_dropped() {
    let mut pilot = Pilot::new(20.0, 5.0);
    let nested = pilot.mount(Nested::new(None)).unwrap();
    assert!(!pilot.press(Point::new(50.0, 50.0)));
    assert!(nested_log(&pilot, nested).is_empty());
}

#[test]
fn hover_enters_and_leaves() {
    let mut pilot = Pilot::new(20.0, 5.0);
    let nested = pilot.mount(Nested::new(None)).unwrap();
    pilot.move_to(Point::new(1.0, 1.0));
    pilot.move_to(Point::new(2.0, 1.0));
    pilot.move_to(Point::new(50.0, 50.0));

    let hover: Vec<String> = nested_log(&pilot, nested)
        .into_iter()
        .filter(|entry| entry.ends_with("enter") || entry.ends_with("leave"))
        .collect();
    assert_eq!(hover, vec!["outer enter", "inner enter", "outer leave", "inner leave"]);
    assert_eq!(pilot.canvas().input().hovered(), None);
}

#[test]
fn routes_run_from_target_to_root() {
    let mut pilot = Pilot::new(20.0, 5.0);
    let nested = pilot.mount(Nested::new(None)).unwrap();
    let outer = pilot.ui().visualization(nested).unwrap();
    let inner = pilot.ui().visuals().children(outer)[0];
    let root = pilot.ui().root_visual();

    let pool = RoutePool::new(1);
    let route = pool.create(pilot.ui().visuals(), inner);
    assert_eq!(route.iter_from_top().collect::<Vec<VisualId>>(), vec![root, outer, inner]);
    assert_eq!(route.get_from_top(0), Some(root));
    assert_eq!(route.get_from_bottom(0), Some(inner));
    drop(route);

    let again = pool.create(pilot.ui().visuals(), outer);
    assert_eq!(again.len(), 2);
    assert_eq!(pool.allocations(), 1);
}

#[test]
fn keyboard_focus_holds_a_visual_or_a_control() {
    let mut pilot = Pilot::new(20.0, 5.0);
    let label = pilot.mount(Label::new("x")).unwrap();
    let visual = pilot.ui().visualization(label).unwrap();

    let canvas = pilot.canvas_mut();
    canvas.set_keyboard_focus(label);
    canvas.set_keyboard_focus(visual);
    assert_eq!(
        canvas.input().keyboard_focus().target(),
        Some(FocusTarget::Visual(visual))
    );
    assert!(!canvas.unset_keyboard_focus(label));
    assert!(canvas.unset_keyboard_focus(visual));
    assert!(!canvas.input().keyboard_focus().is_set());
}

// ---------------------------------------------------------------------------
// Layout, bindings and collections
// ---------------------------------------------------------------------------

#[test]
fn stack_panel_lays_children_out_in_a_row() {
    let mut pilot = Pilot::new(20.0, 5.0);
    let panel = pilot.mount(StackPanel::horizontal()).unwrap();
    for text in ["ab", "cde"] {
        let label = pilot.ui_mut().add(Label::new(text));
        pilot.ui_mut().add_child(panel, label).unwrap();
    }
    insta::assert_snapshot!(pilot.dump(), @r"
    Frame (0,0 20x5)
      LinearLayout (0,0 20x5) anchored
        TextBlock (0,0 2x5) anchored
        TextBlock (2,0 3x5) anchored
    ");
}

#[test]
fn bound_label_text_follows_its_source_until_disposed() {
    let source = Slot::new("a".to_string());
    let label = Label::new("");
    label.text.set_binding(source.binding());

    let mut pilot = Pilot::new(20.0, 5.0);
    pilot.mount(label).unwrap();
    assert_eq!(pilot.renderer().texts(), vec!["a".to_string()]);

    source.set("b".to_string());
    pilot.render();
    assert_eq!(pilot.renderer().texts(), vec!["b".to_string()]);
    assert!(source.listener_count() > 0);

    pilot.canvas_mut().dispose();
    assert_eq!(source.listener_count(), 0);
}

#[test]
fn bound_children_track_list_changes() {
    let mut pilot = Pilot::new(20.0, 5.0);
    let panel = pilot.mount(StackPanel::vertical()).unwrap();
    let list = ListSlot::new();
    pilot.ui_mut().bind_children(panel, list.clone()).unwrap();

    for text in ["one", "two", "three"] {
        let label = pilot.ui_mut().add(Label::new(text));
        list.push(label).unwrap();
    }
    assert_eq!(pilot.render().len(), 3);
    assert_eq!(pilot.renderer().texts(), vec!["one", "two", "three"]);

    list.move_item(0, 2).unwrap();
    pilot.render();
    assert_eq!(pilot.renderer().texts(), vec!["two", "three", "one"]);

    list.remove(1).unwrap();
    pilot.render();
    assert_eq!(pilot.renderer().texts(), vec!["two", "one"]);
}
