//! Templates: functions from a control (or a content value) to a freshly
//! built visual subtree.

use std::any::{Any, TypeId};
use std::fmt;
use std::rc::Rc;

use tracing::{trace, warn};

use super::base::{Control, ControlId};
use crate::style::Context;
use crate::visual::{Frame, LayoutProps, Visual, VisualId, VisualTree};

// ---------------------------------------------------------------------------
// TemplateCx
// ---------------------------------------------------------------------------

/// What a template sees while it builds a visualization.
pub struct TemplateCx<'a> {
    visuals: &'a mut VisualTree,
    context: &'a Context,
    control: ControlId,
    host: Option<VisualId>,
}

impl<'a> TemplateCx<'a> {
    pub(crate) fn new(visuals: &'a mut VisualTree, context: &'a Context, control: ControlId) -> Self {
        Self {
            visuals,
            context,
            control,
            host: None,
        }
    }

    /// The control being visualized.
    pub fn control(&self) -> ControlId {
        self.control
    }

    /// The effective context of the control being visualized.
    pub fn context(&self) -> &Context {
        self.context
    }

    /// Add a parentless visual.
    pub fn insert(&mut self, visual: impl Visual) -> VisualId {
        self.visuals.insert(visual)
    }

    /// Add `visual` as the last child of `parent`.
    pub fn insert_child(&mut self, parent: VisualId, visual: impl Visual) -> VisualId {
        let id = self.visuals.insert(visual);
        self.append(parent, id);
        id
    }

    /// Append an already built visual under `parent`.
    pub fn append(&mut self, parent: VisualId, child: VisualId) {
        if let Err(error) = self.visuals.append_child(parent, child) {
            warn!(%error, "template could not parent a visual");
        }
    }

    /// Box-model properties of a visual built by this template.
    pub fn layout(&self, id: VisualId) -> LayoutProps {
        self.visuals.layout(id).cloned().unwrap_or_default()
    }

    /// Typed access to a visual built by this template.
    pub fn get<V: Visual>(&self, id: VisualId) -> Option<&V> {
        self.visuals.get(id)
    }

    /// Mark `id` as the visual whose children mirror the control's children.
    pub fn set_host(&mut self, id: VisualId) {
        self.host = Some(id);
    }

    pub(crate) fn host(&self) -> Option<VisualId> {
        self.host
    }

    /// Build the presentation of `content`: the `local` template if given,
    /// otherwise the innermost template the context registers for `T`.
    /// Returns `None` when neither exists.
    pub fn present<T: Clone + 'static>(
        &mut self,
        content: &T,
        local: Option<&ContentTemplate<T>>,
    ) -> Option<VisualId> {
        if let Some(template) = local {
            return Some(template.apply(content, self));
        }
        let Some(template) = self.context.content_template(TypeId::of::<T>()) else {
            trace!(
                content = std::any::type_name::<T>(),
                "no content template; content not presented"
            );
            return None;
        };
        template.apply(content, self)
    }
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

type BuildFn = dyn Fn(&dyn Control, &mut TemplateCx<'_>) -> VisualId;

fn build_fn(f: impl Fn(&dyn Control, &mut TemplateCx<'_>) -> VisualId + 'static) -> Rc<BuildFn> {
    Rc::new(f)
}

/// Builds the visualization of a control. Equality is identity.
#[derive(Clone)]
pub struct Template {
    build: Rc<BuildFn>,
}

impl Template {
    /// A template for controls of type `C`. Applied to a control of another
    /// type, it logs a warning and builds an empty [`Frame`].
    pub fn new<C: Control>(build: impl Fn(&C, &mut TemplateCx<'_>) -> VisualId + 'static) -> Self {
        Self {
            build: build_fn(move |control, cx| {
                match control.as_any().downcast_ref::<C>() {
                    Some(control) => build(control, cx),
                    None => {
                        warn!(
                            expected = std::any::type_name::<C>(),
                            actual = control.type_name(),
                            "template applied to a control of another type"
                        );
                        cx.insert(Frame::new())
                    }
                }
            }),
        }
    }

    /// A template producing an empty [`Frame`] for any control.
    pub fn empty() -> Self {
        Self {
            build: build_fn(|_, cx| cx.insert(Frame::new())),
        }
    }

    pub fn apply(&self, control: &dyn Control, cx: &mut TemplateCx<'_>) -> VisualId {
        (self.build)(control, cx)
    }
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.build, &other.build)
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Template({:p})", Rc::as_ptr(&self.build))
    }
}

// ---------------------------------------------------------------------------
// ContentTemplate
// ---------------------------------------------------------------------------

/// Builds the presentation of a content value of type `T`. Equality is
/// identity.
pub struct ContentTemplate<T: 'static> {
    build: Rc<dyn Fn(&T, &mut TemplateCx<'_>) -> VisualId>,
}

impl<T: 'static> Clone for ContentTemplate<T> {
    fn clone(&self) -> Self {
        Self {
            build: self.build.clone(),
        }
    }
}

impl<T: 'static> ContentTemplate<T> {
    pub fn new(build: impl Fn(&T, &mut TemplateCx<'_>) -> VisualId + 'static) -> Self {
        Self {
            build: Rc::new(build),
        }
    }

    pub fn apply(&self, content: &T, cx: &mut TemplateCx<'_>) -> VisualId {
        (self.build)(content, cx)
    }

    /// Forget the content type so the template can live in a registry.
    pub fn erase(self) -> ErasedContentTemplate {
        let build = self.build;
        ErasedContentTemplate {
            content_type: TypeId::of::<T>(),
            build: erased_fn(move |content, cx| {
                content.downcast_ref::<T>().map(|content| build(content, cx))
            }),
        }
    }
}

impl<T: 'static> PartialEq for ContentTemplate<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.build, &other.build)
    }
}

impl<T: 'static> fmt::Debug for ContentTemplate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentTemplate<{}>", std::any::type_name::<T>())
    }
}

type ErasedBuildFn = dyn Fn(&dyn Any, &mut TemplateCx<'_>) -> Option<VisualId>;

fn erased_fn(
    f: impl Fn(&dyn Any, &mut TemplateCx<'_>) -> Option<VisualId> + 'static,
) -> Rc<ErasedBuildFn> {
    Rc::new(f)
}

/// A [`ContentTemplate`] with its content type erased.
#[derive(Clone)]
pub struct ErasedContentTemplate {
    content_type: TypeId,
    build: Rc<ErasedBuildFn>,
}

impl ErasedContentTemplate {
    pub fn content_type(&self) -> TypeId {
        self.content_type
    }

    /// Present `content`; `None` if it is not of the registered type.
    pub fn apply(&self, content: &dyn Any, cx: &mut TemplateCx<'_>) -> Option<VisualId> {
        (self.build)(content, cx)
    }
}

impl fmt::Debug for ErasedContentTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ErasedContentTemplate")
    }
}
