//! Resource registries and the context chain that scopes them.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::rule::{ErasedStyle, Style};
use crate::control::{ContentTemplate, ErasedContentTemplate};

/// Per-control-type style rules and per-content-type templates.
#[derive(Clone, Default)]
pub struct Resources {
    styles: HashMap<TypeId, Vec<ErasedStyle>>,
    content_templates: HashMap<TypeId, ErasedContentTemplate>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a style for controls of type `C`. Rules registered later on
    /// the same registry win over earlier ones.
    pub fn add_style<C: Any>(&mut self, style: Style<C>) {
        self.styles
            .entry(TypeId::of::<C>())
            .or_default()
            .push(style.erase());
    }

    /// Builder form of [`add_style`](Self::add_style).
    pub fn with_style<C: Any>(mut self, style: Style<C>) -> Self {
        self.add_style(style);
        self
    }

    /// Register how content values of type `T` are presented.
    pub fn add_content_template<T: Clone + 'static>(&mut self, template: ContentTemplate<T>) {
        self.content_templates
            .insert(TypeId::of::<T>(), template.erase());
    }

    /// Builder form of [`add_content_template`](Self::add_content_template).
    pub fn with_content_template<T: Clone + 'static>(mut self, template: ContentTemplate<T>) -> Self {
        self.add_content_template(template);
        self
    }

    pub fn styles_for(&self, control_type: TypeId) -> &[ErasedStyle] {
        self.styles
            .get(&control_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn content_template_for(&self, content_type: TypeId) -> Option<&ErasedContentTemplate> {
        self.content_templates.get(&content_type)
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty() && self.content_templates.is_empty()
    }
}

impl fmt::Debug for Resources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resources")
            .field("styled_types", &self.styles.len())
            .field("content_templates", &self.content_templates.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

struct ContextNode {
    local: Resources,
    parent: Option<Context>,
}

/// An immutable lookup scope: local resources plus the enclosing context.
#[derive(Clone)]
pub struct Context {
    node: Rc<ContextNode>,
}

impl Context {
    /// The outermost context.
    pub fn root(resources: Resources) -> Self {
        Self {
            node: Rc::new(ContextNode {
                local: resources,
                parent: None,
            }),
        }
    }

    /// A nested scope whose lookups fall back to `self`.
    pub fn child(&self, resources: Resources) -> Self {
        Self {
            node: Rc::new(ContextNode {
                local: resources,
                parent: Some(self.clone()),
            }),
        }
    }

    pub fn parent(&self) -> Option<&Context> {
        self.node.parent.as_ref()
    }

    pub fn resources(&self) -> &Resources {
        &self.node.local
    }

    /// Style rules for `control_type`, outermost scope first.
    pub fn styling_for(&self, control_type: TypeId) -> Vec<ErasedStyle> {
        let mut scopes = Vec::new();
        let mut cursor = Some(self);
        while let Some(context) = cursor {
            scopes.push(context);
            cursor = context.parent();
        }
        scopes
            .into_iter()
            .rev()
            .flat_map(|context| context.node.local.styles_for(control_type).iter().cloned())
            .collect()
    }

    /// The innermost template registered for `content_type`.
    pub fn content_template(&self, content_type: TypeId) -> Option<ErasedContentTemplate> {
        let mut cursor = Some(self);
        while let Some(context) = cursor {
            if let Some(template) = context.node.local.content_template_for(content_type) {
                return Some(template.clone());
            }
            cursor = context.parent();
        }
        None
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }

    /// Number of scopes from here to the root, inclusive.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut cursor = self.parent();
        while let Some(context) = cursor {
            depth += 1;
            cursor = context.parent();
        }
        depth
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::root(Resources::default())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("depth", &self.depth())
            .field("local", &self.node.local)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::Property;
    use crate::style::StyleResolution;

    struct Chip {
        tone: Property<u8>,
    }

    #[test]
    fn styling_is_outermost_first() {
        let outer = Style::<Chip>::new().set_value(|c| &c.tone, 1);
        let inner = Style::<Chip>::new().set_value(|c| &c.tone, 2);
        let root = Context::root(Resources::new().with_style(outer));
        let nested = root.child(Resources::new()).child(Resources::new().with_style(inner));

        let rules = nested.styling_for(TypeId::of::<Chip>());
        assert_eq!(rules.len(), 2);

        let chip = Chip {
            tone: Property::new("tone", 0),
        };
        let list = crate::property::PropertyList::new().with(&chip.tone);
        StyleResolution::resolve(&chip, &rules).apply(&list);
        assert_eq!(chip.tone.get(), 2);
    }

    #[test]
    fn unrelated_types_have_no_styling() {
        let root = Context::root(Resources::new().with_style(Style::<Chip>::new()));
        assert!(root.styling_for(TypeId::of::<String>()).is_empty());
    }

    #[test]
    fn depth_counts_scopes() {
        let root = Context::default();
        assert_eq!(root.depth(), 1);
        assert_eq!(root.child(Resources::new()).depth(), 2);
    }
}
