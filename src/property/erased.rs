//! Type-erased property access, visual properties and property lists.

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use super::cell::{Property, PropertyKey};
use crate::reactive::{Binding, Subscription};

/// Operations every property supports regardless of its value type.
pub trait AnyProperty {
    fn key(&self) -> PropertyKey;
    fn name(&self) -> &'static str;
    fn activate(&self);
    fn deactivate(&self);
    fn is_active(&self) -> bool;
    /// Remove the style binding, falling back to local or default.
    fn clear_style(&self);
    /// Listen for effective value changes.
    fn watch(&self, listener: Rc<dyn Fn()>) -> Subscription;
}

impl<T: Clone + PartialEq + 'static> AnyProperty for Property<T> {
    fn key(&self) -> PropertyKey {
        Property::key(self)
    }

    fn name(&self) -> &'static str {
        Property::name(self)
    }

    fn activate(&self) {
        Property::activate(self)
    }

    fn deactivate(&self) {
        Property::deactivate(self)
    }

    fn is_active(&self) -> bool {
        Property::is_active(self)
    }

    fn clear_style(&self) {
        if self.style_binding().is_some() {
            self.set_style(None);
        }
    }

    fn watch(&self, listener: Rc<dyn Fn()>) -> Subscription {
        Property::subscribe(self, move || listener())
    }
}

// ---------------------------------------------------------------------------
// Invalidation
// ---------------------------------------------------------------------------

/// Which layout pass a visual property change forces on its owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Invalidation {
    #[default]
    None,
    Measure,
    Arrange,
    Render,
}

/// A [`Property`] owned by a visual, tagged with the invalidation its changes
/// cause while the visual is attached.
pub struct VisualProperty<T: 'static> {
    property: Property<T>,
    invalidation: Invalidation,
}

impl<T: 'static> Clone for VisualProperty<T> {
    fn clone(&self) -> Self {
        Self {
            property: self.property.clone(),
            invalidation: self.invalidation,
        }
    }
}

impl<T: Clone + PartialEq + 'static> VisualProperty<T> {
    pub fn new(name: &'static str, default: T, invalidation: Invalidation) -> Self {
        Self {
            property: Property::new(name, default),
            invalidation,
        }
    }

    pub fn with_default_binding(
        name: &'static str,
        default: Binding<T>,
        invalidation: Invalidation,
    ) -> Self {
        Self {
            property: Property::with_default_binding(name, default),
            invalidation,
        }
    }

    pub fn invalidation(&self) -> Invalidation {
        self.invalidation
    }

    pub fn property(&self) -> &Property<T> {
        &self.property
    }
}

impl<T: 'static> Deref for VisualProperty<T> {
    type Target = Property<T>;

    fn deref(&self) -> &Property<T> {
        &self.property
    }
}

impl<T: Clone + PartialEq + fmt::Debug + 'static> fmt::Debug for VisualProperty<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisualProperty")
            .field("name", &self.name())
            .field("value", &self.get())
            .field("invalidation", &self.invalidation)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// PropertyList
// ---------------------------------------------------------------------------

/// The properties of one control or visual, in declaration order.
#[derive(Default, Clone)]
pub struct PropertyList {
    entries: Vec<(Rc<dyn AnyProperty>, Invalidation)>,
}

impl PropertyList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a control property.
    pub fn with<T: Clone + PartialEq + 'static>(mut self, property: &Property<T>) -> Self {
        self.entries
            .push((Rc::new(property.clone()), Invalidation::None));
        self
    }

    /// Add a visual property with its invalidation policy.
    pub fn with_visual<T: Clone + PartialEq + 'static>(
        mut self,
        property: &VisualProperty<T>,
    ) -> Self {
        self.entries
            .push((Rc::new(property.property.clone()), property.invalidation));
        self
    }

    /// Append every entry of `other`.
    pub fn extend(mut self, other: PropertyList) -> Self {
        self.entries.extend(other.entries);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&dyn AnyProperty, Invalidation)> + '_ {
        self.entries.iter().map(|(p, i)| (p.as_ref(), *i))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn activate_all(&self) {
        for (property, _) in &self.entries {
            property.activate();
        }
    }

    pub fn deactivate_all(&self) {
        for (property, _) in &self.entries {
            property.deactivate();
        }
    }

    pub fn contains(&self, key: PropertyKey) -> bool {
        self.entries.iter().any(|(p, _)| p.key() == key)
    }
}

impl fmt::Debug for PropertyList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(p, i)| (p.name(), i)))
            .finish()
    }
}
