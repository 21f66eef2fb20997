//! Style rules and their pure resolution.
//!
//! A [`Style<C>`] is an ordered set of property assignments for controls of
//! type `C`. Applying styling to a control folds every applicable rule, from
//! the outermost context inward and the control's own `style` last, into a
//! [`StyleResolution`]. The resolution then assigns a style binding to every
//! property it covers and clears the style binding of every other property.
//! There is no apply/undo bookkeeping: the result depends only on the rules.

use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::property::{Property, PropertyKey, PropertyList};
use crate::reactive::Binding;

type Setter<C> = Rc<dyn Fn(&C, &mut StyleResolution)>;

/// Property assignments for controls of type `C`.
pub struct Style<C: 'static> {
    setters: Vec<Setter<C>>,
}

impl<C: 'static> Clone for Style<C> {
    fn clone(&self) -> Self {
        Self {
            setters: self.setters.clone(),
        }
    }
}

impl<C: 'static> Default for Style<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: 'static> Style<C> {
    pub fn new() -> Self {
        Self {
            setters: Vec::new(),
        }
    }

    /// Bind the property selected by `property` to `binding`.
    pub fn set<T, F>(mut self, property: F, binding: Binding<T>) -> Self
    where
        T: Clone + PartialEq + 'static,
        F: Fn(&C) -> &Property<T> + 'static,
    {
        self.setters.push(Rc::new(move |control, resolution| {
            let target = property(control).clone();
            let binding = binding.clone();
            resolution.assign(target.key(), move || target.set_style(Some(binding)));
        }));
        self
    }

    /// Assign a constant value to the property selected by `property`.
    pub fn set_value<T, F>(self, property: F, value: T) -> Self
    where
        T: Clone + PartialEq + 'static,
        F: Fn(&C) -> &Property<T> + 'static,
    {
        self.set(property, Binding::constant(value))
    }

    /// Append the assignments of `other`; later assignments win.
    pub fn extend(mut self, other: &Style<C>) -> Self {
        self.setters.extend(other.setters.iter().cloned());
        self
    }

    pub fn len(&self) -> usize {
        self.setters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.setters.is_empty()
    }

    /// Forget the control type so the rule can live in a registry or a
    /// `style` property.
    pub fn erase(self) -> ErasedStyle {
        let setters = self.setters;
        ErasedStyle {
            control_type: TypeId::of::<C>(),
            control_name: std::any::type_name::<C>(),
            apply: Rc::new(move |control: &dyn Any, resolution: &mut StyleResolution| {
                if let Some(control) = control.downcast_ref::<C>() {
                    for setter in &setters {
                        setter(control, resolution);
                    }
                } else {
                    tracing::warn!(
                        expected = std::any::type_name::<C>(),
                        "style applied to a control of another type; ignored"
                    );
                }
            }),
        }
    }
}

impl<C: 'static> From<Style<C>> for ErasedStyle {
    fn from(style: Style<C>) -> Self {
        style.erase()
    }
}

// ---------------------------------------------------------------------------
// ErasedStyle
// ---------------------------------------------------------------------------

/// A type-erased [`Style`]. Equality is identity.
#[derive(Clone)]
pub struct ErasedStyle {
    control_type: TypeId,
    control_name: &'static str,
    apply: Rc<dyn Fn(&dyn Any, &mut StyleResolution)>,
}

impl ErasedStyle {
    pub fn control_type(&self) -> TypeId {
        self.control_type
    }

    /// Fold this rule's assignments for `control` into `resolution`.
    pub fn resolve_into(&self, control: &dyn Any, resolution: &mut StyleResolution) {
        (self.apply)(control, resolution);
    }
}

impl PartialEq for ErasedStyle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.apply, &other.apply)
    }
}

impl fmt::Debug for ErasedStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedStyle")
            .field("control", &self.control_name)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// StyleResolution
// ---------------------------------------------------------------------------

/// The folded result of a sequence of style rules: at most one pending
/// assignment per property, the last rule winning.
#[derive(Default)]
pub struct StyleResolution {
    assignments: BTreeMap<PropertyKey, Box<dyn FnOnce()>>,
}

impl StyleResolution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `rules` (outermost first) for `control`.
    pub fn resolve<'a>(
        control: &dyn Any,
        rules: impl IntoIterator<Item = &'a ErasedStyle>,
    ) -> Self {
        let mut resolution = Self::new();
        for rule in rules {
            rule.resolve_into(control, &mut resolution);
        }
        resolution
    }

    /// Record an assignment, replacing any earlier one for the same property.
    pub fn assign(&mut self, key: PropertyKey, apply: impl FnOnce() + 'static) {
        self.assignments.insert(key, Box::new(apply));
    }

    pub fn covers(&self, key: PropertyKey) -> bool {
        self.assignments.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Assign resolved style bindings and clear every uncovered property.
    pub fn apply(mut self, properties: &PropertyList) {
        for (property, _) in properties.iter() {
            match self.assignments.remove(&property.key()) {
                Some(assign) => assign(),
                None => property.clear_style(),
            }
        }
        if !self.assignments.is_empty() {
            tracing::trace!(
                dropped = self.assignments.len(),
                "style assignments for undeclared properties ignored"
            );
        }
    }
}

impl fmt::Debug for StyleResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.assignments.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Swatch {
        color: Property<&'static str>,
        width: Property<u32>,
    }

    impl Swatch {
        fn new() -> Self {
            Self {
                color: Property::new("color", "black"),
                width: Property::new("width", 1),
            }
        }

        fn properties(&self) -> PropertyList {
            PropertyList::new().with(&self.color).with(&self.width)
        }
    }

    #[test]
    fn later_rules_win() {
        let swatch = Swatch::new();
        let outer = Style::<Swatch>::new()
            .set_value(|s| &s.color, "red")
            .set_value(|s| &s.width, 4)
            .erase();
        let inner = Style::<Swatch>::new().set_value(|s| &s.color, "blue").erase();

        StyleResolution::resolve(&swatch, [&outer, &inner]).apply(&swatch.properties());
        assert_eq!(swatch.color.get(), "blue");
        assert_eq!(swatch.width.get(), 4);
    }

    #[test]
    fn uncovered_properties_are_cleared() {
        let swatch = Swatch::new();
        let both = Style::<Swatch>::new()
            .set_value(|s| &s.color, "red")
            .set_value(|s| &s.width, 4)
            .erase();
        StyleResolution::resolve(&swatch, [&both]).apply(&swatch.properties());

        let color_only = Style::<Swatch>::new().set_value(|s| &s.color, "green").erase();
        StyleResolution::resolve(&swatch, [&color_only]).apply(&swatch.properties());
        assert_eq!(swatch.color.get(), "green");
        assert_eq!(swatch.width.get(), 1);
    }

    #[test]
    fn local_value_beats_style() {
        let swatch = Swatch::new();
        swatch.color.set_value("white");
        let rule = Style::<Swatch>::new().set_value(|s| &s.color, "red").erase();
        StyleResolution::resolve(&swatch, [&rule]).apply(&swatch.properties());
        assert_eq!(swatch.color.get(), "white");
        swatch.color.clear();
        assert_eq!(swatch.color.get(), "red");
    }

    #[test]
    fn rule_for_another_type_is_ignored() {
        let swatch = Swatch::new();
        let rule = Style::<String>::new().erase();
        let resolution = StyleResolution::resolve(&swatch, [&rule]);
        assert!(resolution.is_empty());
    }

    #[test]
    fn erased_equality_is_identity() {
        let a = Style::<Swatch>::new().erase();
        let b = a.clone();
        let c = Style::<Swatch>::new().erase();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
