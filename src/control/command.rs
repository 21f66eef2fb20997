//! Commands: actions a control invokes on behalf of the user.

use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::reactive::Binding;

/// An action plus a binding that says whether it may run.
///
/// Equality is identity, so assigning the same command twice is a no-op for
/// a property holding it.
#[derive(Clone)]
pub struct Command {
    execute: Rc<dyn Fn()>,
    can_execute: Binding<bool>,
}

impl Command {
    pub fn new(execute: impl Fn() + 'static) -> Self {
        Self {
            execute: Rc::new(execute),
            can_execute: Binding::constant(true),
        }
    }

    pub fn with_can_execute(mut self, can_execute: Binding<bool>) -> Self {
        self.can_execute = can_execute;
        self
    }

    pub fn can_execute(&self) -> bool {
        self.can_execute.get()
    }

    pub fn can_execute_binding(&self) -> &Binding<bool> {
        &self.can_execute
    }

    /// Run the action if it may run. Returns whether it ran.
    pub fn execute(&self) -> bool {
        if !self.can_execute() {
            trace!("command disabled; not executed");
            return false;
        }
        (self.execute)();
        true
    }
}

impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.execute, &other.execute) && self.can_execute.ptr_eq(&other.can_execute)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("can_execute", &self.can_execute())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::Slot;
    use std::cell::Cell;

    #[test]
    fn executes_when_enabled() {
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let command = Command::new(move || counter.set(counter.get() + 1));
        assert!(command.execute());
        assert!(command.execute());
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn disabled_command_does_not_run() {
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let enabled = Slot::new(false);
        let command = Command::new(move || counter.set(counter.get() + 1))
            .with_can_execute(enabled.binding());
        assert!(!command.execute());
        enabled.set(true);
        assert!(command.execute());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn equality_is_identity() {
        let a = Command::new(|| {});
        assert_eq!(a, a.clone());
        assert_ne!(a, Command::new(|| {}));
    }
}
