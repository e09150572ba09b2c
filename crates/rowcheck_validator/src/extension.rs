//! Extension hooks.
//!
//! Hooks run alongside the built-in rules in four families:
//!
//! - `each`: sees every data row, for side effects such as counting
//! - `check`: per-row check reporting `RECORD_CHECK_FAILED` by default
//! - `assert`: per-row assertion reporting `ASSERT_CHECK_FAILED` by default
//! - `finally_assert`: runs once after the last row and reports
//!   `FINALLY_ASSERT_CHECK_FAILED` by default
//!
//! Hooks are registered one at a time as closures, or in bulk by a type
//! implementing [`Extension`].

use crate::{AssertionFailure, Record, RecordError, Validator};
use std::cell::RefCell;
use std::rc::Rc;

pub type EachFn = dyn FnMut(&Record<'_>) -> anyhow::Result<()>;
pub type CheckFn = dyn FnMut(&Record<'_>) -> Result<(), RecordError>;
pub type AssertFn = dyn FnMut(&Record<'_>) -> Result<(), AssertionFailure>;
pub type FinallyAssertFn = dyn FnMut() -> Result<(), AssertionFailure>;

/// A named hook.
pub(crate) struct Hook<F: ?Sized> {
    pub name: String,
    pub func: Box<F>,
}

impl<F: ?Sized> Hook<F> {
    fn new(name: impl Into<String>, func: Box<F>) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

/// Registered hooks, per family, in registration order.
#[derive(Default)]
pub(crate) struct HookSet {
    pub each: Vec<Hook<EachFn>>,
    pub check: Vec<Hook<CheckFn>>,
    pub assert: Vec<Hook<AssertFn>>,
    pub finally_assert: Vec<Hook<FinallyAssertFn>>,
}

impl HookSet {
    pub fn len(&self) -> usize {
        self.each.len() + self.check.len() + self.assert.len() + self.finally_assert.len()
    }
}

/// A bundle of hooks contributed by one type.
///
/// Every method defaults to a no-op. The validator owns the extension for
/// as long as it lives and calls it through a shared handle, so state the
/// extension accumulates during a run can be read afterwards.
///
/// # Example
///
/// ```rust
/// use rowcheck_validator::{AssertionFailure, Extension, Record, Validator};
/// use rowcheck_core::RunOptions;
///
/// #[derive(Default)]
/// struct AtLeastTwoRows {
///     rows: usize,
/// }
///
/// impl Extension for AtLeastTwoRows {
///     fn each(&mut self, _record: &Record<'_>) -> anyhow::Result<()> {
///         self.rows += 1;
///         Ok(())
///     }
///
///     fn finally_assert(&mut self) -> Result<(), AssertionFailure> {
///         AssertionFailure::ensure(self.rows >= 2)
///     }
/// }
///
/// let mut validator = Validator::with_fields(["foo"]).unwrap();
/// let counter = validator.add_extension(AtLeastTwoRows::default());
///
/// let problems = validator.validate(vec![vec!["foo"], vec!["1"]], &RunOptions::new());
/// assert_eq!(problems.len(), 1);
/// assert_eq!(counter.borrow().rows, 1);
/// ```
pub trait Extension: 'static {
    /// Name reported as `function` on unexpected exception problems.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn each(&mut self, _record: &Record<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    fn check(&mut self, _record: &Record<'_>) -> Result<(), RecordError> {
        Ok(())
    }

    fn assert(&mut self, _record: &Record<'_>) -> Result<(), AssertionFailure> {
        Ok(())
    }

    fn finally_assert(&mut self) -> Result<(), AssertionFailure> {
        Ok(())
    }
}

impl Validator {
    /// Registers a hook called for every data row before any check.
    ///
    /// An error returned by the hook is an unexpected exception.
    pub fn add_each<F>(&mut self, name: impl Into<String>, hook: F) -> &mut Self
    where
        F: FnMut(&Record<'_>) -> anyhow::Result<()> + 'static,
    {
        self.hooks.each.push(Hook::new(name, Box::new(hook)));
        self
    }

    /// Registers a per-row check hook.
    pub fn add_check<F>(&mut self, name: impl Into<String>, hook: F) -> &mut Self
    where
        F: FnMut(&Record<'_>) -> Result<(), RecordError> + 'static,
    {
        self.hooks.check.push(Hook::new(name, Box::new(hook)));
        self
    }

    /// Registers a per-row assertion hook.
    pub fn add_assert<F>(&mut self, name: impl Into<String>, hook: F) -> &mut Self
    where
        F: FnMut(&Record<'_>) -> Result<(), AssertionFailure> + 'static,
    {
        self.hooks.assert.push(Hook::new(name, Box::new(hook)));
        self
    }

    /// Registers an assertion hook run once at the end of every run.
    pub fn add_finally_assert<F>(&mut self, name: impl Into<String>, hook: F) -> &mut Self
    where
        F: FnMut() -> Result<(), AssertionFailure> + 'static,
    {
        self.hooks.finally_assert.push(Hook::new(name, Box::new(hook)));
        self
    }

    /// Registers all four hooks of `extension` and returns a handle to it.
    pub fn add_extension<E: Extension>(&mut self, extension: E) -> Rc<RefCell<E>> {
        let name = extension.name().to_string();
        let handle = Rc::new(RefCell::new(extension));

        let ext = Rc::clone(&handle);
        self.add_each(format!("{name}::each"), move |record| {
            ext.try_borrow_mut()?.each(record)
        });

        let ext = Rc::clone(&handle);
        self.add_check(format!("{name}::check"), move |record| {
            ext.try_borrow_mut()?.check(record)
        });

        let ext = Rc::clone(&handle);
        self.add_assert(format!("{name}::assert"), move |record| {
            ext.try_borrow_mut()?.assert(record)
        });

        let ext = Rc::clone(&handle);
        self.add_finally_assert(format!("{name}::finally_assert"), move || {
            ext.try_borrow_mut()?.finally_assert()
        });

        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowcheck_core::FieldSchema;

    struct Noop;

    impl Extension for Noop {}

    #[test]
    fn test_extension_registers_every_family() {
        let mut validator = Validator::with_fields(["foo"]).unwrap();
        validator.add_extension(Noop);

        assert_eq!(validator.hooks.len(), 4);
        assert!(validator.hooks.each[0].name.ends_with("Noop::each"));
        assert!(validator.hooks.finally_assert[0].name.ends_with("Noop::finally_assert"));
    }

    #[test]
    fn test_default_methods_are_noops() {
        let schema = FieldSchema::new(["foo"]).unwrap();
        let row = vec!["1".to_string()];
        let record = Record::new(&schema, &row);
        let mut ext = Noop;

        assert!(ext.each(&record).is_ok());
        assert!(ext.check(&record).is_ok());
        assert!(ext.assert(&record).is_ok());
        assert!(ext.finally_assert().is_ok());
    }

    #[test]
    fn test_hooks_keep_registration_order() {
        let mut validator = Validator::with_fields(["foo"]).unwrap();
        validator
            .add_assert("first", |_| Ok(()))
            .add_assert("second", |_| Ok(()));

        let names: Vec<_> = validator.hooks.assert.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }
}
