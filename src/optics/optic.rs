//! The unified optic type.
//!
//! An [`Optic<I, S, T, A, B>`] reads focuses of type `A` (indexed by `I`) out
//! of a source `S`, and rebuilds a `T` when every focus is replaced by a `B`.
//! The same value acts as getter, setter, modifier and lazy traversal; its
//! [`Capabilities`] say which of those uses are legitimate.
//!
//! Operations that an optic's capabilities rule out (calling [`Optic::get`]
//! on a Many optic, [`Optic::set`] on a read-only one, [`Optic::reverse_get`]
//! on a one-way one) are protocol misuse and panic. Use the checked views
//! ([`Optic::single`], [`Optic::writable`], ...) to turn a capability
//! requirement into a `Result` instead.
//!
//! # Examples
//!
//! ```
//! use opticore::optics::{Context, add, compose, traverse_vec};
//!
//! let context = Context::background();
//! let plus_five = compose(traverse_vec::<i64, i64>(), add(5));
//!
//! assert_eq!(plus_five.get_first(&context, &vec![10, 20, 30]).unwrap(), Some(15));
//! assert_eq!(plus_five.collect(&context, &vec![1, 2]).unwrap(), vec![6, 7]);
//! assert_eq!(
//!     plus_five.modify(&context, vec![10, 20], |value| value * 2).unwrap(),
//!     vec![25, 45],
//! );
//! ```

use std::error::Error as StdError;
use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;

use super::capability::{Capabilities, Cardinality, Direction, Failure};
use super::context::Context;
use super::error::OpticError;
use super::expression::Expression;
use super::sequence::{Indexed, IndexedValue, LazySequence, Yield};

/// The function a modify operation applies to each focus.
pub type Modifier<'m, I, A, B> = dyn FnMut(&I, A) -> Result<B, OpticError> + 'm;

pub(crate) type IterateFn<I, S, A> =
    Arc<dyn Fn(&Context, &S, &mut Yield<'_, I, A>) -> ControlFlow<()> + Send + Sync>;
pub(crate) type ModifyFn<I, S, T, A, B> =
    Arc<dyn Fn(&Context, S, &mut Modifier<'_, I, A, B>) -> Result<T, OpticError> + Send + Sync>;
pub(crate) type ReverseFn<T, B> = Arc<dyn Fn(&Context, B) -> Result<T, OpticError> + Send + Sync>;
pub(crate) type LengthFn<S> = Arc<dyn Fn(&Context, &S) -> Result<usize, OpticError> + Send + Sync>;
pub(crate) type LookupFn<I, S, A> =
    Arc<dyn Fn(&Context, &S, &I) -> Result<Option<A>, OpticError> + Send + Sync>;

/// Whether errors leaving the optic are annotated with its expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Boundary {
    Annotate,
    Transparent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    Plain,
    Identity,
}

/// A composable accessor.
///
/// # Type Parameters
///
/// - `I`: the index of each focus
/// - `S`: the source type
/// - `T`: the rebuilt source type
/// - `A`: the focus type
/// - `B`: the replacement focus type
///
/// Cloning is cheap and every optic is `Send + Sync`.
pub struct Optic<I, S, T, A, B> {
    pub(crate) expression: Expression,
    pub(crate) capabilities: Capabilities,
    pub(crate) boundary: Boundary,
    pub(crate) role: Role,
    pub(crate) iterate: IterateFn<I, S, A>,
    pub(crate) modify: Option<ModifyFn<I, S, T, A, B>>,
    pub(crate) reverse: Option<ReverseFn<T, B>>,
    pub(crate) length: Option<LengthFn<S>>,
    pub(crate) lookup: Option<LookupFn<I, S, A>>,
}

/// An optic that does not change types.
pub type SimpleOptic<I, S, A> = Optic<I, S, S, A, A>;

impl<I, S, T, A, B> Clone for Optic<I, S, T, A, B> {
    fn clone(&self) -> Self {
        Self {
            expression: self.expression.clone(),
            capabilities: self.capabilities,
            boundary: self.boundary,
            role: self.role,
            iterate: Arc::clone(&self.iterate),
            modify: self.modify.clone(),
            reverse: self.reverse.clone(),
            length: self.length.clone(),
            lookup: self.lookup.clone(),
        }
    }
}

impl<I, S, T, A, B> fmt::Debug for Optic<I, S, T, A, B> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Optic")
            .field("expression", &self.expression.to_string())
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

impl<I, S, T, A, B> fmt::Display for Optic<I, S, T, A, B> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.expression)
    }
}

/// Logs and panics on protocol misuse.
#[cold]
#[track_caller]
pub(crate) fn misuse(expression: &Expression, message: &str) -> ! {
    tracing::error!(optic = %expression, "{message}");
    panic!("{message}: `{expression}`");
}

impl<I, S, T, A, B> Optic<I, S, T, A, B>
where
    I: 'static,
    S: 'static,
    T: 'static,
    A: 'static,
    B: 'static,
{
    pub(crate) fn from_iterate(
        expression: Expression,
        capabilities: Capabilities,
        iterate: IterateFn<I, S, A>,
    ) -> Self {
        Self {
            expression,
            capabilities,
            boundary: Boundary::Annotate,
            role: Role::Plain,
            iterate,
            modify: None,
            reverse: None,
            length: None,
            lookup: None,
        }
    }

    pub(crate) fn with_modify_fn(mut self, modify: ModifyFn<I, S, T, A, B>) -> Self {
        self.modify = Some(modify);
        self
    }

    pub(crate) fn with_reverse_fn(mut self, reverse: ReverseFn<T, B>) -> Self {
        self.reverse = Some(reverse);
        self
    }

    pub(crate) fn with_length_fn(mut self, length: LengthFn<S>) -> Self {
        self.length = Some(length);
        self
    }

    pub(crate) fn with_lookup_fn(mut self, lookup: LookupFn<I, S, A>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    pub(crate) fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub(crate) fn transparent(mut self) -> Self {
        self.boundary = Boundary::Transparent;
        self
    }

    pub(crate) fn into_identity(mut self) -> Self {
        self.role = Role::Identity;
        self
    }

    /// Advertises a cheap element count used by [`length`](Self::length).
    ///
    /// # Example
    ///
    /// ```
    /// use opticore::optics::{Context, fold};
    ///
    /// let letters = fold("Letters", |source: &String, sink| {
    ///     for (index, letter) in source.chars().enumerate() {
    ///         if sink(Ok(opticore::optics::Indexed::new(index, letter))).is_break() {
    ///             return std::ops::ControlFlow::Break(());
    ///         }
    ///     }
    ///     std::ops::ControlFlow::Continue(())
    /// })
    /// .with_length(|source: &String| source.chars().count());
    ///
    /// assert_eq!(letters.length(&Context::background(), &"abc".to_string()).unwrap(), 3);
    /// ```
    #[must_use]
    pub fn with_length<F>(self, length: F) -> Self
    where
        F: Fn(&S) -> usize + Send + Sync + 'static,
    {
        self.with_length_fn(Arc::new(move |_, source| Ok(length(source))))
    }

    /// Advertises a direct lookup used by [`index`](Self::index).
    #[must_use]
    pub fn with_index_lookup<F>(self, lookup: F) -> Self
    where
        F: Fn(&S, &I) -> Option<A> + Send + Sync + 'static,
    {
        self.with_lookup_fn(Arc::new(move |_, source, index| Ok(lookup(source, index))))
    }

    /// The descriptive expression of this optic.
    pub const fn expression(&self) -> &Expression {
        &self.expression
    }

    /// The merged capabilities of this optic.
    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// `true` for [`identity`](super::identity) and anything elided to it.
    pub fn is_identity(&self) -> bool {
        self.role == Role::Identity
    }

    /// `true` if a cheap length function is available.
    pub const fn has_cheap_length(&self) -> bool {
        self.length.is_some()
    }

    /// `true` if a direct index lookup is available.
    pub const fn has_index_lookup(&self) -> bool {
        self.lookup.is_some()
    }

    fn annotate(&self, error: OpticError) -> OpticError {
        match self.boundary {
            Boundary::Annotate => error.at(&self.expression),
            Boundary::Transparent => error,
        }
    }

    fn logged<R>(
        &self,
        operation: &'static str,
        result: Result<R, OpticError>,
    ) -> Result<R, OpticError> {
        if let Err(error) = &result {
            tracing::debug!(optic = %self.expression, operation, %error, "optic operation failed");
        }
        result
    }

    #[track_caller]
    fn require(&self, operation: &str, satisfied: bool) {
        if !satisfied {
            misuse(
                &self.expression,
                &format!(
                    "{operation} is not supported by an optic with capabilities {}",
                    self.capabilities
                ),
            );
        }
    }

    /// Runs the producer behind a guard that enforces the yield protocol,
    /// checks `context` before each focus and annotates errors.
    pub(crate) fn drive(
        &self,
        context: &Context,
        source: &S,
        sink: &mut Yield<'_, I, A>,
    ) -> ControlFlow<()> {
        let mut stopped = false;
        let mut guard = |item: IndexedValue<I, A>| {
            if stopped {
                misuse(&self.expression, "yield called after break");
            }
            let item = item.and_then(|indexed| match context.check() {
                Ok(()) => Ok(indexed),
                Err(cancellation) => {
                    tracing::debug!(optic = %self.expression, %cancellation, "iteration cancelled");
                    Err(OpticError::from(cancellation))
                }
            });
            let item = item.map_err(|error| self.annotate(error));
            let failed = item.is_err();
            if sink(item).is_break() || failed {
                stopped = true;
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        };
        (self.iterate)(context, source, &mut guard)
    }

    pub(crate) fn drive_modify(
        &self,
        context: &Context,
        source: S,
        function: &mut Modifier<'_, I, A, B>,
    ) -> Result<T, OpticError> {
        let Some(modify) = &self.modify else {
            misuse(&self.expression, "modify called on an optic without a writer");
        };
        let mut checked = |index: &I, value: A| -> Result<B, OpticError> {
            context.check()?;
            function(index, value)
        };
        modify(context, source, &mut checked).map_err(|error| self.annotate(error))
    }

    pub(crate) fn drive_reverse(&self, context: &Context, value: B) -> Result<T, OpticError> {
        let Some(reverse) = &self.reverse else {
            misuse(&self.expression, "reverse_get called on an optic without a reverse");
        };
        context
            .check()
            .map_err(OpticError::from)
            .and_then(|()| reverse(context, value))
            .map_err(|error| self.annotate(error))
    }

    pub(crate) fn drive_length(&self, context: &Context, source: &S) -> Result<usize, OpticError> {
        match &self.length {
            Some(length) => length(context, source).map_err(|error| self.annotate(error)),
            None => self.iterate(context, source).count(),
        }
    }

    /// Runs the advertised lookup, or returns `None` when there is none.
    pub(crate) fn direct_lookup(
        &self,
        context: &Context,
        source: &S,
        index: &I,
    ) -> Option<Result<Option<A>, OpticError>> {
        let lookup = self.lookup.as_ref()?;
        Some(
            context
                .check()
                .map_err(OpticError::from)
                .and_then(|()| lookup(context, source, index))
                .map_err(|error| self.annotate(error)),
        )
    }

    pub(crate) fn drive_lookup(
        &self,
        context: &Context,
        source: &S,
        index: &I,
    ) -> Result<Option<A>, OpticError>
    where
        I: PartialEq,
    {
        if let Some(found) = self.direct_lookup(context, source, index) {
            return found;
        }
        let mut found = None;
        self.iterate(context, source).try_for_each(|candidate, value| {
            if candidate == *index {
                found = Some(value);
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })?;
        Ok(found)
    }

    /// Returns the single focus.
    ///
    /// # Errors
    ///
    /// Fails with a no-focus error when nothing is focused, or with the
    /// optic's own error.
    ///
    /// # Panics
    ///
    /// Panics if the optic has cardinality Many.
    #[track_caller]
    pub fn get(&self, context: &Context, source: &S) -> Result<A, OpticError> {
        self.get_indexed(context, source)
            .map(|indexed| indexed.value)
    }

    /// Returns the single focus together with its index.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    ///
    /// # Panics
    ///
    /// Panics if the optic has cardinality Many.
    #[track_caller]
    pub fn get_indexed(&self, context: &Context, source: &S) -> Result<Indexed<I, A>, OpticError> {
        self.require("get", self.capabilities.is_single());
        let result = self.iterate(context, source).first().and_then(|first| {
            first.ok_or_else(|| OpticError::no_focus().through(&self.expression))
        });
        self.logged("get", result)
    }

    /// Returns the first focus, if any. Valid for every cardinality.
    ///
    /// # Errors
    ///
    /// Returns an error produced before the first focus.
    pub fn get_first(&self, context: &Context, source: &S) -> Result<Option<A>, OpticError> {
        let result = self
            .iterate(context, source)
            .first()
            .map(|first| first.map(|indexed| indexed.value));
        self.logged("get_first", result)
    }

    /// Replaces every focus with `value`.
    ///
    /// # Errors
    ///
    /// Returns the first error; no partially updated value is produced.
    ///
    /// # Panics
    ///
    /// Panics if the optic is read-only.
    #[track_caller]
    pub fn set(&self, context: &Context, source: S, value: B) -> Result<T, OpticError>
    where
        B: Clone,
    {
        self.modify_indexed(context, source, |_, _| Ok(value.clone()))
    }

    /// Applies `function` to every focus and rebuilds the source.
    ///
    /// # Errors
    ///
    /// Returns the first error; no partially updated value is produced.
    ///
    /// # Panics
    ///
    /// Panics if the optic is read-only.
    #[track_caller]
    pub fn modify<F>(&self, context: &Context, source: S, mut function: F) -> Result<T, OpticError>
    where
        F: FnMut(A) -> B,
    {
        self.modify_indexed(context, source, |_, value| Ok(function(value)))
    }

    /// Like [`modify`](Self::modify) with a fallible function.
    ///
    /// # Errors
    ///
    /// Returns the first error of `function` wrapped in an [`OpticError`] that
    /// carries the path of the focus it failed on.
    ///
    /// # Panics
    ///
    /// Panics if the optic is read-only.
    #[track_caller]
    pub fn try_modify<E, F>(
        &self,
        context: &Context,
        source: S,
        mut function: F,
    ) -> Result<T, OpticError>
    where
        E: StdError + Send + Sync + 'static,
        F: FnMut(A) -> Result<B, E>,
    {
        self.modify_indexed(context, source, |_, value| {
            function(value).map_err(OpticError::new)
        })
    }

    /// Applies `function` to every focus with its index.
    ///
    /// # Errors
    ///
    /// Returns the first error; no partially updated value is produced.
    ///
    /// # Panics
    ///
    /// Panics if the optic is read-only.
    #[track_caller]
    pub fn modify_indexed<F>(
        &self,
        context: &Context,
        source: S,
        mut function: F,
    ) -> Result<T, OpticError>
    where
        F: FnMut(&I, A) -> Result<B, OpticError>,
    {
        self.require("modify", self.capabilities.is_writable());
        let result = self.drive_modify(context, source, &mut function);
        self.logged("modify", result)
    }

    /// Lazily iterates every focus with its index.
    pub fn iterate<'a>(&'a self, context: &'a Context, source: &'a S) -> LazySequence<'a, I, A> {
        LazySequence::new(move |sink| {
            let _ = self.drive(context, source, sink);
        })
    }

    /// Collects every focus.
    ///
    /// # Errors
    ///
    /// Returns the first error produced.
    pub fn collect(&self, context: &Context, source: &S) -> Result<Vec<A>, OpticError> {
        let result = self.iterate(context, source).values();
        self.logged("collect", result)
    }

    /// Counts the focuses, using the cheap length function when present.
    ///
    /// # Errors
    ///
    /// Returns the first error produced while counting.
    pub fn length(&self, context: &Context, source: &S) -> Result<usize, OpticError> {
        let result = self.drive_length(context, source);
        self.logged("length", result)
    }

    /// Builds a source from a focus.
    ///
    /// # Errors
    ///
    /// Returns the reverse construction's error.
    ///
    /// # Panics
    ///
    /// Panics if the optic is one-way.
    #[track_caller]
    pub fn reverse_get(&self, context: &Context, value: B) -> Result<T, OpticError> {
        self.require("reverse_get", self.capabilities.is_reversible());
        let result = self.drive_reverse(context, value);
        self.logged("reverse_get", result)
    }
}

impl<I, S, T, A> Optic<I, S, T, A, A>
where
    I: PartialEq + Clone + fmt::Debug + Send + Sync + 'static,
    S: 'static,
    T: 'static,
    A: 'static,
{
    /// Narrows the optic to the focus at `index`.
    ///
    /// The result has cardinality One, is one-way and fallible: a missing
    /// index is a no-focus error. Reads use the direct lookup when the optic
    /// advertises one and scan otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// use opticore::optics::{Context, traverse_vec};
    ///
    /// let context = Context::background();
    /// let second = traverse_vec::<&str, &str>().index(1);
    ///
    /// assert_eq!(second.get(&context, &vec!["a", "b", "c"]).unwrap(), "b");
    /// assert!(second.get(&context, &vec!["a"]).unwrap_err().is_no_focus());
    /// assert_eq!(
    ///     second.set(&context, vec!["a", "b"], "z").unwrap(),
    ///     vec!["a", "z"],
    /// );
    /// ```
    #[must_use]
    pub fn index(&self, index: I) -> Self {
        let expression = Expression::new("Index")
            .child(self.expression.clone())
            .param(format!("{index:?}"));
        let capabilities = self
            .capabilities
            .with_cardinality(Cardinality::One)
            .with_direction(Direction::UniDir)
            .with_failure(Failure::Fallible);

        let inner = self.clone();
        let key = index.clone();
        let iterate: IterateFn<I, S, A> = Arc::new(move |context, source, sink| {
            match inner.drive_lookup(context, source, &key) {
                Ok(Some(value)) => sink(Ok(Indexed::new(key.clone(), value))),
                Ok(None) => ControlFlow::Continue(()),
                Err(error) => sink(Err(error)),
            }
        });
        let optic = Self::from_iterate(expression, capabilities, iterate);
        if self.modify.is_none() {
            return optic;
        }

        let inner = self.clone();
        optic.with_modify_fn(Arc::new(move |context, source, function| {
            let mut found = false;
            let rebuilt = inner.drive_modify(context, source, &mut |candidate: &I, value: A| {
                if found || *candidate != index {
                    return Ok(value);
                }
                found = true;
                function(candidate, value)
            })?;
            if found {
                Ok(rebuilt)
            } else {
                Err(OpticError::no_focus())
            }
        }))
    }
}

static_assertions::assert_impl_all!(Optic<usize, Vec<i32>, Vec<i32>, i32, i32>: Send, Sync, Clone);
static_assertions::assert_impl_all!(Optic<(), std::rc::Rc<u8>, std::rc::Rc<u8>, u8, u8>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optics::{getter, iso, lens, traverse_vec};
    use rstest::rstest;

    #[rstest]
    #[should_panic(expected = "get is not supported")]
    fn test_get_on_many_panics() {
        let traversal = traverse_vec::<i32, i32>();
        let _ = traversal.get(&Context::background(), &vec![1]);
    }

    #[rstest]
    #[should_panic(expected = "modify is not supported")]
    fn test_set_on_read_only_panics() {
        let length = getter("Len", |source: &String| source.len());
        let _ = length.set(&Context::background(), "abc".to_string(), 1);
    }

    #[rstest]
    #[should_panic(expected = "reverse_get is not supported")]
    fn test_reverse_on_lens_panics() {
        let first = lens("First", |pair: &(i32, i32)| pair.0, |pair: (i32, i32), value: i32| {
            (value, pair.1)
        });
        let _ = first.reverse_get(&Context::background(), 1);
    }

    #[rstest]
    fn test_get_first_on_empty_traversal() {
        let traversal = traverse_vec::<i32, i32>();
        assert_eq!(traversal.get_first(&Context::background(), &vec![]).unwrap(), None);
    }

    #[rstest]
    fn test_get_indexed() {
        let negate = iso("Negate", |value: &i32| -value, |value: i32| -value);
        let indexed = negate.get_indexed(&Context::background(), &4).unwrap();
        assert_eq!(indexed, Indexed::new((), -4));
    }

    #[rstest]
    fn test_modify_aborts_on_first_error() {
        let traversal = traverse_vec::<i32, i32>();
        let mut calls = 0;
        let result = traversal.modify_indexed(&Context::background(), vec![1, 2, 3], |_, value| {
            calls += 1;
            if value == 2 {
                Err(OpticError::message("two"))
            } else {
                Ok(value)
            }
        });
        assert_eq!(result.unwrap_err().to_string(), "two\noptic error path:\n\tTraverse\n");
        assert_eq!(calls, 2);
    }

    #[rstest]
    fn test_length_uses_cheap_length() {
        let traversal = traverse_vec::<i32, i32>();
        assert!(traversal.has_cheap_length());
        assert_eq!(traversal.length(&Context::background(), &vec![1, 2, 3]).unwrap(), 3);
    }

    #[rstest]
    fn test_index_without_lookup_scans() {
        let traversal = crate::optics::compose(traverse_vec::<Vec<i32>, Vec<i32>>(), traverse_vec::<i32, i32>());
        assert!(!traversal.has_index_lookup());
        let at_one = traversal.index(1);
        let source = vec![vec![10, 11], vec![20]];
        assert_eq!(at_one.get(&Context::background(), &source).unwrap(), 11);
    }

    #[rstest]
    fn test_index_modify_missing_is_no_focus() {
        let at_five = traverse_vec::<i32, i32>().index(5);
        let error = at_five
            .modify(&Context::background(), vec![1], |value| value + 1)
            .unwrap_err();
        assert!(error.is_no_focus());
        assert_eq!(error.path()[0].to_string(), "Index(Traverse,5)");
    }
}
