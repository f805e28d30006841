//! Error types for optic operations.
//!
//! All failures of an optic operation, whether raised by the optic itself, by
//! a user supplied function or by cancellation, travel through a single
//! channel: [`OpticError`]. An `OpticError` carries its [`ErrorCause`] and the
//! path of optic descriptions it escaped through, innermost first.
//!
//! Protocol misuse (calling `set` on a read-only optic, yielding after a
//! consumer stopped, ...) is not an `OpticError`; it panics at the point of
//! detection.
//!
//! # Examples
//!
//! ```rust
//! use opticore::optics::{Cancellation, OpticError};
//!
//! let error = OpticError::from(Cancellation::DeadlineExceeded);
//! assert!(error.is_cancelled());
//! assert_eq!(format!("{error}"), "context deadline exceeded");
//! ```

use std::any::Any;
use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use super::capability::Capabilities;
use super::expression::Expression;

/// Why an operation was stopped by its [`Context`](super::Context).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Cancellation {
    /// The context was cancelled explicitly.
    #[error("context canceled")]
    Canceled,
    /// The context deadline passed.
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// The underlying cause of an [`OpticError`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum ErrorCause {
    /// A data or user-function failure.
    #[error("{0}")]
    Data(Arc<dyn StdError + Send + Sync>),
    /// A failure described only by a message.
    #[error("{0}")]
    Message(Cow<'static, str>),
    /// The context was cancelled or expired.
    #[error(transparent)]
    Cancelled(#[from] Cancellation),
    /// An optic with cardinality One found no element to focus on.
    #[error("optic focused on no element")]
    NoFocus,
}

/// A failure of an optic operation together with its diagnostic path.
///
/// The `Display` output is the cause followed, when the path is not empty,
/// by the fixed header `optic error path:` and one tab-indented line per
/// description, innermost first:
///
/// ```text
/// parsing "two": invalid syntax
/// optic error path:
///     ParseInt(10,0)
///     Traverse
///     SliceOf(Traverse | ParseInt(10,0),3)
/// ```
#[derive(Debug, Clone)]
pub struct OpticError {
    cause: ErrorCause,
    path: SmallVec<[Expression; 4]>,
}

impl OpticError {
    /// Wraps an arbitrary error.
    ///
    /// Passing an `OpticError` returns it unchanged rather than nesting it.
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        if let Some(existing) = (&error as &dyn Any).downcast_ref::<Self>() {
            return existing.clone();
        }
        Self::from_cause(ErrorCause::Data(Arc::new(error)))
    }

    /// Creates an error from a message.
    pub fn message(message: impl Into<Cow<'static, str>>) -> Self {
        Self::from_cause(ErrorCause::Message(message.into()))
    }

    /// The error reported when a cardinality One optic finds no focus.
    pub fn no_focus() -> Self {
        Self::from_cause(ErrorCause::NoFocus)
    }

    fn from_cause(cause: ErrorCause) -> Self {
        Self {
            cause,
            path: SmallVec::new(),
        }
    }

    /// The underlying cause.
    pub const fn cause(&self) -> &ErrorCause {
        &self.cause
    }

    /// The descriptions this error escaped through, innermost first.
    pub fn path(&self) -> &[Expression] {
        &self.path
    }

    /// `true` if the failure was caused by cancellation or a deadline.
    pub const fn is_cancelled(&self) -> bool {
        matches!(self.cause, ErrorCause::Cancelled(_))
    }

    /// The cancellation reason, if any.
    pub fn cancellation(&self) -> Option<Cancellation> {
        match &self.cause {
            ErrorCause::Cancelled(cancellation) => Some(*cancellation),
            _ => None,
        }
    }

    /// `true` if a cardinality One optic found nothing to focus on.
    pub const fn is_no_focus(&self) -> bool {
        matches!(self.cause, ErrorCause::NoFocus)
    }

    /// Returns the wrapped data error if it has type `E`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use opticore::optics::{OpticError, ParseIntError};
    ///
    /// let error = OpticError::new(ParseIntError::invalid_syntax("x"));
    /// assert!(error.downcast_ref::<ParseIntError>().is_some());
    /// ```
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        match &self.cause {
            ErrorCause::Data(error) => error.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Appends one description to the path.
    #[must_use]
    pub(crate) fn at(mut self, expression: &Expression) -> Self {
        self.path.push(expression.clone());
        self
    }

    /// Appends the trail of `expression` to the path.
    #[must_use]
    pub(crate) fn through(mut self, expression: &Expression) -> Self {
        self.path.extend(expression.trail());
        self
    }
}

impl From<Cancellation> for OpticError {
    fn from(cancellation: Cancellation) -> Self {
        Self::from_cause(ErrorCause::Cancelled(cancellation))
    }
}

impl fmt::Display for OpticError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.cause)?;
        if self.path.is_empty() {
            return Ok(());
        }
        formatter.write_str("\noptic error path:\n")?;
        for expression in &self.path {
            writeln!(formatter, "\t{expression}")?;
        }
        Ok(())
    }
}

impl StdError for OpticError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.cause {
            ErrorCause::Data(error) => Some(error.as_ref()),
            ErrorCause::Cancelled(cancellation) => Some(cancellation),
            ErrorCause::Message(_) | ErrorCause::NoFocus => None,
        }
    }
}

/// Returned when an optic lacks the capabilities an operation or view needs.
///
/// # Example
///
/// ```rust
/// use opticore::optics::{Context, traverse_vec};
///
/// let traversal = traverse_vec::<i32, i32>();
/// let error = traversal.single().unwrap_err();
/// assert_eq!(error.operation, "single");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation} needs {required} but `{expression}` provides {actual} (axes: {})", .axes.join(", "))]
pub struct CapabilityError {
    /// The operation or view that was requested.
    pub operation: &'static str,
    /// Short rendering of the optic.
    pub expression: String,
    /// The capabilities the optic has.
    pub actual: Capabilities,
    /// The capabilities that were requested.
    pub required: Capabilities,
    /// The axes on which `actual` does not imply `required`.
    pub axes: Vec<&'static str>,
}

impl CapabilityError {
    pub(crate) fn new(
        operation: &'static str,
        expression: &Expression,
        actual: Capabilities,
        required: Capabilities,
    ) -> Self {
        Self {
            operation,
            expression: expression.to_string(),
            actual,
            required,
            axes: actual.violations(required).into_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("boom")]
    struct Boom;

    #[test]
    fn test_display_without_path() {
        let error = OpticError::new(Boom);
        assert_eq!(error.to_string(), "boom");
    }

    #[test]
    fn test_display_with_path_is_innermost_first() {
        let error = OpticError::new(Boom)
            .at(&Expression::new("Inner"))
            .at(&Expression::new("Outer").param(1));
        assert_eq!(
            error.to_string(),
            "boom\noptic error path:\n\tInner\n\tOuter(1)\n"
        );
    }

    #[test]
    fn test_new_does_not_nest_optic_errors() {
        let original = OpticError::message("inner").at(&Expression::new("Leaf"));
        let wrapped = OpticError::new(original.clone());
        assert_eq!(wrapped.to_string(), original.to_string());
        assert_eq!(wrapped.path().len(), 1);
    }

    #[test]
    fn test_cancellation_is_distinguishable() {
        let error = OpticError::from(Cancellation::Canceled);
        assert!(error.is_cancelled());
        assert_eq!(error.cancellation(), Some(Cancellation::Canceled));
        assert!(!OpticError::new(Boom).is_cancelled());
    }

    #[test]
    fn test_downcast_ref() {
        let error = OpticError::new(Boom);
        assert!(error.downcast_ref::<Boom>().is_some());
        assert!(OpticError::no_focus().downcast_ref::<Boom>().is_none());
    }

    #[test]
    fn test_through_appends_trail() {
        let left = Expression::composition("Compose", "A".into(), "B".into());
        let error = OpticError::message("x").through(&left);
        let names: Vec<String> = error.path().iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["B", "A"]);
    }
}
