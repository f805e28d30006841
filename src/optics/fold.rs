//! Read-only optics: getters and folds.
//!
//! A getter ([`Capabilities::GETTER`]) derives exactly one value from its
//! source. A fold ([`Capabilities::FOLD`]) derives any number of indexed
//! values. Neither can write, so their source and target types coincide.
//!
//! # Examples
//!
//! ```
//! use opticore::optics::{Context, compose, getter, traverse_vec};
//!
//! let context = Context::background();
//! let lengths = compose(
//!     traverse_vec::<String, String>(),
//!     getter("Len", |word: &String| word.len()),
//! );
//! let words = vec!["one".to_string(), "three".to_string()];
//!
//! assert_eq!(lengths.collect(&context, &words).unwrap(), vec![3, 5]);
//! assert!(!lengths.capabilities().is_writable());
//! ```

use std::ops::ControlFlow;
use std::sync::Arc;

use super::capability::Capabilities;
use super::expression::Expression;
use super::optic::{IterateFn, Optic};
use super::sequence::{Indexed, Yield};

/// Creates a getter from a function.
pub fn getter<S, A, F>(expression: impl Into<Expression>, function: F) -> Optic<(), S, S, A, A>
where
    S: 'static,
    A: 'static,
    F: Fn(&S) -> A + Send + Sync + 'static,
{
    let iterate: IterateFn<(), S, A> =
        Arc::new(move |_, source, sink| sink(Ok(Indexed::new((), function(source)))));
    Optic::from_iterate(expression.into(), Capabilities::GETTER, iterate).with_length(|_| 1)
}

/// Creates a fold from a producer.
///
/// The producer pushes each focus into the yield callback and must return
/// [`ControlFlow::Break`] as soon as the callback does.
///
/// # Example
///
/// ```
/// use std::ops::ControlFlow;
///
/// use opticore::optics::{Context, Indexed, fold};
///
/// let digits = fold("Digits", |number: &u32, sink| {
///     let text = number.to_string();
///     for (position, digit) in text.chars().enumerate() {
///         sink(Ok(Indexed::new(position, digit)))?;
///     }
///     ControlFlow::Continue(())
/// });
///
/// let rendered = digits.iterate(&Context::background(), &907).render().unwrap();
/// assert_eq!(rendered, "Seq[0:9 1:0 2:7]");
/// ```
pub fn fold<I, S, A, P>(expression: impl Into<Expression>, iterate: P) -> Optic<I, S, S, A, A>
where
    I: 'static,
    S: 'static,
    A: 'static,
    P: Fn(&S, &mut Yield<'_, I, A>) -> ControlFlow<()> + Send + Sync + 'static,
{
    let iterate: IterateFn<I, S, A> = Arc::new(move |_, source, sink| iterate(source, sink));
    Optic::from_iterate(expression.into(), Capabilities::FOLD, iterate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optics::Context;
    use rstest::rstest;

    #[rstest]
    fn test_getter_is_single_read_only() {
        let upper = getter("Upper", |text: &String| text.to_uppercase());
        assert_eq!(upper.capabilities(), Capabilities::GETTER);
        assert_eq!(upper.get(&Context::background(), &"abc".to_string()).unwrap(), "ABC");
    }

    #[rstest]
    fn test_fold_counts_without_cheap_length() {
        let evens = fold("Evens", |limit: &u32, sink| {
            for value in (0..*limit).filter(|value| value % 2 == 0) {
                sink(Ok(Indexed::new(value, value)))?;
            }
            ControlFlow::Continue(())
        });
        assert!(!evens.has_cheap_length());
        assert_eq!(evens.length(&Context::background(), &10).unwrap(), 5);
        assert_eq!(evens.capabilities(), Capabilities::FOLD);
    }

    #[rstest]
    fn test_fold_first_stops_early() {
        let naturals = fold("Naturals", |_: &(), sink| {
            for value in 0_u64.. {
                sink(Ok(Indexed::new(value, value)))?;
            }
            ControlFlow::Continue(())
        });
        let first = naturals.get_first(&Context::background(), &()).unwrap();
        assert_eq!(first, Some(0));
    }
}
