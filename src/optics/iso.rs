//! Iso optics for lossless conversions.
//!
//! An iso converts a source into its focus and back without losing
//! information ([`Capabilities::ISO`]). It is the strongest optic: one
//! focus, writable and reversible. [`Capabilities::ISO`] is also the neutral
//! element of capability merging, so composing with an iso never weakens
//! the other operand.
//!
//! # Laws
//!
//! 1. **`GetReverseGet`**: `reverse_get(get(s)) == s`
//! 2. **`ReverseGetGet`**: `get(reverse_get(a)) == a`
//!
//! # Examples
//!
//! ```
//! use opticore::optics::{Context, iso};
//!
//! let chars = iso(
//!     "Chars",
//!     |text: &String| text.chars().collect::<Vec<_>>(),
//!     |chars: Vec<char>| chars.into_iter().collect::<String>(),
//! );
//!
//! let context = Context::background();
//! let original = "hello".to_string();
//! let split = chars.get(&context, &original).unwrap();
//! assert_eq!(split, vec!['h', 'e', 'l', 'l', 'o']);
//! assert_eq!(chars.reverse_get(&context, split).unwrap(), original);
//! ```

use std::error::Error as StdError;
use std::sync::Arc;

use super::capability::{Capabilities, Failure};
use super::error::OpticError;
use super::expression::Expression;
use super::optic::{IterateFn, Optic};
use super::sequence::Indexed;

/// Creates a pure iso from a conversion and its inverse.
pub fn iso<S, T, A, B, G, R>(
    expression: impl Into<Expression>,
    get: G,
    reverse: R,
) -> Optic<(), S, T, A, B>
where
    S: 'static,
    T: 'static,
    A: 'static,
    B: 'static,
    G: Fn(&S) -> A + Send + Sync + 'static,
    R: Fn(B) -> T + Send + Sync + 'static,
{
    fallible_iso(
        expression,
        move |source: &S| Ok::<_, OpticError>(get(source)),
        move |value: B| Ok::<_, OpticError>(reverse(value)),
    )
    .with_capabilities(Capabilities::ISO)
}

/// Creates an iso whose conversions can fail.
///
/// # Example
///
/// ```
/// use opticore::optics::{Context, Failure, fallible_iso};
///
/// let digits = fallible_iso(
///     "Digits",
///     |text: &String| text.parse::<u32>(),
///     |value: u32| Ok::<_, std::num::ParseIntError>(value.to_string()),
/// );
/// assert_eq!(digits.capabilities().failure, Failure::Fallible);
///
/// let context = Context::background();
/// assert_eq!(digits.get(&context, &"42".to_string()).unwrap(), 42);
///
/// let error = digits.get(&context, &"forty".to_string()).unwrap_err();
/// assert_eq!(error.to_string(), "invalid digit found in string\noptic error path:\n\tDigits\n");
/// ```
pub fn fallible_iso<S, T, A, B, E, G, R>(
    expression: impl Into<Expression>,
    get: G,
    reverse: R,
) -> Optic<(), S, T, A, B>
where
    S: 'static,
    T: 'static,
    A: 'static,
    B: 'static,
    E: StdError + Send + Sync + 'static,
    G: Fn(&S) -> Result<A, E> + Send + Sync + 'static,
    R: Fn(B) -> Result<T, E> + Send + Sync + 'static,
{
    let get = Arc::new(get);
    let reverse = Arc::new(reverse);
    let reader = Arc::clone(&get);
    let iterate: IterateFn<(), S, A> = Arc::new(move |_, source, sink| {
        sink(
            reader(source)
                .map(|value| Indexed::new((), value))
                .map_err(OpticError::new),
        )
    });
    let writer = Arc::clone(&reverse);

    Optic::from_iterate(
        expression.into(),
        Capabilities::ISO.with_failure(Failure::Fallible),
        iterate,
    )
    .with_modify_fn(Arc::new(move |_, source, function| {
        let value = get(&source).map_err(OpticError::new)?;
        writer(function(&(), value)?).map_err(OpticError::new)
    }))
    .with_reverse_fn(Arc::new(move |_, value| {
        reverse(value).map_err(OpticError::new)
    }))
    .with_length(|_| 1)
}
