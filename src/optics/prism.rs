//! Prism optics for focusing on enum variants.
//!
//! A prism focuses on a value that may or may not be present, typically the
//! payload of one enum variant ([`Capabilities::PRISM`]). It yields zero or one
//! focus, so its cardinality is Many, and because the payload alone is enough
//! to rebuild the source it is reversible.
//!
//! # Laws
//!
//! 1. **`PreviewReview`**: iterating `reverse_get(a)` yields exactly `a`
//! 2. **`ReviewPreview`**: if `s` yields `a`, then `reverse_get(a) == s`
//!
//! # Examples
//!
//! ```
//! use opticore::prism;
//! use opticore::optics::Context;
//!
//! #[derive(Clone, PartialEq, Debug)]
//! enum Shape {
//!     Circle(f64),
//!     Square(f64),
//! }
//!
//! let context = Context::background();
//! let circle = prism!(Shape, Circle);
//!
//! assert_eq!(circle.get_first(&context, &Shape::Circle(2.0)).unwrap(), Some(2.0));
//! assert_eq!(circle.get_first(&context, &Shape::Square(3.0)).unwrap(), None);
//! assert_eq!(circle.reverse_get(&context, 1.0).unwrap(), Shape::Circle(1.0));
//! assert_eq!(circle.to_string(), "Variant(Shape::Circle)");
//! ```

use std::ops::ControlFlow;
use std::sync::Arc;

use super::capability::Capabilities;
use super::expression::Expression;
use super::optic::{IterateFn, Optic};
use super::sequence::Indexed;

/// Creates a prism from a partial matcher and a constructor.
///
/// Modifying a source the matcher rejects returns the source unchanged.
///
/// # Example
///
/// ```
/// use opticore::optics::{Context, prism};
///
/// let positive = prism(
///     "Positive",
///     |value: &i32| (*value > 0).then_some(*value),
///     |value: i32| value,
/// );
/// let context = Context::background();
/// assert_eq!(positive.modify(&context, 4, |value| value * 10).unwrap(), 40);
/// assert_eq!(positive.modify(&context, -4, |value| value * 10).unwrap(), -4);
/// ```
pub fn prism<S, A, M, R>(
    expression: impl Into<Expression>,
    matcher: M,
    review: R,
) -> Optic<(), S, S, A, A>
where
    S: 'static,
    A: 'static,
    M: Fn(&S) -> Option<A> + Send + Sync + 'static,
    R: Fn(A) -> S + Send + Sync + 'static,
{
    let matcher = Arc::new(matcher);
    let review = Arc::new(review);

    let preview = Arc::clone(&matcher);
    let iterate: IterateFn<(), S, A> = Arc::new(move |_, source, sink| match preview(source) {
        Some(value) => sink(Ok(Indexed::new((), value))),
        None => ControlFlow::Continue(()),
    });
    let counter = Arc::clone(&matcher);
    let rebuild = Arc::clone(&review);

    Optic::from_iterate(expression.into(), Capabilities::PRISM, iterate)
        .with_modify_fn(Arc::new(move |_, source, function| match matcher(&source) {
            Some(value) => Ok(rebuild(function(&(), value)?)),
            None => Ok(source),
        }))
        .with_reverse_fn(Arc::new(move |_, value| Ok(review(value))))
        .with_length(move |source| usize::from(counter(source).is_some()))
}

/// Creates a prism for a single-field enum variant.
///
/// The payload is cloned on read. The expression is `Variant(Enum::Variant)`.
///
/// # Syntax
///
/// ```text
/// prism!(EnumType, VariantName)
/// ```
#[macro_export]
macro_rules! prism {
    ($enum_type:ident, $variant:ident) => {
        $crate::optics::prism(
            $crate::optics::Expression::new("Variant")
                .param(concat!(stringify!($enum_type), "::", stringify!($variant))),
            |source: &$enum_type| match source {
                $enum_type::$variant(value) => Some(value.clone()),
                #[allow(unreachable_patterns)]
                _ => None,
            },
            $enum_type::$variant,
        )
    };
    ($enum_type:ident < $($generic:tt),+ >, $variant:ident) => {
        $crate::optics::prism(
            $crate::optics::Expression::new("Variant")
                .param(concat!(stringify!($enum_type), "::", stringify!($variant))),
            |source: &$enum_type<$($generic),+>| match source {
                $enum_type::$variant(value) => Some(value.clone()),
                #[allow(unreachable_patterns)]
                _ => None,
            },
            $enum_type::<$($generic),+>::$variant,
        )
    };
}
