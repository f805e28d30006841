//! Traversal optics for focusing on zero or more elements.
//!
//! A traversal ([`Capabilities::TRAVERSAL`]) reads any number of indexed
//! focuses and rebuilds the source when each one is replaced.
//!
//! A traversal is written as two functions: a producer that pushes every
//! focus into a yield callback, and a rebuilder that threads every focus
//! through a modifier. The producer must stop as soon as the callback
//! returns [`ControlFlow::Break`]; the rebuilder must stop at the first
//! error and return it.
//!
//! # Laws
//!
//! 1. **Identity**: `modify(s, |a| a) == s`
//! 2. **Composition**: `modify(modify(s, f), g) == modify(s, |a| g(f(a)))`
//!
//! # Examples
//!
//! ```
//! use std::ops::ControlFlow;
//!
//! use opticore::optics::{Context, Indexed, traversal};
//!
//! let both = traversal(
//!     "Both",
//!     |pair: &(i32, i32), sink| {
//!         if sink(Ok(Indexed::new(0_usize, pair.0))).is_break() {
//!             return ControlFlow::Break(());
//!         }
//!         sink(Ok(Indexed::new(1, pair.1)))
//!     },
//!     |pair: (i32, i32), modifier| Ok((modifier(&0, pair.0)?, modifier(&1, pair.1)?)),
//! );
//!
//! let context = Context::background();
//! assert_eq!(both.collect(&context, &(1, 2)).unwrap(), vec![1, 2]);
//! assert_eq!(both.modify(&context, (1, 2), |value| value * 3).unwrap(), (3, 6));
//! ```

use std::ops::ControlFlow;
use std::sync::Arc;

use super::capability::Capabilities;
use super::error::OpticError;
use super::expression::Expression;
use super::optic::{IterateFn, Modifier, Optic};
use super::sequence::Yield;

/// Creates a traversal from a producer and a rebuilder.
pub fn traversal<I, S, T, A, B, P, M>(
    expression: impl Into<Expression>,
    iterate: P,
    modify: M,
) -> Optic<I, S, T, A, B>
where
    I: 'static,
    S: 'static,
    T: 'static,
    A: 'static,
    B: 'static,
    P: Fn(&S, &mut Yield<'_, I, A>) -> ControlFlow<()> + Send + Sync + 'static,
    M: Fn(S, &mut Modifier<'_, I, A, B>) -> Result<T, OpticError> + Send + Sync + 'static,
{
    let iterate: IterateFn<I, S, A> = Arc::new(move |_, source, sink| iterate(source, sink));
    Optic::from_iterate(expression.into(), Capabilities::TRAVERSAL, iterate)
        .with_modify_fn(Arc::new(move |_, source, function| modify(source, function)))
}
