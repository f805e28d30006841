//! Filtered optics for conditional element access.
//!
//! [`filtered`] focuses on its source only when a [`Predicate`] holds. Composed
//! after a traversal it narrows the traversal to matching elements, both for
//! reads and for writes.
//!
//! The result is not a lawful traversal when a write makes the predicate
//! stop holding: a later read skips the rewritten element.
//!
//! # Examples
//!
//! ```
//! use opticore::optics::{Context, filtered, gt, traverse_vec};
//!
//! let context = Context::background();
//! let large = traverse_vec::<i32, i32>().compose_left(filtered(gt(2)));
//!
//! let rendered = large.iterate(&context, &vec![1, 5, 2, 7]).render().unwrap();
//! assert_eq!(rendered, "Seq[1:5 3:7]");
//! assert_eq!(
//!     large.modify(&context, vec![1, 5, 2, 7], |value| value * 10).unwrap(),
//!     vec![1, 50, 2, 70],
//! );
//! ```

use std::ops::ControlFlow;
use std::sync::Arc;

use super::capability::Capabilities;
use super::expression::Expression;
use super::optic::{IterateFn, Optic};
use super::predicate::{Predicate, evaluate};
use super::sequence::Indexed;

/// Focuses on the source when `predicate` holds, and on nothing otherwise.
///
/// The result is a Many, read-write optic. It is fallible when the predicate
/// is.
pub fn filtered<A>(predicate: Predicate<A>) -> Optic<(), A, A, A, A>
where
    A: Clone + 'static,
{
    let expression = Expression::new("Filtered").child(predicate.expression.clone());
    let capabilities = Capabilities::TRAVERSAL.with_failure(predicate.capabilities.failure);

    let test = predicate.clone();
    let iterate: IterateFn<(), A, A> = Arc::new(move |context, source, sink| {
        match evaluate(&test, context, source) {
            Ok(true) => sink(Ok(Indexed::new((), source.clone()))),
            Ok(false) => ControlFlow::Continue(()),
            Err(error) => sink(Err(error)),
        }
    });

    Optic::from_iterate(expression, capabilities, iterate).with_modify_fn(Arc::new(
        move |context, source, function| {
            if evaluate(&predicate, context, &source)? {
                function(&(), source)
            } else {
                Ok(source)
            }
        },
    ))
}
