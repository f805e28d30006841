//! Predicates as read-only optics.
//!
//! A [`Predicate<A>`] is a getter from `A` to `bool`. Because predicates are
//! optics, they carry an expression (`Gt(2)`, `Not(Eq(0))`) that shows up in
//! renderings and error paths of the optics built from them, such as
//! [`filtered`](super::filtered).
//!
//! # Examples
//!
//! ```
//! use opticore::optics::{Context, gt, not};
//!
//! let context = Context::background();
//! let small = not(gt(10));
//!
//! assert!(small.get(&context, &3).unwrap());
//! assert!(!small.get(&context, &11).unwrap());
//! assert_eq!(small.to_string(), "Not(Gt(10))");
//! ```

use std::fmt;
use std::sync::Arc;

use super::capability::{Direction, Mutability};
use super::context::Context;
use super::error::OpticError;
use super::expression::Expression;
use super::fold::getter;
use super::optic::{IterateFn, Optic};

/// A read-only optic from `A` to `bool`.
pub type Predicate<A> = Optic<(), A, A, bool, bool>;

/// Creates a named predicate from a function.
pub fn predicate<A, F>(name: impl Into<Expression>, function: F) -> Predicate<A>
where
    A: 'static,
    F: Fn(&A) -> bool + Send + Sync + 'static,
{
    getter(name, function)
}

fn comparison<A, F>(name: &'static str, operand: A, compare: F) -> Predicate<A>
where
    A: fmt::Display + Send + Sync + 'static,
    F: Fn(&A, &A) -> bool + Send + Sync + 'static,
{
    let expression = Expression::new(name).param(&operand);
    getter(expression, move |value: &A| compare(value, &operand))
}

/// Holds for values equal to `operand`.
pub fn eq<A>(operand: A) -> Predicate<A>
where
    A: PartialEq + fmt::Display + Send + Sync + 'static,
{
    comparison("Eq", operand, |value, operand| value == operand)
}

/// Holds for values different from `operand`.
pub fn ne<A>(operand: A) -> Predicate<A>
where
    A: PartialEq + fmt::Display + Send + Sync + 'static,
{
    comparison("Ne", operand, |value, operand| value != operand)
}

/// Holds for values greater than `operand`.
pub fn gt<A>(operand: A) -> Predicate<A>
where
    A: PartialOrd + fmt::Display + Send + Sync + 'static,
{
    comparison("Gt", operand, |value, operand| value > operand)
}

/// Holds for values less than `operand`.
pub fn lt<A>(operand: A) -> Predicate<A>
where
    A: PartialOrd + fmt::Display + Send + Sync + 'static,
{
    comparison("Lt", operand, |value, operand| value < operand)
}

/// Negates a predicate.
pub fn not<A: 'static>(predicate: Predicate<A>) -> Predicate<A> {
    let expression = Expression::new("Not").child(predicate.expression.clone());
    let capabilities = predicate
        .capabilities
        .with_mutability(Mutability::ReadOnly)
        .with_direction(Direction::UniDir);
    let inner = predicate;
    let iterate: IterateFn<(), A, bool> = Arc::new(move |context, source, sink| {
        inner.drive(context, source, &mut |item| {
            sink(item.map(|indexed| indexed.map(|holds| !holds)))
        })
    });
    Optic::from_iterate(expression, capabilities, iterate)
}

/// Evaluates `predicate` on `value`. A predicate that yields nothing does
/// not hold.
pub(crate) fn evaluate<A: 'static>(
    predicate: &Predicate<A>,
    context: &Context,
    value: &A,
) -> Result<bool, OpticError> {
    Ok(predicate
        .iterate(context, value)
        .first()?
        .is_some_and(|indexed| indexed.value))
}
