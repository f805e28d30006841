//! Positional slicing of an optic's focuses.
//!
//! [`taking`] keeps the first `n` focuses and [`dropping`] skips them. Both
//! count focuses in iteration order and keep the inner optic's indices.
//! Writes through the result touch only the kept focuses.

use std::ops::ControlFlow;
use std::sync::Arc;

use super::capability::{Cardinality, Direction};
use super::expression::Expression;
use super::optic::{IterateFn, Optic};

fn slice_node<I, S, T, A>(
    name: &'static str,
    optic: &Optic<I, S, T, A, A>,
    count: usize,
    iterate: IterateFn<I, S, A>,
) -> Optic<I, S, T, A, A>
where
    I: 'static,
    S: 'static,
    T: 'static,
    A: 'static,
{
    let expression = Expression::new(name).child(optic.expression.clone()).param(count);
    let capabilities = optic
        .capabilities
        .with_cardinality(Cardinality::Many)
        .with_direction(Direction::UniDir);
    Optic::from_iterate(expression, capabilities, iterate)
}

/// Keeps the first `count` focuses of `optic`.
///
/// Iteration stops as soon as `count` focuses were produced, so `taking`
/// makes infinite optics finite.
///
/// # Example
///
/// ```
/// use opticore::optics::{Context, taking, traverse_vec};
///
/// let context = Context::background();
/// let first_two = taking(traverse_vec::<i32, i32>(), 2);
///
/// assert_eq!(first_two.collect(&context, &vec![1, 2, 3]).unwrap(), vec![1, 2]);
/// assert_eq!(first_two.set(&context, vec![1, 2, 3], 0).unwrap(), vec![0, 0, 3]);
/// assert_eq!(first_two.to_string(), "Taking(Traverse,2)");
/// ```
pub fn taking<I, S, T, A>(optic: Optic<I, S, T, A, A>, count: usize) -> Optic<I, S, T, A, A>
where
    I: 'static,
    S: 'static,
    T: 'static,
    A: 'static,
{
    let inner = optic.clone();
    let iterate: IterateFn<I, S, A> = Arc::new(move |context, source, sink| {
        if count == 0 {
            return ControlFlow::Continue(());
        }
        let mut taken = 0;
        inner.drive(context, source, &mut |item| {
            if item.is_ok() {
                taken += 1;
            }
            let flow = sink(item);
            if taken >= count {
                ControlFlow::Break(())
            } else {
                flow
            }
        })
    });
    let mut sliced = slice_node("Taking", &optic, count, iterate);

    if optic.modify.is_some() {
        let inner = optic.clone();
        sliced = sliced.with_modify_fn(Arc::new(move |context, source, function| {
            let mut position = 0;
            inner.drive_modify(context, source, &mut |index, value| {
                position += 1;
                if position <= count {
                    function(index, value)
                } else {
                    Ok(value)
                }
            })
        }));
    }
    if optic.length.is_some() {
        let inner = optic;
        sliced = sliced.with_length_fn(Arc::new(move |context, source| {
            inner
                .drive_length(context, source)
                .map(|length| length.min(count))
        }));
    }
    sliced
}

/// Skips the first `count` focuses of `optic`.
///
/// # Example
///
/// ```
/// use opticore::optics::{Context, dropping, traverse_vec};
///
/// let context = Context::background();
/// let tail = dropping(traverse_vec::<char, char>(), 1);
///
/// assert_eq!(tail.iterate(&context, &vec!['a', 'b', 'c']).render().unwrap(), "Seq[1:b 2:c]");
/// assert_eq!(tail.length(&context, &vec!['a']).unwrap(), 0);
/// ```
pub fn dropping<I, S, T, A>(optic: Optic<I, S, T, A, A>, count: usize) -> Optic<I, S, T, A, A>
where
    I: 'static,
    S: 'static,
    T: 'static,
    A: 'static,
{
    let inner = optic.clone();
    let iterate: IterateFn<I, S, A> = Arc::new(move |context, source, sink| {
        let mut skipped = 0;
        inner.drive(context, source, &mut |item| {
            if item.is_ok() && skipped < count {
                skipped += 1;
                return ControlFlow::Continue(());
            }
            sink(item)
        })
    });
    let mut sliced = slice_node("Dropping", &optic, count, iterate);

    if optic.modify.is_some() {
        let inner = optic.clone();
        sliced = sliced.with_modify_fn(Arc::new(move |context, source, function| {
            let mut position = 0;
            inner.drive_modify(context, source, &mut |index, value| {
                position += 1;
                if position > count {
                    function(index, value)
                } else {
                    Ok(value)
                }
            })
        }));
    }
    if optic.length.is_some() {
        let inner = optic;
        sliced = sliced.with_length_fn(Arc::new(move |context, source| {
            inner
                .drive_length(context, source)
                .map(|length| length.saturating_sub(count))
        }));
    }
    sliced
}
