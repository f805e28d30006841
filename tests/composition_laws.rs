//! Property-based tests for composition.
//!
//! This module verifies the algebra every composition strategy obeys:
//!
//! - **Merge**: the capabilities of a composition are the axis-wise merge of
//!   its operands, for every strategy
//! - **Associativity**: `(a . b) . c` and `a . (b . c)` focus on the same
//!   values and share capabilities
//! - **Identity**: composing with `identity` on either side changes neither
//!   the behaviour nor the description of an optic
//!
//! Lens, iso and traversal laws are checked for the leaf optics along the
//! way.

use opticore::lens;
use opticore::optics::{
    Capabilities, Cardinality, Context, Direction, Failure, IxMapLeft, IxMapRight, IxPair,
    Mutability, Optic, add, compose, compose_both, compose_left, compose_with, identity, ix_map,
    reconstrain_unchecked, traverse_vec, tuple_first,
};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn capabilities() -> impl Strategy<Value = Capabilities> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(many, read_only, uni_dir, fallible)| {
            Capabilities::new(
                if many { Cardinality::Many } else { Cardinality::One },
                if read_only { Mutability::ReadOnly } else { Mutability::ReadWrite },
                if uni_dir { Direction::UniDir } else { Direction::BiDir },
                if fallible { Failure::Fallible } else { Failure::Pure },
            )
        },
    )
}

/// An `add` iso presenting arbitrary capabilities. An iso has both a writer
/// and a reverse, so any target is accepted.
fn shifted(amount: i32, capabilities: Capabilities) -> Optic<(), i32, i32, i32, i32> {
    reconstrain_unchecked(add(amount), capabilities)
}

#[derive(Clone, PartialEq, Debug)]
struct Point {
    x: i32,
    y: i32,
}

// =============================================================================
// Capability Merge
// =============================================================================

proptest! {
    #[test]
    fn prop_merge_is_commutative(left in capabilities(), right in capabilities()) {
        prop_assert_eq!(left.merge(right), right.merge(left));
    }

    #[test]
    fn prop_merge_is_associative(
        first in capabilities(),
        second in capabilities(),
        third in capabilities(),
    ) {
        prop_assert_eq!(
            first.merge(second).merge(third),
            first.merge(second.merge(third))
        );
    }

    #[test]
    fn prop_iso_is_merge_identity(value in capabilities()) {
        prop_assert_eq!(Capabilities::ISO.merge(value), value);
        prop_assert_eq!(value.merge(Capabilities::ISO), value);
    }

    #[test]
    fn prop_merge_implies_neither_operand_less(left in capabilities(), right in capabilities()) {
        let merged = left.merge(right);
        prop_assert!(left.implies(merged));
        prop_assert!(right.implies(merged));
    }

    #[test]
    fn prop_every_strategy_merges_capabilities(left in capabilities(), right in capabilities()) {
        let expected = left.merge(right);
        prop_assert_eq!(compose(shifted(1, left), shifted(2, right)).capabilities(), expected);
        prop_assert_eq!(compose_left(shifted(1, left), shifted(2, right)).capabilities(), expected);
        prop_assert_eq!(compose_both(shifted(1, left), shifted(2, right)).capabilities(), expected);
        prop_assert_eq!(
            compose_with(IxMapLeft, shifted(1, left), shifted(2, right)).capabilities(),
            expected
        );
    }
}

// =============================================================================
// Associativity And Identity
// =============================================================================

proptest! {
    #[test]
    fn prop_composition_is_associative(values in prop::collection::vec(any::<(i16, i16)>(), 0..8)) {
        let context = Context::background();
        let source: Vec<(i32, i16)> = values
            .into_iter()
            .map(|(first, second)| (i32::from(first), second))
            .collect();

        let grouped_left = compose(
            compose(traverse_vec::<(i32, i16), (i32, i16)>(), tuple_first()),
            add(3),
        );
        let grouped_right = compose(
            traverse_vec::<(i32, i16), (i32, i16)>(),
            compose(tuple_first(), add(3)),
        );

        prop_assert_eq!(grouped_left.capabilities(), grouped_right.capabilities());
        prop_assert_eq!(grouped_left.to_string(), grouped_right.to_string());
        prop_assert_eq!(
            grouped_left.collect(&context, &source).unwrap(),
            grouped_right.collect(&context, &source).unwrap()
        );
        prop_assert_eq!(
            grouped_left.modify(&context, source.clone(), |value| value * 2).unwrap(),
            grouped_right.modify(&context, source, |value| value * 2).unwrap()
        );
    }

    #[test]
    fn prop_identity_is_neutral(
        values in prop::collection::vec(any::<i32>(), 0..8),
        replacement in any::<i32>(),
    ) {
        let on_left = identity::<Vec<i32>>;
        let on_right = identity::<i32>;
        let every = traverse_vec::<i32, i32>;
        let unknown = |_: &()| None;
        let position = |index: &usize| Some(*index);

        check_neutral(&compose(on_left(), every()), position, &values, replacement)?;
        check_neutral(&compose(every(), on_right()), unknown, &values, replacement)?;
        check_neutral(&compose_left(on_left(), every()), unknown, &values, replacement)?;
        check_neutral(&compose_left(every(), on_right()), position, &values, replacement)?;
        check_neutral(
            &compose_both(on_left(), every()),
            |index: &IxPair<(), usize>| Some(index.right),
            &values,
            replacement,
        )?;
        check_neutral(
            &compose_both(every(), on_right()),
            |index: &IxPair<usize, ()>| Some(index.left),
            &values,
            replacement,
        )?;
        check_neutral(
            &compose_with(ix_map(|(): &(), column: &usize| *column), on_left(), every()),
            position,
            &values,
            replacement,
        )?;
        check_neutral(
            &compose_with(ix_map(|row: &usize, (): &()| *row), every(), on_right()),
            position,
            &values,
            replacement,
        )?;
    }

    #[test]
    fn prop_narrowed_identity_merges_capabilities(
        narrowed in capabilities(),
        values in prop::collection::vec(any::<i32>(), 0..8),
    ) {
        let context = Context::background();
        let on_left = || reconstrain_unchecked(identity::<Vec<i32>>(), narrowed);
        let on_right = || reconstrain_unchecked(identity::<i32>(), narrowed);
        let every = traverse_vec::<i32, i32>;
        let expected = narrowed.merge(every().capabilities());

        let composites = [
            compose(on_left(), every()).capabilities(),
            compose(every(), on_right()).capabilities(),
            compose_left(on_left(), every()).capabilities(),
            compose_left(every(), on_right()).capabilities(),
            compose_both(on_left(), every()).capabilities(),
            compose_both(every(), on_right()).capabilities(),
            compose_with(IxMapLeft, on_left(), every()).capabilities(),
            compose_with(IxMapRight, every(), on_right()).capabilities(),
        ];
        for actual in composites {
            prop_assert_eq!(actual, expected);
        }

        let through = compose(on_left(), every());
        prop_assert_eq!(through.collect(&context, &values).unwrap(), values.clone());
        if expected.is_writable() {
            prop_assert_eq!(
                through.modify(&context, values.clone(), |value| value.wrapping_add(1)).unwrap(),
                every().modify(&context, values, |value| value.wrapping_add(1)).unwrap()
            );
        }
    }
}

/// Checks that an elided composition behaves exactly like a plain vector
/// traversal. `position` recovers the element position from the composed
/// index, when the strategy keeps it.
fn check_neutral<I, P>(
    elided: &Optic<I, Vec<i32>, Vec<i32>, i32, i32>,
    position: P,
    values: &[i32],
    replacement: i32,
) -> Result<(), TestCaseError>
where
    I: Clone + Send + Sync + 'static,
    P: Fn(&I) -> Option<usize>,
{
    let context = Context::background();
    let every = traverse_vec::<i32, i32>();
    let source = values.to_vec();

    prop_assert_eq!(elided.to_string(), every.to_string());
    prop_assert_eq!(elided.capabilities(), every.capabilities());

    let focuses = elided.iterate(&context, &source).collect_indexed().unwrap();
    prop_assert_eq!(focuses.len(), source.len());
    for (offset, focus) in focuses.iter().enumerate() {
        prop_assert_eq!(focus.value, source[offset]);
        if let Some(index) = position(&focus.index) {
            prop_assert_eq!(index, offset);
        }
    }

    prop_assert_eq!(
        elided.set(&context, source.clone(), replacement).unwrap(),
        every.set(&context, source.clone(), replacement).unwrap()
    );
    prop_assert_eq!(
        elided.modify(&context, source.clone(), |value| value.wrapping_mul(3)).unwrap(),
        every.modify(&context, source, |value| value.wrapping_mul(3)).unwrap()
    );
    Ok(())
}

// =============================================================================
// Leaf Laws
// =============================================================================

proptest! {
    /// GetPut: setting what was read leaves the source unchanged.
    #[test]
    fn prop_lens_get_put(x in any::<i32>(), y in any::<i32>()) {
        let context = Context::background();
        let x_lens = lens!(Point, x);
        let point = Point { x, y };
        let value = x_lens.get(&context, &point).unwrap();
        prop_assert_eq!(x_lens.set(&context, point.clone(), value).unwrap(), point);
    }

    /// PutGet: reading after a set returns the value set.
    #[test]
    fn prop_lens_put_get(x in any::<i32>(), y in any::<i32>(), value in any::<i32>()) {
        let context = Context::background();
        let y_lens = lens!(Point, y);
        let updated = y_lens.set(&context, Point { x, y }, value).unwrap();
        prop_assert_eq!(y_lens.get(&context, &updated).unwrap(), value);
    }

    /// PutPut: the second of two sets wins.
    #[test]
    fn prop_lens_put_put(x in any::<i32>(), first in any::<i32>(), second in any::<i32>()) {
        let context = Context::background();
        let x_lens = lens!(Point, x);
        let point = Point { x, y: 0 };
        let twice = x_lens
            .set(&context, x_lens.set(&context, point.clone(), first).unwrap(), second)
            .unwrap();
        prop_assert_eq!(twice, x_lens.set(&context, point, second).unwrap());
    }

    /// Reverse then get round-trips through an iso.
    #[test]
    fn prop_iso_round_trip(value in -1_000_000_i32..1_000_000, amount in -1_000_i32..1_000) {
        let context = Context::background();
        let shift = add(amount);
        let source = shift.reverse_get(&context, value).unwrap();
        prop_assert_eq!(shift.get(&context, &source).unwrap(), value);
    }

    /// Modifying with the identity function leaves a traversal's source intact.
    #[test]
    fn prop_traversal_identity_modify(values in prop::collection::vec(any::<i64>(), 0..16)) {
        let context = Context::background();
        let every = traverse_vec::<i64, i64>();
        prop_assert_eq!(every.modify(&context, values.clone(), |value| value).unwrap(), values);
    }

    /// Two modifies compose into one.
    #[test]
    fn prop_traversal_modify_composition(values in prop::collection::vec(-1000_i64..1000, 0..16)) {
        let context = Context::background();
        let every = traverse_vec::<i64, i64>();
        let twice = every
            .modify(&context, every.modify(&context, values.clone(), |value| value + 1).unwrap(), |value| value * 3)
            .unwrap();
        let once = every.modify(&context, values, |value| (value + 1) * 3).unwrap();
        prop_assert_eq!(twice, once);
    }

    /// Length agrees with the number of collected focuses.
    #[test]
    fn prop_length_matches_collect(values in prop::collection::vec(any::<u8>(), 0..32)) {
        let context = Context::background();
        let every = traverse_vec::<u8, u8>();
        prop_assert_eq!(
            every.length(&context, &values).unwrap(),
            every.collect(&context, &values).unwrap().len()
        );
    }
}
