//! Element-wise traversals of standard containers.
//!
//! Every traversal in this module renders as `Traverse`, advertises a cheap
//! length and a direct key lookup, and rebuilds the container with the same
//! keys in the same order. Replacement values may change type.
//!
//! | Container | Index | Order |
//! |---|---|---|
//! | [`Vec<A>`] | position | positional |
//! | [`BTreeMap<K, V>`] | key | ascending key |
//! | [`HashMap<K, V>`] | key | unspecified |
//! | [`Option<A>`] | `()` | zero or one focus |
//!
//! The [`Each`] trait picks the type-preserving traversal for a container
//! type.
//!
//! # Examples
//!
//! ```
//! use opticore::optics::{Context, Each};
//!
//! let context = Context::background();
//! let every = <Vec<i32> as Each>::each();
//!
//! assert_eq!(every.collect(&context, &vec![1, 2, 3]).unwrap(), vec![1, 2, 3]);
//! assert_eq!(every.modify(&context, vec![1, 2, 3], |value| value * 2).unwrap(), vec![2, 4, 6]);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::hash::Hash;
use std::ops::ControlFlow;
use std::sync::Arc;

use super::capability::Capabilities;
use super::expression::Expression;
use super::optic::{IterateFn, Optic, SimpleOptic};
use super::sequence::Indexed;

fn traverse_expression() -> Expression {
    Expression::new("Traverse")
}

/// Traverses the elements of a vector, indexed by position.
pub fn traverse_vec<A, B>() -> Optic<usize, Vec<A>, Vec<B>, A, B>
where
    A: Clone + 'static,
    B: 'static,
{
    let iterate: IterateFn<usize, Vec<A>, A> = Arc::new(|_, source, sink| {
        for (position, value) in source.iter().enumerate() {
            sink(Ok(Indexed::new(position, value.clone())))?;
        }
        ControlFlow::Continue(())
    });

    Optic::from_iterate(traverse_expression(), Capabilities::TRAVERSAL, iterate)
        .with_modify_fn(Arc::new(|_, source, function| {
            source
                .into_iter()
                .enumerate()
                .map(|(position, value)| function(&position, value))
                .collect()
        }))
        .with_length(Vec::len)
        .with_index_lookup(|source, position| source.get(*position).cloned())
}

/// Traverses the values of a [`BTreeMap`] in ascending key order, indexed by
/// key.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
///
/// use opticore::optics::{Context, traverse_btree_map};
///
/// let scores: BTreeMap<&str, u32> = [("bob", 3), ("amy", 5)].into_iter().collect();
/// let every = traverse_btree_map::<&str, u32, String>();
///
/// let context = Context::background();
/// assert_eq!(every.iterate(&context, &scores).render().unwrap(), "Seq[amy:5 bob:3]");
///
/// let labelled = every.modify(&context, scores, |score| format!("{score} pts")).unwrap();
/// assert_eq!(labelled["amy"], "5 pts");
/// ```
pub fn traverse_btree_map<K, V, W>() -> Optic<K, BTreeMap<K, V>, BTreeMap<K, W>, V, W>
where
    K: Ord + Clone + 'static,
    V: Clone + 'static,
    W: 'static,
{
    let iterate: IterateFn<K, BTreeMap<K, V>, V> = Arc::new(|_, source, sink| {
        for (key, value) in source {
            sink(Ok(Indexed::new(key.clone(), value.clone())))?;
        }
        ControlFlow::Continue(())
    });

    Optic::from_iterate(traverse_expression(), Capabilities::TRAVERSAL, iterate)
        .with_modify_fn(Arc::new(|_, source, function| {
            source
                .into_iter()
                .map(|(key, value)| function(&key, value).map(|value| (key, value)))
                .collect()
        }))
        .with_length(BTreeMap::len)
        .with_index_lookup(|source, key| source.get(key).cloned())
}

/// Traverses the values of a [`HashMap`], indexed by key.
///
/// Iteration order is the map's own, which is unspecified.
pub fn traverse_hash_map<K, V, W>() -> Optic<K, HashMap<K, V>, HashMap<K, W>, V, W>
where
    K: Eq + Hash + Clone + 'static,
    V: Clone + 'static,
    W: 'static,
{
    let iterate: IterateFn<K, HashMap<K, V>, V> = Arc::new(|_, source, sink| {
        for (key, value) in source {
            sink(Ok(Indexed::new(key.clone(), value.clone())))?;
        }
        ControlFlow::Continue(())
    });

    Optic::from_iterate(traverse_expression(), Capabilities::TRAVERSAL, iterate)
        .with_modify_fn(Arc::new(|_, source, function| {
            source
                .into_iter()
                .map(|(key, value)| function(&key, value).map(|value| (key, value)))
                .collect()
        }))
        .with_length(HashMap::len)
        .with_index_lookup(|source, key| source.get(key).cloned())
}

/// Traverses the value of an [`Option`], if any.
pub fn traverse_option<A, B>() -> Optic<(), Option<A>, Option<B>, A, B>
where
    A: Clone + 'static,
    B: 'static,
{
    let iterate: IterateFn<(), Option<A>, A> = Arc::new(|_, source, sink| match source {
        Some(value) => sink(Ok(Indexed::new((), value.clone()))),
        None => ControlFlow::Continue(()),
    });

    Optic::from_iterate(traverse_expression(), Capabilities::TRAVERSAL, iterate)
        .with_modify_fn(Arc::new(|_, source, function| {
            source.map(|value| function(&(), value)).transpose()
        }))
        .with_length(|source| usize::from(source.is_some()))
        .with_index_lookup(|source, ()| source.clone())
}

/// Containers with a canonical type-preserving traversal.
pub trait Each: Sized + 'static {
    /// The index of each element.
    type Index: PartialEq + Clone + Debug + Send + Sync + 'static;

    /// The element type.
    type Element: 'static;

    /// Returns the traversal over every element.
    fn each() -> SimpleOptic<Self::Index, Self, Self::Element>;
}

impl<A: Clone + 'static> Each for Vec<A> {
    type Index = usize;
    type Element = A;

    fn each() -> SimpleOptic<usize, Self, A> {
        traverse_vec()
    }
}

impl<K, V> Each for BTreeMap<K, V>
where
    K: Ord + Clone + Debug + Send + Sync + 'static,
    V: Clone + 'static,
{
    type Index = K;
    type Element = V;

    fn each() -> SimpleOptic<K, Self, V> {
        traverse_btree_map()
    }
}

impl<K, V> Each for HashMap<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    V: Clone + 'static,
{
    type Index = K;
    type Element = V;

    fn each() -> SimpleOptic<K, Self, V> {
        traverse_hash_map()
    }
}

impl<A: Clone + 'static> Each for Option<A> {
    type Index = ();
    type Element = A;

    fn each() -> SimpleOptic<(), Self, A> {
        traverse_option()
    }
}

/// Returns the canonical traversal of `C`.
///
/// # Example
///
/// ```
/// use opticore::optics::{Context, each};
///
/// let total: i32 = each::<Option<i32>>()
///     .collect(&Context::background(), &Some(4))
///     .unwrap()
///     .into_iter()
///     .sum();
/// assert_eq!(total, 4);
/// ```
pub fn each<C: Each>() -> SimpleOptic<C::Index, C, C::Element> {
    C::each()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optics::{Context, OpticError};
    use rstest::rstest;

    // =========================================================================
    // Vec
    // =========================================================================

    #[rstest]
    #[case(vec![], 0)]
    #[case(vec![4], 1)]
    #[case(vec![4, 5, 6], 3)]
    fn test_vec_length(#[case] source: Vec<i32>, #[case] expected: usize) {
        let every = traverse_vec::<i32, i32>();
        assert_eq!(every.length(&Context::background(), &source).unwrap(), expected);
    }

    #[rstest]
    fn test_vec_modify_changes_type() {
        let every = traverse_vec::<i32, String>();
        let rendered = every
            .modify(&Context::background(), vec![1, 2], |value| value.to_string())
            .unwrap();
        assert_eq!(rendered, vec!["1".to_string(), "2".to_string()]);
    }

    #[rstest]
    fn test_vec_modify_error_leaves_no_partial_result() {
        let every = traverse_vec::<i32, i32>();
        let error = every
            .modify_indexed(&Context::background(), vec![1, 2, 3], |position, value| {
                if *position == 1 {
                    Err(OpticError::message("second"))
                } else {
                    Ok(value)
                }
            })
            .unwrap_err();
        assert_eq!(error.to_string(), "second\noptic error path:\n\tTraverse\n");
    }

    #[rstest]
    fn test_vec_lookup_is_direct() {
        let every = traverse_vec::<char, char>();
        assert!(every.has_index_lookup());
        let at = every.index(2);
        assert_eq!(at.get(&Context::background(), &vec!['a', 'b', 'c']).unwrap(), 'c');
        assert_eq!(at.to_string(), "Index(Traverse,2)");
    }

    // =========================================================================
    // Maps
    // =========================================================================

    #[rstest]
    fn test_btree_map_iterates_in_key_order() {
        let source: BTreeMap<u8, char> = [(3, 'c'), (1, 'a'), (2, 'b')].into_iter().collect();
        let every = traverse_btree_map::<u8, char, char>();
        let values = every.collect(&Context::background(), &source).unwrap();
        assert_eq!(values, vec!['a', 'b', 'c']);
    }

    #[rstest]
    fn test_hash_map_modify_keeps_keys() {
        let source: HashMap<&str, i32> = [("x", 1), ("y", 2)].into_iter().collect();
        let every = each::<HashMap<&str, i32>>();
        let context = Context::background();
        let bumped = every.modify(&context, source, |value| value + 10).unwrap();
        assert_eq!(bumped["x"], 11);
        assert_eq!(bumped["y"], 12);
        assert_eq!(every.index("y").get(&context, &bumped).unwrap(), 12);
    }

    // =========================================================================
    // Option
    // =========================================================================

    #[rstest]
    #[case(Some(2), Some(3))]
    #[case(None, None)]
    fn test_option_modify(#[case] source: Option<i32>, #[case] expected: Option<i32>) {
        let every = traverse_option::<i32, i32>();
        assert_eq!(every.modify(&Context::background(), source, |value| value + 1).unwrap(), expected);
    }

    #[rstest]
    fn test_option_length() {
        let every = traverse_option::<i32, i32>();
        let context = Context::background();
        assert_eq!(every.length(&context, &Some(1)).unwrap(), 1);
        assert_eq!(every.length(&context, &None).unwrap(), 0);
    }
}
