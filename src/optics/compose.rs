//! Composition strategies.
//!
//! Every strategy merges the capabilities of both operands with
//! [`Capabilities::merge`](super::Capabilities::merge); they differ only in
//! the index of the result:
//!
//! | Strategy | Result index | Mapper |
//! |---|---|---|
//! | [`compose`] | right index | [`IxMapRight`] |
//! | [`compose_left`] | left index | [`IxMapLeft`] |
//! | [`compose_both`] | [`IxPair<IL, IR>`] | [`IxMapBoth`] |
//! | [`compose_with`] | caller defined | any [`IxMapper`] |
//!
//! # Identity Elision
//!
//! Composing with [`identity`](super::identity) never builds a composition
//! node. [`compose`] and [`compose_left`] return the other operand itself,
//! or a transparent copy of it re-indexed to the unit index.
//! [`compose_both`] and [`compose_with`] return the other operand re-indexed
//! through the mapper.
//!
//! # Example
//!
//! ```
//! use opticore::optics::{Context, IxPair, compose_both, traverse_vec};
//!
//! let context = Context::background();
//! let cells = compose_both(traverse_vec::<Vec<char>, Vec<char>>(), traverse_vec::<char, char>());
//! let grid = vec![vec!['a', 'b'], vec!['c']];
//!
//! let indexed = cells.iterate(&context, &grid).collect_indexed().unwrap();
//! assert_eq!(indexed[2].index, IxPair::new(1, 0));
//! assert_eq!(indexed[2].value, 'c');
//! ```

use std::any::Any;
use std::ops::ControlFlow;
use std::sync::Arc;

use super::error::OpticError;
use super::expression::Expression;
use super::ixmap::{IxMapBoth, IxMapLeft, IxMapRight, IxMapper, IxPair};
use super::optic::{IterateFn, Optic};
use super::sequence::Indexed;

type MapFn<I, J> = Arc<dyn Fn(&I) -> J + Send + Sync>;
type UnmapFn<J, I> = Arc<dyn Fn(&J) -> Option<I> + Send + Sync>;

// =============================================================================
// Strategies
// =============================================================================

/// Sequential composition; the result is indexed by the right operand.
///
/// # Example
///
/// ```
/// use opticore::optics::{Context, add, compose, traverse_vec};
///
/// let shifted = compose(traverse_vec::<i32, i32>(), add(5));
/// assert_eq!(shifted.to_string(), "Traverse | Add(5)");
/// assert_eq!(shifted.get_first(&Context::background(), &vec![10, 20, 30]).unwrap(), Some(15));
/// ```
pub fn compose<IL, IR, S, T, M, N, A, B>(
    left: Optic<IL, S, T, M, N>,
    right: Optic<IR, M, N, A, B>,
) -> Optic<IR, S, T, A, B>
where
    IL: Clone + Send + Sync + 'static,
    IR: Clone + Send + Sync + 'static,
    S: 'static,
    T: 'static,
    M: 'static,
    N: 'static,
    A: 'static,
    B: 'static,
{
    composed("Compose", IxMapRight, left, right)
}

/// Composition indexed by the left operand.
pub fn compose_left<IL, IR, S, T, M, N, A, B>(
    left: Optic<IL, S, T, M, N>,
    right: Optic<IR, M, N, A, B>,
) -> Optic<IL, S, T, A, B>
where
    IL: Clone + Send + Sync + 'static,
    IR: Clone + Send + Sync + 'static,
    S: 'static,
    T: 'static,
    M: 'static,
    N: 'static,
    A: 'static,
    B: 'static,
{
    composed("ComposeLeft", IxMapLeft, left, right)
}

/// Composition indexed by both operands. The pair mapper is lossless, so
/// [`Optic::index`] can look up through both operands directly.
pub fn compose_both<IL, IR, S, T, M, N, A, B>(
    left: Optic<IL, S, T, M, N>,
    right: Optic<IR, M, N, A, B>,
) -> Optic<IxPair<IL, IR>, S, T, A, B>
where
    IL: Clone + Send + Sync + 'static,
    IR: Clone + Send + Sync + 'static,
    S: 'static,
    T: 'static,
    M: 'static,
    N: 'static,
    A: 'static,
    B: 'static,
{
    composed("ComposeBoth", IxMapBoth, left, right)
}

/// Composition with a caller supplied [`IxMapper`].
///
/// # Example
///
/// ```
/// use opticore::optics::{Context, compose_with, ix_map, traverse_vec};
///
/// let flat = compose_with(
///     ix_map(|row: &usize, column: &usize| row * 10 + column),
///     traverse_vec::<Vec<i32>, Vec<i32>>(),
///     traverse_vec::<i32, i32>(),
/// );
/// let grid = vec![vec![1, 2], vec![3]];
/// let indices: Vec<usize> = flat
///     .iterate(&Context::background(), &grid)
///     .collect_indexed()
///     .unwrap()
///     .into_iter()
///     .map(|indexed| indexed.index)
///     .collect();
/// assert_eq!(indices, vec![0, 1, 10]);
/// ```
pub fn compose_with<X, IL, IR, I, S, T, M, N, A, B>(
    mapper: X,
    left: Optic<IL, S, T, M, N>,
    right: Optic<IR, M, N, A, B>,
) -> Optic<I, S, T, A, B>
where
    X: IxMapper<IL, IR, I>,
    IL: Clone + Send + Sync + 'static,
    IR: Clone + Send + Sync + 'static,
    I: 'static,
    S: 'static,
    T: 'static,
    M: 'static,
    N: 'static,
    A: 'static,
    B: 'static,
{
    composed("ComposeWith", mapper, left, right)
}

impl<I, S, T, A, B> Optic<I, S, T, A, B>
where
    I: Clone + Send + Sync + 'static,
    S: 'static,
    T: 'static,
    A: 'static,
    B: 'static,
{
    /// Method form of [`compose`].
    #[must_use]
    pub fn compose<IR, C, D>(self, right: Optic<IR, A, B, C, D>) -> Optic<IR, S, T, C, D>
    where
        IR: Clone + Send + Sync + 'static,
        C: 'static,
        D: 'static,
    {
        compose(self, right)
    }

    /// Method form of [`compose_left`].
    #[must_use]
    pub fn compose_left<IR, C, D>(self, right: Optic<IR, A, B, C, D>) -> Optic<I, S, T, C, D>
    where
        IR: Clone + Send + Sync + 'static,
        C: 'static,
        D: 'static,
    {
        compose_left(self, right)
    }

    /// Method form of [`compose_both`].
    #[must_use]
    pub fn compose_both<IR, C, D>(
        self,
        right: Optic<IR, A, B, C, D>,
    ) -> Optic<IxPair<I, IR>, S, T, C, D>
    where
        IR: Clone + Send + Sync + 'static,
        C: 'static,
        D: 'static,
    {
        compose_both(self, right)
    }
}

// =============================================================================
// Re-indexing
// =============================================================================

/// Changes the index of `optic` with `map`.
///
/// The result is transparent: it keeps the expression of `optic` and adds no
/// entry to error paths. Index lookup on the result scans, because `map`
/// cannot be inverted.
///
/// # Example
///
/// ```
/// use opticore::optics::{Context, reindexed, traverse_vec};
///
/// let labelled = reindexed(traverse_vec::<i32, i32>(), |position: &usize| format!("#{position}"));
/// let rendered = labelled.iterate(&Context::background(), &vec![7, 8]).render().unwrap();
/// assert_eq!(rendered, "Seq[#0:7 #1:8]");
/// ```
pub fn reindexed<I, J, S, T, A, B, F>(optic: Optic<I, S, T, A, B>, map: F) -> Optic<J, S, T, A, B>
where
    I: 'static,
    J: 'static,
    S: 'static,
    T: 'static,
    A: 'static,
    B: 'static,
    F: Fn(&I) -> J + Send + Sync + 'static,
{
    reindex(optic, Arc::new(map), None)
}

/// Like [`reindexed`], with an inverse that keeps direct index lookup
/// available.
pub fn reindexed_with_unmap<I, J, S, T, A, B, F, U>(
    optic: Optic<I, S, T, A, B>,
    map: F,
    unmap: U,
) -> Optic<J, S, T, A, B>
where
    I: 'static,
    J: 'static,
    S: 'static,
    T: 'static,
    A: 'static,
    B: 'static,
    F: Fn(&I) -> J + Send + Sync + 'static,
    U: Fn(&J) -> Option<I> + Send + Sync + 'static,
{
    reindex(optic, Arc::new(map), Some(Arc::new(unmap)))
}

fn reindex<I, J, S, T, A, B>(
    optic: Optic<I, S, T, A, B>,
    map: MapFn<I, J>,
    unmap: Option<UnmapFn<J, I>>,
) -> Optic<J, S, T, A, B>
where
    I: 'static,
    J: 'static,
    S: 'static,
    T: 'static,
    A: 'static,
    B: 'static,
{
    let inner = optic.clone();
    let forward = Arc::clone(&map);
    let iterate: IterateFn<J, S, A> = Arc::new(move |context, source, sink| {
        inner.drive(context, source, &mut |item| {
            sink(item.map(|Indexed { index, value }| Indexed::new(forward(&index), value)))
        })
    });
    let mut reindexed =
        Optic::from_iterate(optic.expression.clone(), optic.capabilities, iterate).transparent();

    if optic.modify.is_some() {
        let inner = optic.clone();
        let forward = Arc::clone(&map);
        reindexed = reindexed.with_modify_fn(Arc::new(move |context, source, function| {
            inner.drive_modify(context, source, &mut |index, value| function(&forward(index), value))
        }));
    }
    if optic.reverse.is_some() {
        let inner = optic.clone();
        reindexed = reindexed
            .with_reverse_fn(Arc::new(move |context, value| inner.drive_reverse(context, value)));
    }
    if optic.length.is_some() {
        let inner = optic.clone();
        reindexed = reindexed
            .with_length_fn(Arc::new(move |context, source| inner.drive_length(context, source)));
    }
    if let Some(unmap) = unmap.filter(|_| optic.lookup.is_some()) {
        let inner = optic;
        reindexed = reindexed.with_lookup_fn(Arc::new(move |context, source, index| {
            unmap(index).map_or(Ok(None), |original| {
                inner
                    .direct_lookup(context, source, &original)
                    .unwrap_or(Ok(None))
            })
        }));
    }
    reindexed
}

// =============================================================================
// Composition core
// =============================================================================

fn cast<X: 'static, Y: Clone + 'static>(value: &X) -> Option<Y> {
    (value as &dyn Any).downcast_ref::<Y>().cloned()
}

fn elide<X, IL, IR, I, S, T, M, N, A, B>(
    mapper: &Arc<X>,
    left: &Optic<IL, S, T, M, N>,
    right: &Optic<IR, M, N, A, B>,
) -> Option<Optic<I, S, T, A, B>>
where
    X: IxMapper<IL, IR, I>,
    IL: Clone + Send + Sync + 'static,
    IR: Clone + Send + Sync + 'static,
    I: 'static,
    S: 'static,
    T: 'static,
    M: 'static,
    N: 'static,
    A: 'static,
    B: 'static,
{
    if left.is_identity() {
        if let Some(operand) = cast::<_, Optic<I, S, T, A, B>>(right) {
            return Some(operand);
        }
        let unit: IL = cast(&())?;
        let (forward, backward) = (Arc::clone(mapper), Arc::clone(mapper));
        let map: MapFn<IR, I> = Arc::new(move |right_index| forward.map(&unit, right_index));
        let unmap = mapper.is_lossless().then(|| {
            Arc::new(move |index: &I| backward.unmap(index).map(|(_, right_index)| right_index))
                as UnmapFn<I, IR>
        });
        return cast(&reindex(right.clone(), map, unmap));
    }
    if right.is_identity() {
        if let Some(operand) = cast::<_, Optic<I, S, T, A, B>>(left) {
            return Some(operand);
        }
        let unit: IR = cast(&())?;
        let (forward, backward) = (Arc::clone(mapper), Arc::clone(mapper));
        let map: MapFn<IL, I> = Arc::new(move |left_index| forward.map(left_index, &unit));
        let unmap = mapper.is_lossless().then(|| {
            Arc::new(move |index: &I| backward.unmap(index).map(|(left_index, _)| left_index))
                as UnmapFn<I, IL>
        });
        return cast(&reindex(left.clone(), map, unmap));
    }
    None
}

fn composed<X, IL, IR, I, S, T, M, N, A, B>(
    name: &'static str,
    mapper: X,
    left: Optic<IL, S, T, M, N>,
    right: Optic<IR, M, N, A, B>,
) -> Optic<I, S, T, A, B>
where
    X: IxMapper<IL, IR, I>,
    IL: Clone + Send + Sync + 'static,
    IR: Clone + Send + Sync + 'static,
    I: 'static,
    S: 'static,
    T: 'static,
    M: 'static,
    N: 'static,
    A: 'static,
    B: 'static,
{
    let mapper = Arc::new(mapper);
    if let Some(elided) = elide(&mapper, &left, &right) {
        tracing::trace!(left = %left.expression, right = %right.expression, "elided identity in {name}");
        return elided;
    }

    let expression = Expression::composition(name, left.expression.clone(), right.expression.clone());
    let capabilities = left.capabilities.merge(right.capabilities);
    tracing::trace!(optic = %expression, %capabilities, "composed optic");

    let (outer, inner, ix) = (left.clone(), right.clone(), Arc::clone(&mapper));
    let iterate: IterateFn<I, S, A> = Arc::new(move |context, source, sink| {
        outer.drive(context, source, &mut |item| match item {
            Ok(Indexed {
                index: left_index,
                value: middle,
            }) => inner.drive(context, &middle, &mut |item| match item {
                Ok(Indexed {
                    index: right_index,
                    value,
                }) => sink(Ok(Indexed::new(ix.map(&left_index, &right_index), value))),
                Err(error) => sink(Err(error.through(&outer.expression))),
            }),
            Err(error) => sink(Err(error)),
        })
    });
    let mut optic = Optic::from_iterate(expression, capabilities, iterate).transparent();

    if left.modify.is_some() && right.modify.is_some() {
        let (outer, inner, ix) = (left.clone(), right.clone(), Arc::clone(&mapper));
        optic = optic.with_modify_fn(Arc::new(move |context, source, function| {
            outer.drive_modify(context, source, &mut |left_index, middle| {
                inner.drive_modify(context, middle, &mut |right_index, value| {
                    function(&ix.map(left_index, right_index), value)
                })
            })
        }));
    }

    if left.reverse.is_some() && right.reverse.is_some() {
        let (outer, inner) = (left.clone(), right.clone());
        optic = optic.with_reverse_fn(Arc::new(move |context, value| {
            let middle = inner
                .drive_reverse(context, value)
                .map_err(|error| error.through(&outer.expression))?;
            outer.drive_reverse(context, middle)
        }));
    }

    if right.length.is_some() {
        let (outer, inner) = (left.clone(), right.clone());
        optic = optic.with_length_fn(Arc::new(move |context, source| {
            let mut total = 0;
            let mut failure: Option<OpticError> = None;
            let _ = outer.drive(context, source, &mut |item| {
                let counted = item.and_then(|Indexed { value: middle, .. }| {
                    inner
                        .drive_length(context, &middle)
                        .map_err(|error| error.through(&outer.expression))
                });
                match counted {
                    Ok(count) => {
                        total += count;
                        ControlFlow::Continue(())
                    }
                    Err(error) => {
                        failure = Some(error);
                        ControlFlow::Break(())
                    }
                }
            });
            failure.map_or(Ok(total), Err)
        }));
    }

    if mapper.is_lossless() && left.lookup.is_some() && right.lookup.is_some() {
        let (outer, inner, ix) = (left, right, mapper);
        optic = optic.with_lookup_fn(Arc::new(move |context, source, index| {
            let Some((left_index, right_index)) = ix.unmap(index) else {
                return Ok(None);
            };
            let Some(middle) = outer
                .direct_lookup(context, source, &left_index)
                .unwrap_or(Ok(None))?
            else {
                return Ok(None);
            };
            inner
                .direct_lookup(context, &middle, &right_index)
                .unwrap_or(Ok(None))
                .map_err(|error| error.through(&outer.expression))
        }));
    }

    optic
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optics::{
        Capabilities, Context, add, getter, identity, lens, prism, traverse_btree_map, traverse_vec,
    };
    use rstest::rstest;
    use std::collections::BTreeMap;

    fn first_of_pair() -> Optic<(), (i32, i32), (i32, i32), i32, i32> {
        lens(
            "First",
            |pair: &(i32, i32)| pair.0,
            |pair: (i32, i32), value: i32| (value, pair.1),
        )
    }

    #[rstest]
    fn test_capabilities_merge_across_strategies() {
        let length = getter("Len", |text: &String| text.len());
        let strings = traverse_vec::<String, String>();
        let expected = Capabilities::FOLD;
        assert_eq!(compose(strings.clone(), length.clone()).capabilities(), expected);
        assert_eq!(compose_left(strings.clone(), length.clone()).capabilities(), expected);
        assert_eq!(compose_both(strings, length).capabilities(), expected);
    }

    #[rstest]
    fn test_identity_is_elided_without_node() {
        let composed = compose(identity::<(i32, i32)>(), first_of_pair());
        assert_eq!(composed.to_string(), "First");
        let composed = compose(first_of_pair(), identity::<i32>());
        assert_eq!(composed.to_string(), "First");
        assert!(!composed.expression().is_composition());
    }

    #[rstest]
    fn test_identity_both_reindexes_through_mapper() {
        let elided = compose_both(identity::<Vec<i32>>(), traverse_vec::<i32, i32>());
        let indexed = elided
            .iterate(&Context::background(), &vec![4, 5])
            .collect_indexed()
            .unwrap();
        assert_eq!(elided.to_string(), "Traverse");
        assert_eq!(indexed[1].index, IxPair::new((), 1));
        assert!(elided.has_index_lookup());
    }

    #[rstest]
    fn test_compose_left_keeps_outer_index() {
        let optic = compose_left(traverse_btree_map::<&str, i32, i32>(), add(1));
        let source: BTreeMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
        let rendered = optic.iterate(&Context::background(), &source).render().unwrap();
        assert_eq!(rendered, "Seq[a:2 b:3]");
    }

    #[rstest]
    fn test_both_lookup_goes_through_operands() {
        let cells = compose_both(
            traverse_btree_map::<String, Vec<i32>, Vec<i32>>(),
            traverse_vec::<i32, i32>(),
        );
        assert!(cells.has_index_lookup());
        let source: BTreeMap<String, Vec<i32>> =
            [("x".to_string(), vec![1, 2]), ("y".to_string(), vec![3])].into_iter().collect();
        let cell = cells.index(IxPair::new("x".to_string(), 1));
        assert_eq!(cell.get(&Context::background(), &source).unwrap(), 2);
    }

    #[rstest]
    fn test_length_sums_cheap_right_lengths() {
        let cells = compose(traverse_vec::<Vec<i32>, Vec<i32>>(), traverse_vec::<i32, i32>());
        assert!(cells.has_cheap_length());
        let grid = vec![vec![1, 2, 3], vec![], vec![4]];
        assert_eq!(cells.length(&Context::background(), &grid).unwrap(), 4);
    }

    #[rstest]
    fn test_reverse_through_prism_and_iso() {
        let some = prism("Some", |option: &Option<i32>| *option, Some);
        let shifted = compose(some, add(10));
        assert_eq!(shifted.reverse_get(&Context::background(), 5).unwrap(), Some(-5));
    }

    #[rstest]
    fn test_read_only_operand_drops_modify() {
        let length = getter("Len", |text: &String| text.len());
        let composed = compose(traverse_vec::<String, String>(), length);
        assert!(!composed.capabilities().is_writable());
        assert!(composed.modify.is_none());
    }
}
