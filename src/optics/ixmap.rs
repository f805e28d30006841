//! Index mappers for composition.
//!
//! Composing `left: Optic<IL, ..>` with `right: Optic<IR, ..>` yields an optic
//! whose index is computed from both component indices by an [`IxMapper`].
//!
//! A mapper that can also split a combined index back into its components
//! (`unmap`) is *lossless*. Lossless mappers let a composed
//! [`index`](super::Optic::index) lookup jump straight to the focus through
//! both operands; lossy mappers force a linear scan.
//!
//! | Mapper | Result index | Lossless |
//! |---|---|---|
//! | [`IxMapLeft`] | `IL` | no |
//! | [`IxMapRight`] | `IR` | no |
//! | [`IxMapBoth`] | [`IxPair<IL, IR>`] | yes |
//! | [`IxMapFn`] | any | no |
//! | [`IxMapFnUnmap`] | any | yes |
//!
//! # Examples
//!
//! ```
//! use opticore::optics::{IxMapBoth, IxMapper, IxPair};
//!
//! let pair = IxMapBoth.map(&"alpha", &1_usize);
//! assert_eq!(pair.to_string(), "{alpha 1}");
//! assert_eq!(IxMapBoth.unmap(&pair), Some(("alpha", 1)));
//! ```

use std::fmt;

/// Combines the indices of two composed optics.
pub trait IxMapper<IL, IR, I>: Send + Sync + 'static {
    /// Combines a left and a right index.
    fn map(&self, left: &IL, right: &IR) -> I;

    /// Splits a combined index. Lossy mappers return `None`.
    fn unmap(&self, index: &I) -> Option<(IL, IR)> {
        let _ = index;
        None
    }

    /// `true` if [`unmap`](Self::unmap) is supported.
    fn is_lossless(&self) -> bool {
        false
    }
}

/// A pair of component indices, rendered as `{left right}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IxPair<L, R> {
    /// The outer (left) index.
    pub left: L,
    /// The inner (right) index.
    pub right: R,
}

impl<L, R> IxPair<L, R> {
    /// Pairs two indices.
    pub const fn new(left: L, right: R) -> Self {
        Self { left, right }
    }
}

impl<L: fmt::Display, R: fmt::Display> fmt::Display for IxPair<L, R> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{{} {}}}", self.left, self.right)
    }
}

/// Keeps the left index.
#[derive(Debug, Clone, Copy, Default)]
pub struct IxMapLeft;

impl<IL, IR> IxMapper<IL, IR, IL> for IxMapLeft
where
    IL: Clone,
{
    fn map(&self, left: &IL, _right: &IR) -> IL {
        left.clone()
    }
}

/// Keeps the right index.
#[derive(Debug, Clone, Copy, Default)]
pub struct IxMapRight;

impl<IL, IR> IxMapper<IL, IR, IR> for IxMapRight
where
    IR: Clone,
{
    fn map(&self, _left: &IL, right: &IR) -> IR {
        right.clone()
    }
}

/// Keeps both indices as an [`IxPair`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IxMapBoth;

impl<IL, IR> IxMapper<IL, IR, IxPair<IL, IR>> for IxMapBoth
where
    IL: Clone,
    IR: Clone,
{
    fn map(&self, left: &IL, right: &IR) -> IxPair<IL, IR> {
        IxPair::new(left.clone(), right.clone())
    }

    fn unmap(&self, index: &IxPair<IL, IR>) -> Option<(IL, IR)> {
        Some((index.left.clone(), index.right.clone()))
    }

    fn is_lossless(&self) -> bool {
        true
    }
}

/// A lossy mapper built from a function.
#[derive(Clone, Copy)]
pub struct IxMapFn<F>(F);

impl<F> fmt::Debug for IxMapFn<F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("IxMapFn(..)")
    }
}

impl<IL, IR, I, F> IxMapper<IL, IR, I> for IxMapFn<F>
where
    F: Fn(&IL, &IR) -> I + Send + Sync + 'static,
{
    fn map(&self, left: &IL, right: &IR) -> I {
        (self.0)(left, right)
    }
}

/// A lossless mapper built from a function and its inverse.
#[derive(Clone, Copy)]
pub struct IxMapFnUnmap<F, U> {
    map: F,
    unmap: U,
}

impl<F, U> fmt::Debug for IxMapFnUnmap<F, U> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("IxMapFnUnmap(..)")
    }
}

impl<IL, IR, I, F, U> IxMapper<IL, IR, I> for IxMapFnUnmap<F, U>
where
    F: Fn(&IL, &IR) -> I + Send + Sync + 'static,
    U: Fn(&I) -> Option<(IL, IR)> + Send + Sync + 'static,
{
    fn map(&self, left: &IL, right: &IR) -> I {
        (self.map)(left, right)
    }

    fn unmap(&self, index: &I) -> Option<(IL, IR)> {
        (self.unmap)(index)
    }

    fn is_lossless(&self) -> bool {
        true
    }
}

/// Creates a lossy mapper from `map`.
///
/// # Example
///
/// ```
/// use opticore::optics::{IxMapper, ix_map};
///
/// let flatten = ix_map(|row: &usize, column: &usize| row * 10 + column);
/// assert_eq!(flatten.map(&2, &3), 23);
/// assert!(!IxMapper::<usize, usize, usize>::is_lossless(&flatten));
/// ```
pub const fn ix_map<F>(map: F) -> IxMapFn<F> {
    IxMapFn(map)
}

/// Creates a lossless mapper from `map` and its inverse `unmap`.
pub const fn ix_map_with_unmap<F, U>(map: F, unmap: U) -> IxMapFnUnmap<F, U> {
    IxMapFnUnmap { map, unmap }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_left_and_right() {
        assert_eq!(IxMapLeft.map(&"outer", &7), "outer");
        assert_eq!(IxMapRight.map(&"outer", &7), 7);
        assert_eq!(IxMapper::<&str, i32, i32>::unmap(&IxMapRight, &7), None);
    }

    #[rstest]
    fn test_both_round_trips() {
        let pair = IxMapBoth.map(&3_usize, &'x');
        assert_eq!(IxMapBoth.unmap(&pair), Some((3, 'x')));
        assert!(IxMapper::<usize, char, IxPair<usize, char>>::is_lossless(
            &IxMapBoth
        ));
    }

    #[rstest]
    fn test_fn_with_unmap() {
        let mapper = ix_map_with_unmap(
            |row: &usize, column: &usize| row * 10 + column,
            |flat: &usize| Some((flat / 10, flat % 10)),
        );
        assert_eq!(mapper.map(&4, &2), 42);
        assert_eq!(mapper.unmap(&42), Some((4, 2)));
        assert!(IxMapper::<usize, usize, usize>::is_lossless(&mapper));
    }

    #[rstest]
    #[case(IxPair::new(1, 2), "{1 2}")]
    #[case(IxPair::new(10, 0), "{10 0}")]
    fn test_pair_display(#[case] pair: IxPair<i32, i32>, #[case] expected: &str) {
        assert_eq!(pair.to_string(), expected);
    }
}
