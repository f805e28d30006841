//! Optics that gather focuses into a single collection.
//!
//! [`slice_of`] and [`col_of`] turn any optic into a cardinality One optic
//! whose focus is the list of everything the inner optic focuses on. When
//! the inner optic is writable, writing a list back replaces the focuses by
//! position; the list must keep its length.
//!
//! [`with_index`] keeps the cardinality and exposes each focus together
//! with its index.
//!
//! # Examples
//!
//! ```
//! use opticore::optics::{Context, slice_of, traverse_vec};
//!
//! let context = Context::background();
//! let all = slice_of(traverse_vec::<i32, i32>(), 4);
//!
//! assert_eq!(all.get(&context, &vec![3, 1, 2]).unwrap(), vec![3, 1, 2]);
//! let sorted = all
//!     .modify(&context, vec![3, 1, 2], |mut values| {
//!         values.sort_unstable();
//!         values
//!     })
//!     .unwrap();
//! assert_eq!(sorted, vec![1, 2, 3]);
//! ```

use std::fmt;
use std::ops::ControlFlow;
use std::sync::Arc;

use super::capability::{Cardinality, Direction, Failure};
use super::context::Context;
use super::error::OpticError;
use super::expression::Expression;
use super::optic::{IterateFn, Optic};
use super::sequence::Indexed;

// =============================================================================
// Col
// =============================================================================

/// An ordered collection of indexed values, rendered as `Col[k1:v1 k2:v2]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Col<I, A> {
    entries: Vec<Indexed<I, A>>,
}

impl<I, A> Default for Col<I, A> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<I, A> Col<I, A> {
    /// Creates an empty collection.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an entry.
    pub fn push(&mut self, index: I, value: A) {
        self.entries.push(Indexed::new(index, value));
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Indexed<I, A>> {
        self.entries.iter()
    }

    /// The value of the first entry with `index`.
    pub fn get(&self, index: &I) -> Option<&A>
    where
        I: PartialEq,
    {
        self.entries
            .iter()
            .find(|entry| entry.index == *index)
            .map(|entry| &entry.value)
    }

    /// The indices in order.
    pub fn indices(&self) -> impl Iterator<Item = &I> {
        self.entries.iter().map(|entry| &entry.index)
    }

    /// The values in order.
    pub fn values(&self) -> impl Iterator<Item = &A> {
        self.entries.iter().map(|entry| &entry.value)
    }

    /// Consumes the collection, keeping only the values.
    pub fn into_values(self) -> Vec<A> {
        self.entries.into_iter().map(|entry| entry.value).collect()
    }
}

impl<I, A> FromIterator<Indexed<I, A>> for Col<I, A> {
    fn from_iter<X: IntoIterator<Item = Indexed<I, A>>>(iter: X) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<I, A> IntoIterator for Col<I, A> {
    type Item = Indexed<I, A>;
    type IntoIter = std::vec::IntoIter<Indexed<I, A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a, I, A> IntoIterator for &'a Col<I, A> {
    type Item = &'a Indexed<I, A>;
    type IntoIter = std::slice::Iter<'a, Indexed<I, A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<I: fmt::Display, A: fmt::Display> fmt::Display for Col<I, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Col[")?;
        for (position, entry) in self.entries.iter().enumerate() {
            if position > 0 {
                formatter.write_str(" ")?;
            }
            write!(formatter, "{entry}")?;
        }
        formatter.write_str("]")
    }
}

// =============================================================================
// Gathering optics
// =============================================================================

/// Collects every focus of `optic` with its index.
fn gather<I, S, T, A, B>(
    optic: &Optic<I, S, T, A, B>,
    context: &Context,
    source: &S,
    capacity: usize,
) -> Result<Vec<Indexed<I, A>>, OpticError>
where
    I: 'static,
    S: 'static,
    T: 'static,
    A: 'static,
    B: 'static,
{
    let mut entries = Vec::with_capacity(capacity);
    let mut failure = None;
    let _ = optic.drive(context, source, &mut |item| match item {
        Ok(entry) => {
            entries.push(entry);
            ControlFlow::Continue(())
        }
        Err(error) => {
            failure = Some(error);
            ControlFlow::Break(())
        }
    });
    failure.map_or(Ok(entries), Err)
}

/// Builds the One optic shared by [`slice_of`] and [`col_of`]. `wrap` turns
/// the gathered entries into the focus and `unwrap` turns a replacement back
/// into one value per focus.
fn gathering<I, S, T, A, B, C, D>(
    expression: Expression,
    optic: Optic<I, S, T, A, B>,
    capacity: usize,
    wrap: fn(Vec<Indexed<I, A>>) -> C,
    unwrap: fn(D) -> Vec<B>,
) -> Optic<(), S, T, C, D>
where
    I: 'static,
    S: 'static,
    T: 'static,
    A: 'static,
    B: 'static,
    C: 'static,
    D: 'static,
{
    let writable = optic.capabilities.is_writable();
    let failure = if writable {
        Failure::Fallible
    } else {
        optic.capabilities.failure
    };
    let capabilities = optic
        .capabilities
        .with_cardinality(Cardinality::One)
        .with_direction(Direction::UniDir)
        .with_failure(failure);

    let inner = optic.clone();
    let iterate: IterateFn<(), S, C> = Arc::new(move |context, source, sink| {
        match gather(&inner, context, source, capacity) {
            Ok(entries) => sink(Ok(Indexed::new((), wrap(entries)))),
            Err(error) => sink(Err(error)),
        }
    });
    let gathered = Optic::from_iterate(expression, capabilities, iterate);
    if optic.modify.is_none() {
        return gathered;
    }

    gathered.with_modify_fn(Arc::new(move |context, source, function| {
        let entries = gather(&optic, context, &source, capacity)?;
        let expected = entries.len();
        let replacements = unwrap(function(&(), wrap(entries))?);
        if replacements.len() != expected {
            return Err(OpticError::message(format!(
                "replacement has {} elements, expected {expected}",
                replacements.len()
            )));
        }
        let mut replacements = replacements.into_iter();
        optic.drive_modify(context, source, &mut |_, _| {
            replacements
                .next()
                .ok_or_else(|| OpticError::message("optic produced more focuses on write than on read"))
        })
    }))
}

/// Gathers the focuses of `optic` into a `Vec`, reserving `capacity`.
///
/// The result has cardinality One and is one-way. It is writable when
/// `optic` is; a write is then fallible because the replacement must have
/// as many elements as were read.
pub fn slice_of<I, S, T, A, B>(
    optic: Optic<I, S, T, A, B>,
    capacity: usize,
) -> Optic<(), S, T, Vec<A>, Vec<B>>
where
    I: 'static,
    S: 'static,
    T: 'static,
    A: 'static,
    B: 'static,
{
    let expression = Expression::new("SliceOf")
        .child(optic.expression.clone())
        .param(capacity);
    gathering(
        expression,
        optic,
        capacity,
        |entries| entries.into_iter().map(|entry| entry.value).collect(),
        |values| values,
    )
}

/// Gathers the focuses of `optic` into a [`Col`] keyed by their indices.
///
/// Writing a `Col` back replaces the focuses by position; its indices are
/// ignored.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
///
/// use opticore::optics::{Context, col_of, traverse_btree_map};
///
/// let source: BTreeMap<&str, i32> = [("b", 2), ("a", 1)].into_iter().collect();
/// let entries = col_of(traverse_btree_map::<&str, i32, i32>());
///
/// let col = entries.get(&Context::background(), &source).unwrap();
/// assert_eq!(col.to_string(), "Col[a:1 b:2]");
/// assert_eq!(col.get(&"b"), Some(&2));
/// ```
pub fn col_of<I, S, T, A, B>(optic: Optic<I, S, T, A, B>) -> Optic<(), S, T, Col<I, A>, Col<I, B>>
where
    I: 'static,
    S: 'static,
    T: 'static,
    A: 'static,
    B: 'static,
{
    let expression = Expression::new("ColOf").child(optic.expression.clone());
    gathering(
        expression,
        optic,
        0,
        |entries| entries.into_iter().collect(),
        Col::into_values,
    )
}

/// Exposes each focus of `optic` together with its index.
///
/// Writes receive the indexed focus and return a plain replacement.
///
/// # Example
///
/// ```
/// use opticore::optics::{Context, traverse_vec, with_index};
///
/// let context = Context::background();
/// let numbered = with_index(traverse_vec::<char, String>());
///
/// let labels = numbered
///     .modify(&context, vec!['a', 'b'], |entry| format!("{}{}", entry.value, entry.index))
///     .unwrap();
/// assert_eq!(labels, vec!["a0".to_string(), "b1".to_string()]);
/// ```
pub fn with_index<I, S, T, A, B>(optic: Optic<I, S, T, A, B>) -> Optic<I, S, T, Indexed<I, A>, B>
where
    I: Clone + 'static,
    S: 'static,
    T: 'static,
    A: 'static,
    B: 'static,
{
    let expression = Expression::new("WithIndex").child(optic.expression.clone());
    let capabilities = optic.capabilities.with_direction(Direction::UniDir);

    let inner = optic.clone();
    let iterate: IterateFn<I, S, Indexed<I, A>> = Arc::new(move |context, source, sink| {
        inner.drive(context, source, &mut |item| {
            sink(item.map(|entry| Indexed::new(entry.index.clone(), entry)))
        })
    });
    let indexed = Optic::from_iterate(expression, capabilities, iterate);

    let indexed = match optic.length.clone() {
        Some(length) => indexed.with_length_fn(length),
        None => indexed,
    };
    if optic.modify.is_none() {
        return indexed;
    }
    indexed.with_modify_fn(Arc::new(move |context, source, function| {
        optic.drive_modify(context, source, &mut |index, value| {
            function(index, Indexed::new(index.clone(), value))
        })
    }))
}
