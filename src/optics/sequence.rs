//! The lazy indexed iteration protocol.
//!
//! Iteration is push based. A producer receives a [`Yield`] callback and
//! calls it once per focus with an [`IndexedValue`]. The callback answers
//! with [`ControlFlow`]: `Continue` asks for more, `Break` asks the producer
//! to stop. A producer that yields again after `Break` violates the protocol
//! and panics with `yield called after break`.
//!
//! A [`LazySequence`] packages a producer so it can be consumed later. The
//! producer runs once; sequences are not restartable.
//!
//! # Examples
//!
//! ```
//! use opticore::optics::{Indexed, LazySequence};
//!
//! let sequence = LazySequence::new(|sink| {
//!     for (index, value) in ["a", "b", "c"].into_iter().enumerate() {
//!         if sink(Ok(Indexed::new(index, value))).is_break() {
//!             return;
//!         }
//!     }
//! });
//! assert_eq!(sequence.render().unwrap(), "Seq[0:a 1:b 2:c]");
//! ```

use std::fmt;
use std::ops::ControlFlow;

use super::error::OpticError;

/// An index paired with the focus it identifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Indexed<I, A> {
    /// The index of the focus.
    pub index: I,
    /// The focused value.
    pub value: A,
}

impl<I, A> Indexed<I, A> {
    /// Pairs an index with a value.
    pub const fn new(index: I, value: A) -> Self {
        Self { index, value }
    }

    /// Splits into `(index, value)`.
    pub fn into_parts(self) -> (I, A) {
        (self.index, self.value)
    }

    /// Applies `function` to the value, keeping the index.
    pub fn map<B, F>(self, function: F) -> Indexed<I, B>
    where
        F: FnOnce(A) -> B,
    {
        Indexed::new(self.index, function(self.value))
    }
}

impl<I: fmt::Display, A: fmt::Display> fmt::Display for Indexed<I, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}:{}", self.index, self.value)
    }
}

/// One element of a lazy iteration: either an indexed focus or an error.
pub type IndexedValue<I, A> = Result<Indexed<I, A>, OpticError>;

/// The callback a producer pushes elements into.
pub type Yield<'y, I, A> = dyn FnMut(IndexedValue<I, A>) -> ControlFlow<()> + 'y;

type Producer<'a, I, A> = Box<dyn FnOnce(&mut Yield<'_, I, A>) + 'a>;

/// A single-use, lazily evaluated sequence of indexed focuses.
///
/// Nothing runs until a consuming method is called. Every consumer that
/// returns a `Result` stops at the first error and returns it.
pub struct LazySequence<'a, I, A> {
    producer: Producer<'a, I, A>,
}

impl<'a, I, A> LazySequence<'a, I, A> {
    /// Wraps a producer.
    pub fn new<P>(producer: P) -> Self
    where
        P: FnOnce(&mut Yield<'_, I, A>) + 'a,
    {
        Self {
            producer: Box::new(producer),
        }
    }

    /// A sequence with no elements.
    pub fn empty() -> Self
    where
        I: 'a,
        A: 'a,
    {
        Self::new(|_| {})
    }

    /// Runs the producer, handing every element to `consumer`.
    ///
    /// Errors are delivered as elements; returning `Break` stops the producer.
    pub fn for_each<F>(self, mut consumer: F)
    where
        F: FnMut(IndexedValue<I, A>) -> ControlFlow<()>,
    {
        (self.producer)(&mut consumer);
    }

    /// Runs the producer until `consumer` breaks or an error arrives.
    ///
    /// # Errors
    ///
    /// Returns the first error produced.
    pub fn try_for_each<F>(self, mut consumer: F) -> Result<(), OpticError>
    where
        F: FnMut(I, A) -> ControlFlow<()>,
    {
        let mut failure = None;
        self.for_each(|item| match item {
            Ok(Indexed { index, value }) => consumer(index, value),
            Err(error) => {
                failure = Some(error);
                ControlFlow::Break(())
            }
        });
        failure.map_or(Ok(()), Err)
    }

    /// The first element, stopping the producer right after it.
    ///
    /// # Errors
    ///
    /// Returns the error if one is produced before the first focus.
    pub fn first(self) -> Result<Option<Indexed<I, A>>, OpticError> {
        let mut first = None;
        self.try_for_each(|index, value| {
            first = Some(Indexed::new(index, value));
            ControlFlow::Break(())
        })?;
        Ok(first)
    }

    /// Collects every indexed focus.
    ///
    /// # Errors
    ///
    /// Returns the first error produced.
    pub fn collect_indexed(self) -> Result<Vec<Indexed<I, A>>, OpticError> {
        let mut collected = Vec::new();
        self.try_for_each(|index, value| {
            collected.push(Indexed::new(index, value));
            ControlFlow::Continue(())
        })?;
        Ok(collected)
    }

    /// Collects every focus, dropping the indices.
    ///
    /// # Errors
    ///
    /// Returns the first error produced.
    pub fn values(self) -> Result<Vec<A>, OpticError> {
        let mut collected = Vec::new();
        self.try_for_each(|_, value| {
            collected.push(value);
            ControlFlow::Continue(())
        })?;
        Ok(collected)
    }

    /// Counts the focuses.
    ///
    /// # Errors
    ///
    /// Returns the first error produced.
    pub fn count(self) -> Result<usize, OpticError> {
        let mut count = 0;
        self.try_for_each(|_, _| {
            count += 1;
            ControlFlow::Continue(())
        })?;
        Ok(count)
    }

    /// Renders the sequence as `Seq[k1:v1 k2:v2]`.
    ///
    /// # Errors
    ///
    /// Returns the first error produced.
    pub fn render(self) -> Result<String, OpticError>
    where
        I: fmt::Display,
        A: fmt::Display,
    {
        let mut rendered = String::from("Seq[");
        let mut separator = "";
        self.try_for_each(|index, value| {
            rendered.push_str(separator);
            rendered.push_str(&Indexed::new(index, value).to_string());
            separator = " ";
            ControlFlow::Continue(())
        })?;
        rendered.push(']');
        Ok(rendered)
    }
}

impl<I, A> fmt::Debug for LazySequence<'_, I, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("LazySequence(..)")
    }
}
