//! Capability tags and their merge algebra.
//!
//! Every optic carries four independent capability tags:
//!
//! - [`Cardinality`]: exactly one focus, or zero-or-more
//! - [`Mutability`]: whether `set`/`modify` are permitted
//! - [`Direction`]: whether a reverse construction (focus to source) exists
//! - [`Failure`]: whether operations can produce an error
//!
//! Composition merges the tags of both operands axis by axis. The merge
//! result is computed eagerly when the composed optic is built and stored as a
//! flat [`Capabilities`] value, so there is never a nested description of how
//! the tags were merged.
//!
//! # Merge Laws
//!
//! ```text
//! Many     iff either operand is Many
//! ReadWrite iff both operands are ReadWrite
//! BiDir    iff both operands are BiDir
//! Fallible iff either operand is Fallible
//! ```
//!
//! [`Capabilities::ISO`] is the neutral element of [`Capabilities::merge`].
//!
//! # Examples
//!
//! ```
//! use opticore::optics::{Capabilities, Cardinality, Failure, merge};
//!
//! assert_eq!(merge(Cardinality::One, Cardinality::Many), Cardinality::Many);
//! assert_eq!(merge(Failure::Pure, Failure::Pure), Failure::Pure);
//!
//! let merged = Capabilities::LENS.merge(Capabilities::TRAVERSAL);
//! assert_eq!(merged, Capabilities::TRAVERSAL);
//! ```

use std::fmt;

use smallvec::SmallVec;

/// A single capability axis.
///
/// Each axis is a two-valued enum with a merge rule and an `implies`
/// ordering. Merging values of two different axes does not type-check.
pub trait Axis: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync + 'static {
    /// Human readable axis name used in diagnostics.
    const NAME: &'static str;

    /// Merges the tags of two composed operands.
    #[must_use]
    fn merge(self, other: Self) -> Self;

    /// Returns `true` if an optic with this tag can honestly be presented as
    /// having the `target` tag.
    fn implies(self, target: Self) -> bool;
}

/// Merges two tags of the same axis.
///
/// # Example
///
/// ```
/// use opticore::optics::{Direction, merge};
///
/// assert_eq!(merge(Direction::BiDir, Direction::UniDir), Direction::UniDir);
/// ```
#[must_use]
pub fn merge<X: Axis>(left: X, right: X) -> X {
    left.merge(right)
}

/// Focus cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Cardinality {
    /// Exactly one focus per operation.
    One,
    /// Zero or more focuses.
    Many,
}

/// Whether an optic can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mutability {
    /// Only read operations are permitted.
    ReadOnly,
    /// `set` and `modify` are permitted.
    ReadWrite,
}

/// Whether an optic can rebuild a source from a focus alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// No reverse construction.
    UniDir,
    /// `reverse_get` is available.
    BiDir,
}

/// Whether an optic's operations can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Failure {
    /// Operations never fail (cancellation aside).
    Pure,
    /// Operations may report an error.
    Fallible,
}

impl Axis for Cardinality {
    const NAME: &'static str = "cardinality";

    fn merge(self, other: Self) -> Self {
        if self == Self::Many || other == Self::Many {
            Self::Many
        } else {
            Self::One
        }
    }

    fn implies(self, target: Self) -> bool {
        self == target || self == Self::One
    }
}

impl Axis for Mutability {
    const NAME: &'static str = "mutability";

    fn merge(self, other: Self) -> Self {
        if self == Self::ReadWrite && other == Self::ReadWrite {
            Self::ReadWrite
        } else {
            Self::ReadOnly
        }
    }

    fn implies(self, target: Self) -> bool {
        self == target || self == Self::ReadWrite
    }
}

impl Axis for Direction {
    const NAME: &'static str = "direction";

    fn merge(self, other: Self) -> Self {
        if self == Self::BiDir && other == Self::BiDir {
            Self::BiDir
        } else {
            Self::UniDir
        }
    }

    fn implies(self, target: Self) -> bool {
        self == target || self == Self::BiDir
    }
}

impl Axis for Failure {
    const NAME: &'static str = "failure";

    fn merge(self, other: Self) -> Self {
        if self == Self::Fallible || other == Self::Fallible {
            Self::Fallible
        } else {
            Self::Pure
        }
    }

    fn implies(self, target: Self) -> bool {
        self == target || self == Self::Pure
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::One => "One",
            Self::Many => "Many",
        })
    }
}

impl fmt::Display for Mutability {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::ReadOnly => "ReadOnly",
            Self::ReadWrite => "ReadWrite",
        })
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::UniDir => "UniDir",
            Self::BiDir => "BiDir",
        })
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Pure => "Pure",
            Self::Fallible => "Fallible",
        })
    }
}

/// The flattened capability set of one optic.
///
/// # Example
///
/// ```
/// use opticore::optics::{Capabilities, Mutability};
///
/// let read_only = Capabilities::LENS.with_mutability(Mutability::ReadOnly);
/// assert!(Capabilities::LENS.implies(read_only));
/// assert!(!read_only.implies(Capabilities::LENS));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Capabilities {
    /// Focus cardinality.
    pub cardinality: Cardinality,
    /// Read-only or read-write.
    pub mutability: Mutability,
    /// One-way or reversible.
    pub direction: Direction,
    /// Pure or fallible.
    pub failure: Failure,
}

impl Capabilities {
    /// One, `ReadWrite`, `BiDir`, Pure. Neutral element of [`merge`](Self::merge).
    pub const ISO: Self = Self::new(
        Cardinality::One,
        Mutability::ReadWrite,
        Direction::BiDir,
        Failure::Pure,
    );

    /// One, `ReadWrite`, `UniDir`, Pure.
    pub const LENS: Self = Self::new(
        Cardinality::One,
        Mutability::ReadWrite,
        Direction::UniDir,
        Failure::Pure,
    );

    /// Many, `ReadWrite`, `BiDir`, Pure.
    pub const PRISM: Self = Self::new(
        Cardinality::Many,
        Mutability::ReadWrite,
        Direction::BiDir,
        Failure::Pure,
    );

    /// Many, `ReadWrite`, `UniDir`, Pure.
    pub const TRAVERSAL: Self = Self::new(
        Cardinality::Many,
        Mutability::ReadWrite,
        Direction::UniDir,
        Failure::Pure,
    );

    /// One, `ReadOnly`, `UniDir`, Pure.
    pub const GETTER: Self = Self::new(
        Cardinality::One,
        Mutability::ReadOnly,
        Direction::UniDir,
        Failure::Pure,
    );

    /// Many, `ReadOnly`, `UniDir`, Pure.
    pub const FOLD: Self = Self::new(
        Cardinality::Many,
        Mutability::ReadOnly,
        Direction::UniDir,
        Failure::Pure,
    );

    /// Creates a capability set from its four tags.
    #[must_use]
    pub const fn new(
        cardinality: Cardinality,
        mutability: Mutability,
        direction: Direction,
        failure: Failure,
    ) -> Self {
        Self {
            cardinality,
            mutability,
            direction,
            failure,
        }
    }

    /// Merges two capability sets axis by axis.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            cardinality: merge(self.cardinality, other.cardinality),
            mutability: merge(self.mutability, other.mutability),
            direction: merge(self.direction, other.direction),
            failure: merge(self.failure, other.failure),
        }
    }

    /// Returns `true` if every axis of `self` implies the matching axis of
    /// `target`.
    pub fn implies(self, target: Self) -> bool {
        self.violations(target).is_empty()
    }

    /// Names the axes on which `self` does not imply `target`.
    pub fn violations(self, target: Self) -> SmallVec<[&'static str; 4]> {
        let mut violations = SmallVec::new();
        if !self.cardinality.implies(target.cardinality) {
            violations.push(Cardinality::NAME);
        }
        if !self.mutability.implies(target.mutability) {
            violations.push(Mutability::NAME);
        }
        if !self.direction.implies(target.direction) {
            violations.push(Direction::NAME);
        }
        if !self.failure.implies(target.failure) {
            violations.push(Failure::NAME);
        }
        violations
    }

    /// Returns a copy with the cardinality replaced.
    #[must_use]
    pub const fn with_cardinality(self, cardinality: Cardinality) -> Self {
        Self {
            cardinality,
            ..self
        }
    }

    /// Returns a copy with the mutability replaced.
    #[must_use]
    pub const fn with_mutability(self, mutability: Mutability) -> Self {
        Self { mutability, ..self }
    }

    /// Returns a copy with the direction replaced.
    #[must_use]
    pub const fn with_direction(self, direction: Direction) -> Self {
        Self { direction, ..self }
    }

    /// Returns a copy with the failure mode replaced.
    #[must_use]
    pub const fn with_failure(self, failure: Failure) -> Self {
        Self { failure, ..self }
    }

    /// `true` for `ReadWrite`.
    pub fn is_writable(self) -> bool {
        self.mutability == Mutability::ReadWrite
    }

    /// `true` for `BiDir`.
    pub fn is_reversible(self) -> bool {
        self.direction == Direction::BiDir
    }

    /// `true` for cardinality One.
    pub fn is_single(self) -> bool {
        self.cardinality == Cardinality::One
    }

    /// `true` for Pure.
    pub fn is_pure(self) -> bool {
        self.failure == Failure::Pure
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}/{}/{}/{}",
            self.cardinality, self.mutability, self.direction, self.failure
        )
    }
}
