//! # opticore
//!
//! Composable accessors ("optics") whose operations are checked against a
//! set of capability tags.
//!
//! ## Overview
//!
//! An optic addresses zero or more focuses inside a source value. Lenses,
//! prisms, isos, traversals, getters and folds are all the same
//! [`Optic`](optics::Optic) type; what tells them apart is the
//! [`Capabilities`](optics::Capabilities) value they carry:
//!
//! - **Cardinality**: exactly one focus, or any number
//! - **Mutability**: read-only, or settable
//! - **Direction**: one-way, or reversible
//! - **Failure**: pure, or possibly failing
//!
//! Composition merges the capabilities of its operands, tracks a joint
//! index, and annotates errors with the path of optics they passed through.
//! Every operation honours a [`Context`](optics::Context) carrying a
//! cancellation token and an optional deadline.
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for index pairs, indexed values and
//!   collections
//!
//! ## Example
//!
//! ```rust
//! use opticore::prelude::*;
//!
//! let context = Context::background();
//! let second_elements = compose(traverse_vec::<(i32, i32), (i32, i32)>(), tuple_second());
//!
//! let pairs = vec![(1, 10), (2, 20)];
//! assert_eq!(second_elements.collect(&context, &pairs).unwrap(), vec![10, 20]);
//! assert_eq!(
//!     second_elements.modify(&context, pairs, |value| value + 1).unwrap(),
//!     vec![(1, 11), (2, 21)],
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports every optic, combinator and supporting type.
///
/// # Usage
///
/// ```rust
/// use opticore::prelude::*;
/// ```
pub mod prelude {
    pub use crate::optics::*;
}

pub mod optics;
