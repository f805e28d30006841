//! Index-based access to a single container element.
//!
//! [`Ixed::ix`] narrows the canonical [`Each`] traversal of a container to
//! one index. The result has cardinality One and is fallible: reading or
//! writing a missing index fails with a no-focus error instead of inserting.
//!
//! # Examples
//!
//! ```
//! use opticore::optics::{Context, Ixed};
//!
//! let context = Context::background();
//! let third = <Vec<i32> as Ixed>::ix(2);
//!
//! assert_eq!(third.get(&context, &vec![1, 2, 3]).unwrap(), 3);
//! assert_eq!(third.set(&context, vec![1, 2, 3], 9).unwrap(), vec![1, 2, 9]);
//! assert!(third.set(&context, vec![1], 9).unwrap_err().is_no_focus());
//! ```

use super::each::Each;
use super::optic::SimpleOptic;

/// Containers whose elements can be addressed by index.
pub trait Ixed: Each {
    /// Returns an optic focused on the element at `index`.
    fn ix(index: Self::Index) -> SimpleOptic<Self::Index, Self, Self::Element> {
        Self::each().index(index)
    }
}

impl<C: Each> Ixed for C {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optics::{Capabilities, Cardinality, Context, Failure};
    use rstest::rstest;
    use std::collections::BTreeMap;

    #[rstest]
    fn test_ix_capabilities() {
        let capabilities = <Vec<u8> as Ixed>::ix(0).capabilities();
        assert_eq!(capabilities.cardinality, Cardinality::One);
        assert_eq!(capabilities.failure, Failure::Fallible);
        assert!(capabilities.is_writable());
        assert!(!capabilities.is_reversible());
        assert_ne!(capabilities, Capabilities::LENS);
    }

    #[rstest]
    #[case("b", Some(2))]
    #[case("z", None)]
    fn test_ix_on_btree_map(#[case] key: &'static str, #[case] expected: Option<i32>) {
        let source: BTreeMap<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
        let entry = <BTreeMap<&str, i32> as Ixed>::ix(key);
        assert_eq!(entry.get_first(&Context::background(), &source).unwrap(), expected);
    }

    #[rstest]
    fn test_ix_modify_touches_only_index() {
        let second = <Vec<i32> as Ixed>::ix(1);
        let updated = second
            .modify(&Context::background(), vec![5, 5, 5], |value| value * 2)
            .unwrap();
        assert_eq!(updated, vec![5, 10, 5]);
    }
}
