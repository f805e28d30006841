//! Narrowing and asserting the capabilities of an optic.
//!
//! Capabilities are plain values, so presenting an optic with different
//! capabilities is a check of [`Capabilities::implies`]:
//!
//! - [`reconstrain`] accepts a target only when the optic's capabilities
//!   imply it, and fails with a [`CapabilityError`] otherwise.
//! - [`read_only`], [`uni_dir`], [`fallible`] and [`many`] give up one
//!   guarantee. They can never fail.
//! - [`reconstrain_unchecked`], [`assume_pure`] and [`assume_one`] trust
//!   the caller. Asserting a guarantee the optic does not honour is a logic
//!   error in the caller: the optic keeps behaving as it did, and only its
//!   advertised capabilities change.
//!
//! Giving up `ReadWrite` or `BiDir` also drops the write or reverse
//! function, so the narrowed optic cannot perform them even internally.
//!
//! # Examples
//!
//! ```
//! use opticore::optics::{Capabilities, reconstrain, traverse_vec};
//!
//! let every = traverse_vec::<i32, i32>();
//! assert!(reconstrain(every.clone(), Capabilities::FOLD).is_ok());
//!
//! let error = reconstrain(every, Capabilities::LENS).unwrap_err();
//! assert_eq!(error.axes, vec!["cardinality"]);
//! ```

use super::capability::{Capabilities, Cardinality, Direction, Failure, Mutability};
use super::error::CapabilityError;
use super::optic::{Optic, Role, misuse};

/// Applies `target`, dropping the functions it no longer permits.
///
/// An identity presented with anything other than iso capabilities is no
/// longer neutral and stops being elided by composition.
fn restrict<I, S, T, A, B>(mut optic: Optic<I, S, T, A, B>, target: Capabilities) -> Optic<I, S, T, A, B> {
    if target != Capabilities::ISO {
        optic.role = Role::Plain;
    }
    if !target.is_writable() {
        optic.modify = None;
    }
    if !target.is_reversible() {
        optic.reverse = None;
    }
    optic.capabilities = target;
    optic
}

/// Presents `optic` with the `target` capabilities if its own capabilities
/// imply them.
///
/// # Errors
///
/// Returns a [`CapabilityError`] naming the axes on which the optic falls
/// short of `target`.
pub fn reconstrain<I, S, T, A, B>(
    optic: Optic<I, S, T, A, B>,
    target: Capabilities,
) -> Result<Optic<I, S, T, A, B>, CapabilityError> {
    if optic.capabilities.implies(target) {
        Ok(restrict(optic, target))
    } else {
        Err(CapabilityError::new(
            "reconstrain",
            &optic.expression,
            optic.capabilities,
            target,
        ))
    }
}

/// Drops the write capability.
pub fn read_only<I, S, T, A, B>(optic: Optic<I, S, T, A, B>) -> Optic<I, S, T, A, B> {
    let target = optic.capabilities.with_mutability(Mutability::ReadOnly);
    restrict(optic, target)
}

/// Drops the reverse capability.
pub fn uni_dir<I, S, T, A, B>(optic: Optic<I, S, T, A, B>) -> Optic<I, S, T, A, B> {
    let target = optic.capabilities.with_direction(Direction::UniDir);
    restrict(optic, target)
}

/// Marks the optic as possibly failing.
pub fn fallible<I, S, T, A, B>(optic: Optic<I, S, T, A, B>) -> Optic<I, S, T, A, B> {
    let target = optic.capabilities.with_failure(Failure::Fallible);
    restrict(optic, target)
}

/// Marks the optic as focusing on any number of elements, which gives up
/// [`Optic::get`].
pub fn many<I, S, T, A, B>(optic: Optic<I, S, T, A, B>) -> Optic<I, S, T, A, B> {
    let target = optic.capabilities.with_cardinality(Cardinality::Many);
    restrict(optic, target)
}

/// Presents `optic` with the `target` capabilities without checking them.
///
/// When `target` is not implied by the optic's capabilities, the assertion
/// is logged at debug level. The caller is responsible for the optic
/// actually honouring `target`.
///
/// # Panics
///
/// Panics if `target` asks for `ReadWrite` on an optic that has no write
/// function, or for `BiDir` on one that has no reverse function.
#[track_caller]
pub fn reconstrain_unchecked<I, S, T, A, B>(
    optic: Optic<I, S, T, A, B>,
    target: Capabilities,
) -> Optic<I, S, T, A, B> {
    let actual = optic.capabilities;
    if !actual.implies(target) {
        tracing::debug!(
            optic = %optic.expression,
            %actual,
            asserted = %target,
            axes = ?actual.violations(target),
            "asserting capabilities the optic does not prove"
        );
    }
    if target.is_writable() && optic.modify.is_none() {
        misuse(&optic.expression, "cannot assert ReadWrite on an optic without a writer");
    }
    if target.is_reversible() && optic.reverse.is_none() {
        misuse(&optic.expression, "cannot assert BiDir on an optic without a reverse");
    }
    restrict(optic, target)
}

/// Asserts that the optic never fails.
///
/// # Example
///
/// ```
/// use opticore::optics::{Context, assume_pure, compose, parse_int, traverse_vec};
///
/// let numbers = assume_pure(compose(traverse_vec::<String, String>(), parse_int(10, 0)));
/// assert!(numbers.capabilities().is_pure());
/// assert_eq!(numbers.collect(&Context::background(), &vec!["4".to_string()]).unwrap(), vec![4]);
/// ```
#[track_caller]
pub fn assume_pure<I, S, T, A, B>(optic: Optic<I, S, T, A, B>) -> Optic<I, S, T, A, B> {
    let target = optic.capabilities.with_failure(Failure::Pure);
    reconstrain_unchecked(optic, target)
}

/// Asserts that the optic focuses on exactly one element.
///
/// [`Optic::get`] on the result returns the first focus, and fails with a
/// no-focus error when there is none.
///
/// # Example
///
/// ```
/// use opticore::optics::{Context, assume_one, traverse_vec};
///
/// let head = assume_one(traverse_vec::<i32, i32>());
/// let context = Context::background();
/// assert_eq!(head.get(&context, &vec![7, 8]).unwrap(), 7);
/// assert!(head.get(&context, &vec![]).unwrap_err().is_no_focus());
/// ```
#[track_caller]
pub fn assume_one<I, S, T, A, B>(optic: Optic<I, S, T, A, B>) -> Optic<I, S, T, A, B> {
    let target = optic.capabilities.with_cardinality(Cardinality::One);
    reconstrain_unchecked(optic, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optics::{Context, getter, identity, iso, lens, prism};
    use rstest::rstest;

    fn negate() -> Optic<(), i32, i32, i32, i32> {
        iso("Negate", |value: &i32| -value, |value: i32| -value)
    }

    #[rstest]
    #[case(Capabilities::ISO)]
    #[case(Capabilities::LENS)]
    #[case(Capabilities::PRISM)]
    #[case(Capabilities::TRAVERSAL)]
    #[case(Capabilities::GETTER)]
    #[case(Capabilities::FOLD)]
    fn test_iso_reconstrains_to_every_preset(#[case] target: Capabilities) {
        let narrowed = reconstrain(negate(), target).unwrap();
        assert_eq!(narrowed.capabilities(), target);
        assert_eq!(narrowed.modify.is_some(), target.is_writable());
    }

    #[rstest]
    fn test_reconstrain_rejects_stronger_target() {
        let length = getter("Len", |text: &String| text.len());
        let error = reconstrain(length, Capabilities::ISO).unwrap_err();
        assert_eq!(error.operation, "reconstrain");
        assert_eq!(error.expression, "Len");
        assert_eq!(error.axes, vec!["mutability", "direction"]);
    }

    #[rstest]
    fn test_safe_helpers_drop_functions() {
        let narrowed = uni_dir(read_only(negate()));
        assert_eq!(narrowed.capabilities(), Capabilities::GETTER);
        assert!(narrowed.modify.is_none());
        assert!(narrowed.reverse.is_none());
        assert_eq!(narrowed.get(&Context::background(), &3).unwrap(), -3);

        let loose = many(fallible(negate()));
        assert!(!loose.capabilities().is_single());
        assert!(!loose.capabilities().is_pure());
        assert!(loose.reverse.is_some());
    }

    #[rstest]
    fn test_narrowed_identity_is_no_longer_neutral() {
        assert!(read_only(identity::<u8>()).role == Role::Plain);
        assert!(!fallible(identity::<u8>()).is_identity());
        assert!(!many(identity::<u8>()).is_identity());
        assert!(!uni_dir(identity::<u8>()).is_identity());
        assert!(reconstrain(identity::<u8>(), Capabilities::ISO).unwrap().is_identity());
        assert!(reconstrain_unchecked(identity::<u8>(), Capabilities::ISO).is_identity());
    }

    #[rstest]
    fn test_assume_one_on_prism() {
        let some = assume_one(prism("Some", |option: &Option<u8>| *option, Some));
        let context = Context::background();
        assert_eq!(some.get(&context, &Some(4)).unwrap(), 4);
        assert!(some.get(&context, &None).unwrap_err().is_no_focus());
    }

    #[rstest]
    #[should_panic(expected = "cannot assert BiDir on an optic without a reverse")]
    fn test_unchecked_bidir_without_reverse_panics() {
        let first = lens("First", |pair: &(i8, i8)| pair.0, |pair: (i8, i8), value: i8| (value, pair.1));
        let _ = reconstrain_unchecked(first, Capabilities::ISO);
    }

    #[rstest]
    #[should_panic(expected = "cannot assert ReadWrite on an optic without a writer")]
    fn test_unchecked_read_write_without_writer_panics() {
        let length = getter("Len", |text: &String| text.len());
        let _ = reconstrain_unchecked(length, Capabilities::LENS);
    }
}
