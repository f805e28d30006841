//! Checked capability views.
//!
//! Calling an operation an optic's capabilities rule out panics. A view
//! turns that requirement into a `Result` up front: converting an optic into
//! a view checks one capability axis and fails with a [`CapabilityError`]
//! when the optic does not have it. A view dereferences to the optic, so
//! every operation stays available.
//!
//! | View | Requires | Method |
//! |---|---|---|
//! | [`Single`] | cardinality One | [`Optic::single`] |
//! | [`Writable`] | `ReadWrite` | [`Optic::writable`] |
//! | [`Reversible`] | `BiDir` | [`Optic::reversible`] |
//! | [`Infallible`] | Pure | [`Optic::infallible`] |
//!
//! # Examples
//!
//! ```
//! use opticore::optics::{Context, Single, getter, traverse_vec};
//!
//! fn describe(view: &Single<(), String, String, usize, usize>) -> usize {
//!     view.get(&Context::background(), &"four".to_string()).unwrap()
//! }
//!
//! let length = getter("Len", |text: &String| text.len()).single().unwrap();
//! assert_eq!(describe(&length), 4);
//!
//! let error = traverse_vec::<i32, i32>().single().unwrap_err();
//! assert_eq!(
//!     error.to_string(),
//!     "single needs One/ReadWrite/UniDir/Pure but `Traverse` provides \
//!      Many/ReadWrite/UniDir/Pure (axes: cardinality)",
//! );
//! ```

use std::fmt;
use std::ops::Deref;

use super::capability::{Capabilities, Cardinality, Direction, Failure, Mutability};
use super::error::CapabilityError;
use super::optic::Optic;

fn check<I, S, T, A, B>(
    optic: &Optic<I, S, T, A, B>,
    operation: &'static str,
    required: Capabilities,
) -> Result<(), CapabilityError> {
    if optic.capabilities.implies(required) {
        Ok(())
    } else {
        Err(CapabilityError::new(
            operation,
            &optic.expression,
            optic.capabilities,
            required,
        ))
    }
}

macro_rules! capability_view {
    ($(#[$doc:meta])* $view:ident, $method:ident, $operation:literal, $with:ident($tag:expr)) => {
        $(#[$doc])*
        pub struct $view<I, S, T, A, B>(Optic<I, S, T, A, B>);

        impl<I, S, T, A, B> Clone for $view<I, S, T, A, B> {
            fn clone(&self) -> Self {
                Self(self.0.clone())
            }
        }

        impl<I, S, T, A, B> fmt::Debug for $view<I, S, T, A, B> {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.debug_tuple(stringify!($view)).field(&self.0).finish()
            }
        }

        impl<I, S, T, A, B> $view<I, S, T, A, B> {
            /// Unwraps the optic.
            pub fn into_inner(self) -> Optic<I, S, T, A, B> {
                self.0
            }
        }

        impl<I, S, T, A, B> Deref for $view<I, S, T, A, B> {
            type Target = Optic<I, S, T, A, B>;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl<I, S, T, A, B> TryFrom<Optic<I, S, T, A, B>> for $view<I, S, T, A, B> {
            type Error = CapabilityError;

            fn try_from(optic: Optic<I, S, T, A, B>) -> Result<Self, Self::Error> {
                let required = optic.capabilities.$with($tag);
                check(&optic, $operation, required)?;
                Ok(Self(optic))
            }
        }

        impl<I, S, T, A, B> Optic<I, S, T, A, B> {
            #[doc = concat!("Checks the optic for the [`", stringify!($view), "`] view.")]
            ///
            /// # Errors
            ///
            /// Returns a [`CapabilityError`] when the optic lacks the capability.
            pub fn $method(self) -> Result<$view<I, S, T, A, B>, CapabilityError> {
                $view::try_from(self)
            }
        }
    };
}

capability_view!(
    /// An optic known to have exactly one focus.
    Single, single, "single", with_cardinality(Cardinality::One)
);

capability_view!(
    /// An optic known to support `set` and `modify`.
    Writable, writable, "writable", with_mutability(Mutability::ReadWrite)
);

capability_view!(
    /// An optic known to support `reverse_get`.
    Reversible, reversible, "reversible", with_direction(Direction::BiDir)
);

capability_view!(
    /// An optic known not to fail, cancellation aside.
    Infallible, infallible, "infallible", with_failure(Failure::Pure)
);
