//! Ambient cancellation and deadline context.
//!
//! A [`Context`] is threaded read-only through every optic operation. Long
//! running traversals check it once per element boundary; once it reports
//! cancellation the traversal stops and surfaces an
//! [`OpticError`](super::OpticError) whose cause is a [`Cancellation`].
//!
//! # Examples
//!
//! ```rust
//! use std::time::Duration;
//! use opticore::optics::{Cancellation, Context};
//!
//! let background = Context::background();
//! assert_eq!(background.check(), Ok(()));
//!
//! let (cancellable, canceller) = background.with_cancel();
//! canceller.cancel();
//! assert_eq!(cancellable.check(), Err(Cancellation::Canceled));
//!
//! // Cancelling a child never affects its parent.
//! assert_eq!(background.check(), Ok(()));
//!
//! let expired = background.with_timeout(Duration::ZERO);
//! assert_eq!(expired.check(), Err(Cancellation::DeadlineExceeded));
//! ```

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use super::error::Cancellation;

/// Cancellation and deadline state shared by a tree of operations.
///
/// Cloning is cheap and clones observe the same cancellation.
#[derive(Debug, Clone)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    #[must_use]
    pub fn background() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Derives a child context together with the handle that cancels it.
    ///
    /// The child is also cancelled when `self` is cancelled.
    #[must_use]
    pub fn with_cancel(&self) -> (Self, Canceller) {
        let token = self.token.child_token();
        let canceller = Canceller {
            token: token.clone(),
        };
        (
            Self {
                token,
                deadline: self.deadline,
            },
            canceller,
        )
    }

    /// Derives a child context that expires at `deadline`, or at the parent's
    /// deadline if that is earlier.
    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = self
            .deadline
            .map_or(deadline, |current| current.min(deadline));
        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    /// Derives a child context that expires `timeout` from now.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// The effective deadline, if any.
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Reports whether the context is still live.
    ///
    /// Explicit cancellation takes precedence over an expired deadline.
    ///
    /// # Errors
    ///
    /// Returns the [`Cancellation`] reason once the context is done.
    pub fn check(&self) -> Result<(), Cancellation> {
        if self.token.is_cancelled() {
            return Err(Cancellation::Canceled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(Cancellation::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// `true` once [`check`](Self::check) would fail.
    pub fn is_done(&self) -> bool {
        self.check().is_err()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

/// Cancels the context it was created with, and every context derived from it.
#[derive(Debug, Clone)]
pub struct Canceller {
    token: CancellationToken,
}

impl Canceller {
    /// Cancels the associated context. Idempotent.
    pub fn cancel(&self) {
        tracing::debug!("optic context cancelled");
        self.token.cancel();
    }
}

static_assertions::assert_impl_all!(Context: Send, Sync, Clone);
static_assertions::assert_impl_all!(Canceller: Send, Sync);
