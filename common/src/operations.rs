//! Abstract operations executed by [`Handler`]s.
//!
//! [`Handler`]: crate::Handler

use std::marker::PhantomData;

/// Operation storing the provided value, replacing any existing one under
/// the same key.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Operation evicting values matched by the provided selector.
#[derive(Clone, Copy, Debug)]
pub struct Delete<T>(pub T);

/// Operation reading a value, usually through a [`By`] selector.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Operation starting a long-running process, like a background task.
#[derive(Clone, Copy, Debug)]
pub struct Start<T>(pub T);

/// Operation running a single iteration of a recurring job.
#[derive(Clone, Copy, Debug)]
pub struct Perform<T>(pub T);

/// Selector of `W` by `B`.
///
/// The selected type `W` only takes part in dispatching, so different reads
/// by the same key (a listing and its count, say) stay distinct operations.
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Type of the value to select.
    _what: PhantomData<W>,

    /// Value to select by.
    by: B,
}

impl<W, B> By<W, B> {
    /// Creates a new [`By`] selecting by the provided value.
    #[must_use]
    pub fn new(by: B) -> Self {
        Self {
            _what: PhantomData,
            by,
        }
    }

    /// Returns the value to select by.
    #[must_use]
    pub fn inner(&self) -> &B {
        &self.by
    }

    /// Consumes this [`By`] returning the value to select by.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.by
    }
}
