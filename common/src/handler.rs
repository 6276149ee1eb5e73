//! [`Handler`] abstractions.

use std::future::Future;

/// Executor of the `Args` operation.
///
/// Page queries, revalidation commands, background tasks, content backends
/// and the page cache all implement [`Handler`] once per operation they
/// support, so the same value answers many differently typed requests.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes the provided operation.
    ///
    /// # Errors
    ///
    /// [`Handler::Err`] if the operation fails.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
