//! [`Background`] environment of [`Task`]s.

use std::{
    error::Error,
    future::{Future, IntoFuture},
    iter,
};

use futures::{
    future::{self, LocalBoxFuture},
    FutureExt as _, TryFutureExt as _,
};
use tokio::task;

#[cfg(doc)]
use crate::Task;

/// Error a spawned [`Task`] has finished with.
type Failure = Box<dyn Error + 'static>;

/// Background environment of [`Task`]s.
///
/// Spawned [`Task`]s only start running once the [`Background`] itself is
/// awaited, and the whole environment fails as soon as any of them does.
#[derive(Debug, Default)]
pub struct Background {
    /// [`task::LocalSet`] driving the spawned [`Task`]s.
    local: task::LocalSet,

    /// Handles of the spawned [`Task`]s.
    spawned: Vec<task::JoinHandle<Result<(), Failure>>>,
}

impl Background {
    /// Spawns the provided [`Task`] `future` inside this [`Background`].
    pub fn spawn<F, E>(&mut self, future: F)
    where
        F: Future<Output = Result<(), E>> + 'static,
        E: Error + 'static,
    {
        let handle = self
            .local
            .spawn_local(future.map_err(Failure::from));
        self.spawned.push(handle);
    }

    /// Returns the number of spawned [`Task`]s.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spawned.len()
    }

    /// Indicates whether no [`Task`]s were spawned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spawned.is_empty()
    }
}

impl IntoFuture for Background {
    type Output = Result<(), Failure>;
    type IntoFuture = LocalBoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        let Self { local, spawned } = self;

        let finished = spawned.into_iter().map(|handle| {
            handle
                .map(|r| r.unwrap_or_else(|e| Err(Failure::from(e))))
                .boxed_local()
        });

        future::try_join_all(
            iter::once(local.map(Ok).boxed_local()).chain(finished),
        )
        .map_ok(drop)
        .boxed_local()
    }
}

#[cfg(test)]
mod spec {
    use std::io;

    use super::Background;

    #[tokio::test]
    async fn completes_once_all_tasks_do() {
        let mut bg = Background::default();
        bg.spawn(async { Ok::<_, io::Error>(()) });
        bg.spawn(async { Ok::<_, io::Error>(()) });

        assert_eq!(bg.len(), 2);
        assert!(bg.await.is_ok());
    }

    #[tokio::test]
    async fn fails_with_the_first_failure() {
        let mut bg = Background::default();
        bg.spawn(async { Ok::<_, io::Error>(()) });
        bg.spawn(async { Err(io::Error::other("boom")) });

        assert_eq!(bg.await.unwrap_err().to_string(), "boom");
    }
}
