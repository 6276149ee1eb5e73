//! [`PurgeExpiredPages`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Delete, Perform, Start};
use smart_default::SmartDefault;
use tokio::time::interval;
use tracing as log;

use crate::{
    infra::{
        cache::{ExpirationDateTime, Page},
        Cache as _,
    },
    Service,
};

use super::Task;

/// Configuration for [`PurgeExpiredPages`] [`Task`].
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Interval between expired [`Page`]s purges.
    #[default(time::Duration::from_secs(300))]
    pub interval: time::Duration,
}

/// [`Task`] for evicting expired [`Page`]s from the cache.
#[derive(Clone, Copy, Debug)]
pub struct PurgeExpiredPages<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<C> Task<Start<By<PurgeExpiredPages<Self>, Config>>> for Service<C>
where
    PurgeExpiredPages<Service<C>>:
        Task<Perform<()>, Ok = usize, Err: Error> + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<PurgeExpiredPages<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let task = PurgeExpiredPages {
            config: by.into_inner(),
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            match task.execute(Perform(())).await {
                Ok(0) => {}
                Ok(purged) => log::debug!("purged {purged} expired page(s)"),
                Err(e) => log::error!("`task::PurgeExpiredPages` failed: {e}"),
            }
        }
    }
}

impl<C> Task<Perform<()>> for PurgeExpiredPages<Service<C>> {
    type Ok = usize;
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        self.service
            .pages()
            .execute(Delete(By::<Page, _>::new(ExpirationDateTime::now())))
            .await
    }
}

/// Error of [`PurgeExpiredPages`] execution.
pub type ExecutionError = Infallible;

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::operations::{Insert, Perform};

    use crate::{
        infra::{
            cache::{Key, Page},
            Cache as _, Memory,
        },
        task::Task as _,
    };

    use super::{Config, PurgeExpiredPages};

    #[tokio::test]
    async fn evicts_expired_pages_only() {
        let svc = crate::spec::service(Memory::default());
        for (key, ttl) in [("/stale", 0), ("/fresh", 60)] {
            svc.pages()
                .execute(Insert(Page::new(
                    Key::from(key),
                    String::new(),
                    vec![],
                    Duration::from_secs(ttl),
                )))
                .await
                .unwrap();
        }
        let task = PurgeExpiredPages {
            config: Config::default(),
            service: svc.clone(),
        };

        assert_eq!(task.execute(Perform(())).await.unwrap(), 1);
        assert_eq!(task.execute(Perform(())).await.unwrap(), 0);
        assert_eq!(svc.pages().len().await, 1);
    }
}
