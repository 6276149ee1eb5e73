//! Service contains the business logic of the listings site.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod feed;
pub mod filter;
pub mod infra;
pub mod query;
pub mod read;
pub mod task;

use common::operations::{By, Start};
use derive_more::{Debug, Display, Error};
use secrecy::SecretBox;

use self::{domain::revalidation::Secret, infra::cache};
#[cfg(doc)]
use self::infra::{Cache, Cms};

pub use self::{command::Command, query::Query, task::Task};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [`cache::Pages`] configuration.
    pub cache: cache::Config,

    /// [`task::PurgeExpiredPages`] configuration.
    pub purge_expired_pages: task::purge_expired_pages::Config,

    /// [`Secret`] authenticating [`command::Revalidate`] requests.
    ///
    /// Revalidation is rejected altogether while it's empty.
    #[debug(skip)]
    pub revalidate_secret: SecretBox<Secret>,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<C> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Cms`] of this [`Service`].
    cms: C,

    /// [`Cache`] of rendered pages of this [`Service`].
    pages: cache::Pages,
}

impl<C> Service<C> {
    /// Creates a new [`Service`] with the provided parameters.
    pub fn new(config: Config, cms: C) -> (Self, task::Background)
    where
        Self: Task<
                Start<
                    By<
                        task::PurgeExpiredPages<Self>,
                        task::purge_expired_pages::Config,
                    >,
                >,
                Ok = (),
                Err: Error,
            > + Clone
            + 'static,
    {
        let pages = cache::Pages::new(config.cache.capacity);
        let this = Service { config, cms, pages };

        let mut bg = task::Background::default();
        let svc = this.clone();
        bg.spawn(async move {
            svc.execute(Start(By::new(svc.config().purge_expired_pages)))
                .await
        });

        (this, bg)
    }

    /// Returns [`Config`] of this [`Service`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Cms`] of this [`Service`].
    #[must_use]
    pub fn cms(&self) -> &C {
        &self.cms
    }

    /// Returns [`Cache`] of rendered pages of this [`Service`].
    #[must_use]
    pub fn pages(&self) -> &cache::Pages {
        &self.pages
    }
}

/// Shortcut for the error of starting a [`Task`].
type TaskStartError<Svc, T, Args> = <Svc as Task<Start<By<T, Args>>>>::Err;

/// Error of starting a [`Service`].
#[derive(Debug, Display, Error)]
pub enum StartupError<Svc>
where
    Svc: Task<
        Start<
            By<
                task::PurgeExpiredPages<Svc>,
                task::purge_expired_pages::Config,
            >,
        >,
    >,
{
    /// [`task::PurgeExpiredPages`] failed to start.
    PurgeExpiredPagesTask(
        TaskStartError<
            Svc,
            task::PurgeExpiredPages<Svc>,
            task::purge_expired_pages::Config,
        >,
    ),
}

#[cfg(test)]
pub(crate) mod spec {
    use secrecy::SecretBox;

    use crate::{
        domain::revalidation::Secret,
        infra::{cache, Memory},
        task::purge_expired_pages,
        Config, Service,
    };

    /// Revalidation secret of the [`service()`] fixture.
    pub(crate) const SECRET: &str = "s3cr3t";

    /// Creates a [`Service`] fixture over the provided [`Memory`] without
    /// spawning its background tasks.
    pub(crate) fn service(cms: Memory) -> Service<Memory> {
        Service {
            config: Config {
                cache: cache::Config::default(),
                purge_expired_pages: purge_expired_pages::Config::default(),
                revalidate_secret: SecretBox::new(Box::new(Secret::from(
                    SECRET,
                ))),
            },
            cms,
            pages: cache::Pages::new(16),
        }
    }

    #[test]
    fn hides_secret_from_debug() {
        let svc = service(Memory::default());

        assert!(!format!("{svc:?}").contains(SECRET));
    }
}
