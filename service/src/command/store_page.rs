//! [`Command`] for caching a rendered [`Page`].

use std::convert::Infallible;

use common::operations::Insert;

use crate::{
    domain::revalidation::Tag,
    infra::{
        cache::{Key, Page},
        Cache as _,
    },
    Service,
};

use super::Command;

/// [`Command`] for caching a rendered [`Page`].
#[derive(Clone, Debug)]
pub struct StorePage {
    /// [`Key`] to cache the [`Page`] under.
    pub key: Key,

    /// Rendered HTML of the [`Page`].
    pub html: String,

    /// [`Tag`]s invalidating the [`Page`].
    pub tags: Vec<Tag>,
}

impl<C> Command<StorePage> for Service<C> {
    type Ok = Page;
    type Err = Infallible;

    async fn execute(&self, cmd: StorePage) -> Result<Self::Ok, Self::Err> {
        let StorePage { key, html, tags } = cmd;

        let page = Page::new(key, html, tags, self.config().cache.ttl);
        self.pages().execute(Insert(page.clone())).await?;

        Ok(page)
    }
}
