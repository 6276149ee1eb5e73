//! [`Query`] of a cached [`Page`].

use std::convert::Infallible;

use common::operations::{By, Select};

use crate::{
    infra::{
        cache::{Key, Page},
        Cache as _,
    },
    Service,
};

use super::Query;

/// [`Query`] of a fresh cached [`Page`] by its [`Key`].
#[derive(Clone, Debug)]
pub struct Cached(pub Key);

impl<C> Query<Cached> for Service<C> {
    type Ok = Option<Page>;
    type Err = Infallible;

    async fn execute(
        &self,
        Cached(key): Cached,
    ) -> Result<Self::Ok, Self::Err> {
        self.pages().execute(Select(By::new(key))).await
    }
}
