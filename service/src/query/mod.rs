//! [`Query`] definition.

pub mod listing;
pub mod listings;
pub mod page;
pub mod post;
pub mod posts;
pub mod sitemap;

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    infra::{cms, Cms},
    Service,
};

/// [`Query`] of the [`Service`].
pub use common::Handler as Query;

/// [`Query`] [`Select`]ing a `T`ype from a [`Cms`].
#[derive(Clone, Copy, Debug)]
#[expect(clippy::module_name_repetitions, reason = "more readable")]
pub struct CmsQuery<T>(T);

impl<W, B> CmsQuery<By<W, B>> {
    /// Creates a new [`CmsQuery`] selecting a `W` by the provided `B`.
    #[must_use]
    pub fn by(by: B) -> Self {
        Self(By::new(by))
    }
}

impl<C, W, B> Query<CmsQuery<By<W, B>>> for Service<C>
where
    C: Cms<Select<By<W, B>>, Ok = W, Err = Traced<cms::Error>>,
{
    type Ok = W;
    type Err = Traced<cms::Error>;

    async fn execute(
        &self,
        CmsQuery(by): CmsQuery<By<W, B>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.cms().execute(Select(by)).await.map_err(tracerr::wrap!())
    }
}
