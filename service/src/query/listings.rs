//! [`Query`] collection related to multiple [`Listing`]s.

use common::{operations::By, pagination::Window};
use futures::future;
use tracerr::Traced;

use crate::{
    domain::Listing,
    filter::Filter,
    infra::cms,
    read::{self, listing::list},
    Service,
};

use super::{CmsQuery, Query};

/// Queries a window of [`Listing`]s matching a [`Filter`].
pub type List = CmsQuery<By<Vec<Listing>, list::Selector>>;

/// Queries total count of [`Listing`]s matching a [`Filter`].
pub type TotalCount = CmsQuery<By<list::TotalCount, Filter>>;

/// Queries featured [`Listing`]s.
pub type Featured = CmsQuery<By<Vec<Listing>, read::listing::Featured>>;

/// [`Query`] fetching a [`list::Page`] of [`Listing`]s matching a [`Filter`].
#[derive(Clone, Debug)]
pub struct Fetch {
    /// [`Filter`] the [`Listing`]s should match.
    pub filter: Filter,

    /// [`Window`] of the [`Listing`]s to fetch.
    pub window: Window,
}

impl<C> Query<Fetch> for Service<C>
where
    Self: Query<List, Ok = Vec<Listing>, Err = Traced<cms::Error>>
        + Query<TotalCount, Ok = list::TotalCount, Err = Traced<cms::Error>>,
{
    type Ok = list::Page;
    type Err = Traced<cms::Error>;

    async fn execute(
        &self,
        Fetch { filter, window }: Fetch,
    ) -> Result<Self::Ok, Self::Err> {
        let (items, total) = future::try_join(
            self.execute(List::by(list::Selector {
                window,
                filter: filter.clone(),
            })),
            self.execute(TotalCount::by(filter)),
        )
        .await
        .map_err(tracerr::wrap!())?;

        Ok(list::Page::new(window, items, total.into()))
    }
}
