//! [`Query`] collection related to multiple [`Post`]s.

use common::{operations::By, pagination::Window};
use futures::future;
use tracerr::Traced;

use crate::{domain::Post, infra::cms, read::post::list, Service};

use super::{CmsQuery, Query};

/// Queries a window of [`Post`]s, newest first.
pub type List = CmsQuery<By<Vec<Post>, list::Selector>>;

/// Queries total count of [`Post`]s.
pub type TotalCount = CmsQuery<By<list::TotalCount, ()>>;

/// [`Query`] fetching a [`list::Page`] of [`Post`]s.
#[derive(Clone, Copy, Debug)]
pub struct Fetch {
    /// [`Window`] of the [`Post`]s to fetch.
    pub window: Window,
}

impl<C> Query<Fetch> for Service<C>
where
    Self: Query<List, Ok = Vec<Post>, Err = Traced<cms::Error>>
        + Query<TotalCount, Ok = list::TotalCount, Err = Traced<cms::Error>>,
{
    type Ok = list::Page;
    type Err = Traced<cms::Error>;

    async fn execute(
        &self,
        Fetch { window }: Fetch,
    ) -> Result<Self::Ok, Self::Err> {
        let (items, total) = future::try_join(
            self.execute(List::by(list::Selector { window, filter: () })),
            self.execute(TotalCount::by(())),
        )
        .await
        .map_err(tracerr::wrap!())?;

        Ok(list::Page::new(window, items, total.into()))
    }
}
