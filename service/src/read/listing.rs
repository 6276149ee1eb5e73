//! [`Listing`]-related read definitions.

#[cfg(doc)]
use crate::domain::Listing;

/// Selection of featured [`Listing`]s shown on the home page.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Featured {
    /// Maximum number of [`Listing`]s to select.
    pub limit: usize,
}

pub mod list {
    //! [`Listing`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::{domain, filter};
    #[cfg(doc)]
    use crate::domain::Listing;

    define_pagination!(Node, Filter);

    /// Node in a [`Page`].
    pub type Node = domain::Listing;

    /// Filter for [`Selector`].
    pub type Filter = filter::Filter;

    /// Total count of [`Listing`]s matching a [`Filter`].
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(usize);
}
