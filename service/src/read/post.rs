//! [`Post`]-related read definitions.
//!
//! [`Post`]: crate::domain::Post

pub mod list {
    //! [`Post`]s list definitions.

    use common::define_pagination;
    use derive_more::{From, Into};

    use crate::domain;
    #[cfg(doc)]
    use crate::domain::Post;

    define_pagination!(Node, ());

    /// Node in a [`Page`], newest first.
    pub type Node = domain::Post;

    /// Total count of published [`Post`]s.
    #[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
    pub struct TotalCount(usize);
}
