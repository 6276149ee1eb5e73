//! [`Query`] collection related to a single [`Listing`].

use common::operations::By;

use crate::domain::{Listing, Slug};
#[cfg(doc)]
use crate::Query;

use super::CmsQuery;

/// Queries a [`Listing`] by its [`Slug`].
pub type BySlug = CmsQuery<By<Option<Listing>, Slug>>;
