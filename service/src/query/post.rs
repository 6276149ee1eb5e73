//! [`Query`] collection related to a single [`Post`].

use common::operations::By;

use crate::domain::{Post, Slug};
#[cfg(doc)]
use crate::Query;

use super::CmsQuery;

/// Queries a [`Post`] by its [`Slug`].
pub type BySlug = CmsQuery<By<Option<Post>, Slug>>;
