//! [`Query`] of sitemap contents.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::Query;

use super::CmsQuery;

/// Queries the [`read::sitemap::Documents`] to list in a sitemap.
pub type Documents = CmsQuery<By<read::sitemap::Documents, ()>>;
