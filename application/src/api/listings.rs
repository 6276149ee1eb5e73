//! Listings window endpoint.

use axum::{extract::Query, Json};
use common::pagination::Window;
use serde::Deserialize;
use service::{
    filter,
    query::{listings, Query as _},
    read::listing::list,
};

use crate::{AsError, Context, Error};

/// Maximum number of listings returned at once.
pub const MAX_LIMIT: usize = 48;

/// Query parameters of the [`listings()`] endpoint, besides the filter
/// ones.
#[derive(Debug, Deserialize)]
pub struct Params {
    /// Number of listings to skip.
    #[serde(default)]
    offset: usize,

    /// Maximum number of listings to return.
    ///
    /// Defaults to the configured page size.
    limit: Option<usize>,
}

/// Returns a window of listings matching the filter in the query string.
///
/// # Errors
///
/// If the content backend fails.
#[tracing::instrument(skip_all, fields(query = ctx.query()))]
pub async fn listings(
    ctx: Context,
    Query(params): Query<Params>,
) -> Result<Json<list::Page>, Error> {
    let mut filter = filter::decode(ctx.query());
    _ = filter.prune_neighborhoods();

    let limit = params
        .limit
        .unwrap_or_else(|| ctx.site().listings.page_size.get())
        .min(MAX_LIMIT);

    ctx.service()
        .execute(listings::Fetch {
            filter,
            window: Window::new(params.offset, limit),
        })
        .await
        .map(Json)
        .map_err(AsError::into_error)
}
