//! Listings index and detail pages.

use std::time::Instant;

use askama::Template;
use axum::{
    extract::{Path, Query},
    response::{IntoResponse as _, Redirect, Response},
};
use common::pagination::{page_path, Pager};
use serde::Deserialize;
use service::{
    domain::{revalidation::Tag, Listing, Slug},
    feed::{Feed, Landing, Outcome},
    filter::{
        self,
        editor::{Control, Edit, Strategy},
        Editor, Filter,
    },
    query::{self, listings, Query as _},
    read::listing::list,
};
use tracing as log;

use crate::{config::Pagination as Mode, AsError, Context, Error};

use super::{
    render, serve, statics,
    view::{Card, FilterForm, Layout, Pagination},
    Fallback, Rendered, HTML,
};

/// Path of the listings index.
const BASE: &str = "/properties";

/// Path serving the next batch of the listings feed.
const MORE: &str = "/properties/more";

/// Listings index page.
#[derive(Debug, Template)]
#[template(path = "properties.html")]
struct Index {
    layout: Layout,
    form: FilterForm,
    cards: Vec<Card>,
    total: Option<usize>,
    feed: bool,
    more: Option<String>,
    pagination: Option<Pagination>,
    missing_page: Option<usize>,
}

/// Next batch of the listings feed.
#[derive(Debug, Template)]
#[template(path = "partials/more.html")]
struct More {
    cards: Vec<Card>,
    more: Option<String>,
}

/// Listing detail page.
#[derive(Debug, Template)]
#[template(path = "property.html")]
struct Detail {
    layout: Layout,
    listing: Listing,
    card: Card,
    view: Option<&'static str>,
    lot_area: Option<String>,
}

/// Query parameters of the listings index.
#[derive(Debug, Deserialize)]
pub struct IndexParams {
    /// Legacy page number, moved to the `/page/N` path.
    page: Option<String>,
}

/// Serves the listings index, either as a feed or as its first page.
///
/// A `page` query parameter redirects to the path of that page.
#[tracing::instrument(skip_all, fields(query = ctx.query()))]
pub async fn index(
    ctx: Context,
    Query(params): Query<IndexParams>,
) -> Response {
    let site = ctx.site();
    if let Some(page) = params.page.and_then(|p| p.trim().parse().ok()) {
        let mut filter = filter::decode(ctx.query());
        _ = filter.prune_neighborhoods();
        let path = filter.href(&page_path(BASE, page));
        return Redirect::permanent(&path).into_response();
    }

    match site.listings.pagination {
        Mode::InfiniteScroll => {
            match Landing::of(ctx.query(), &site.listings.default_development)
            {
                Landing::Redirect(filter) => {
                    Redirect::temporary(&filter.href(BASE)).into_response()
                }
                Landing::Render(filter) => {
                    serve(&ctx, HTML, feed(&ctx, filter)).await
                }
            }
        }
        Mode::Pages => serve(&ctx, HTML, numbered(&ctx, 1)).await,
    }
}

/// Serves a numbered page of the listings index.
#[tracing::instrument(skip_all, fields(page = page))]
pub async fn page(ctx: Context, Path(page): Path<usize>) -> Response {
    serve(&ctx, HTML, numbered(&ctx, page)).await
}

/// Query parameters of the next feed batch.
#[derive(Debug, Deserialize)]
pub struct MoreParams {
    /// Number of batches already delivered.
    #[serde(default)]
    page: usize,
}

/// Serves the next batch of the listings feed, along with the sentinel
/// loading the following one.
#[tracing::instrument(skip_all, fields(page = params.page))]
pub async fn more(ctx: Context, Query(params): Query<MoreParams>) -> Response {
    serve(&ctx, HTML, async {
        let mut filter = filter::decode(ctx.query());
        _ = filter.prune_neighborhoods();

        let mut feed =
            Feed::resume(filter, params.page, ctx.site().listings.page_size);
        let outcome = feed.load_more(ctx.service()).await;
        let failed = matches!(outcome, Some(Outcome::Failed));

        let body = render(&More {
            cards: feed.items().iter().map(Card::from).collect(),
            more: feed.more_href(MORE),
        })?;
        Ok(Rendered::page(body, vec![Tag::Listings]).degraded(failed))
    })
    .await
}

/// Applies the submitted filter form and redirects to its URL.
///
/// A change of a single control made by [htmx] is applied according to the
/// [`Strategy`] of that control: select-likes are applied as soon as the
/// client-side debounce fires, while the typed prices are left as they were
/// on the page until committed. Submitting the whole form commits
/// everything.
///
/// [htmx]: https://htmx.org
#[expect(
    clippy::unused_async,
    reason = "`async` is required to match signature"
)]
#[tracing::instrument(
    skip_all,
    fields(query = ctx.query(), trigger = ctx.htmx_trigger_name()),
)]
pub async fn apply(ctx: Context) -> Redirect {
    let applied = ctx
        .htmx_current_query()
        .map(|q| filter::decode(&q))
        .unwrap_or_default();
    let mut editor = Editor::new(applied);

    let now = Instant::now();
    for edit in Edit::all_of(filter::decode(ctx.query())) {
        editor.edit(edit, now);
    }
    let strategy = ctx
        .htmx_trigger_name()
        .and_then(Control::named)
        .map_or(Strategy::OnCommit, Control::strategy);
    _ = match strategy {
        Strategy::Debounced(delay) => editor.poll(now + delay),
        Strategy::OnCommit => editor.commit(),
    };

    Redirect::to(&editor.applied().href(BASE))
}

/// Clears the filter by redirecting to the bare listings index.
#[expect(
    clippy::unused_async,
    reason = "`async` is required to match signature"
)]
#[tracing::instrument(skip_all)]
pub async fn clear(ctx: Context) -> Redirect {
    let mut editor = Editor::new(filter::decode(ctx.query()));
    _ = editor.clear();
    Redirect::to(&editor.applied().href(BASE))
}

/// Serves the detail page of a single listing.
#[tracing::instrument(skip_all, fields(slug = %slug))]
pub async fn detail(ctx: Context, Path(slug): Path<String>) -> Response {
    serve(&ctx, HTML, async {
        let site = ctx.site();
        let Some(slug) = Slug::new(slug) else {
            return statics::missing(&ctx);
        };

        let found = ctx
            .service()
            .execute(query::listing::BySlug::by(slug.clone()))
            .await
            .map_err(AsError::into_error)?;
        let Some(listing) = found else {
            return statics::missing(&ctx);
        };

        let body = render(&Detail {
            layout: Layout::new(site, listing.title.clone(), &listing.path()),
            card: Card::from(&listing),
            view: listing.view.map(|v| v.label()),
            lot_area: listing.lot_area.map(|a| a.to_string()),
            listing,
        })?;
        Ok(Rendered::page(body, vec![Tag::Listing(slug)]))
    })
    .await
}

/// Renders the listings index as a feed of the provided [`Filter`] with its
/// first batch loaded.
///
/// A failed fetch renders as an empty feed without a sentinel, so the page
/// just stops paging.
async fn feed(ctx: &Context, filter: Filter) -> Result<Rendered, Error> {
    let mut feed = Feed::new(Filter::default(), ctx.site().listings.page_size);
    let outcome = feed.apply(filter, ctx.service()).await;
    let failed = outcome == Outcome::Failed;

    let body = render(&Index {
        layout: Layout::new(ctx.site(), "Properties", BASE),
        form: FilterForm::of(feed.filter()),
        cards: feed.items().iter().map(Card::from).collect(),
        total: None,
        feed: true,
        more: feed.more_href(MORE),
        pagination: None,
        missing_page: None,
    })?;
    Ok(Rendered::page(body, vec![Tag::Listings]).degraded(failed))
}

/// Renders the provided numbered page of the listings index.
///
/// A page out of range is rendered with an inline message, without fetching
/// any listings. Listings failing to load render as an empty result.
async fn numbered(ctx: &Context, page: usize) -> Result<Rendered, Error> {
    let site = ctx.site();
    let svc = ctx.service();

    let mut filter = filter::decode(ctx.query());
    _ = filter.prune_neighborhoods();

    let mut fallback = Fallback::default();
    let total = fallback.or_default(
        svc.execute(listings::TotalCount::by(filter.clone()))
            .await
            .map(usize::from),
        "listings count",
    );

    let (cards, pagination, missing_page) =
        match Pager::request(page, total, site.listings.page_size) {
            Ok(pager) => {
                let items = fallback.or_default(
                    svc.execute(listings::List::by(list::Selector {
                        window: pager.window(),
                        filter: filter.clone(),
                    }))
                    .await,
                    "listings",
                );
                let nav =
                    Pagination::of(&pager, BASE, &filter::encode(&filter));
                let cards = items.iter().map(Card::from).collect();
                (cards, Some(nav).filter(Pagination::is_useful), None)
            }
            Err(e) => {
                log::debug!("{e}");
                (Vec::new(), None, Some(page))
            }
        };

    let body = render(&Index {
        layout: Layout::new(site, "Properties", ctx.cache_key().as_ref()),
        form: FilterForm::of(&filter),
        cards,
        total: Some(total),
        feed: false,
        more: None,
        pagination,
        missing_page,
    })?;
    Ok(Rendered::page(body, vec![Tag::Listings])
        .degraded(fallback.failed()))
}
