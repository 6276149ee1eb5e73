//! Blog pages.

use askama::Template;
use axum::{extract::Path, response::Response};
use common::pagination::Pager;
use service::{
    domain::{post::Block, revalidation::Tag, Slug},
    query::{self, posts, Query as _},
    read::post::list,
};
use tracing as log;

use crate::{AsError, Context, Error};

use super::{
    render, serve, statics,
    view::{Layout, Pagination, PostCard},
    Fallback, Rendered, HTML,
};

/// Path of the blog index.
const BASE: &str = "/blog";

/// Blog index page.
#[derive(Debug, Template)]
#[template(path = "blog.html")]
struct Index {
    layout: Layout,
    posts: Vec<PostCard>,
    pagination: Option<Pagination>,
    missing_page: Option<usize>,
    failed: bool,
}

/// Post detail page.
#[derive(Debug, Template)]
#[template(path = "post.html")]
struct Detail {
    layout: Layout,
    card: PostCard,
    author: Option<String>,
    blocks: Vec<Block>,
}

/// Serves the first page of the blog index.
#[tracing::instrument(skip_all)]
pub async fn index(ctx: Context) -> Response {
    serve(&ctx, HTML, numbered(&ctx, 1)).await
}

/// Serves a numbered page of the blog index.
#[tracing::instrument(skip_all, fields(page = page))]
pub async fn page(ctx: Context, Path(page): Path<usize>) -> Response {
    serve(&ctx, HTML, numbered(&ctx, page)).await
}

/// Serves the detail page of a single post.
#[tracing::instrument(skip_all, fields(slug = %slug))]
pub async fn detail(ctx: Context, Path(slug): Path<String>) -> Response {
    serve(&ctx, HTML, async {
        let Some(slug) = Slug::new(slug) else {
            return statics::missing(&ctx);
        };

        let found = ctx
            .service()
            .execute(query::post::BySlug::by(slug.clone()))
            .await
            .map_err(AsError::into_error)?;
        let Some(post) = found else {
            return statics::missing(&ctx);
        };

        let body = render(&Detail {
            layout: Layout::new(ctx.site(), post.title.clone(), &post.path()),
            card: PostCard::from(&post),
            author: post.author.clone(),
            blocks: post.body.blocks().to_vec(),
        })?;
        Ok(Rendered::page(body, vec![Tag::Post(slug)]))
    })
    .await
}

/// Renders the provided numbered page of the blog index, newest posts first.
async fn numbered(ctx: &Context, page: usize) -> Result<Rendered, Error> {
    let site = ctx.site();
    let svc = ctx.service();

    let mut fallback = Fallback::default();
    let total = fallback.or_default(
        svc.execute(posts::TotalCount::by(())).await.map(usize::from),
        "posts count",
    );

    let (posts, pagination, missing_page) =
        match Pager::request(page, total, site.posts.page_size) {
            Ok(pager) => {
                let items = fallback.or_default(
                    svc.execute(posts::List::by(list::Selector {
                        window: pager.window(),
                        filter: (),
                    }))
                    .await,
                    "posts",
                );
                let nav = Pagination::of(&pager, BASE, "");
                let posts = items.iter().map(PostCard::from).collect();
                (posts, Some(nav).filter(Pagination::is_useful), None)
            }
            Err(e) => {
                log::debug!("{e}");
                (Vec::new(), None, Some(page))
            }
        };

    let body = render(&Index {
        layout: Layout::new(site, "Blog", ctx.path()),
        posts,
        pagination,
        missing_page,
        failed: fallback.failed(),
    })?;
    Ok(Rendered::page(body, vec![Tag::Posts]).degraded(fallback.failed()))
}
