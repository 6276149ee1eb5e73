//! Home page.

use askama::Template;
use axum::response::Response;
use common::pagination::Window;
use futures::future;
use service::{
    domain::revalidation::Tag,
    query::{listings, posts, Query as _},
    read,
};

use crate::Context;

use super::{
    render, serve,
    view::{Card, Layout, PostCard},
    Fallback, Rendered, HTML,
};

/// Home page.
#[derive(Debug, Template)]
#[template(path = "home.html")]
struct Home {
    layout: Layout,
    cards: Vec<Card>,
    posts: Vec<PostCard>,
}

/// Renders the home page: featured listings and the latest posts.
#[tracing::instrument(skip_all)]
pub async fn page(ctx: Context) -> Response {
    serve(&ctx, HTML, async {
        let site = ctx.site();
        let svc = ctx.service();

        let (featured, latest) = future::join(
            svc.execute(listings::Featured::by(read::listing::Featured {
                limit: site.listings.featured,
            })),
            svc.execute(posts::Fetch {
                window: Window::new(0, site.posts.latest),
            }),
        )
        .await;

        let mut fallback = Fallback::default();
        let featured = fallback.or_default(featured, "featured listings");
        let latest = fallback
            .or_default(latest.map(|p| p.items), "latest posts");

        let body = render(&Home {
            layout: Layout::new(site, "Luxury real estate", "/"),
            cards: featured.iter().map(Card::from).collect(),
            posts: latest.iter().map(PostCard::from).collect(),
        })?;
        Ok(Rendered::page(body, vec![Tag::Home]).degraded(fallback.failed()))
    })
    .await
}
