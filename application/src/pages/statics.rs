//! Pages with no content backend data.

use askama::Template;
use axum::response::Response;

use crate::{Context, Error};

use super::{render, serve, view::Layout, Rendered, HTML};

/// Frequently asked questions page.
#[derive(Debug, Template)]
#[template(path = "faq.html")]
struct Faq {
    layout: Layout,
}

/// "Not found" page.
#[derive(Debug, Template)]
#[template(path = "not_found.html")]
struct NotFound {
    layout: Layout,
}

/// Contact page.
#[derive(Debug, Template)]
#[template(path = "contact.html")]
struct Contact {
    layout: Layout,
}

/// Serves the frequently asked questions page.
#[tracing::instrument(skip_all)]
pub async fn faq(ctx: Context) -> Response {
    serve(&ctx, HTML, async {
        let layout = Layout::new(ctx.site(), "FAQ", "/faq");
        Ok(Rendered::page(render(&Faq { layout })?, Vec::new()))
    })
    .await
}

/// Serves the contact page.
#[tracing::instrument(skip_all)]
pub async fn contact(ctx: Context) -> Response {
    serve(&ctx, HTML, async {
        let layout = Layout::new(ctx.site(), "Contact", "/contact");
        Ok(Rendered::page(render(&Contact { layout })?, Vec::new()))
    })
    .await
}

/// Serves the "not found" page for any unknown path.
#[tracing::instrument(skip_all, fields(path = ctx.path()))]
pub async fn not_found(ctx: Context) -> Response {
    serve(&ctx, HTML, async { missing(&ctx) }).await
}

/// Renders the "not found" page of the current request.
pub(super) fn missing(ctx: &Context) -> Result<Rendered, Error> {
    let body = render(&NotFound {
        layout: Layout::new(ctx.site(), "Page not found", ctx.path()),
    })?;
    Ok(Rendered::not_found(body))
}
