//! `sitemap.xml` page.

use askama::Template;
use axum::response::Response;
use service::{
    domain::revalidation::Tag,
    query::{self, Query as _},
};

use crate::{AsError, Context};

use super::{render, serve, Rendered};

/// Content type of the sitemap.
const XML: &str = "application/xml; charset=utf-8";

/// Sitemap document.
#[derive(Debug, Template)]
#[template(path = "sitemap.xml")]
struct Sitemap {
    urls: Vec<Url>,
}

/// Single URL of a [`Sitemap`].
#[derive(Debug)]
struct Url {
    loc: String,
    last_modified: Option<String>,
    priority: String,
}

/// Serves the sitemap of every static page, listing and post.
#[tracing::instrument(skip_all)]
pub async fn sitemap(ctx: Context) -> Response {
    serve(&ctx, XML, async {
        let docs = ctx
            .service()
            .execute(query::sitemap::Documents::by(()))
            .await
            .map_err(AsError::into_error)?;

        let urls = docs
            .entries()
            .into_iter()
            .map(|e| Url {
                loc: ctx.site().absolute(&e.path),
                last_modified: e.last_modified.map(|d| d.to_rfc3339()),
                priority: e.priority.to_string(),
            })
            .collect();

        let body = render(&Sitemap { urls })?;
        Ok(Rendered::page(body, vec![Tag::Sitemap]))
    })
    .await
}
