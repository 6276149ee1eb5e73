//! Server-rendered pages.

pub mod blog;
pub mod home;
pub mod properties;
pub mod sitemap;
pub mod statics;
mod view;

use std::{fmt, future::Future};

use askama::Template;
use axum::response::{IntoResponse, Response};
use http::{header, HeaderName, HeaderValue, StatusCode};
use service::{
    command::{self, Command as _},
    domain::revalidation::Tag,
    infra::cache::ETag,
    query::{self, Query as _},
};
use tracing as log;

use crate::{Context, Error};

/// Content type of HTML pages.
const HTML: &str = "text/html; charset=utf-8";

/// Header telling whether a page was served from the cache.
const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// Page rendered for a request.
#[derive(Debug)]
pub struct Rendered {
    /// [`StatusCode`] to respond with.
    status: StatusCode,

    /// Rendered body.
    body: String,

    /// [`Tag`]s invalidating this [`Rendered`] page once cached.
    tags: Vec<Tag>,

    /// Indicator whether this [`Rendered`] page may be cached.
    cacheable: bool,
}

impl Rendered {
    /// Creates a new successfully [`Rendered`] page.
    #[must_use]
    pub fn page(body: String, tags: Vec<Tag>) -> Self {
        Self {
            status: StatusCode::OK,
            body,
            tags,
            cacheable: true,
        }
    }

    /// Creates a new [`Rendered`] "not found" page.
    #[must_use]
    pub fn not_found(body: String) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body,
            tags: Vec::new(),
            cacheable: false,
        }
    }

    /// Forbids caching of this [`Rendered`] page if some of its content
    /// `failed` to load.
    #[must_use]
    pub fn degraded(mut self, failed: bool) -> Self {
        self.cacheable &= !failed;
        self
    }
}

/// Tracker of content which failed to load, so a page was rendered without
/// it.
#[derive(Clone, Copy, Debug, Default)]
pub struct Fallback {
    /// Indicator whether anything failed to load.
    failed: bool,
}

impl Fallback {
    /// Unwraps the provided `result`, logging an error and falling back to
    /// the default value on failure.
    pub fn or_default<T, E>(&mut self, result: Result<T, E>, what: &str) -> T
    where
        T: Default,
        E: fmt::Display,
    {
        result.unwrap_or_else(|e| {
            log::error!("failed to fetch {what}: {e}");
            self.failed = true;
            T::default()
        })
    }

    /// Indicates whether anything failed to load.
    #[must_use]
    pub const fn failed(&self) -> bool {
        self.failed
    }
}

/// Renders the provided [`Template`].
///
/// # Errors
///
/// If the [`Template`] fails to render.
fn render<T: Template>(tpl: &T) -> Result<String, Error> {
    tpl.render().map_err(|e| Error::internal(&e))
}

/// Serves the page of the current request from the page cache, rendering and
/// caching it on a miss.
///
/// Only successfully [`Rendered`] pages are cached.
async fn serve<F>(
    ctx: &Context,
    content_type: &'static str,
    render: F,
) -> Response
where
    F: Future<Output = Result<Rendered, Error>>,
{
    let key = ctx.cache_key();

    let cached = ctx
        .service()
        .execute(query::page::Cached(key.clone()))
        .await
        .unwrap_or_else(|e| match e {});
    if let Some(page) = cached {
        log::debug!("serving `{key}` from cache");
        return respond(ctx, content_type, &page.etag, &page.html, "HIT");
    }

    let Rendered {
        status,
        body,
        tags,
        cacheable,
    } = match render.await {
        Ok(rendered) => rendered,
        Err(e) => return e.into_response(),
    };

    if status != StatusCode::OK || !cacheable {
        return (
            status,
            [
                (
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(content_type),
                ),
                (
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("no-store"),
                ),
            ],
            body,
        )
            .into_response();
    }

    let page = ctx
        .service()
        .execute(command::StorePage {
            key,
            html: body,
            tags,
        })
        .await
        .unwrap_or_else(|e| match e {});
    respond(ctx, content_type, &page.etag, &page.html, "MISS")
}

/// Responds with the provided cached page contents, or with `304 Not
/// Modified` if the client already has them.
fn respond(
    ctx: &Context,
    content_type: &'static str,
    etag: &ETag,
    html: &str,
    cache: &'static str,
) -> Response {
    let headers = [
        (header::ETAG, HeaderValue::from_str(etag.as_ref())),
        (
            header::CACHE_CONTROL,
            Ok(HeaderValue::from_static(
                "public, max-age=0, must-revalidate",
            )),
        ),
        (X_CACHE, Ok(HeaderValue::from_static(cache))),
    ]
    .into_iter()
    .filter_map(|(name, value)| Some((name, value.ok()?)))
    .collect::<http::HeaderMap>();

    if ctx.if_none_match().is_some_and(|v| etag.matches(v)) {
        return (StatusCode::NOT_MODIFIED, headers).into_response();
    }

    (
        headers,
        [(header::CONTENT_TYPE, HeaderValue::from_static(content_type))],
        html.to_owned(),
    )
        .into_response()
}
