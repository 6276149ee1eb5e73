//! Revalidation webhook endpoint.

use axum::{
    extract::{rejection::JsonRejection, Query},
    Json,
};
use common::DateTime;
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::{
        revalidation::{DocumentKind, Tag},
        Slug,
    },
};
use tracing as log;

use crate::{AsError, Context, Error};

/// Query parameters of the [`revalidate()`] endpoint.
#[derive(Debug, Deserialize)]
pub struct Params {
    /// Shared secret, for callers unable to set headers.
    secret: Option<String>,
}

/// Notification about a changed content document.
#[derive(Debug, Deserialize)]
pub struct Payload {
    /// Type of the changed document.
    #[serde(rename = "_type")]
    kind: String,

    /// Slug of the changed document, if it has one.
    slug: Option<SlugField>,
}

/// Slug field of a content document.
#[derive(Debug, Deserialize)]
pub struct SlugField {
    /// Current value of the slug.
    current: Option<String>,
}

/// Successful revalidation response.
#[derive(Debug, Serialize)]
pub struct Revalidated {
    /// Always `true`.
    revalidated: bool,

    /// Unix timestamp of the revalidation, in milliseconds.
    now: i128,

    /// Invalidated cache [`Tag`]s.
    tags: Vec<Tag>,
}

/// Invalidates the cached pages affected by a changed content document.
///
/// The shared secret is taken from the `Authorization: Bearer` header, or
/// from the `secret` query parameter otherwise.
///
/// # Errors
///
/// If the secret is wrong, or the payload doesn't name a known document
/// type.
#[tracing::instrument(skip_all)]
pub async fn revalidate(
    ctx: Context,
    Query(params): Query<Params>,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Result<Json<Revalidated>, Error> {
    let secret = match ctx.bearer_token().await {
        Some(token) => token,
        None => params.secret.unwrap_or_default(),
    };

    let (kind, slug) = match payload {
        Ok(Json(Payload { kind, slug })) => {
            let known = kind.parse::<DocumentKind>().ok();
            if known.is_none() {
                log::debug!("unknown document type `{kind}`");
            }
            let slug = slug.and_then(|s| s.current).and_then(Slug::new);
            (known, slug)
        }
        Err(e) => {
            log::debug!("malformed revalidation payload: {}", e.body_text());
            (None, None)
        }
    };

    let tags = ctx
        .service()
        .execute(command::Revalidate { secret, kind, slug })
        .await
        .map_err(AsError::into_error)?;
    log::info!(
        "revalidated tags: {}",
        tags.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "),
    );

    Ok(Json(Revalidated {
        revalidated: true,
        now: DateTime::now().unix_timestamp_millis(),
        tags,
    }))
}
