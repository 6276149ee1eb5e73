//! [`Context`]-related definitions.

use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, RequestPartsExt as _};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use service::infra::cache::Key;

use crate::{config::Site, Error, Service};

/// Request context.
#[derive(Debug)]
pub struct Context {
    /// [`Service`] instance.
    service: Service,

    /// [`Site`] configuration.
    site: Arc<Site>,

    /// Parts of the HTTP request.
    parts: http::request::Parts,
}

impl Context {
    /// Returns [`Service`] instance of this [`Context`].
    #[must_use]
    pub fn service(&self) -> &Service {
        &self.service
    }

    /// Returns [`Site`] configuration of this [`Context`].
    #[must_use]
    pub fn site(&self) -> &Site {
        &self.site
    }

    /// Returns the path of the current request.
    #[must_use]
    pub fn path(&self) -> &str {
        self.parts.uri.path()
    }

    /// Returns the raw query string of the current request, if any.
    #[must_use]
    pub fn query(&self) -> &str {
        self.parts.uri.query().unwrap_or_default()
    }

    /// Returns the cache [`Key`] of the current request.
    #[must_use]
    pub fn cache_key(&self) -> Key {
        self.parts
            .uri
            .path_and_query()
            .map_or_else(|| self.path().into(), |pq| pq.as_str().into())
    }

    /// Returns the `If-None-Match` header of the current request, if any.
    #[must_use]
    pub fn if_none_match(&self) -> Option<&str> {
        self.parts
            .headers
            .get(http::header::IF_NONE_MATCH)
            .and_then(|h| h.to_str().ok())
    }

    /// Returns the name of the form field triggering the current [htmx]
    /// request, if any.
    ///
    /// [htmx]: https://htmx.org
    #[must_use]
    pub fn htmx_trigger_name(&self) -> Option<&str> {
        self.parts
            .headers
            .get("hx-trigger-name")
            .and_then(|h| h.to_str().ok())
    }

    /// Returns the query string of the page the current [htmx] request is
    /// made from, if any.
    ///
    /// [htmx]: https://htmx.org
    #[must_use]
    pub fn htmx_current_query(&self) -> Option<String> {
        let url = self.parts.headers.get("hx-current-url")?.to_str().ok()?;
        let uri = url.parse::<http::Uri>().ok()?;
        Some(uri.query().unwrap_or_default().to_owned())
    }

    /// Returns the bearer token of the current request, if any.
    pub async fn bearer_token(&self) -> Option<String> {
        self.parts
            .clone()
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .ok()
            .map(|TypedHeader(Authorization(bearer))| {
                bearer.token().to_owned()
            })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let service = parts
            .extensions
            .get::<Service>()
            .cloned()
            .ok_or_else(|| Error::internal(&"missing `Service` extension"))?;
        let site = parts
            .extensions
            .get::<Arc<Site>>()
            .cloned()
            .ok_or_else(|| Error::internal(&"missing `Site` extension"))?;

        Ok(Self {
            service,
            site,
            parts: parts.clone(),
        })
    }
}
