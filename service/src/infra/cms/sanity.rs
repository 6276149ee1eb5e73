//! [Sanity] [`Cms`] implementation.
//!
//! [Sanity]: https://www.sanity.io

use std::time::Duration;

use common::operations::{By, Select};
use reqwest::header::{self, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret as _, SecretString};
use serde::{de::DeserializeOwned, Deserialize};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{Listing, Post, Slug},
    filter::Filter,
    read,
};

use super::{
    document::{ListingDoc, PostDoc, SitemapDoc},
    groq, Cms, Error,
};

/// [`Sanity`] client configuration.
#[derive(Debug)]
pub struct Config {
    /// ID of the [Sanity] project.
    ///
    /// [Sanity]: https://www.sanity.io
    pub project_id: String,

    /// Name of the dataset to query.
    pub dataset: String,

    /// Dated version of the HTTP API, like `2024-01-01`.
    pub api_version: String,

    /// Indicator whether to query the cached CDN API instead of the live one.
    pub use_cdn: bool,

    /// Read token for private datasets.
    pub token: Option<SecretString>,

    /// Timeout of a single request.
    pub timeout: Duration,
}

/// [Sanity] content lake client.
///
/// [Sanity]: https://www.sanity.io
#[derive(Clone, Debug)]
pub struct Sanity {
    /// HTTP client.
    client: reqwest::Client,

    /// URL of the query endpoint.
    url: String,
}

/// Response of the query endpoint.
#[derive(Deserialize)]
struct Response<T> {
    /// Result of the query.
    result: T,
}

impl Sanity {
    /// Creates a new [`Sanity`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If the token is not a valid header value, or the HTTP client cannot
    /// be built.
    pub fn new(conf: &Config) -> Result<Self, Traced<Error>> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &conf.token {
            let mut value = HeaderValue::try_from(format!(
                "Bearer {}",
                token.expose_secret(),
            ))
            .map_err(tracerr::from_and_wrap!(=> Error))?;
            value.set_sensitive(true);
            _ = headers.insert(header::AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(conf.timeout)
            .build()
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        let host = if conf.use_cdn { "apicdn" } else { "api" };
        let url = format!(
            "https://{}.{host}.sanity.io/v{}/data/query/{}",
            conf.project_id,
            conf.api_version.trim_start_matches('v'),
            conf.dataset,
        );

        Ok(Self { client, url })
    }

    /// Executes the provided [`groq::Query`] and decodes its result.
    async fn fetch<T: DeserializeOwned>(
        &self,
        query: groq::Query,
    ) -> Result<T, Traced<Error>> {
        let groq::Query { text, params } = query;
        log::debug!("GROQ: {text}");

        let mut pairs = vec![("query".to_owned(), text)];
        pairs.extend(
            params
                .into_iter()
                .map(|(name, value)| (format!("${name}"), value.to_string())),
        );

        let resp = self
            .client
            .get(&self.url)
            .query(&pairs)
            .send()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(tracerr::new!(Error::Status(status.as_u16())));
        }

        let body = resp
            .bytes()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        let Response { result } = serde_json::from_slice(&body)
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        Ok(result)
    }
}

/// Converts the provided documents, skipping invalid ones.
fn convert<D, T>(docs: Vec<D>) -> Vec<T>
where
    T: TryFrom<D, Error = Traced<Error>>,
{
    docs.into_iter()
        .filter_map(|d| {
            T::try_from(d)
                .map_err(|e| log::warn!("skipping document: {e}"))
                .ok()
        })
        .collect()
}

impl Cms<Select<By<Vec<Listing>, read::listing::list::Selector>>> for Sanity {
    type Ok = Vec<Listing>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Listing>, read::listing::list::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::listing::list::Selector { window, filter } = by.into_inner();
        let docs = self
            .fetch::<Vec<ListingDoc>>(groq::listings(&filter, window))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(convert(docs))
    }
}

impl Cms<Select<By<read::listing::list::TotalCount, Filter>>> for Sanity {
    type Ok = read::listing::list::TotalCount;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::listing::list::TotalCount, Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.fetch::<usize>(groq::listings_count(by.inner()))
            .await
            .map(Into::into)
            .map_err(tracerr::wrap!())
    }
}

impl Cms<Select<By<Option<Listing>, Slug>>> for Sanity {
    type Ok = Option<Listing>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Listing>, Slug>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.fetch::<Option<ListingDoc>>(groq::listing(by.inner()))
            .await
            .map_err(tracerr::wrap!())?
            .map(Listing::try_from)
            .transpose()
            .map_err(tracerr::wrap!())
    }
}

impl Cms<Select<By<Vec<Listing>, read::listing::Featured>>> for Sanity {
    type Ok = Vec<Listing>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Listing>, read::listing::Featured>>,
    ) -> Result<Self::Ok, Self::Err> {
        let docs = self
            .fetch::<Vec<ListingDoc>>(groq::featured_listings(by.inner().limit))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(convert(docs))
    }
}

impl Cms<Select<By<Vec<Post>, read::post::list::Selector>>> for Sanity {
    type Ok = Vec<Post>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Post>, read::post::list::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let docs = self
            .fetch::<Vec<PostDoc>>(groq::posts(by.inner().window))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(convert(docs))
    }
}

impl Cms<Select<By<read::post::list::TotalCount, ()>>> for Sanity {
    type Ok = read::post::list::TotalCount;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: Select<By<read::post::list::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.fetch::<usize>(groq::posts_count())
            .await
            .map(Into::into)
            .map_err(tracerr::wrap!())
    }
}

impl Cms<Select<By<Option<Post>, Slug>>> for Sanity {
    type Ok = Option<Post>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Post>, Slug>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.fetch::<Option<PostDoc>>(groq::post(by.inner()))
            .await
            .map_err(tracerr::wrap!())?
            .map(Post::try_from)
            .transpose()
            .map_err(tracerr::wrap!())
    }
}

impl Cms<Select<By<read::sitemap::Documents, ()>>> for Sanity {
    type Ok = read::sitemap::Documents;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: Select<By<read::sitemap::Documents, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.fetch::<SitemapDoc>(groq::sitemap())
            .await
            .map(Into::into)
            .map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use super::{Config, Sanity};

    fn config(use_cdn: bool) -> Config {
        Config {
            project_id: "abc123".into(),
            dataset: "production".into(),
            api_version: "2024-01-01".into(),
            use_cdn,
            token: Some("sk-token".into()),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn builds_endpoint_url() {
        assert_eq!(
            Sanity::new(&config(true)).unwrap().url,
            "https://abc123.apicdn.sanity.io/v2024-01-01/data/query/production",
        );
        assert_eq!(
            Sanity::new(&config(false)).unwrap().url,
            "https://abc123.api.sanity.io/v2024-01-01/data/query/production",
        );
    }
}
