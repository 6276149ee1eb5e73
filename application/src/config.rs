//! [`Config`]-related definitions.

use std::{num::NonZeroUsize, time};

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use secrecy::{ExposeSecret as _, SecretBox, SecretString};
use serde::Deserialize;
use service::domain::{revalidation::Secret, Slug};
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: Server,

    /// Site configuration.
    pub site: Site,

    /// Content backend configuration.
    pub cms: Cms,

    /// Service configuration.
    pub service: Service,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(8080)]
    pub port: u16,

    /// [CORS] configuration of the JSON API.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,
}

/// [CORS] configuration.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// List of allowed origins.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Site configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Site {
    /// Public URL the site is served at, without a trailing slash.
    #[default("http://localhost:8080".to_owned())]
    pub url: String,

    /// Name of the site.
    #[default("Punta Mita Estates".to_owned())]
    pub name: String,

    /// Listings pages configuration.
    pub listings: Listings,

    /// Blog pages configuration.
    pub posts: Posts,
}

impl Site {
    /// Returns the absolute URL of the provided `path` on this [`Site`].
    #[must_use]
    pub fn absolute(&self, path: &str) -> String {
        format!("{}{path}", self.url.trim_end_matches('/'))
    }
}

/// Listings pages configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Listings {
    /// Number of listings on a single page or feed batch.
    #[default(NonZeroUsize::MIN.saturating_add(11))]
    pub page_size: NonZeroUsize,

    /// Way the listings index is paginated.
    pub pagination: Pagination,

    /// Development a listings feed without any filter is redirected to.
    #[default(default_development())]
    pub default_development: Slug,

    /// Number of featured listings shown on the home page.
    #[default(6)]
    pub featured: usize,
}

/// Returns the default [`Listings::default_development`].
fn default_development() -> Slug {
    Slug::new("punta-mita")
        .unwrap_or_else(|| unreachable!("`punta-mita` is a valid `Slug`"))
}

/// Way the listings index is paginated.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum Pagination {
    /// Batches are appended once the end of the list is revealed.
    #[default]
    InfiniteScroll,

    /// Discrete numbered pages.
    Pages,
}

/// Blog pages configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Posts {
    /// Number of posts on a single page.
    #[default(NonZeroUsize::MIN.saturating_add(8))]
    pub page_size: NonZeroUsize,

    /// Number of latest posts shown on the home page.
    #[default(3)]
    pub latest: usize,
}

/// Content backend configuration.
#[derive(Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cms {
    /// Content backend to use.
    pub backend: Backend,

    /// Path to the JSON fixtures of the [`Backend::Memory`].
    #[default("fixtures/content.json".to_owned())]
    pub fixtures: String,

    /// [`Backend::Sanity`] configuration.
    pub sanity: Sanity,
}

/// Content backend.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// In-memory dataset loaded from fixtures.
    #[default]
    Memory,

    /// [Sanity] content lake.
    ///
    /// [Sanity]: https://www.sanity.io
    Sanity,
}

/// [Sanity] configuration.
///
/// [Sanity]: https://www.sanity.io
#[derive(Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Sanity {
    /// ID of the project.
    pub project_id: String,

    /// Dataset to query.
    #[default("production".to_owned())]
    pub dataset: String,

    /// Dated version of the HTTP API.
    #[default("2024-01-01".to_owned())]
    pub api_version: String,

    /// Indicator whether to query the cached CDN API.
    #[default(true)]
    pub use_cdn: bool,

    /// Read token for private datasets.
    pub token: Option<SecretString>,

    /// Timeout of a single request.
    #[default(time::Duration::from_secs(10))]
    #[serde(with = "humantime_serde")]
    pub timeout: time::Duration,
}

impl From<Sanity> for service::infra::cms::sanity::Config {
    fn from(value: Sanity) -> Self {
        let Sanity {
            project_id,
            dataset,
            api_version,
            use_cdn,
            token,
            timeout,
        } = value;

        Self {
            project_id,
            dataset,
            api_version,
            use_cdn,
            token,
            timeout,
        }
    }
}

/// Service configuration.
#[derive(Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Service {
    /// Rendered pages cache configuration.
    pub cache: Cache,

    /// Secret authenticating revalidation webhooks.
    ///
    /// Revalidation is disabled if none is set.
    pub revalidate_secret: Option<SecretString>,

    /// Service tasks configuration.
    pub tasks: Tasks,
}

impl From<Service> for service::Config {
    fn from(value: Service) -> Self {
        let Service {
            cache: Cache { ttl, capacity },
            revalidate_secret,
            tasks: Tasks {
                purge_expired_pages,
            },
        } = value;

        let secret = revalidate_secret
            .as_ref()
            .map_or_else(Secret::default, |s| s.expose_secret().into());

        Self {
            cache: service::infra::cache::Config { ttl, capacity },
            purge_expired_pages: service::task::purge_expired_pages::Config {
                interval: purge_expired_pages.interval,
            },
            revalidate_secret: SecretBox::new(Box::new(secret)),
        }
    }
}

/// Rendered pages cache configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cache {
    /// Time a rendered page is served from the cache.
    #[default(time::Duration::from_secs(60))]
    #[serde(with = "humantime_serde")]
    pub ttl: time::Duration,

    /// Maximum number of cached pages.
    #[default(512)]
    pub capacity: usize,
}

/// Service tasks configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Tasks {
    /// `PurgeExpiredPages` task configuration.
    pub purge_expired_pages: Task,
}

/// Service task configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Task {
    /// Task execution interval.
    #[default(time::Duration::from_secs(5 * 60))]
    #[serde(with = "humantime_serde")]
    pub interval: time::Duration,
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use super::{Backend, Config, Pagination};

    #[test]
    fn defaults_without_file() {
        let config = Config::new("does-not-exist.toml").unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.cors.origins, ["*"]);
        assert_eq!(config.cms.backend, Backend::Memory);
        assert_eq!(config.site.listings.page_size.get(), 12);
        assert_eq!(config.site.listings.pagination, Pagination::InfiniteScroll);
        assert_eq!(config.site.listings.default_development, "punta-mita");
        assert_eq!(config.site.posts.page_size.get(), 9);
        assert_eq!(config.service.cache.ttl, Duration::from_secs(60));
        assert!(config.service.revalidate_secret.is_none());
    }

    #[test]
    fn builds_absolute_urls() {
        let mut config = Config::default();
        config.site.url = "https://example.com/".to_owned();

        assert_eq!(
            config.site.absolute("/blog/news"),
            "https://example.com/blog/news",
        );
    }
}
