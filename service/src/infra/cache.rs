//! [`Cache`] of rendered pages.

use std::{collections::HashMap, convert::Infallible, sync::Arc, time::Duration};

use common::{
    operations::{By, Delete, Insert, Select},
    unit, DateTimeOf,
};
#[cfg(doc)]
use common::DateTime;
use derive_more::{AsRef, Display, From};
use smart_default::SmartDefault;
use tokio::sync::RwLock;
use xxhash_rust::xxh3;

use crate::domain::revalidation::Tag;

/// Page cache operation.
pub use common::Handler as Cache;

/// [`Pages`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Time a cached [`Page`] stays fresh.
    #[default(Duration::from_secs(60))]
    pub ttl: Duration,

    /// Maximum number of cached [`Page`]s.
    #[default(512)]
    pub capacity: usize,
}

/// Key of a cached [`Page`]: request path along with its query string.
#[derive(AsRef, Clone, Debug, Display, Eq, From, Hash, PartialEq)]
#[as_ref(str)]
#[from(&str, String)]
pub struct Key(String);

/// Entity tag identifying the contents of a [`Page`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str)]
pub struct ETag(String);

impl ETag {
    /// Computes the [`ETag`] of the provided `content`.
    #[must_use]
    pub fn of(content: &str) -> Self {
        Self(format!("\"{:016x}\"", xxh3::xxh3_64(content.as_bytes())))
    }

    /// Checks whether the provided `If-None-Match` header value matches this
    /// [`ETag`].
    #[must_use]
    pub fn matches(&self, if_none_match: &str) -> bool {
        if_none_match.split(',').map(str::trim).any(|tag| {
            tag == "*" || tag.trim_start_matches("W/") == self.0
        })
    }
}

/// [`DateTime`] when a cached [`Page`] goes stale.
pub type ExpirationDateTime = DateTimeOf<(Page, unit::Expiration)>;

/// Rendered page along with its caching metadata.
#[derive(Clone, Debug)]
pub struct Page {
    /// [`Key`] this [`Page`] is cached under.
    pub key: Key,

    /// Rendered HTML.
    pub html: Arc<str>,

    /// [`ETag`] of the `html`.
    pub etag: ETag,

    /// [`Tag`]s invalidating this [`Page`].
    pub tags: Vec<Tag>,

    /// [`DateTime`] when this [`Page`] goes stale.
    pub expires_at: ExpirationDateTime,
}

impl Page {
    /// Creates a new [`Page`] staying fresh for the provided `ttl`.
    #[must_use]
    pub fn new(key: Key, html: String, tags: Vec<Tag>, ttl: Duration) -> Self {
        Self {
            key,
            etag: ETag::of(&html),
            html: html.into(),
            tags,
            expires_at: ExpirationDateTime::now() + ttl,
        }
    }

    /// Indicates whether this [`Page`] is stale at the provided moment.
    #[must_use]
    pub fn is_expired(&self, now: ExpirationDateTime) -> bool {
        self.expires_at <= now
    }
}

/// In-memory [`Page`]s storage.
#[derive(Clone, Debug, Default)]
pub struct Pages {
    /// Cached [`Page`]s by their [`Key`]s.
    entries: Arc<RwLock<HashMap<Key, Page>>>,

    /// Maximum number of cached [`Page`]s.
    capacity: usize,
}

impl Pages {
    /// Creates a new empty [`Pages`] storage holding up to the provided
    /// `capacity` of [`Page`]s.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Arc::default(),
            capacity,
        }
    }

    /// Returns the number of cached [`Page`]s, including the stale ones.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

impl Cache<Select<By<Option<Page>, Key>>> for Pages {
    type Ok = Option<Page>;
    type Err = Infallible;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Page>, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let now = ExpirationDateTime::now();
        Ok(self
            .entries
            .read()
            .await
            .get(by.inner())
            .filter(|p| !p.is_expired(now))
            .cloned())
    }
}

impl Cache<Insert<Page>> for Pages {
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Insert(page): Insert<Page>,
    ) -> Result<Self::Ok, Self::Err> {
        if self.capacity == 0 {
            return Ok(());
        }

        let mut entries = self.entries.write().await;
        if !entries.contains_key(&page.key) && entries.len() >= self.capacity {
            let now = ExpirationDateTime::now();
            entries.retain(|_, p| !p.is_expired(now));
        }
        if !entries.contains_key(&page.key) && entries.len() >= self.capacity {
            let oldest = entries
                .values()
                .min_by_key(|p| p.expires_at)
                .map(|p| p.key.clone());
            if let Some(key) = oldest {
                _ = entries.remove(&key);
            }
        }
        _ = entries.insert(page.key.clone(), page);

        Ok(())
    }
}

impl Cache<Delete<By<Page, Tag>>> for Pages {
    type Ok = usize;
    type Err = Infallible;

    async fn execute(
        &self,
        Delete(by): Delete<By<Page, Tag>>,
    ) -> Result<Self::Ok, Self::Err> {
        let tag = by.into_inner();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, p| !p.tags.contains(&tag));
        Ok(before - entries.len())
    }
}

impl Cache<Delete<By<Page, ExpirationDateTime>>> for Pages {
    type Ok = usize;
    type Err = Infallible;

    async fn execute(
        &self,
        Delete(by): Delete<By<Page, ExpirationDateTime>>,
    ) -> Result<Self::Ok, Self::Err> {
        let now = by.into_inner();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, p| !p.is_expired(now));
        Ok(before - entries.len())
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::operations::{By, Delete, Insert, Select};

    use crate::domain::{revalidation::Tag, Slug};

    use super::{Cache as _, ETag, ExpirationDateTime, Key, Page, Pages};

    fn page(key: &str, tags: Vec<Tag>, ttl: Duration) -> Page {
        Page::new(Key::from(key), format!("<p>{key}</p>"), tags, ttl)
    }

    async fn get(pages: &Pages, key: &str) -> Option<Page> {
        pages
            .execute(Select(By::<Option<Page>, _>::new(Key::from(key))))
            .await
            .unwrap()
    }

    #[test]
    fn etag_is_stable() {
        let etag = ETag::of("<html></html>");

        assert_eq!(etag, ETag::of("<html></html>"));
        assert_ne!(etag, ETag::of("<html> </html>"));
        assert!(etag.matches(etag.as_ref()));
        assert!(etag.matches(&format!("W/{etag}, \"other\"")));
        assert!(etag.matches("*"));
        assert!(!etag.matches("\"other\""));
    }

    #[tokio::test]
    async fn serves_fresh_pages_only() {
        let pages = Pages::new(8);
        let minute = Duration::from_secs(60);
        pages.execute(Insert(page("/", vec![], minute))).await.unwrap();
        pages
            .execute(Insert(page("/blog", vec![], Duration::ZERO)))
            .await
            .unwrap();

        assert!(get(&pages, "/").await.is_some());
        assert!(get(&pages, "/blog").await.is_none());

        let purged = pages
            .execute(Delete(By::<Page, _>::new(ExpirationDateTime::now())))
            .await
            .unwrap();
        assert_eq!(purged, 1);
        assert_eq!(pages.len().await, 1);
    }

    #[tokio::test]
    async fn invalidates_by_tag() {
        let pages = Pages::new(8);
        let minute = Duration::from_secs(60);
        let slug = Slug::new("villa-azul").unwrap();
        for (key, tags) in [
            ("/", vec![Tag::Home]),
            ("/properties", vec![Tag::Listings]),
            ("/properties/villa-azul", vec![Tag::Listing(slug.clone())]),
            ("/blog", vec![Tag::Posts]),
        ] {
            pages.execute(Insert(page(key, tags, minute))).await.unwrap();
        }

        let removed = pages
            .execute(Delete(By::<Page, _>::new(Tag::Listing(slug))))
            .await
            .unwrap();

        assert_eq!(removed, 1);
        assert!(get(&pages, "/properties/villa-azul").await.is_none());
        assert!(get(&pages, "/properties").await.is_some());
    }

    #[tokio::test]
    async fn evicts_when_full() {
        let pages = Pages::new(2);
        for (key, secs) in [("/a", 10), ("/b", 20), ("/c", 30)] {
            pages
                .execute(Insert(page(key, vec![], Duration::from_secs(secs))))
                .await
                .unwrap();
        }

        assert_eq!(pages.len().await, 2);
        assert!(get(&pages, "/a").await.is_none());
        assert!(get(&pages, "/c").await.is_some());
    }
}
