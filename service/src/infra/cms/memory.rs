//! In-memory [`Cms`] implementation.

use std::{path::Path, sync::Arc};

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{Listing, Post, Slug},
    filter::{Filter, Sort},
    read,
};

use super::{document, Cms, Error};

/// In-memory content dataset.
///
/// Evaluates queries with the same semantics as the content backend does,
/// so it serves local previews and tests.
#[derive(Clone, Debug, Default)]
pub struct Memory(Arc<Dataset>);

/// Contents of a [`Memory`].
#[derive(Debug, Default)]
struct Dataset {
    /// All the [`Listing`]s.
    listings: Vec<Listing>,

    /// All the [`Post`]s, newest first.
    posts: Vec<Post>,
}

impl Memory {
    /// Creates a new [`Memory`] out of the provided documents.
    #[must_use]
    pub fn new(listings: Vec<Listing>, mut posts: Vec<Post>) -> Self {
        posts.sort_by(|a, b| {
            b.published_at.cmp(&a.published_at).then_with(|| a.id.cmp(&b.id))
        });
        Self(Arc::new(Dataset { listings, posts }))
    }

    /// Parses a new [`Memory`] out of the provided JSON fixtures.
    ///
    /// Fixtures are an object with `listings` and `posts` arrays of projected
    /// documents.
    ///
    /// # Errors
    ///
    /// If the fixtures are not valid JSON or contain an invalid document.
    pub fn from_json(json: &[u8]) -> Result<Self, Traced<Error>> {
        let dataset = serde_json::from_slice::<document::Dataset>(json)
            .map_err(tracerr::from_and_wrap!(=> Error))?;

        let listings = dataset
            .listings
            .into_iter()
            .map(Listing::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(tracerr::wrap!())?;
        let posts = dataset
            .posts
            .into_iter()
            .map(Post::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(tracerr::wrap!())?;

        Ok(Self::new(listings, posts))
    }

    /// Loads a new [`Memory`] from the JSON fixtures file at the provided
    /// `path`.
    ///
    /// # Errors
    ///
    /// If the file cannot be read or its contents are invalid.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, Traced<Error>> {
        let json = tokio::fs::read(path)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))?;
        Self::from_json(&json).map_err(tracerr::wrap!())
    }

    /// Returns the [`Listing`]s matching the provided [`Filter`], in its
    /// [`Sort`] order.
    fn matching(&self, filter: &Filter) -> Vec<&Listing> {
        let mut found = self
            .0
            .listings
            .iter()
            .filter(|l| filter.matches(l))
            .collect::<Vec<_>>();
        found.sort_by(|a, b| filter.compare(a, b));
        found
    }
}

impl Cms<Select<By<Vec<Listing>, read::listing::list::Selector>>> for Memory {
    type Ok = Vec<Listing>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Listing>, read::listing::list::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::listing::list::Selector { window, filter } = by.into_inner();
        Ok(self
            .matching(&filter)
            .into_iter()
            .skip(window.offset)
            .take(window.limit)
            .cloned()
            .collect())
    }
}

impl Cms<Select<By<read::listing::list::TotalCount, Filter>>> for Memory {
    type Ok = read::listing::list::TotalCount;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::listing::list::TotalCount, Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.matching(by.inner()).len().into())
    }
}

impl Cms<Select<By<Option<Listing>, Slug>>> for Memory {
    type Ok = Option<Listing>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Listing>, Slug>>,
    ) -> Result<Self::Ok, Self::Err> {
        let slug = by.into_inner();
        Ok(self.0.listings.iter().find(|l| l.slug == slug).cloned())
    }
}

impl Cms<Select<By<Vec<Listing>, read::listing::Featured>>> for Memory {
    type Ok = Vec<Listing>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Listing>, read::listing::Featured>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::listing::Featured { limit } = by.into_inner();
        let featured = Filter {
            sort: Sort::Featured,
            ..Filter::default()
        };
        Ok(self
            .matching(&featured)
            .into_iter()
            .filter(|l| l.featured)
            .take(limit)
            .cloned()
            .collect())
    }
}

impl Cms<Select<By<Vec<Post>, read::post::list::Selector>>> for Memory {
    type Ok = Vec<Post>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Post>, read::post::list::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let window = by.into_inner().window;
        Ok(self
            .0
            .posts
            .iter()
            .skip(window.offset)
            .take(window.limit)
            .cloned()
            .collect())
    }
}

impl Cms<Select<By<read::post::list::TotalCount, ()>>> for Memory {
    type Ok = read::post::list::TotalCount;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: Select<By<read::post::list::TotalCount, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.0.posts.len().into())
    }
}

impl Cms<Select<By<Option<Post>, Slug>>> for Memory {
    type Ok = Option<Post>;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Post>, Slug>>,
    ) -> Result<Self::Ok, Self::Err> {
        let slug = by.into_inner();
        Ok(self.0.posts.iter().find(|p| p.slug == slug).cloned())
    }
}

impl Cms<Select<By<read::sitemap::Documents, ()>>> for Memory {
    type Ok = read::sitemap::Documents;
    type Err = Traced<Error>;

    async fn execute(
        &self,
        _: Select<By<read::sitemap::Documents, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(read::sitemap::Documents {
            listings: self
                .0
                .listings
                .iter()
                .map(|l| read::sitemap::Listing {
                    slug: l.slug.clone(),
                    updated_at: l.updated_at,
                    featured: l.featured,
                    status: l.status,
                })
                .collect(),
            posts: self
                .0
                .posts
                .iter()
                .map(|p| read::sitemap::Post {
                    slug: p.slug.clone(),
                    updated_at: p.updated_at,
                    featured: p.featured,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Select},
        pagination::{Selector, Window},
    };
    use serde_json::json;

    use crate::{
        domain::{Listing, Slug},
        filter::{self, Filter, Sort},
        infra::cms::Cms as _,
        read,
    };

    use super::Memory;

    fn memory() -> Memory {
        Memory::new(
            vec![
                filter::spec::listing("a", 500_000),
                filter::spec::listing("b", 1_000_000),
                filter::spec::listing("c", 2_000_000),
            ],
            vec![],
        )
    }

    #[tokio::test]
    async fn windows_filtered_listings() {
        let filter = Filter {
            sort: Sort::PriceHigh,
            ..filter::decode("priceMin=900000")
        };

        let items: Vec<Listing> = memory()
            .execute(Select(By::<Vec<Listing>, _>::new(Selector {
                window: Window::new(1, 12),
                filter: filter.clone(),
            })))
            .await
            .unwrap();
        let total: read::listing::list::TotalCount =
            memory()
                .execute(Select(By::<read::listing::list::TotalCount, _>::new(
                    filter,
                )))
                .await
                .unwrap();

        assert_eq!(
            items.iter().map(|l| l.id.as_str()).collect::<Vec<_>>(),
            ["b"],
        );
        assert_eq!(usize::from(total), 2);
    }

    #[tokio::test]
    async fn finds_by_slug() {
        let found: Option<Listing> = memory()
            .execute(Select(By::<Option<Listing>, _>::new(
                Slug::new("listing-b").unwrap(),
            )))
            .await
            .unwrap();
        assert_eq!(
            found.map(|l| l.price.label()).as_deref(),
            Some("$1,000,000"),
        );
    }

    #[test]
    fn parses_fixtures() {
        let json = json!({
            "listings": [{
                "_id": "l1",
                "_createdAt": "2025-01-01T00:00:00Z",
                "title": "Casa",
                "slug": "casa",
                "price": 10,
                "propertyType": "land",
            }],
            "posts": [
                {
                    "_id": "old",
                    "title": "Old",
                    "slug": "old",
                    "publishedAt": "2024-01-01T00:00:00Z",
                },
                {
                    "_id": "new",
                    "title": "New",
                    "slug": "new",
                    "publishedAt": "2025-01-01T00:00:00Z",
                },
            ],
        });

        let memory = Memory::from_json(json.to_string().as_bytes()).unwrap();

        assert_eq!(memory.0.listings.len(), 1);
        assert_eq!(memory.0.posts[0].slug, "new");
        assert!(Memory::from_json(b"{\"listings\": [{\"_id\": 1}]}").is_err());
    }
}
