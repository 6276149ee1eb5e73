//! Raw documents as projected by the content backend.
//!
//! Any field may come as `null`, so everything is optional here and gets
//! validated while converting into domain types.

use std::str::FromStr;

use common::{DateTime, Price};
use serde::Deserialize;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        listing::{self, Area},
        post::{Block, BlockStyle, Body, ReadingTime},
        Listing, Post, Slug,
    },
    read::sitemap,
};

use super::Error;

/// Projected listing document.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListingDoc {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_createdAt")]
    created_at: Option<String>,
    #[serde(rename = "_updatedAt")]
    updated_at: Option<String>,
    title: Option<String>,
    slug: Option<String>,
    price: Option<Price>,
    bedrooms: Option<u8>,
    bathrooms: Option<u8>,
    property_type: Option<String>,
    status: Option<String>,
    developments: Option<Vec<String>>,
    neighborhoods: Option<Vec<String>>,
    view: Option<String>,
    lot_area: Option<Area>,
    construction_area: Option<Area>,
    main_image: Option<ImageDoc>,
    gallery: Option<Vec<ImageDoc>>,
    video_url: Option<String>,
    tour_url: Option<String>,
    featured: Option<bool>,
    description: Option<String>,
}

/// Projected image asset.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ImageDoc {
    url: Option<String>,
    alt: Option<String>,
}

impl ImageDoc {
    /// Converts this [`ImageDoc`] into a [`listing::Image`], if it has an
    /// asset resolved.
    fn into_image(self) -> Option<listing::Image> {
        Some(listing::Image {
            url: self.url.filter(|u| !u.is_empty())?,
            alt: self.alt.filter(|a| !a.is_empty()),
        })
    }
}

/// Projected post document.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PostDoc {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_createdAt")]
    created_at: Option<String>,
    #[serde(rename = "_updatedAt")]
    updated_at: Option<String>,
    title: Option<String>,
    slug: Option<String>,
    excerpt: Option<String>,
    body: Option<Vec<BlockDoc>>,
    author: Option<String>,
    category: Option<String>,
    main_image: Option<ImageDoc>,
    published_at: Option<String>,
    featured: Option<bool>,
    reading_time: Option<u32>,
}

/// Portable Text block.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct BlockDoc {
    #[serde(rename = "_type")]
    kind: Option<String>,
    style: Option<String>,
    children: Option<Vec<SpanDoc>>,
}

/// Portable Text span.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct SpanDoc {
    text: Option<String>,
}

/// Projected sitemap documents.
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct SitemapDoc {
    listings: Option<Vec<SitemapEntryDoc>>,
    posts: Option<Vec<SitemapEntryDoc>>,
}

/// Projected sitemap entry.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SitemapEntryDoc {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_updatedAt")]
    updated_at: Option<String>,
    slug: Option<String>,
    featured: Option<bool>,
    status: Option<String>,
}

/// Fixtures file contents.
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct Dataset {
    #[serde(default)]
    pub(crate) listings: Vec<ListingDoc>,
    #[serde(default)]
    pub(crate) posts: Vec<PostDoc>,
}

/// Shortcut for creating an [`Error::InvalidDocument`].
fn invalid(id: &str, reason: impl Into<String>) -> Traced<Error> {
    tracerr::new!(Error::InvalidDocument {
        id: id.to_owned(),
        reason: reason.into(),
    })
}

/// Requires the provided `field` to be present.
fn required<T>(
    id: &str,
    name: &str,
    field: Option<T>,
) -> Result<T, Traced<Error>> {
    field.ok_or_else(|| invalid(id, format!("missing `{name}`")))
}

/// Parses the provided optional [RFC 3339] timestamp.
///
/// [RFC 3339]: https://tools.ietf.org/html/rfc3339
fn datetime(
    id: &str,
    name: &str,
    raw: Option<&str>,
) -> Result<Option<DateTime>, Traced<Error>> {
    raw.map(|s| {
        DateTime::from_rfc3339(s)
            .map_err(|e| invalid(id, format!("invalid `{name}`: {e}")))
    })
    .transpose()
}

/// Parses the provided list of slugs, skipping invalid ones.
fn slugs(id: &str, raw: Option<Vec<String>>) -> Vec<Slug> {
    raw.unwrap_or_default()
        .into_iter()
        .filter_map(|s| {
            Slug::normalize(&s).or_else(|| {
                log::warn!("document `{id}` has invalid slug `{s}`");
                None
            })
        })
        .collect()
}

/// Parses an optional kind, treating unknown values as absent.
fn kind<T: FromStr>(id: &str, name: &str, raw: Option<&str>) -> Option<T> {
    raw.and_then(|s| {
        s.parse().ok().or_else(|| {
            log::warn!("document `{id}` has unknown `{name}` value `{s}`");
            None
        })
    })
}

impl TryFrom<ListingDoc> for Listing {
    type Error = Traced<Error>;

    fn try_from(doc: ListingDoc) -> Result<Self, Self::Error> {
        let id = doc.id.as_str();

        let slug = doc.slug.as_deref().and_then(Slug::normalize);
        let slug = required(id, "slug", slug)?;
        let created_at = required(
            id,
            "_createdAt",
            datetime(id, "_createdAt", doc.created_at.as_deref())?,
        )?;
        let updated_at = datetime(id, "_updatedAt", doc.updated_at.as_deref())?
            .unwrap_or(created_at);
        let property_type = required(
            id,
            "propertyType",
            kind(id, "propertyType", doc.property_type.as_deref()),
        )?;

        Ok(Self {
            title: required(id, "title", doc.title)?,
            price: required(id, "price", doc.price)?,
            slug,
            bedrooms: doc.bedrooms.unwrap_or_default(),
            bathrooms: doc.bathrooms.unwrap_or_default(),
            property_type,
            status: kind(id, "status", doc.status.as_deref())
                .unwrap_or(listing::Status::Available),
            developments: slugs(id, doc.developments),
            neighborhoods: slugs(id, doc.neighborhoods),
            view: kind(id, "view", doc.view.as_deref()),
            lot_area: doc.lot_area,
            construction_area: doc.construction_area,
            main_image: doc.main_image.and_then(ImageDoc::into_image),
            gallery: doc
                .gallery
                .unwrap_or_default()
                .into_iter()
                .filter_map(ImageDoc::into_image)
                .collect(),
            video_url: doc.video_url.filter(|u| !u.is_empty()),
            tour_url: doc.tour_url.filter(|u| !u.is_empty()),
            featured: doc.featured.unwrap_or_default(),
            description: doc.description.filter(|d| !d.trim().is_empty()),
            created_at: created_at.coerce(),
            updated_at: updated_at.coerce(),
            id: doc.id.into(),
        })
    }
}

impl BlockDoc {
    /// Converts this [`BlockDoc`] into a [`Block`], if it's a text one.
    fn into_block(self) -> Option<Block> {
        if self.kind.as_deref().is_some_and(|k| k != "block") {
            return None;
        }
        let text = self
            .children
            .unwrap_or_default()
            .into_iter()
            .filter_map(|s| s.text)
            .collect::<String>();
        if text.trim().is_empty() {
            return None;
        }
        let style = self
            .style
            .and_then(|s| s.parse().ok())
            .unwrap_or(BlockStyle::Normal);
        Some(Block { style, text })
    }
}

impl TryFrom<PostDoc> for Post {
    type Error = Traced<Error>;

    fn try_from(doc: PostDoc) -> Result<Self, Self::Error> {
        let id = doc.id.as_str();

        let slug = doc.slug.as_deref().and_then(Slug::normalize);
        let slug = required(id, "slug", slug)?;
        let published_at = required(
            id,
            "publishedAt",
            datetime(id, "publishedAt", doc.published_at.as_deref())?.or(
                datetime(id, "_createdAt", doc.created_at.as_deref())?,
            ),
        )?;
        let updated_at = datetime(id, "_updatedAt", doc.updated_at.as_deref())?
            .unwrap_or(published_at);
        let body = Body::from(
            doc.body
                .unwrap_or_default()
                .into_iter()
                .filter_map(BlockDoc::into_block)
                .collect::<Vec<_>>(),
        );
        let reading_time = doc
            .reading_time
            .and_then(ReadingTime::new)
            .unwrap_or_else(|| ReadingTime::estimate(&body));

        Ok(Self {
            title: required(id, "title", doc.title)?,
            slug,
            excerpt: doc.excerpt.filter(|e| !e.trim().is_empty()),
            body,
            author: doc.author,
            category: doc.category,
            main_image: doc.main_image.and_then(ImageDoc::into_image),
            published_at: published_at.coerce(),
            featured: doc.featured.unwrap_or_default(),
            reading_time,
            updated_at: updated_at.coerce(),
            id: doc.id.into(),
        })
    }
}

impl SitemapEntryDoc {
    /// Returns the [`Slug`] and the modification [`DateTime`] of this
    /// [`SitemapEntryDoc`], skipping it if any is missing.
    fn parts(&self) -> Option<(Slug, DateTime)> {
        let slug = self.slug.as_deref().and_then(Slug::normalize);
        let updated_at = self
            .updated_at
            .as_deref()
            .and_then(|s| DateTime::from_rfc3339(s).ok());
        if slug.is_none() || updated_at.is_none() {
            log::warn!("skipping incomplete sitemap document `{}`", self.id);
        }
        Some((slug?, updated_at?))
    }
}

impl From<SitemapDoc> for sitemap::Documents {
    fn from(doc: SitemapDoc) -> Self {
        Self {
            listings: doc
                .listings
                .unwrap_or_default()
                .into_iter()
                .filter_map(|d| {
                    let (slug, updated_at) = d.parts()?;
                    Some(sitemap::Listing {
                        slug,
                        updated_at: updated_at.coerce(),
                        featured: d.featured.unwrap_or_default(),
                        status: kind(&d.id, "status", d.status.as_deref())
                            .unwrap_or(listing::Status::Available),
                    })
                })
                .collect(),
            posts: doc
                .posts
                .unwrap_or_default()
                .into_iter()
                .filter_map(|d| {
                    let (slug, updated_at) = d.parts()?;
                    Some(sitemap::Post {
                        slug,
                        updated_at: updated_at.coerce(),
                        featured: d.featured.unwrap_or_default(),
                    })
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod spec {
    use serde_json::json;

    use crate::domain::{listing, post::BlockStyle, Listing, Post};

    use super::{ListingDoc, PostDoc};

    #[test]
    fn converts_listing() {
        let doc: ListingDoc = serde_json::from_value(json!({
            "_id": "abc",
            "_createdAt": "2025-01-01T00:00:00Z",
            "_updatedAt": null,
            "title": "Villa Azul",
            "slug": "villa-azul",
            "price": 1250000,
            "bedrooms": 4,
            "bathrooms": null,
            "propertyType": "Villa",
            "status": "reserved",
            "developments": ["punta-mita", "Not A Slug!"],
            "neighborhoods": null,
            "view": "ocean",
            "lotArea": {"value": 1200, "unit": "sqm"},
            "mainImage": {"url": "https://cdn/img.jpg", "alt": null},
            "gallery": [{"url": null, "alt": "broken"}],
            "featured": true,
        }))
        .unwrap();

        let listing = Listing::try_from(doc).unwrap();

        assert_eq!(listing.slug, "villa-azul");
        assert_eq!(listing.price.label(), "$1,250,000");
        assert_eq!(listing.bathrooms, 0);
        assert_eq!(listing.property_type, listing::PropertyType::Villa);
        assert_eq!(listing.status, listing::Status::Reserved);
        assert_eq!(listing.developments, ["punta-mita"]);
        assert_eq!(listing.view, Some(listing::View::Ocean));
        assert_eq!(
            listing.lot_area.map(|a| a.to_string()).as_deref(),
            Some("1200 m²"),
        );
        assert!(listing.gallery.is_empty());
        assert_eq!(listing.updated_at.to_rfc3339(), "2025-01-01T00:00:00Z");
    }

    #[test]
    fn rejects_incomplete_listing() {
        let doc: ListingDoc = serde_json::from_value(json!({
            "_id": "abc",
            "_createdAt": "2025-01-01T00:00:00Z",
            "title": "No slug",
            "price": 1,
            "propertyType": "condo",
        }))
        .unwrap();

        let err = Listing::try_from(doc).unwrap_err();
        assert_eq!(
            err.into_inner().to_string(),
            "invalid `abc` document: missing `slug`",
        );
    }

    #[test]
    fn converts_post_body() {
        let doc: PostDoc = serde_json::from_value(json!({
            "_id": "p1",
            "_updatedAt": "2025-02-02T00:00:00Z",
            "title": "Market report",
            "slug": "market-report",
            "publishedAt": "2025-02-01T09:00:00Z",
            "body": [
                {"_type": "block", "style": "h2", "children": [
                    {"text": "Prices "}, {"text": "rise"},
                ]},
                {"_type": "image"},
                {"_type": "block", "style": "weird", "children": [
                    {"text": "Quite a few words here."},
                ]},
            ],
        }))
        .unwrap();

        let post = Post::try_from(doc).unwrap();

        let blocks = post.body.blocks();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].style, BlockStyle::H2);
        assert_eq!(blocks[0].text, "Prices rise");
        assert_eq!(blocks[1].style, BlockStyle::Normal);
        assert_eq!(post.reading_time.minutes(), 1);
        assert_eq!(post.published_at.to_date(), "2025-02-01");
    }
}
