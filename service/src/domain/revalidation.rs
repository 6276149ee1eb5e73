//! Cache revalidation definitions.

use std::fmt;

use common::define_kind;
use derive_more::From;
use secrecy::{zeroize::Zeroize, CloneableSecret};
use serde::{Serialize, Serializer};

use super::Slug;

/// Shared secret authenticating revalidation requests.
#[derive(Clone, Default, From)]
#[from(&str, String)]
pub struct Secret(String);

impl Secret {
    /// Checks whether the provided `candidate` equals this [`Secret`].
    ///
    /// Takes the same time for any `candidate` of the same length.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        let (expected, actual) = (self.0.as_bytes(), candidate.as_bytes());
        expected.len() == actual.len()
            && expected
                .iter()
                .zip(actual)
                .fold(0, |diff, (a, b)| diff | (a ^ b))
                == 0
    }

    /// Indicates whether this [`Secret`] is empty, so nothing can match it.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl CloneableSecret for Secret {}
impl Zeroize for Secret {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

define_kind! {
    #[doc = "Type of a content document that changed."]
    enum DocumentKind {
        #[doc = "Property listing."]
        #[label = "Property"]
        Property,

        #[doc = "Blog post."]
        #[label = "Post"]
        Post,

        #[doc = "Blog post author."]
        #[label = "Author"]
        Author,

        #[doc = "Blog post category."]
        #[label = "Category"]
        Category,
    }
}

/// Label grouping cached pages which have to be invalidated together.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Tag {
    /// Home page.
    Home,

    /// Listings index pages.
    Listings,

    /// Detail page of a single listing.
    Listing(Slug),

    /// Blog index pages.
    Posts,

    /// Detail page of a single post.
    Post(Slug),

    /// Sitemap.
    Sitemap,
}

impl Tag {
    /// Returns the [`Tag`]s to invalidate once a document of the provided
    /// [`DocumentKind`] changes.
    ///
    /// Per-document [`Tag`]s are only produced when the `slug` is known.
    #[must_use]
    pub fn affected_by(kind: DocumentKind, slug: Option<&Slug>) -> Vec<Self> {
        match kind {
            DocumentKind::Property => {
                let mut tags = vec![Self::Listings];
                tags.extend(slug.cloned().map(Self::Listing));
                tags.extend([Self::Home, Self::Sitemap]);
                tags
            }
            DocumentKind::Post => {
                let mut tags = vec![Self::Posts];
                tags.extend(slug.cloned().map(Self::Post));
                tags.extend([Self::Home, Self::Sitemap]);
                tags
            }
            DocumentKind::Author | DocumentKind::Category => vec![Self::Posts],
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("home"),
            Self::Listings => f.write_str("listings"),
            Self::Listing(slug) => write!(f, "listing:{slug}"),
            Self::Posts => f.write_str("posts"),
            Self::Post(slug) => write!(f, "post:{slug}"),
            Self::Sitemap => f.write_str("sitemap"),
        }
    }
}

impl Serialize for Tag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod spec {
    use crate::domain::Slug;

    use super::{DocumentKind, Secret, Tag};

    fn tags(kind: DocumentKind, slug: Option<&str>) -> Vec<String> {
        let slug = slug.map(|s| Slug::new(s).unwrap());
        Tag::affected_by(kind, slug.as_ref())
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn property_tags() {
        assert_eq!(
            tags(DocumentKind::Property, Some("villa-azul")),
            ["listings", "listing:villa-azul", "home", "sitemap"],
        );
        assert_eq!(
            tags(DocumentKind::Property, None),
            ["listings", "home", "sitemap"],
        );
    }

    #[test]
    fn post_tags() {
        assert_eq!(
            tags(DocumentKind::Post, Some("market-report")),
            ["posts", "post:market-report", "home", "sitemap"],
        );
    }

    #[test]
    fn author_and_category_tags() {
        assert_eq!(tags(DocumentKind::Author, Some("jane")), ["posts"]);
        assert_eq!(tags(DocumentKind::Category, None), ["posts"]);
    }

    #[test]
    fn secret_matching() {
        let secret = Secret::from("s3cr3t");

        assert!(secret.matches("s3cr3t"));
        assert!(!secret.matches("s3cr3T"));
        assert!(!secret.matches("s3cr3t!"));
        assert!(!secret.matches(""));
        assert_eq!(format!("{secret:?}"), "Secret(***)");
    }
}
