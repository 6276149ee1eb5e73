//! Sitemap read definitions.

use std::fmt;

use common::DateTime;

use crate::domain::{listing, post, Slug};

/// Documents listed in a sitemap.
#[derive(Clone, Debug, Default)]
pub struct Documents {
    /// Published listings.
    pub listings: Vec<Listing>,

    /// Published posts.
    pub posts: Vec<Post>,
}

/// Listing as seen by a sitemap.
#[derive(Clone, Debug)]
pub struct Listing {
    /// [`Slug`] of the listing.
    pub slug: Slug,

    /// [`DateTime`] when the listing was last modified.
    pub updated_at: listing::ModificationDateTime,

    /// Indicator whether the listing is promoted.
    pub featured: bool,

    /// [`listing::Status`] of the listing.
    pub status: listing::Status,
}

/// Post as seen by a sitemap.
#[derive(Clone, Debug)]
pub struct Post {
    /// [`Slug`] of the post.
    pub slug: Slug,

    /// [`DateTime`] when the post was last modified.
    pub updated_at: post::ModificationDateTime,

    /// Indicator whether the post is promoted.
    pub featured: bool,
}

/// Pages always present in a sitemap, along with their [`Priority`].
pub const STATIC_ROUTES: &[(&str, Priority)] = &[
    ("/", Priority(10)),
    ("/properties", Priority(9)),
    ("/blog", Priority(8)),
    ("/faq", Priority(5)),
    ("/contact", Priority(5)),
];

impl Documents {
    /// Returns the sitemap [`Entry`]s: static pages first, then listings,
    /// then posts.
    #[must_use]
    pub fn entries(&self) -> Vec<Entry> {
        let statics = STATIC_ROUTES.iter().map(|&(path, priority)| Entry {
            path: path.to_owned(),
            last_modified: None,
            priority,
        });
        let listings = self.listings.iter().map(|l| Entry {
            path: format!("/properties/{}", l.slug),
            last_modified: Some(l.updated_at.coerce()),
            priority: Priority::of_listing(l),
        });
        let posts = self.posts.iter().map(|p| Entry {
            path: format!("/blog/{}", p.slug),
            last_modified: Some(p.updated_at.coerce()),
            priority: Priority::of_post(p),
        });

        statics.chain(listings).chain(posts).collect()
    }
}

/// Single URL of a sitemap.
#[derive(Clone, Debug)]
pub struct Entry {
    /// Absolute path of the page.
    pub path: String,

    /// [`DateTime`] when the page content was last modified, if known.
    pub last_modified: Option<DateTime>,

    /// [`Priority`] of the page.
    pub priority: Priority,
}

/// Relative importance of a sitemap [`Entry`], in tenths.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct Priority(u8);

impl Priority {
    /// Estimates the [`Priority`] of a [`Listing`] page.
    #[must_use]
    pub fn of_listing(listing: &Listing) -> Self {
        if listing.featured {
            Self(9)
        } else if listing.status == listing::Status::Available {
            Self(8)
        } else {
            Self(6)
        }
    }

    /// Estimates the [`Priority`] of a [`Post`] page.
    #[must_use]
    pub const fn of_post(post: &Post) -> Self {
        if post.featured {
            Self(7)
        } else {
            Self(6)
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

#[cfg(test)]
mod spec {
    use crate::domain::{listing, post, Slug};

    use super::{Documents, Listing, Post};

    fn listing(slug: &str, featured: bool, status: listing::Status) -> Listing {
        Listing {
            slug: Slug::new(slug).unwrap(),
            updated_at: listing::ModificationDateTime::from_rfc3339(
                "2025-03-03T10:00:00Z",
            )
            .unwrap(),
            featured,
            status,
        }
    }

    #[test]
    fn prioritizes_entries() {
        let docs = Documents {
            listings: vec![
                listing("a", true, listing::Status::Sold),
                listing("b", false, listing::Status::Available),
                listing("c", false, listing::Status::Reserved),
            ],
            posts: vec![Post {
                slug: Slug::new("news").unwrap(),
                updated_at: post::ModificationDateTime::UNIX_EPOCH,
                featured: true,
            }],
        };

        let entries = docs
            .entries()
            .into_iter()
            .map(|e| (e.path, e.priority.to_string()))
            .collect::<Vec<_>>();

        assert_eq!(
            entries,
            [
                ("/", "1.0"),
                ("/properties", "0.9"),
                ("/blog", "0.8"),
                ("/faq", "0.5"),
                ("/contact", "0.5"),
                ("/properties/a", "0.9"),
                ("/properties/b", "0.8"),
                ("/properties/c", "0.6"),
                ("/blog/news", "0.7"),
            ]
            .map(|(p, v)| (p.to_owned(), v.to_owned())),
        );
    }

    #[test]
    fn carries_last_modification() {
        let docs = Documents {
            listings: vec![listing("a", false, listing::Status::Available)],
            posts: vec![],
        };

        let entry = &docs.entries()[5];
        assert_eq!(
            entry.last_modified.map(|d| d.to_date()).as_deref(),
            Some("2025-03-03"),
        );
        assert!(docs.entries()[0].last_modified.is_none());
    }
}
