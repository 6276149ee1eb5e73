//! [`Slug`] definitions.

use std::{str::FromStr, sync::LazyLock};

use derive_more::{AsRef, Display};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// URL-safe `kebab-case` identifier of a content entry or a tag.
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[as_ref(str, String)]
#[serde(try_from = "String", into = "String")]
pub struct Slug(String);

impl Slug {
    /// Creates a new [`Slug`] if the given `slug` is valid.
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Option<Self> {
        let slug = slug.into();
        Self::check(&slug).then_some(Self(slug))
    }

    /// Normalizes the given human input (trimming and lowercasing it) into a
    /// [`Slug`], if possible.
    #[must_use]
    pub fn normalize(input: &str) -> Option<Self> {
        Self::new(input.trim().to_lowercase())
    }

    /// Returns this [`Slug`] as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks whether the given `slug` is a valid [`Slug`].
    fn check(slug: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Slug`] invariants:
        /// - Must consist of lowercase ASCII letters, digits and hyphens;
        /// - Must not start/end with a hyphen;
        /// - Must not contain consecutive hyphens;
        /// - Must be between 1 and 200 characters long.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid regex")
        });

        let slug = slug.as_ref();
        slug.len() <= 200 && REGEX.is_match(slug)
    }
}

impl FromStr for Slug {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Slug`")
    }
}

impl TryFrom<String> for Slug {
    type Error = &'static str;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s).ok_or("invalid `Slug`")
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

impl PartialEq<str> for Slug {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Slug {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod spec {
    use super::Slug;

    #[test]
    fn validates() {
        assert!(Slug::new("punta-mita").is_some());
        assert!(Slug::new("villa-42").is_some());

        assert!(Slug::new("").is_none());
        assert!(Slug::new("-punta").is_none());
        assert!(Slug::new("punta--mita").is_none());
        assert!(Slug::new("Punta-Mita").is_none());
        assert!(Slug::new("punta mita").is_none());
    }

    #[test]
    fn normalizes_human_input() {
        assert_eq!(Slug::normalize("  Punta-Mita "), Slug::new("punta-mita"));
        assert_eq!(Slug::normalize("  "), None);
    }
}
