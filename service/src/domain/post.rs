//! [`Post`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display, From, Into};
use serde::{Deserialize, Serialize};

use super::{listing::Image, Slug};

/// Blog article.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// ID of this [`Post`].
    pub id: Id,

    /// Title of this [`Post`].
    pub title: String,

    /// [`Slug`] of this [`Post`] used in its URL.
    pub slug: Slug,

    /// Short summary of this [`Post`].
    pub excerpt: Option<String>,

    /// [`Body`] of this [`Post`].
    pub body: Body,

    /// Name of the author of this [`Post`], if any.
    pub author: Option<String>,

    /// Name of the category of this [`Post`], if any.
    pub category: Option<String>,

    /// Main [`Image`] of this [`Post`], if any.
    pub main_image: Option<Image>,

    /// [`DateTime`] when this [`Post`] was published.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub published_at: PublicationDateTime,

    /// Indicator whether this [`Post`] is promoted.
    pub featured: bool,

    /// [`ReadingTime`] of this [`Post`].
    pub reading_time: ReadingTime,

    /// [`DateTime`] when this [`Post`] was last modified.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub updated_at: ModificationDateTime,
}

impl Post {
    /// Returns the URL path of this [`Post`].
    #[must_use]
    pub fn path(&self) -> String {
        format!("/blog/{}", self.slug)
    }
}

/// ID of a [`Post`], as assigned by the content backend.
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[as_ref(str)]
pub struct Id(String);

/// [`DateTime`] when a [`Post`] was published.
pub type PublicationDateTime = DateTimeOf<(Post, unit::Publication)>;

/// [`DateTime`] when a [`Post`] was last modified.
pub type ModificationDateTime = DateTimeOf<(Post, unit::Modification)>;

/// Body of a [`Post`] as a sequence of text [`Block`]s.
#[derive(Clone, Debug, Default, Eq, From, PartialEq, Serialize)]
pub struct Body(Vec<Block>);

impl Body {
    /// Returns the [`Block`]s of this [`Body`].
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.0
    }

    /// Counts the whitespace-separated words of this [`Body`].
    #[must_use]
    pub fn word_count(&self) -> usize {
        self.0.iter().map(|b| b.text.split_whitespace().count()).sum()
    }
}

/// Paragraph-level piece of a [`Body`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Block {
    /// [`BlockStyle`] of this [`Block`].
    pub style: BlockStyle,

    /// Plain text of this [`Block`].
    pub text: String,
}

define_kind! {
    #[doc = "Style of a [`Block`]."]
    enum BlockStyle {
        #[doc = "Regular paragraph."]
        #[label = "p"]
        Normal,

        #[doc = "Second-level heading."]
        #[label = "h2"]
        H2,

        #[doc = "Third-level heading."]
        #[label = "h3"]
        H3,

        #[doc = "Fourth-level heading."]
        #[label = "h4"]
        H4,

        #[doc = "Quotation."]
        #[label = "blockquote"]
        Blockquote,
    }
}

impl BlockStyle {
    /// Returns the HTML tag rendering this [`BlockStyle`].
    #[must_use]
    pub const fn tag(self) -> &'static str {
        self.label()
    }
}

/// Estimated time of reading a [`Post`], in minutes.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    Eq,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
pub struct ReadingTime(u32);

impl ReadingTime {
    /// Reading speed used for estimations.
    pub const WORDS_PER_MINUTE: usize = 200;

    /// Creates a new [`ReadingTime`], if the provided number of `minutes` is
    /// positive.
    #[must_use]
    pub const fn new(minutes: u32) -> Option<Self> {
        if minutes == 0 {
            None
        } else {
            Some(Self(minutes))
        }
    }

    /// Estimates the [`ReadingTime`] of the provided [`Body`].
    ///
    /// Never less than a minute.
    #[must_use]
    pub fn estimate(body: &Body) -> Self {
        let minutes = body.word_count().div_ceil(Self::WORDS_PER_MINUTE);
        Self(u32::try_from(minutes).unwrap_or(u32::MAX).max(1))
    }

    /// Returns the number of minutes of this [`ReadingTime`].
    #[must_use]
    pub const fn minutes(self) -> u32 {
        self.0
    }
}
