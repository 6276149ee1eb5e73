//! [`Filter`] of [`Listing`]s and its URL representation.

mod codec;
pub mod editor;

use std::cmp::Ordering;

use common::{define_kind, Price};

use crate::domain::{
    listing::PropertyType,
    location::{self, Neighborhood},
    Listing, Slug,
};

pub use self::{
    codec::{decode, encode},
    editor::Editor,
};

define_kind! {
    #[doc = "Order of [`Listing`]s."]
    enum Sort {
        #[doc = "Featured [`Listing`]s first, newest first."]
        #[label = "Featured"]
        Featured,

        #[doc = "Cheapest [`Listing`]s first."]
        #[label = "Price: low to high"]
        PriceLow,

        #[doc = "Most expensive [`Listing`]s first."]
        #[label = "Price: high to low"]
        PriceHigh,
    }
}

impl Default for Sort {
    fn default() -> Self {
        Self::Featured
    }
}

/// Selection of [`Listing`]s made by a visitor.
///
/// The URL query string is the only durable representation of a [`Filter`],
/// see [`decode()`] and [`encode()`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Filter {
    /// Minimum number of bedrooms.
    pub bedrooms: Option<u8>,

    /// Minimum number of bathrooms.
    pub bathrooms: Option<u8>,

    /// Inclusive lower bound of the [`Listing::price`].
    pub price_min: Option<Price>,

    /// Inclusive upper bound of the [`Listing::price`].
    pub price_max: Option<Price>,

    /// Required [`PropertyType`].
    pub property_type: Option<PropertyType>,

    /// Developments any of which a [`Listing`] must belong to.
    pub developments: Vec<Slug>,

    /// Neighborhoods any of which a [`Listing`] must belong to.
    pub neighborhoods: Vec<Slug>,

    /// [`Sort`] order of the result.
    pub sort: Sort,
}

impl Filter {
    /// Creates a new [`Filter`] selecting the provided development only.
    #[must_use]
    pub fn development(slug: Slug) -> Self {
        Self {
            developments: vec![slug],
            ..Self::default()
        }
    }

    /// Indicates whether this [`Filter`] narrows nothing down.
    ///
    /// [`Sort`] doesn't count, as it never excludes a [`Listing`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let Self {
            bedrooms,
            bathrooms,
            price_min,
            price_max,
            property_type,
            developments,
            neighborhoods,
            sort: _,
        } = self;

        bedrooms.is_none()
            && bathrooms.is_none()
            && price_min.is_none()
            && price_max.is_none()
            && property_type.is_none()
            && developments.is_empty()
            && neighborhoods.is_empty()
    }

    /// Checks whether the provided [`Listing`] satisfies this [`Filter`].
    ///
    /// Bounds are inclusive, and list dimensions require a non-empty
    /// intersection.
    #[must_use]
    pub fn matches(&self, listing: &Listing) -> bool {
        fn intersects(selected: &[Slug], tags: &[Slug]) -> bool {
            selected.is_empty() || tags.iter().any(|t| selected.contains(t))
        }

        self.bedrooms.is_none_or(|min| listing.bedrooms >= min)
            && self.bathrooms.is_none_or(|min| listing.bathrooms >= min)
            && self.price_min.is_none_or(|min| listing.price >= min)
            && self.price_max.is_none_or(|max| listing.price <= max)
            && self
                .property_type
                .is_none_or(|ty| listing.property_type == ty)
            && intersects(&self.developments, &listing.developments)
            && intersects(&self.neighborhoods, &listing.neighborhoods)
    }

    /// Compares the provided [`Listing`]s according to the [`Sort`] of this
    /// [`Filter`].
    ///
    /// [`Listing::id`] breaks ties, so the order is total.
    #[must_use]
    pub fn compare(&self, a: &Listing, b: &Listing) -> Ordering {
        let primary = match self.sort {
            Sort::Featured => b
                .featured
                .cmp(&a.featured)
                .then_with(|| b.created_at.cmp(&a.created_at)),
            Sort::PriceLow => a.price.cmp(&b.price),
            Sort::PriceHigh => b.price.cmp(&a.price),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }

    /// Returns the [`Neighborhood`]s selectable with the developments of
    /// this [`Filter`].
    #[must_use]
    pub fn valid_neighborhoods(&self) -> Vec<&'static Neighborhood> {
        location::valid_neighborhoods(&self.developments)
    }

    /// Drops the selected neighborhoods not belonging to any of the selected
    /// developments.
    ///
    /// Returns whether anything was dropped.
    pub fn prune_neighborhoods(&mut self) -> bool {
        let valid = self.valid_neighborhoods();
        let before = self.neighborhoods.len();
        self.neighborhoods
            .retain(|n| valid.iter().any(|v| n.as_str() == v.slug));
        self.neighborhoods.len() != before
    }

    /// Returns the URL of this [`Filter`] applied to the page at the
    /// provided `base` path.
    #[must_use]
    pub fn href(&self, base: &str) -> String {
        let query = encode(self);
        if query.is_empty() {
            base.to_owned()
        } else {
            format!("{base}?{query}")
        }
    }
}
