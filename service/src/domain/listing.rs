//! [`Listing`] definitions.

use std::fmt;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateTimeOf, Price};
use derive_more::{AsRef, Display, From, Into};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{location, Slug};

/// Property offered for sale.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// ID of this [`Listing`].
    pub id: Id,

    /// Title of this [`Listing`].
    pub title: String,

    /// [`Slug`] of this [`Listing`] used in its URL.
    pub slug: Slug,

    /// Asking [`Price`] of this [`Listing`].
    pub price: Price,

    /// Number of bedrooms in this [`Listing`].
    pub bedrooms: u8,

    /// Number of bathrooms in this [`Listing`].
    pub bathrooms: u8,

    /// [`PropertyType`] of this [`Listing`].
    pub property_type: PropertyType,

    /// [`Status`] of this [`Listing`].
    pub status: Status,

    /// Developments this [`Listing`] belongs to.
    pub developments: Vec<Slug>,

    /// Neighborhoods this [`Listing`] belongs to.
    pub neighborhoods: Vec<Slug>,

    /// [`View`] from this [`Listing`], if any.
    pub view: Option<View>,

    /// Lot [`Area`] of this [`Listing`], if known.
    pub lot_area: Option<Area>,

    /// Construction [`Area`] of this [`Listing`], if known.
    pub construction_area: Option<Area>,

    /// Main [`Image`] of this [`Listing`], if any.
    pub main_image: Option<Image>,

    /// Gallery [`Image`]s of this [`Listing`].
    pub gallery: Vec<Image>,

    /// URL of a video presenting this [`Listing`], if any.
    pub video_url: Option<String>,

    /// URL of a virtual tour of this [`Listing`], if any.
    pub tour_url: Option<String>,

    /// Indicator whether this [`Listing`] is promoted.
    pub featured: bool,

    /// Plain-text description of this [`Listing`].
    pub description: Option<String>,

    /// [`DateTime`] when this [`Listing`] was created.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Listing`] was last modified.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub updated_at: ModificationDateTime,
}

impl Listing {
    /// Returns the human-readable name of the first development of this
    /// [`Listing`], if any.
    #[must_use]
    pub fn development_label(&self) -> Option<String> {
        self.developments
            .first()
            .map(|d| location::development_label(d.as_str()))
    }

    /// Returns the human-readable name of the first neighborhood of this
    /// [`Listing`], if any.
    #[must_use]
    pub fn neighborhood_label(&self) -> Option<String> {
        self.neighborhoods
            .first()
            .map(|n| location::neighborhood_label(n.as_str()))
    }

    /// Returns the URL path of this [`Listing`].
    #[must_use]
    pub fn path(&self) -> String {
        format!("/properties/{}", self.slug)
    }
}

/// ID of a [`Listing`], as assigned by the content backend.
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

impl Id {
    /// Returns this [`Id`] as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// [`DateTime`] when a [`Listing`] was created.
pub type CreationDateTime = DateTimeOf<(Listing, unit::Creation)>;

/// [`DateTime`] when a [`Listing`] was last modified.
pub type ModificationDateTime = DateTimeOf<(Listing, unit::Modification)>;

define_kind! {
    #[doc = "Type of a [`Listing`]."]
    enum PropertyType {
        #[doc = "Detached house."]
        #[label = "Villa"]
        Villa,

        #[doc = "Apartment in a shared building."]
        #[label = "Condo"]
        Condo,

        #[doc = "Plot of land."]
        #[label = "Land"]
        Land,
    }
}

define_kind! {
    #[doc = "Sales status of a [`Listing`]."]
    enum Status {
        #[doc = "Open for offers."]
        #[label = "Available"]
        Available,

        #[doc = "Offer accepted, sale not closed yet."]
        #[label = "Reserved"]
        Reserved,

        #[doc = "Sale closed."]
        #[label = "Sold"]
        Sold,
    }
}

define_kind! {
    #[doc = "View from a [`Listing`]."]
    enum View {
        #[doc = "Ocean view."]
        #[label = "Ocean view"]
        Ocean,

        #[doc = "Golf course view."]
        #[label = "Golf view"]
        Golf,

        #[doc = "Garden view."]
        #[label = "Garden view"]
        Garden,

        #[doc = "Jungle view."]
        #[label = "Jungle view"]
        Jungle,

        #[doc = "Mountain view."]
        #[label = "Mountain view"]
        Mountain,
    }
}

define_kind! {
    #[doc = "Unit of an [`Area`]."]
    enum AreaUnit {
        #[doc = "Square feet."]
        #[label = "sq ft"]
        Sqft,

        #[doc = "Square meters."]
        #[label = "m²"]
        Sqm,
    }
}

/// Surface area measurement.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Area {
    /// Measured value.
    pub value: Decimal,

    /// [`AreaUnit`] of the `value`.
    pub unit: AreaUnit,
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value.normalize(), self.unit.label())
    }
}

/// Image hosted by the content backend.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Image {
    /// URL of this [`Image`].
    pub url: String,

    /// Alternative text of this [`Image`].
    pub alt: Option<String>,
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::{Area, AreaUnit, PropertyType, Status};

    #[test]
    fn parses_kinds_ignoring_case() {
        assert_eq!("Villa".parse::<PropertyType>(), Ok(PropertyType::Villa));
        assert_eq!("CONDO".parse::<PropertyType>(), Ok(PropertyType::Condo));
        assert!("castle".parse::<PropertyType>().is_err());
        assert_eq!(Status::Reserved.label(), "Reserved");
    }

    #[test]
    fn displays_area() {
        let area = Area {
            value: Decimal::new(45000, 1),
            unit: AreaUnit::Sqft,
        };

        assert_eq!(area.to_string(), "4500 sq ft");
    }
}
