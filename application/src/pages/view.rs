//! View models rendered by the page templates.

use common::pagination::{page_path, Pager, Token};
use service::{
    domain::{
        listing::{Image, PropertyType},
        location, Listing, Post,
    },
    filter::{
        editor::{Control, Strategy},
        Filter, Sort,
    },
};

use crate::config::Site;

/// Metadata of a whole HTML document.
#[derive(Clone, Debug)]
pub(crate) struct Layout {
    /// Name of the site.
    pub(crate) site_name: String,

    /// Title of the document.
    pub(crate) title: String,

    /// Absolute canonical URL of the document.
    pub(crate) canonical: String,
}

impl Layout {
    /// Creates a new [`Layout`] of the page at the provided `path`.
    pub(crate) fn new(
        site: &Site,
        title: impl Into<String>,
        path: &str,
    ) -> Self {
        Self {
            site_name: site.name.clone(),
            title: title.into(),
            canonical: site.absolute(path),
        }
    }
}

/// Card of a [`Listing`] in a list.
#[derive(Clone, Debug)]
pub(crate) struct Card {
    pub(crate) href: String,
    pub(crate) title: String,
    pub(crate) price: String,
    pub(crate) bedrooms: u8,
    pub(crate) bathrooms: u8,
    pub(crate) property_type: &'static str,
    pub(crate) status: &'static str,
    pub(crate) development: Option<String>,
    pub(crate) neighborhood: Option<String>,
    pub(crate) area: Option<String>,
    pub(crate) image: Option<Image>,
}

impl From<&Listing> for Card {
    fn from(listing: &Listing) -> Self {
        Self {
            href: listing.path(),
            title: listing.title.clone(),
            price: listing.price.label(),
            bedrooms: listing.bedrooms,
            bathrooms: listing.bathrooms,
            property_type: listing.property_type.label(),
            status: listing.status.label(),
            development: listing.development_label(),
            neighborhood: listing.neighborhood_label(),
            area: listing.construction_area.map(|a| a.to_string()),
            image: listing.main_image.clone(),
        }
    }
}

/// Card of a [`Post`] in a list.
#[derive(Clone, Debug)]
pub(crate) struct PostCard {
    pub(crate) href: String,
    pub(crate) title: String,
    pub(crate) excerpt: Option<String>,
    pub(crate) published_on: String,
    pub(crate) reading_time: u32,
    pub(crate) category: Option<String>,
    pub(crate) image: Option<Image>,
}

impl From<&Post> for PostCard {
    fn from(post: &Post) -> Self {
        Self {
            href: post.path(),
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            published_on: post.published_at.to_long_date(),
            reading_time: post.reading_time.minutes(),
            category: post.category.clone(),
            image: post.main_image.clone(),
        }
    }
}

/// Option of a form control.
#[derive(Clone, Debug)]
pub(crate) struct Choice {
    pub(crate) value: String,
    pub(crate) label: String,
    pub(crate) selected: bool,
}

impl Choice {
    fn new(
        value: impl Into<String>,
        label: impl Into<String>,
        selected: bool,
    ) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            selected,
        }
    }
}

/// Largest minimum of bedrooms and bathrooms offered in the form.
const MAX_ROOMS: u8 = 6;

/// Filter form of the listings index.
#[derive(Clone, Debug)]
pub(crate) struct FilterForm {
    pub(crate) bedrooms: Vec<Choice>,
    pub(crate) bathrooms: Vec<Choice>,
    pub(crate) price_min: String,
    pub(crate) price_max: String,
    pub(crate) types: Vec<Choice>,
    pub(crate) developments: Vec<Choice>,
    pub(crate) neighborhoods: Vec<Choice>,
    pub(crate) sorts: Vec<Choice>,
}

impl FilterForm {
    /// Fills a new [`FilterForm`] with the provided [`Filter`].
    pub(crate) fn of(filter: &Filter) -> Self {
        fn rooms(selected: Option<u8>) -> Vec<Choice> {
            let any = Choice::new("", "Any", selected.is_none());
            let counts = (1..=MAX_ROOMS).map(|n| {
                Choice::new(n.to_string(), format!("{n}+"), selected == Some(n))
            });
            [any].into_iter().chain(counts).collect()
        }

        let types = [Choice::new("", "Any", filter.property_type.is_none())]
            .into_iter()
            .chain(PropertyType::ALL.iter().map(|&ty| {
                let selected = filter.property_type == Some(ty);
                Choice::new(ty.slug(), ty.label(), selected)
            }))
            .collect();

        let developments = location::DEVELOPMENTS
            .iter()
            .map(|d| {
                let selected =
                    filter.developments.iter().any(|s| *s == d.slug);
                Choice::new(d.slug, d.label, selected)
            })
            .collect();

        let neighborhoods = filter
            .valid_neighborhoods()
            .into_iter()
            .map(|n| {
                let selected =
                    filter.neighborhoods.iter().any(|s| *s == n.slug);
                Choice::new(n.slug, n.label, selected)
            })
            .collect();

        let sorts = Sort::ALL
            .iter()
            .map(|&s| Choice::new(s.slug(), s.label(), filter.sort == s))
            .collect();

        Self {
            bedrooms: rooms(filter.bedrooms),
            bathrooms: rooms(filter.bathrooms),
            price_min: filter
                .price_min
                .map(|p| p.to_string())
                .unwrap_or_default(),
            price_max: filter
                .price_max
                .map(|p| p.to_string())
                .unwrap_or_default(),
            types,
            developments,
            neighborhoods,
            sorts,
        }
    }
}

impl FilterForm {
    /// Returns the [htmx] trigger applying the form field with the provided
    /// `name` on its own.
    ///
    /// [htmx]: https://htmx.org/attributes/hx-trigger
    #[expect(clippy::unused_self, reason = "called from templates")]
    pub(crate) fn hx_trigger(&self, name: &str) -> String {
        match Control::named(name).map(Control::strategy) {
            Some(Strategy::Debounced(delay)) => {
                format!("change delay:{}ms", delay.as_millis())
            }
            Some(Strategy::OnCommit) | None => "change".to_owned(),
        }
    }
}

/// Link of a page navigation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Link {
    /// Text of this [`Link`].
    pub(crate) label: String,

    /// URL of this [`Link`], or [`None`] for a collapsed gap.
    pub(crate) href: Option<String>,

    /// Indicator whether this [`Link`] points to the current page.
    pub(crate) current: bool,
}

/// Navigation between numbered pages.
#[derive(Clone, Debug)]
pub(crate) struct Pagination {
    pub(crate) previous: Option<String>,
    pub(crate) next: Option<String>,
    pub(crate) links: Vec<Link>,
}

impl Pagination {
    /// Builds the [`Pagination`] of the provided [`Pager`] for the pages
    /// under the `base` path, preserving the provided `query` string.
    pub(crate) fn of(pager: &Pager, base: &str, query: &str) -> Self {
        let href = |page: usize| {
            let path = page_path(base, page);
            if query.is_empty() {
                path
            } else {
                format!("{path}?{query}")
            }
        };

        let links = pager
            .tokens()
            .into_iter()
            .map(|token| match token {
                Token::Page(n) => Link {
                    label: n.to_string(),
                    href: Some(href(n)),
                    current: n == pager.current(),
                },
                Token::Ellipsis => Link {
                    label: "…".to_owned(),
                    href: None,
                    current: false,
                },
            })
            .collect();

        Self {
            previous: pager.previous().map(href),
            next: pager.next().map(href),
            links,
        }
    }

    /// Indicates whether there is anywhere to navigate to.
    pub(crate) fn is_useful(&self) -> bool {
        self.links.len() > 1
    }
}

#[cfg(test)]
mod spec {
    use std::num::NonZeroUsize;

    use common::pagination::Pager;
    use service::filter;

    use super::{FilterForm, Pagination};

    #[test]
    fn paginates_with_query() {
        let size = NonZeroUsize::new(12).unwrap();
        let pager = Pager::request(2, 100, size).unwrap();

        let nav = Pagination::of(&pager, "/properties", "bedrooms=3");

        assert_eq!(nav.previous.as_deref(), Some("/properties?bedrooms=3"));
        assert_eq!(
            nav.next.as_deref(),
            Some("/properties/page/3?bedrooms=3"),
        );
        let labels =
            nav.links.iter().map(|l| l.label.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, ["1", "2", "3", "4", "…", "9"]);
        assert!(nav.links[1].current);
        assert!(nav.links[4].href.is_none());
    }

    #[test]
    fn offers_neighborhoods_of_selected_developments() {
        let form = FilterForm::of(&filter::decode(
            "development=litibu&neighborhood=iyari&bedrooms=2",
        ));

        let neighborhoods = form
            .neighborhoods
            .iter()
            .map(|c| (c.value.as_str(), c.selected))
            .collect::<Vec<_>>();
        assert_eq!(
            neighborhoods,
            [
                ("altavela", false),
                ("caracol", false),
                ("iyari", true),
                ("litibu-bay", false),
            ],
        );
        assert!(form.bedrooms.iter().any(|c| c.value == "2" && c.selected));
        assert!(form
            .developments
            .iter()
            .any(|c| c.value == "litibu" && c.selected));
    }

    #[test]
    fn debounces_selects_but_not_prices() {
        let form = FilterForm::of(&filter::Filter::default());

        for name in ["bedrooms", "type", "development", "sort"] {
            assert_eq!(form.hx_trigger(name), "change delay:300ms", "{name}");
        }
        assert_eq!(form.hx_trigger("priceMin"), "change");
        assert_eq!(form.hx_trigger("priceMax"), "change");
    }

    #[test]
    fn disables_neighborhoods_without_development() {
        let form = FilterForm::of(&filter::Filter::default());

        assert!(form.neighborhoods.is_empty());
        assert!(form.types[0].selected);
    }
}
