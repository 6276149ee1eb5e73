//! [GROQ] queries issued to the content backend.
//!
//! [GROQ]: https://www.sanity.io/docs/groq

use common::pagination::Window;
use itertools::Itertools as _;
use serde_json::{Map, Value};

use crate::{domain::Slug, filter::{Filter, Sort}};

/// Projection of a listing document.
const LISTING_PROJECTION: &str = "{\
    _id, _createdAt, _updatedAt, title, \"slug\": slug.current, price, \
    bedrooms, bathrooms, propertyType, status, developments, neighborhoods, \
    view, lotArea, constructionArea, \
    \"mainImage\": {\"url\": mainImage.asset->url, \"alt\": mainImage.alt}, \
    \"gallery\": gallery[]{\"url\": asset->url, alt}, \
    videoUrl, tourUrl, featured, description\
}";

/// Projection of a post document.
const POST_PROJECTION: &str = "{\
    _id, _createdAt, _updatedAt, title, \"slug\": slug.current, excerpt, \
    body, \"author\": author->name, \"category\": categories[0]->title, \
    \"mainImage\": {\"url\": mainImage.asset->url, \"alt\": mainImage.alt}, \
    publishedAt, featured, readingTime\
}";

/// Filter of published posts.
const POSTS: &str = "_type == \"post\" && defined(slug.current)";

/// Order of posts, newest first.
const POSTS_ORDER: &str = "publishedAt desc, _id asc";

/// [GROQ] query along with its parameters.
///
/// [GROQ]: https://www.sanity.io/docs/groq
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    /// Text of this [`Query`].
    pub text: String,

    /// Parameters of this [`Query`], by their names without `$`.
    pub params: Map<String, Value>,
}

/// Predicate selecting listings matching a [`Filter`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Predicate {
    /// Conditions joined with `&&`.
    clauses: Vec<&'static str>,

    /// Parameters the `clauses` refer to.
    params: Map<String, Value>,
}

impl Predicate {
    /// Builds a new [`Predicate`] out of the provided [`Filter`].
    #[must_use]
    pub fn new(filter: &Filter) -> Self {
        let mut this = Self {
            clauses: vec!["_type == \"property\""],
            params: Map::new(),
        };

        if let Some(n) = filter.bedrooms {
            this.bind("bedrooms >= $bedrooms", "bedrooms", n.into());
        }
        if let Some(n) = filter.bathrooms {
            this.bind("bathrooms >= $bathrooms", "bathrooms", n.into());
        }
        if let Some(p) = filter.price_min {
            this.bind("price >= $priceMin", "priceMin", price(p));
        }
        if let Some(p) = filter.price_max {
            this.bind("price <= $priceMax", "priceMax", price(p));
        }
        if let Some(t) = filter.property_type {
            this.bind(
                "lower(propertyType) == lower($type)",
                "type",
                t.slug().into(),
            );
        }
        if !filter.developments.is_empty() {
            this.bind(
                "count(developments[@ in $development]) > 0",
                "development",
                slugs(&filter.developments),
            );
        }
        if !filter.neighborhoods.is_empty() {
            this.bind(
                "count(neighborhoods[@ in $neighborhood]) > 0",
                "neighborhood",
                slugs(&filter.neighborhoods),
            );
        }

        this
    }

    /// Adds the provided `clause` referring the `value` by the `name`.
    fn bind(&mut self, clause: &'static str, name: &str, value: Value) {
        self.clauses.push(clause);
        _ = self.params.insert(name.to_owned(), value);
    }

    /// Returns the text of this [`Predicate`].
    #[must_use]
    pub fn text(&self) -> String {
        self.clauses.iter().join(" && ")
    }
}

/// Returns the `order()` arguments for the provided [`Sort`].
///
/// `_id` is always the last key, so equal listings have a stable order.
#[must_use]
pub const fn order(sort: Sort) -> &'static str {
    match sort {
        Sort::Featured => "featured desc, _createdAt desc, _id asc",
        Sort::PriceLow => "price asc, _id asc",
        Sort::PriceHigh => "price desc, _id asc",
    }
}

/// Returns the slice operator selecting the provided [`Window`].
fn slice(window: Window) -> String {
    format!("[{}...{}]", window.offset, window.end())
}

/// Converts the provided [`common::Price`] into a JSON number.
fn price(p: common::Price) -> Value {
    p.to_string()
        .parse::<serde_json::Number>()
        .map_or(Value::Null, Value::Number)
}

/// Converts the provided [`Slug`]s into a JSON array.
fn slugs(slugs: &[Slug]) -> Value {
    slugs.iter().map(|s| Value::from(s.as_str())).collect()
}

/// Builds a [`Query`] selecting the provided [`Window`] of listings matching
/// the provided [`Filter`].
#[must_use]
pub fn listings(filter: &Filter, window: Window) -> Query {
    let predicate = Predicate::new(filter);
    Query {
        text: format!(
            "*[{}] | order({}) {} {LISTING_PROJECTION}",
            predicate.text(),
            order(filter.sort),
            slice(window),
        ),
        params: predicate.params,
    }
}

/// Builds a [`Query`] counting listings matching the provided [`Filter`].
#[must_use]
pub fn listings_count(filter: &Filter) -> Query {
    let predicate = Predicate::new(filter);
    Query {
        text: format!("count(*[{}])", predicate.text()),
        params: predicate.params,
    }
}

/// Builds a [`Query`] selecting a single listing by its [`Slug`].
#[must_use]
pub fn listing(slug: &Slug) -> Query {
    Query {
        text: format!(
            "*[_type == \"property\" && slug.current == $slug][0] \
             {LISTING_PROJECTION}",
        ),
        params: Map::from_iter([("slug".to_owned(), slug.as_str().into())]),
    }
}

/// Builds a [`Query`] selecting up to `limit` featured listings.
#[must_use]
pub fn featured_listings(limit: usize) -> Query {
    Query {
        text: format!(
            "*[_type == \"property\" && featured == true] | order({}) {} \
             {LISTING_PROJECTION}",
            order(Sort::Featured),
            slice(Window::new(0, limit)),
        ),
        params: Map::new(),
    }
}

/// Builds a [`Query`] selecting the provided [`Window`] of posts.
#[must_use]
pub fn posts(window: Window) -> Query {
    Query {
        text: format!(
            "*[{POSTS}] | order({POSTS_ORDER}) {} {POST_PROJECTION}",
            slice(window),
        ),
        params: Map::new(),
    }
}

/// Builds a [`Query`] counting posts.
#[must_use]
pub fn posts_count() -> Query {
    Query {
        text: format!("count(*[{POSTS}])"),
        params: Map::new(),
    }
}

/// Builds a [`Query`] selecting a single post by its [`Slug`].
#[must_use]
pub fn post(slug: &Slug) -> Query {
    Query {
        text: format!(
            "*[{POSTS} && slug.current == $slug][0] {POST_PROJECTION}",
        ),
        params: Map::from_iter([("slug".to_owned(), slug.as_str().into())]),
    }
}

/// Builds a [`Query`] selecting everything listed in a sitemap.
#[must_use]
pub fn sitemap() -> Query {
    Query {
        text: format!(
            "{{\
                \"listings\": *[_type == \"property\" \
                    && defined(slug.current)] \
                    {{_id, _updatedAt, \"slug\": slug.current, \
                    featured, status}}, \
                \"posts\": *[{POSTS}] \
                    {{_id, _updatedAt, \"slug\": slug.current, featured}}\
            }}",
        ),
        params: Map::new(),
    }
}

#[cfg(test)]
mod spec {
    use common::{pagination::Window, Price};
    use rust_decimal::Decimal;
    use serde_json::json;

    use crate::{
        domain::{listing::PropertyType, Slug},
        filter::{Filter, Sort},
    };

    use super::{listings, listings_count, Predicate};

    #[test]
    fn empty_filter_selects_all_properties() {
        assert_eq!(
            Predicate::new(&Filter::default()).text(),
            "_type == \"property\"",
        );
    }

    #[test]
    fn binds_every_dimension() {
        let filter = Filter {
            bedrooms: Some(3),
            bathrooms: Some(2),
            price_min: Price::new(Decimal::from(900_000)),
            price_max: Price::new(Decimal::new(15, 1)),
            property_type: Some(PropertyType::Condo),
            developments: vec![Slug::new("litibu").unwrap()],
            neighborhoods: vec![Slug::new("iyari").unwrap()],
            sort: Sort::PriceLow,
        };

        let query = listings_count(&filter);

        assert_eq!(
            query.text,
            "count(*[_type == \"property\" && bedrooms >= $bedrooms \
             && bathrooms >= $bathrooms && price >= $priceMin \
             && price <= $priceMax && lower(propertyType) == lower($type) \
             && count(developments[@ in $development]) > 0 \
             && count(neighborhoods[@ in $neighborhood]) > 0])",
        );
        assert_eq!(
            serde_json::Value::Object(query.params),
            json!({
                "bedrooms": 3,
                "bathrooms": 2,
                "priceMin": 900_000,
                "priceMax": 1.5,
                "type": "condo",
                "development": ["litibu"],
                "neighborhood": ["iyari"],
            }),
        );
    }

    #[test]
    fn windows_sorted_listings() {
        let filter = Filter {
            sort: Sort::PriceHigh,
            ..Filter::default()
        };

        let query = listings(&filter, Window::new(24, 12));

        assert!(query.text.starts_with(
            "*[_type == \"property\"] | order(price desc, _id asc) [24...36] {",
        ));
        assert!(query.params.is_empty());
    }
}
