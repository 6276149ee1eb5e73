//! URL query string representation of a [`Filter`].

use std::str::FromStr;

use itertools::Itertools as _;
use tracing as log;

use crate::domain::Slug;

use super::{Filter, Sort};

/// Query parameter names, in the order they're encoded.
pub(super) mod key {
    pub(in crate::filter) const BEDROOMS: &str = "bedrooms";
    pub(in crate::filter) const BATHROOMS: &str = "bathrooms";
    pub(in crate::filter) const PRICE_MIN: &str = "priceMin";
    pub(in crate::filter) const PRICE_MAX: &str = "priceMax";
    pub(in crate::filter) const TYPE: &str = "type";
    pub(in crate::filter) const DEVELOPMENT: &str = "development";
    pub(in crate::filter) const NEIGHBORHOOD: &str = "neighborhood";
    pub(in crate::filter) const SORT: &str = "sort";
}

/// Decodes a [`Filter`] from the provided URL query string.
///
/// Never fails: absent, unknown and unparsable parameters are ignored, so
/// the corresponding dimension stays at its default. A leading `?` is
/// allowed.
#[must_use]
pub fn decode(query: &str) -> Filter {
    let query = query.strip_prefix('?').unwrap_or(query);
    let pairs = serde_urlencoded::from_str::<Vec<(String, String)>>(query)
        .unwrap_or_else(|e| {
            log::debug!("ignoring malformed query string `{query}`: {e}");
            Vec::new()
        });

    let mut filter = Filter::default();
    for (k, v) in pairs {
        match k.as_str() {
            key::BEDROOMS => set(&mut filter.bedrooms, &k, &v, parse_count),
            key::BATHROOMS => set(&mut filter.bathrooms, &k, &v, parse_count),
            key::PRICE_MIN => set(&mut filter.price_min, &k, &v, parse),
            key::PRICE_MAX => set(&mut filter.price_max, &k, &v, parse),
            key::TYPE => set(&mut filter.property_type, &k, &v, parse),
            key::DEVELOPMENT => extend(&mut filter.developments, &v),
            key::NEIGHBORHOOD => extend(&mut filter.neighborhoods, &v),
            key::SORT => {
                filter.sort = parse(&v).unwrap_or_else(|| {
                    log::debug!("unknown `sort` value `{v}`");
                    Sort::default()
                });
            }
            _ => {}
        }
    }
    filter
}

/// Encodes the provided [`Filter`] into a URL query string.
///
/// Only non-default dimensions are emitted, always in the same order, so
/// equal [`Filter`]s produce equal strings.
#[expect(clippy::missing_panics_doc, reason = "infallible")]
#[must_use]
pub fn encode(filter: &Filter) -> String {
    let Filter {
        bedrooms,
        bathrooms,
        price_min,
        price_max,
        property_type,
        developments,
        neighborhoods,
        sort,
    } = filter;

    let csv = |slugs: &[Slug]| {
        (!slugs.is_empty()).then(|| slugs.iter().join(","))
    };

    let pairs = [
        (key::BEDROOMS, bedrooms.map(|n| n.to_string())),
        (key::BATHROOMS, bathrooms.map(|n| n.to_string())),
        (key::PRICE_MIN, price_min.map(|p| p.to_string())),
        (key::PRICE_MAX, price_max.map(|p| p.to_string())),
        (key::TYPE, property_type.map(|t| t.to_string())),
        (key::DEVELOPMENT, csv(developments)),
        (key::NEIGHBORHOOD, csv(neighborhoods)),
        (key::SORT, (*sort != Sort::default()).then(|| sort.to_string())),
    ];
    let pairs = pairs
        .iter()
        .filter_map(|(k, v)| Some((*k, v.as_deref()?)))
        .collect::<Vec<_>>();

    serde_urlencoded::to_string(pairs)
        .unwrap_or_else(|e| panic!("cannot encode `Filter`: {e}"))
}

/// Parses the provided `value` with its [`FromStr`] implementation.
fn parse<T: FromStr>(value: &str) -> Option<T> {
    value.trim().parse().ok()
}

/// Parses a minimum count, tolerating a trailing `+` (like `3+`).
fn parse_count(value: &str) -> Option<u8> {
    parse(value.trim().trim_end_matches('+'))
}

/// Sets the `field` to the `value` parsed with the provided `parser`,
/// leaving it untouched if the `value` cannot be parsed.
fn set<T>(
    field: &mut Option<T>,
    key: &str,
    value: &str,
    parser: impl FnOnce(&str) -> Option<T>,
) {
    if let Some(v) = parser(value) {
        *field = Some(v);
    } else {
        log::debug!("ignoring invalid `{key}` value `{value}`");
    }
}

/// Appends the comma-separated slugs of the provided `value` to the `list`,
/// skipping empty, invalid and already present ones.
fn extend(list: &mut Vec<Slug>, value: &str) {
    for token in value.split(',') {
        if token.trim().is_empty() {
            continue;
        }
        match Slug::normalize(token) {
            Some(slug) if !list.contains(&slug) => list.push(slug),
            Some(_) => {}
            None => log::debug!("ignoring invalid slug `{token}`"),
        }
    }
}
