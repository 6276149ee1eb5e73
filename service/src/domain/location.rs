//! [`Development`] and [`Neighborhood`] lookup tables.
//!
//! Every [`Neighborhood`] belongs to exactly one [`Development`].

use itertools::Itertools as _;

use super::Slug;

/// Top-level geographic grouping of listings, like a resort community.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Development {
    /// `kebab-case` slug of this [`Development`].
    pub slug: &'static str,

    /// Human-readable name of this [`Development`].
    pub label: &'static str,

    /// [`Neighborhood`]s of this [`Development`].
    pub neighborhoods: &'static [Neighborhood],
}

/// Sub-area of a [`Development`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Neighborhood {
    /// `kebab-case` slug of this [`Neighborhood`].
    pub slug: &'static str,

    /// Human-readable name of this [`Neighborhood`].
    pub label: &'static str,
}

/// Shortcut for defining a [`Neighborhood`].
const fn n(slug: &'static str, label: &'static str) -> Neighborhood {
    Neighborhood { slug, label }
}

/// All the known [`Development`]s.
pub const DEVELOPMENTS: &[Development] = &[
    Development {
        slug: "punta-mita",
        label: "Punta Mita",
        neighborhoods: &[
            n("bahia-estates", "Bahia Estates"),
            n("el-encanto", "El Encanto"),
            n("hacienda-de-mita", "Hacienda de Mita"),
            n("kupuri", "Kupuri"),
            n("lagos-del-mar", "Lagos del Mar"),
            n("las-marietas", "Las Marietas"),
            n("pacifico", "Pacifico"),
            n("porta-fortuna", "Porta Fortuna"),
            n("ranchos", "Ranchos"),
            n("sufi-ocean-club", "Sufi Ocean Club"),
            n("tau-residences", "Tau Residences"),
        ],
    },
    Development {
        slug: "litibu",
        label: "Litibu",
        neighborhoods: &[
            n("altavela", "Altavela"),
            n("caracol", "Caracol"),
            n("iyari", "Iyari"),
            n("litibu-bay", "Litibu Bay"),
        ],
    },
    Development {
        slug: "costa-canuva",
        label: "Costa Canuva",
        neighborhoods: &[
            n("auberge-residences", "Auberge Residences"),
            n("canuva-hills", "Canuva Hills"),
            n("mandarin-oriental-residences", "Mandarin Oriental Residences"),
        ],
    },
    Development {
        slug: "la-cruz",
        label: "La Cruz de Huanacaxtle",
        neighborhoods: &[
            n("marina-la-cruz", "Marina La Cruz"),
            n("rancho-banderas", "Rancho Banderas"),
        ],
    },
];

/// Looks up the [`Development`] with the provided slug.
#[must_use]
pub fn development(slug: &str) -> Option<&'static Development> {
    DEVELOPMENTS.iter().find(|d| d.slug == slug)
}

/// Looks up the [`Neighborhood`] with the provided slug along with the
/// [`Development`] it belongs to.
#[must_use]
pub fn neighborhood(
    slug: &str,
) -> Option<(&'static Development, &'static Neighborhood)> {
    DEVELOPMENTS.iter().find_map(|d| {
        d.neighborhoods.iter().find(|n| n.slug == slug).map(|n| (d, n))
    })
}

/// Returns the human-readable name of the development with the provided
/// slug, humanizing unknown slugs.
#[must_use]
pub fn development_label(slug: &str) -> String {
    development(slug).map_or_else(|| humanize(slug), |d| d.label.to_owned())
}

/// Returns the human-readable name of the neighborhood with the provided
/// slug, humanizing unknown slugs.
#[must_use]
pub fn neighborhood_label(slug: &str) -> String {
    neighborhood(slug)
        .map_or_else(|| humanize(slug), |(_, n)| n.label.to_owned())
}

/// Returns the [`Neighborhood`]s available for the provided selection of
/// developments.
///
/// The result is the union of neighborhoods of every selected development,
/// deduplicated and sorted by slug. An empty selection yields no
/// neighborhoods, and unknown developments contribute nothing.
#[must_use]
pub fn valid_neighborhoods(
    developments: &[Slug],
) -> Vec<&'static Neighborhood> {
    developments
        .iter()
        .filter_map(|slug| development(slug.as_str()))
        .flat_map(|d| d.neighborhoods.iter())
        .sorted_by_key(|n| n.slug)
        .dedup_by(|a, b| a.slug == b.slug)
        .collect()
}

/// Turns a `kebab-case` slug into a title, like `las-marietas` into
/// `Las Marietas`.
#[must_use]
pub fn humanize(slug: &str) -> String {
    slug.split('-')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            chars
                .next()
                .map(|first| {
                    first.to_uppercase().chain(chars).collect::<String>()
                })
                .unwrap_or_default()
        })
        .join(" ")
}

#[cfg(test)]
mod spec {
    use std::collections::HashSet;

    use super::{
        development_label, humanize, neighborhood, neighborhood_label,
        valid_neighborhoods, DEVELOPMENTS,
    };
    use crate::domain::Slug;

    fn slugs(raw: &[&str]) -> Vec<Slug> {
        raw.iter().map(|s| Slug::new(*s).unwrap()).collect()
    }

    #[test]
    fn every_neighborhood_belongs_to_one_development() {
        let mut seen = HashSet::new();
        for d in DEVELOPMENTS {
            assert!(Slug::new(d.slug).is_some(), "{}", d.slug);
            for n in d.neighborhoods {
                assert!(Slug::new(n.slug).is_some(), "{}", n.slug);
                assert!(seen.insert(n.slug), "`{}` is duplicated", n.slug);
            }
        }
    }

    #[test]
    fn empty_selection_has_no_neighborhoods() {
        assert!(valid_neighborhoods(&[]).is_empty());
        assert!(valid_neighborhoods(&slugs(&["atlantis"])).is_empty());
    }

    #[test]
    fn union_is_sorted_and_deduplicated() {
        let valid = valid_neighborhoods(&slugs(&[
            "litibu",
            "la-cruz",
            "litibu",
        ]));

        assert_eq!(
            valid.iter().map(|n| n.slug).collect::<Vec<_>>(),
            [
                "altavela",
                "caracol",
                "iyari",
                "litibu-bay",
                "marina-la-cruz",
                "rancho-banderas",
            ],
        );
    }

    #[test]
    fn punta_mita_neighborhood_is_not_in_litibu() {
        let valid = valid_neighborhoods(&slugs(&["litibu"]));

        assert!(valid.iter().all(|n| n.slug != "bahia-estates"));
        assert_eq!(
            neighborhood("bahia-estates").map(|(d, _)| d.slug),
            Some("punta-mita"),
        );
    }

    #[test]
    fn labels() {
        assert_eq!(development_label("la-cruz"), "La Cruz de Huanacaxtle");
        assert_eq!(neighborhood_label("lagos-del-mar"), "Lagos del Mar");
        assert_eq!(development_label("new-frontier"), "New Frontier");
        assert_eq!(humanize("sayulita"), "Sayulita");
        assert_eq!(humanize(""), "");
    }
}
