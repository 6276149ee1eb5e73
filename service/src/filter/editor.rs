//! [`Editor`] of a [`Filter`] applying visitor edits.
//!
//! Select-like controls are applied automatically once the visitor stops
//! changing them for a while, whereas free-text controls wait for an
//! explicit commit (the "Apply" button or leaving the field).

use std::time::{Duration, Instant};

use common::Price;

use crate::domain::{listing::PropertyType, Slug};

use super::{codec::key, Filter, Sort};

/// Delay after the last edit of a [`Strategy::Debounced`] [`Control`] before
/// it's applied.
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// Input control of a [`Filter`] form.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Control {
    /// Minimum bedrooms select.
    Bedrooms,

    /// Minimum bathrooms select.
    Bathrooms,

    /// Minimum price text field.
    PriceMin,

    /// Maximum price text field.
    PriceMax,

    /// Property type select.
    Type,

    /// Developments multi-select.
    Development,

    /// Neighborhoods multi-select.
    Neighborhood,

    /// Sort order select.
    Sort,
}

impl Control {
    /// All the [`Control`]s of a [`Filter`] form.
    pub const ALL: [Self; 8] = [
        Self::Bedrooms,
        Self::Bathrooms,
        Self::PriceMin,
        Self::PriceMax,
        Self::Type,
        Self::Development,
        Self::Neighborhood,
        Self::Sort,
    ];

    /// Returns the name of the form field and query parameter of this
    /// [`Control`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bedrooms => key::BEDROOMS,
            Self::Bathrooms => key::BATHROOMS,
            Self::PriceMin => key::PRICE_MIN,
            Self::PriceMax => key::PRICE_MAX,
            Self::Type => key::TYPE,
            Self::Development => key::DEVELOPMENT,
            Self::Neighborhood => key::NEIGHBORHOOD,
            Self::Sort => key::SORT,
        }
    }

    /// Looks up the [`Control`] of the provided form field name.
    #[must_use]
    pub fn named(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Returns the [`Strategy`] of applying edits of this [`Control`].
    #[must_use]
    pub const fn strategy(self) -> Strategy {
        match self {
            Self::PriceMin | Self::PriceMax => Strategy::OnCommit,
            Self::Bedrooms
            | Self::Bathrooms
            | Self::Type
            | Self::Development
            | Self::Neighborhood
            | Self::Sort => Strategy::Debounced(DEBOUNCE),
        }
    }
}

/// Strategy of applying edits of a [`Control`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Strategy {
    /// Applied once no edits happen for the given [`Duration`].
    Debounced(Duration),

    /// Applied on an explicit [`Editor::commit()`] only.
    OnCommit,
}

/// Single edit of a [`Control`] value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Edit {
    /// New minimum bedrooms.
    Bedrooms(Option<u8>),

    /// New minimum bathrooms.
    Bathrooms(Option<u8>),

    /// New minimum price.
    PriceMin(Option<Price>),

    /// New maximum price.
    PriceMax(Option<Price>),

    /// New property type.
    Type(Option<PropertyType>),

    /// New selection of developments.
    Developments(Vec<Slug>),

    /// New selection of neighborhoods.
    Neighborhoods(Vec<Slug>),

    /// New sort order.
    Sort(Sort),
}

impl Edit {
    /// Splits the provided [`Filter`], as read from a submitted form, into
    /// one [`Edit`] per [`Control`].
    #[must_use]
    pub fn all_of(filter: Filter) -> [Self; 8] {
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

        [
            Self::Bedrooms(bedrooms),
            Self::Bathrooms(bathrooms),
            Self::PriceMin(price_min),
            Self::PriceMax(price_max),
            Self::Type(property_type),
            Self::Developments(developments),
            Self::Neighborhoods(neighborhoods),
            Self::Sort(sort),
        ]
    }

    /// Returns the [`Control`] this [`Edit`] is made with.
    #[must_use]
    pub const fn control(&self) -> Control {
        match self {
            Self::Bedrooms(_) => Control::Bedrooms,
            Self::Bathrooms(_) => Control::Bathrooms,
            Self::PriceMin(_) => Control::PriceMin,
            Self::PriceMax(_) => Control::PriceMax,
            Self::Type(_) => Control::Type,
            Self::Developments(_) => Control::Development,
            Self::Neighborhoods(_) => Control::Neighborhood,
            Self::Sort(_) => Control::Sort,
        }
    }
}

/// Set of [`Filter`] dimensions to overwrite.
///
/// [`None`] leaves the dimension as is.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Partial {
    /// New minimum bedrooms.
    pub bedrooms: Option<Option<u8>>,

    /// New minimum bathrooms.
    pub bathrooms: Option<Option<u8>>,

    /// New minimum price.
    pub price_min: Option<Option<Price>>,

    /// New maximum price.
    pub price_max: Option<Option<Price>>,

    /// New property type.
    pub property_type: Option<Option<PropertyType>>,

    /// New selection of developments.
    pub developments: Option<Vec<Slug>>,

    /// New selection of neighborhoods.
    pub neighborhoods: Option<Vec<Slug>>,

    /// New sort order.
    pub sort: Option<Sort>,
}

impl Partial {
    /// Indicates whether this [`Partial`] overwrites nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Records the provided [`Edit`], replacing any previous one of the same
    /// [`Control`].
    pub fn record(&mut self, edit: Edit) {
        match edit {
            Edit::Bedrooms(v) => self.bedrooms = Some(v),
            Edit::Bathrooms(v) => self.bathrooms = Some(v),
            Edit::PriceMin(v) => self.price_min = Some(v),
            Edit::PriceMax(v) => self.price_max = Some(v),
            Edit::Type(v) => self.property_type = Some(v),
            Edit::Developments(v) => self.developments = Some(v),
            Edit::Neighborhoods(v) => self.neighborhoods = Some(v),
            Edit::Sort(v) => self.sort = Some(v),
        }
    }

    /// Splits off the dimensions edited with [`Strategy::Debounced`]
    /// [`Control`]s, leaving the [`Strategy::OnCommit`] ones in place.
    #[must_use]
    pub fn take_debounced(&mut self) -> Self {
        Self {
            bedrooms: self.bedrooms.take(),
            bathrooms: self.bathrooms.take(),
            price_min: None,
            price_max: None,
            property_type: self.property_type.take(),
            developments: self.developments.take(),
            neighborhoods: self.neighborhoods.take(),
            sort: self.sort.take(),
        }
    }

    /// Overwrites the dimensions of the provided [`Filter`] with the ones
    /// of this [`Partial`].
    pub fn merge_into(self, filter: &mut Filter) {
        let Self {
            bedrooms,
            bathrooms,
            price_min,
            price_max,
            property_type,
            developments,
            neighborhoods,
            sort,
        } = self;

        if let Some(v) = bedrooms {
            filter.bedrooms = v;
        }
        if let Some(v) = bathrooms {
            filter.bathrooms = v;
        }
        if let Some(v) = price_min {
            filter.price_min = v;
        }
        if let Some(v) = price_max {
            filter.price_max = v;
        }
        if let Some(v) = property_type {
            filter.property_type = v;
        }
        if let Some(v) = developments {
            filter.developments = v;
        }
        if let Some(v) = neighborhoods {
            filter.neighborhoods = v;
        }
        if let Some(v) = sort {
            filter.sort = v;
        }
    }
}

impl From<Filter> for Partial {
    /// Overwrites every dimension, as a submitted form does.
    fn from(filter: Filter) -> Self {
        Self {
            bedrooms: Some(filter.bedrooms),
            bathrooms: Some(filter.bathrooms),
            price_min: Some(filter.price_min),
            price_max: Some(filter.price_max),
            property_type: Some(filter.property_type),
            developments: Some(filter.developments),
            neighborhoods: Some(filter.neighborhoods),
            sort: Some(filter.sort),
        }
    }
}

/// Editor of the applied [`Filter`].
///
/// Every way of changing the applied [`Filter`] goes through
/// [`Editor::apply()`], so neighborhoods are always pruned before the
/// [`Filter`] reaches a fetch.
#[derive(Clone, Debug, Default)]
pub struct Editor {
    /// Currently applied [`Filter`].
    applied: Filter,

    /// Edits not applied yet.
    pending: Partial,

    /// Moment when the pending debounced edits are due.
    deadline: Option<Instant>,
}

impl Editor {
    /// Creates a new [`Editor`] of the provided applied [`Filter`].
    #[must_use]
    pub fn new(applied: Filter) -> Self {
        Self {
            applied,
            pending: Partial::default(),
            deadline: None,
        }
    }

    /// Returns the currently applied [`Filter`].
    #[must_use]
    pub const fn applied(&self) -> &Filter {
        &self.applied
    }

    /// Returns the [`Filter`] as the visitor sees it in the form: the
    /// applied one with the pending edits on top.
    #[must_use]
    pub fn draft(&self) -> Filter {
        let mut draft = self.applied.clone();
        self.pending.clone().merge_into(&mut draft);
        draft
    }

    /// Returns the moment when [`Editor::poll()`] applies the pending
    /// debounced edits, if there are any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Records the provided [`Edit`] made at the provided moment.
    ///
    /// A debounced [`Edit`] postpones the deadline of all the pending
    /// debounced ones.
    pub fn edit(&mut self, edit: Edit, now: Instant) {
        if let Strategy::Debounced(delay) = edit.control().strategy() {
            self.deadline = Some(now + delay);
        }
        self.pending.record(edit);
    }

    /// Applies the pending debounced edits if their deadline has come.
    ///
    /// Returns the new [`Filter`] if it has changed.
    pub fn poll(&mut self, now: Instant) -> Option<Filter> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        let due = self.pending.take_debounced();
        self.apply(due)
    }

    /// Applies all the pending edits at once.
    ///
    /// Returns the new [`Filter`] if it has changed.
    pub fn commit(&mut self) -> Option<Filter> {
        self.deadline = None;
        let all = std::mem::take(&mut self.pending);
        self.apply(all)
    }

    /// Drops the pending edits and resets the applied [`Filter`] to the
    /// default one.
    ///
    /// Returns the new [`Filter`] if it has changed.
    pub fn clear(&mut self) -> Option<Filter> {
        self.deadline = None;
        self.pending = Partial::default();
        (self.applied != Filter::default()).then(|| {
            self.applied = Filter::default();
            self.applied.clone()
        })
    }

    /// Applies the provided [`Partial`] to the applied [`Filter`], pruning
    /// neighborhoods not matching the developments.
    ///
    /// Returns the new [`Filter`] if it has changed.
    pub fn apply(&mut self, partial: Partial) -> Option<Filter> {
        if partial.is_empty() {
            return None;
        }

        let mut next = self.applied.clone();
        partial.merge_into(&mut next);
        _ = next.prune_neighborhoods();

        (next != self.applied).then(|| {
            self.applied = next;
            self.applied.clone()
        })
    }
}

#[cfg(test)]
mod spec {
    use std::time::{Duration, Instant};

    use common::Price;
    use rust_decimal::Decimal;

    use crate::domain::Slug;

    use super::{Control, Edit, Editor, Filter, Partial, Sort, Strategy};

    fn slugs(raw: &[&str]) -> Vec<Slug> {
        raw.iter().map(|s| Slug::new(*s).unwrap()).collect()
    }

    #[test]
    fn prices_wait_for_commit() {
        assert_eq!(Control::PriceMin.strategy(), Strategy::OnCommit);
        assert!(matches!(Control::Sort.strategy(), Strategy::Debounced(_)));

        let t0 = Instant::now();
        let mut editor = Editor::default();
        editor.edit(Edit::PriceMin(Price::new(Decimal::from(900_000))), t0);

        assert_eq!(editor.deadline(), None);
        assert_eq!(editor.poll(t0 + Duration::from_secs(10)), None);
        assert_eq!(
            editor.draft().price_min,
            Price::new(Decimal::from(900_000)),
        );

        let applied = editor.commit().unwrap();
        assert_eq!(applied.price_min, Price::new(Decimal::from(900_000)));
        assert_eq!(editor.commit(), None);
    }

    #[test]
    fn debounces_select_edits() {
        let t0 = Instant::now();
        let mut editor = Editor::default();
        editor.edit(Edit::Bedrooms(Some(2)), t0);
        editor.edit(
            Edit::Bedrooms(Some(3)),
            t0 + Duration::from_millis(200),
        );

        assert_eq!(editor.poll(t0 + Duration::from_millis(400)), None);

        let applied = editor.poll(t0 + Duration::from_millis(500)).unwrap();
        assert_eq!(applied.bedrooms, Some(3));
        assert_eq!(editor.poll(t0 + Duration::from_secs(1)), None);
    }

    #[test]
    fn poll_keeps_uncommitted_prices() {
        let t0 = Instant::now();
        let mut editor = Editor::default();
        editor.edit(Edit::PriceMax(Price::new(Decimal::from(10))), t0);
        editor.edit(Edit::Sort(Sort::PriceLow), t0);

        let applied = editor.poll(t0 + Duration::from_secs(1)).unwrap();
        assert_eq!(applied.sort, Sort::PriceLow);
        assert_eq!(applied.price_max, None);

        let applied = editor.commit().unwrap();
        assert_eq!(applied.price_max, Price::new(Decimal::from(10)));
    }

    #[test]
    fn form_fields_map_to_controls() {
        for control in Control::ALL {
            assert_eq!(Control::named(control.name()), Some(control));
        }
        assert_eq!(Control::named("priceMin"), Some(Control::PriceMin));
        assert_eq!(Control::named("page"), None);

        let edits = Edit::all_of(Filter::default());
        let controls = edits.iter().map(Edit::control).collect::<Vec<_>>();
        assert_eq!(controls, Control::ALL);
    }

    #[test]
    fn submitted_form_applies_selects_after_debounce() {
        let t0 = Instant::now();
        let mut editor =
            Editor::new(Filter::development(Slug::new("litibu").unwrap()));
        let submitted = Filter {
            bedrooms: Some(4),
            price_min: Price::new(Decimal::from(900_000)),
            developments: slugs(&["litibu"]),
            ..Filter::default()
        };
        for edit in Edit::all_of(submitted) {
            editor.edit(edit, t0);
        }

        let applied = editor.poll(t0 + super::DEBOUNCE).unwrap();
        assert_eq!(applied.bedrooms, Some(4));
        assert_eq!(applied.price_min, None);
    }

    #[test]
    fn development_change_prunes_neighborhoods() {
        let mut editor = Editor::new(Filter {
            developments: slugs(&["punta-mita"]),
            neighborhoods: slugs(&["bahia-estates"]),
            ..Filter::default()
        });

        let applied = editor
            .apply(Partial {
                developments: Some(slugs(&["litibu"])),
                ..Partial::default()
            })
            .unwrap();

        assert_eq!(applied.developments, slugs(&["litibu"]));
        assert!(applied.neighborhoods.is_empty());
    }

    #[test]
    fn unchanged_filter_is_not_applied() {
        let filter = Filter::development(Slug::new("litibu").unwrap());
        let mut editor = Editor::new(filter.clone());

        assert_eq!(editor.apply(Partial::from(filter)), None);
        assert_eq!(editor.apply(Partial::default()), None);
    }

    #[test]
    fn clear_resets_everything() {
        let t0 = Instant::now();
        let mut editor =
            Editor::new(Filter::development(Slug::new("litibu").unwrap()));
        editor.edit(Edit::Bathrooms(Some(2)), t0);

        assert_eq!(editor.clear(), Some(Filter::default()));
        assert_eq!(editor.deadline(), None);
        assert_eq!(editor.poll(t0 + Duration::from_secs(1)), None);
        assert_eq!(editor.clear(), None);
    }
}
