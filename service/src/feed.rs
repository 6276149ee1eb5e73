//! Infinite-scroll [`Feed`] of [`Listing`]s.

use std::{fmt, num::NonZeroUsize};

use common::pagination::Window;
use tracing as log;

use crate::{
    domain::{Listing, Slug},
    filter::{self, Filter},
    query::{listings::Fetch, Query},
    read::listing::list,
};

/// Decision on how to serve a landing request of a [`Feed`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Landing {
    /// Request carries no [`Filter`], so it should be redirected to the
    /// provided default one.
    Redirect(Filter),

    /// Request should be rendered with the provided [`Filter`].
    Render(Filter),
}

impl Landing {
    /// Decides how to serve a request with the provided `query` string.
    ///
    /// A `query` without any [`Filter`] dimension is redirected to the
    /// `default_development`, keeping the requested [`filter::Sort`].
    #[must_use]
    pub fn of(query: &str, default_development: &Slug) -> Self {
        let mut filter = filter::decode(query);
        if filter.is_empty() {
            return Self::Redirect(Filter {
                sort: filter.sort,
                ..Filter::development(default_development.clone())
            });
        }
        _ = filter.prune_neighborhoods();
        Self::Render(filter)
    }
}

/// Ticket of a single in-flight [`Feed`] batch request.
///
/// Completing a [`Feed`] with a [`Ticket`] issued before its last reset has
/// no effect.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Ticket {
    /// Generation of the [`Feed`] this [`Ticket`] was issued in.
    generation: u64,

    /// [`Window`] of the requested batch.
    pub window: Window,
}

/// Outcome of completing a [`Feed`] batch request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Provided number of [`Listing`]s was appended.
    Appended(usize),

    /// Response belongs to an outdated generation and was discarded.
    Stale,

    /// Request failed, so the [`Feed`] stopped paging until reset.
    Failed,
}

/// Infinite-scroll list of [`Listing`]s loaded in batches.
#[derive(Clone, Debug)]
pub struct Feed {
    /// [`Filter`] the [`Listing`]s are loaded with.
    filter: Filter,

    /// Loaded [`Listing`]s.
    items: Vec<Listing>,

    /// Number of loaded batches.
    page: usize,

    /// Number of [`Listing`]s in a single batch.
    page_size: NonZeroUsize,

    /// Indicator whether a batch request is in flight.
    is_loading: bool,

    /// Indicator whether more [`Listing`]s are expected.
    has_more: bool,

    /// Number of resets happened to this [`Feed`].
    generation: u64,

    /// Indicator whether the last batch request failed.
    stalled: bool,
}

impl Feed {
    /// Creates a new empty [`Feed`] of the provided [`Filter`].
    #[must_use]
    pub fn new(filter: Filter, page_size: NonZeroUsize) -> Self {
        Self::resume(filter, 0, page_size)
    }

    /// Creates a new [`Feed`] of the provided [`Filter`] positioned after
    /// `page` batches which were already delivered.
    #[must_use]
    pub fn resume(
        filter: Filter,
        page: usize,
        page_size: NonZeroUsize,
    ) -> Self {
        Self {
            filter,
            items: Vec::new(),
            page,
            page_size,
            is_loading: false,
            has_more: true,
            generation: 0,
            stalled: false,
        }
    }

    /// Returns the [`Filter`] of this [`Feed`].
    #[must_use]
    pub const fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Returns the loaded [`Listing`]s.
    #[must_use]
    pub fn items(&self) -> &[Listing] {
        &self.items
    }

    /// Returns the number of loaded batches.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Indicates whether a batch request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Indicates whether more [`Listing`]s are expected.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    /// Indicates whether paging stopped because of a failed request.
    #[must_use]
    pub const fn is_stalled(&self) -> bool {
        self.stalled
    }

    /// Returns the [`Window`] of the batch following the loaded ones.
    fn next_window(&self) -> Window {
        let size = self.page_size.get();
        Window::new(self.page.saturating_mul(size), size)
    }

    /// Starts loading the next batch.
    ///
    /// [`None`] is returned if a batch is already in flight, everything is
    /// loaded, or the last request failed.
    pub fn begin(&mut self) -> Option<Ticket> {
        if self.is_loading || !self.has_more || self.stalled {
            return None;
        }
        self.is_loading = true;
        Some(Ticket {
            generation: self.generation,
            window: self.next_window(),
        })
    }

    /// Completes the batch request of the provided [`Ticket`].
    pub fn complete<E: fmt::Display>(
        &mut self,
        ticket: Ticket,
        result: Result<list::Page, E>,
    ) -> Outcome {
        if ticket.generation != self.generation {
            log::debug!(
                "discarding stale feed batch of generation {}",
                ticket.generation,
            );
            return Outcome::Stale;
        }

        self.is_loading = false;
        match result {
            Ok(page) => {
                let appended = page.items.len();
                self.items.extend(page.items);
                self.page += 1;
                self.has_more = page.has_more;
                Outcome::Appended(appended)
            }
            Err(e) => {
                log::error!("failed to load feed batch: {e}");
                self.stalled = true;
                Outcome::Failed
            }
        }
    }

    /// Replaces the [`Filter`] of this [`Feed`], dropping everything loaded,
    /// and starts loading the first batch.
    ///
    /// Any batch in flight becomes stale.
    pub fn reset(&mut self, mut filter: Filter) -> Ticket {
        _ = filter.prune_neighborhoods();
        self.filter = filter;
        self.items.clear();
        self.page = 0;
        self.has_more = true;
        self.stalled = false;
        self.is_loading = true;
        self.generation += 1;
        Ticket {
            generation: self.generation,
            window: self.next_window(),
        }
    }

    /// Loads the next batch with the provided `service`.
    ///
    /// [`None`] is returned if no batch should be loaded now.
    pub async fn load_more<S>(&mut self, service: &S) -> Option<Outcome>
    where
        S: Query<Fetch, Ok = list::Page, Err: fmt::Display>,
    {
        let ticket = self.begin()?;
        Some(self.fetch(ticket, service).await)
    }

    /// Applies the provided [`Filter`] and loads its first batch with the
    /// provided `service`.
    pub async fn apply<S>(&mut self, filter: Filter, service: &S) -> Outcome
    where
        S: Query<Fetch, Ok = list::Page, Err: fmt::Display>,
    {
        let ticket = self.reset(filter);
        self.fetch(ticket, service).await
    }

    /// Fetches the batch of the provided [`Ticket`] and completes it.
    async fn fetch<S>(&mut self, ticket: Ticket, service: &S) -> Outcome
    where
        S: Query<Fetch, Ok = list::Page, Err: fmt::Display>,
    {
        let result = service
            .execute(Fetch {
                filter: self.filter.clone(),
                window: ticket.window,
            })
            .await;
        self.complete(ticket, result)
    }

    /// Returns the URL loading the next batch of this [`Feed`] from the
    /// provided `base` path, if there is anything to load.
    #[must_use]
    pub fn more_href(&self, base: &str) -> Option<String> {
        (self.has_more && !self.stalled).then(|| {
            let query = filter::encode(&self.filter);
            if query.is_empty() {
                format!("{base}?page={}", self.page)
            } else {
                format!("{base}?{query}&page={}", self.page)
            }
        })
    }
}

#[cfg(test)]
mod spec {
    use std::{convert::Infallible, num::NonZeroUsize};

    use common::pagination::Window;

    use crate::{
        domain::{Listing, Slug},
        filter::{self, Filter, Sort},
        infra::Memory,
        read::listing::list,
    };

    use super::{Feed, Landing, Outcome};

    const TWO: NonZeroUsize = match NonZeroUsize::new(2) {
        Some(n) => n,
        None => unreachable!(),
    };

    fn page(window: Window, ids: &[&str], total: usize) -> list::Page {
        let items = ids
            .iter()
            .map(|id| filter::spec::listing(id, 1_000_000))
            .collect::<Vec<Listing>>();
        list::Page::new(window, items, total)
    }

    fn ids(feed: &Feed) -> Vec<&str> {
        feed.items().iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn redirects_bare_landing() {
        let default = Slug::new("punta-mita").unwrap();

        assert_eq!(
            Landing::of("", &default),
            Landing::Redirect(Filter::development(default.clone())),
        );
        let Landing::Redirect(filter) = Landing::of("?sort=price-low", &default)
        else {
            panic!("expected redirect");
        };
        assert_eq!(
            filter.href("/properties"),
            "/properties?development=punta-mita&sort=price-low",
        );
        assert_eq!(
            Landing::of("type=villa", &default),
            Landing::Render(filter::decode("type=villa")),
        );
    }

    #[test]
    fn prunes_landing_neighborhoods() {
        let default = Slug::new("punta-mita").unwrap();

        let Landing::Render(filter) =
            Landing::of("development=litibu&neighborhood=kupuri", &default)
        else {
            panic!("expected render");
        };

        assert!(filter.neighborhoods.is_empty());
        assert_eq!(filter.developments, [Slug::new("litibu").unwrap()]);
    }

    #[test]
    fn loads_batches_in_order() {
        let mut feed = Feed::new(Filter::default(), TWO);

        let first = feed.begin().unwrap();
        assert_eq!(first.window, Window::new(0, 2));
        assert!(feed.begin().is_none(), "no concurrent loads");

        let batch = page(first.window, &["a", "b"], 3);
        let outcome = feed.complete(first, Ok::<_, Infallible>(batch));
        assert_eq!(outcome, Outcome::Appended(2));
        assert!(feed.has_more());

        let second = feed.begin().unwrap();
        assert_eq!(second.window, Window::new(2, 2));
        let batch = page(second.window, &["c"], 3);
        _ = feed.complete(second, Ok::<_, Infallible>(batch));

        assert_eq!(ids(&feed), ["a", "b", "c"]);
        assert_eq!(feed.page(), 2);
        assert!(!feed.has_more());
        assert!(feed.begin().is_none());
    }

    #[test]
    fn discards_stale_responses() {
        let mut feed = Feed::new(Filter::default(), TWO);
        let outdated = feed.begin().unwrap();

        let current = feed.reset(Filter {
            sort: Sort::PriceHigh,
            ..Filter::default()
        });
        assert_eq!(current.window, Window::new(0, 2));

        let batch = page(outdated.window, &["old"], 1);
        let outcome = feed.complete(outdated, Ok::<_, Infallible>(batch));
        assert_eq!(outcome, Outcome::Stale);
        assert!(feed.items().is_empty());
        assert!(feed.is_loading());

        let batch = page(current.window, &["new"], 1);
        _ = feed.complete(current, Ok::<_, Infallible>(batch));
        assert_eq!(ids(&feed), ["new"]);
        assert_eq!(feed.page(), 1);
        assert!(!feed.is_loading());
    }

    #[test]
    fn failure_stalls_until_reset() {
        let mut feed = Feed::new(Filter::default(), TWO);
        let ticket = feed.begin().unwrap();

        let outcome = feed.complete(ticket, Err::<list::Page, _>("timeout"));

        assert_eq!(outcome, Outcome::Failed);
        assert!(feed.has_more());
        assert!(!feed.is_loading());
        assert!(feed.is_stalled());
        assert!(feed.begin().is_none());
        assert_eq!(feed.more_href("/properties/more"), None);

        _ = feed.reset(Filter::default());
        assert!(!feed.is_stalled());
    }

    #[test]
    fn builds_next_batch_href() {
        let feed = Feed::resume(filter::decode("bedrooms=3"), 2, TWO);

        assert_eq!(
            feed.more_href("/properties/more").as_deref(),
            Some("/properties/more?bedrooms=3&page=2"),
        );
        assert_eq!(
            Feed::new(Filter::default(), TWO)
                .more_href("/properties/more")
                .as_deref(),
            Some("/properties/more?page=0"),
        );
    }

    #[tokio::test]
    async fn loads_from_service() {
        let svc = crate::spec::service(Memory::new(
            ["a", "b", "c"]
                .into_iter()
                .map(|id| filter::spec::listing(id, 1_000_000))
                .collect(),
            vec![],
        ));
        let mut feed = Feed::new(Filter::default(), TWO);

        assert_eq!(feed.load_more(&svc).await, Some(Outcome::Appended(2)));
        assert_eq!(feed.load_more(&svc).await, Some(Outcome::Appended(1)));
        assert_eq!(feed.load_more(&svc).await, None);
        assert_eq!(ids(&feed), ["a", "b", "c"]);

        let outcome = feed.apply(filter::decode("bedrooms=9"), &svc).await;
        assert_eq!(outcome, Outcome::Appended(0));
        assert!(feed.items().is_empty());
        assert!(!feed.has_more());
    }
}
