//! Abstractions for pagination.

use std::{num::NonZeroUsize, ops::Range};

use derive_more::{Display, Error};
use serde::Serialize;

/// Window of items to select: `[offset, offset + limit)`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Window {
    /// Number of items to skip.
    pub offset: usize,

    /// Maximum number of items to return.
    pub limit: usize,
}

impl Window {
    /// Creates a new [`Window`].
    #[must_use]
    pub const fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// Returns the exclusive end of this [`Window`].
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset.saturating_add(self.limit)
    }

    /// Returns this [`Window`] as a [`Range`].
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }
}

/// A fetched window of items.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<I> {
    /// Items in this [`Page`], in the requested order.
    pub items: Vec<I>,

    /// Total number of items matching the selection.
    pub total: usize,

    /// Offset this [`Page`] starts at.
    pub offset: usize,

    /// Requested size of this [`Page`].
    pub page_size: usize,

    /// Indicator whether there are more items after this [`Page`].
    pub has_more: bool,
}

impl<I> Page<I> {
    /// Creates a new [`Page`] of the provided `items` fetched for the
    /// provided [`Window`].
    #[must_use]
    pub fn new(window: Window, items: Vec<I>, total: usize) -> Self {
        let has_more = window.offset + items.len() < total;
        Self {
            items,
            total,
            offset: window.offset,
            page_size: window.limit,
            has_more,
        }
    }

    /// Creates a new empty [`Page`] for the provided [`Window`].
    #[must_use]
    pub fn empty(window: Window) -> Self {
        Self::new(window, Vec::new(), 0)
    }
}

/// Pagination selector.
#[derive(Clone, Debug)]
pub struct Selector<F> {
    /// [`Window`] to select.
    pub window: Window,

    /// Additional filter being applied to the result.
    pub filter: F,
}

/// Error of requesting a page number outside of the available pages.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
#[display("page {requested} is out of range 1..={total_pages}")]
pub struct OutOfRange {
    /// Requested page number.
    pub requested: usize,

    /// Number of available pages.
    pub total_pages: usize,
}

/// Discrete page-based pagination state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Pager {
    /// Current page number, starting from `1`.
    current: usize,

    /// Total number of pages.
    total_pages: usize,

    /// Number of items on a single page.
    page_size: NonZeroUsize,
}

/// Number of pages shown on each side of the current one.
const WINDOW_RADIUS: usize = 2;

impl Pager {
    /// Calculates the number of pages required to show `total` items.
    #[must_use]
    pub fn total_pages(total: usize, page_size: NonZeroUsize) -> usize {
        total.div_ceil(page_size.get())
    }

    /// Requests the `page` of `total` items.
    ///
    /// Without any pages (an empty or unknown result) every `page` but `0`
    /// is valid.
    ///
    /// # Errors
    ///
    /// With [`OutOfRange`] if the `page` is `0` or past the last one.
    pub fn request(
        page: usize,
        total: usize,
        page_size: NonZeroUsize,
    ) -> Result<Self, OutOfRange> {
        let total_pages = Self::total_pages(total, page_size);
        if page < 1 || (total_pages > 0 && page > total_pages) {
            return Err(OutOfRange {
                requested: page,
                total_pages,
            });
        }
        Ok(Self {
            current: page,
            total_pages,
            page_size,
        })
    }

    /// Moves this [`Pager`] to the provided `page`, clamping it into the
    /// available pages.
    pub fn go_to(&mut self, page: usize) -> &mut Self {
        self.current = page.clamp(1, self.total_pages.max(1));
        self
    }

    /// Returns the current page number.
    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Returns the total number of pages.
    #[must_use]
    pub const fn total_pages_count(&self) -> usize {
        self.total_pages
    }

    /// Returns the number of items on a single page.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size.get()
    }

    /// Returns the offset of the first item on the current page.
    #[must_use]
    pub const fn offset(&self) -> usize {
        (self.current - 1) * self.page_size.get()
    }

    /// Returns the [`Window`] of the current page.
    #[must_use]
    pub const fn window(&self) -> Window {
        Window::new(self.offset(), self.page_size.get())
    }

    /// Returns the previous page number, if any.
    #[must_use]
    pub fn previous(&self) -> Option<usize> {
        (self.current > 1).then(|| self.current - 1)
    }

    /// Returns the next page number, if any.
    #[must_use]
    pub fn next(&self) -> Option<usize> {
        (self.current < self.total_pages).then(|| self.current + 1)
    }

    /// Returns the [`Token`]s to display for navigating between pages.
    ///
    /// The first and the last pages are always shown along with the pages
    /// around the current one. Any gap is collapsed into a single
    /// [`Token::Ellipsis`].
    #[must_use]
    pub fn tokens(&self) -> Vec<Token> {
        let last = self.total_pages;
        if last == 0 {
            return Vec::new();
        }

        let from = self.current.saturating_sub(WINDOW_RADIUS).max(1);
        let to = (self.current + WINDOW_RADIUS).min(last);

        let mut tokens = Vec::with_capacity(to - from + 5);
        let mut push = |page: usize| {
            if let Some(Token::Page(prev)) = tokens.last().copied() {
                if prev >= page {
                    return;
                }
                if prev + 1 < page {
                    tokens.push(Token::Ellipsis);
                }
            }
            tokens.push(Token::Page(page));
        };

        push(1);
        for page in from..=to {
            push(page);
        }
        push(last);

        tokens
    }
}

/// Token of a page navigation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Token {
    /// Link to the page with the provided number.
    Page(usize),

    /// Collapsed gap between pages.
    Ellipsis,
}

/// Returns the path of the `page` under the provided `base` path.
///
/// The first page lives at the `base` itself, while the others use the
/// `/page/N` suffix.
#[must_use]
pub fn page_path(base: &str, page: usize) -> String {
    let base = base.trim_end_matches('/');
    if page <= 1 {
        if base.is_empty() {
            "/".to_owned()
        } else {
            base.to_owned()
        }
    } else {
        format!("{base}/page/{page}")
    }
}

/// Defines pagination types.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_pagination {
    ($node:ty, $filter:ty) => {
        #[doc = "A [`Page`] of nodes."]
        pub type Page = $crate::pagination::Page<$node>;

        #[doc = "[`Page`] selector."]
        pub type Selector = $crate::pagination::Selector<$filter>;
    };
}

#[cfg(test)]
mod spec {
    use std::num::NonZeroUsize;

    use super::{page_path, OutOfRange, Page, Pager, Token, Window};

    const TWELVE: NonZeroUsize = match NonZeroUsize::new(12) {
        Some(n) => n,
        None => unreachable!(),
    };

    fn pager(current: usize, total_pages: usize) -> Pager {
        Pager::request(current, total_pages, NonZeroUsize::MIN).unwrap()
    }

    #[test]
    fn window_math() {
        assert_eq!(Pager::total_pages(37, TWELVE), 4);
        assert_eq!(Pager::total_pages(36, TWELVE), 3);
        assert_eq!(Pager::total_pages(0, TWELVE), 0);

        let first = Pager::request(1, 37, TWELVE).unwrap();
        assert_eq!(first.window().range(), 0..12);
        assert_eq!(first.previous(), None);
        assert_eq!(first.next(), Some(2));

        let last = Pager::request(4, 37, TWELVE).unwrap();
        assert_eq!(last.offset(), 36);
        assert_eq!(last.next(), None);
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(
            Pager::request(5, 37, TWELVE),
            Err(OutOfRange {
                requested: 5,
                total_pages: 4,
            }),
        );
        assert!(Pager::request(0, 37, TWELVE).is_err());
        assert!(Pager::request(1, 0, TWELVE).is_ok());
    }

    #[test]
    fn empty_result_has_no_missing_pages() {
        let p = Pager::request(3, 0, TWELVE).unwrap();

        assert_eq!(p.current(), 3);
        assert_eq!(p.next(), None);
        assert!(p.tokens().is_empty());
        assert!(Pager::request(0, 0, TWELVE).is_err());
    }

    #[test]
    fn go_to_clamps() {
        let mut p = Pager::request(2, 37, TWELVE).unwrap();

        assert_eq!(p.go_to(10).current(), 4);
        assert_eq!(p.go_to(0).current(), 1);
        assert_eq!(p.go_to(3).offset(), 24);
    }

    #[test]
    fn tokens_collapse_gaps() {
        use Token::{Ellipsis as E, Page as P};

        assert_eq!(
            pager(5, 10).tokens(),
            [P(1), E, P(3), P(4), P(5), P(6), P(7), E, P(10)],
        );
        assert_eq!(pager(1, 10).tokens(), [P(1), P(2), P(3), E, P(10)]);
        assert_eq!(
            pager(4, 10).tokens(),
            [P(1), P(2), P(3), P(4), P(5), P(6), E, P(10)],
        );
        assert_eq!(pager(10, 10).tokens(), [P(1), E, P(8), P(9), P(10)]);
        assert_eq!(pager(1, 1).tokens(), [P(1)]);
        assert_eq!(pager(2, 3).tokens(), [P(1), P(2), P(3)]);
    }

    #[test]
    fn tokens_never_repeat() {
        for total in 1..=15 {
            for current in 1..=total {
                let tokens = pager(current, total).tokens();
                for pair in tokens.windows(2) {
                    assert_ne!(pair[0], pair[1], "{current}/{total}");
                }
                assert_eq!(tokens.first(), Some(&Token::Page(1)));
                assert_eq!(tokens.last(), Some(&Token::Page(total)));
            }
        }
    }

    #[test]
    fn page_paths() {
        assert_eq!(page_path("/blog", 1), "/blog");
        assert_eq!(page_path("/blog/", 3), "/blog/page/3");
        assert_eq!(page_path("", 1), "/");
    }

    #[test]
    fn page_has_more() {
        let page = Page::new(Window::new(12, 12), vec![(); 12], 37);
        assert!(page.has_more);

        let page = Page::new(Window::new(36, 12), vec![()], 37);
        assert!(!page.has_more);
    }
}
