//! Page arithmetic for ordered listings.
//!
//! Pages are 1-based. A requested page number is resolved leniently:
//!
//! - missing or non-numeric input resolves to the first page,
//! - numbers outside `1..=num_pages` resolve to the last page,
//! - an empty result set still has exactly one (empty) page.
//!
//! The repository layer only needs [`Page::offset`] and [`Page::per_page`]
//! to fetch the slice.

use serde::Serialize;

/// Splits `total_items` rows into pages of `per_page`.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    total_items: i64,
    per_page: i64,
}

/// A resolved page, safe to turn into `LIMIT`/`OFFSET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub number: i64,
    pub num_pages: i64,
    pub per_page: i64,
    pub total_items: i64,
}

impl Paginator {
    /// `per_page` below 1 is treated as 1.
    pub fn new(total_items: i64, per_page: i64) -> Self {
        Self {
            total_items: total_items.max(0),
            per_page: per_page.max(1),
        }
    }

    pub fn num_pages(&self) -> i64 {
        if self.total_items == 0 {
            return 1;
        }
        (self.total_items + self.per_page - 1) / self.per_page
    }

    /// Resolve the raw `?page=` value into a valid page.
    pub fn get_page(&self, raw: Option<&str>) -> Page {
        let num_pages = self.num_pages();
        let number = match raw.map(str::trim).and_then(|s| s.parse::<i64>().ok()) {
            None => 1,
            Some(n) if (1..=num_pages).contains(&n) => n,
            Some(_) => num_pages,
        };
        Page {
            number,
            num_pages,
            per_page: self.per_page,
            total_items: self.total_items,
        }
    }
}

impl Page {
    /// Row offset of the first item on this page.
    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.per_page
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> Option<i64> {
        self.has_next().then_some(self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<i64> {
        self.has_previous().then_some(self.number - 1)
    }
}

/// A page of items together with its navigation metadata.
///
/// Serializes as `{ "items": [...], "page": {...}, "has_next": .., ... }`
/// which is what listing views hand to clients.
#[derive(Debug, Clone, Serialize)]
pub struct PageOf<T: Serialize> {
    pub items: Vec<T>,
    pub page: Page,
    pub has_next: bool,
    pub has_previous: bool,
    pub next_page_number: Option<i64>,
    pub previous_page_number: Option<i64>,
}

impl<T: Serialize> PageOf<T> {
    pub fn new(items: Vec<T>, page: Page) -> Self {
        Self {
            items,
            has_next: page.has_next(),
            has_previous: page.has_previous(),
            next_page_number: page.next_page_number(),
            previous_page_number: page.previous_page_number(),
            page,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirteen_items_make_two_pages() {
        let paginator = Paginator::new(13, 10);
        assert_eq!(paginator.num_pages(), 2);

        let first = paginator.get_page(None);
        assert_eq!(first.number, 1);
        assert_eq!(first.offset(), 0);
        assert!(first.has_next());
        assert!(!first.has_previous());

        let second = paginator.get_page(Some("2"));
        assert_eq!(second.number, 2);
        assert_eq!(second.offset(), 10);
        assert!(!second.has_next());
        assert_eq!(second.previous_page_number(), Some(1));
    }

    #[test]
    fn exact_multiple_has_no_trailing_empty_page() {
        assert_eq!(Paginator::new(20, 10).num_pages(), 2);
        assert_eq!(Paginator::new(21, 10).num_pages(), 3);
    }

    #[test]
    fn empty_listing_still_has_one_page() {
        let page = Paginator::new(0, 10).get_page(Some("5"));
        assert_eq!(page.number, 1);
        assert_eq!(page.num_pages, 1);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn out_of_range_clamps_to_last_page() {
        let paginator = Paginator::new(35, 10);
        assert_eq!(paginator.get_page(Some("99")).number, 4);
        assert_eq!(paginator.get_page(Some("0")).number, 4);
        assert_eq!(paginator.get_page(Some("-3")).number, 4);
    }

    #[test]
    fn garbage_resolves_to_first_page() {
        let paginator = Paginator::new(35, 10);
        assert_eq!(paginator.get_page(Some("abc")).number, 1);
        assert_eq!(paginator.get_page(Some("")).number, 1);
        assert_eq!(paginator.get_page(Some(" 3 ")).number, 3);
    }

    #[test]
    fn zero_page_size_is_clamped() {
        let paginator = Paginator::new(3, 0);
        assert_eq!(paginator.num_pages(), 3);
    }

    #[test]
    fn page_of_carries_navigation() {
        let page = Paginator::new(13, 10).get_page(Some("1"));
        let view = PageOf::new(vec![1, 2, 3], page);
        assert_eq!(view.len(), 3);
        assert!(view.has_next);
        assert_eq!(view.next_page_number, Some(2));
        assert_eq!(view.previous_page_number, None);
    }
}
