//! Splitting ordered feeds into fixed-size pages.
//!
//! Page numbers are 1-based. A missing, non-numeric or non-positive request
//! means page 1; a request past the end means the last page. An empty feed
//! still has exactly one (empty) page.

use serde::Serialize;

/// Stateless page calculator shared by every feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: usize,
}

impl Paginator {
    pub const DEFAULT_PER_PAGE: usize = 10;

    pub fn new(per_page: usize) -> Self {
        Self {
            per_page: per_page.max(1),
        }
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Interpret a raw `?page=` value.
    pub fn parse_page(raw: Option<&str>) -> usize {
        raw.and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|n| *n >= 1)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(1)
    }

    pub fn num_pages(&self, count: u64) -> usize {
        let pages = count.div_ceil(self.per_page as u64) as usize;
        pages.max(1)
    }

    /// Resolve the requested page against a feed of `count` items.
    pub fn window(&self, count: u64, raw: Option<&str>) -> PageWindow {
        let num_pages = self.num_pages(count);
        let number = Self::parse_page(raw).min(num_pages);
        let offset = ((number - 1) * self.per_page) as u64;

        PageWindow {
            number,
            num_pages,
            count,
            per_page: self.per_page,
            offset,
            limit: self.per_page as u64,
        }
    }

    /// Slice an in-memory sequence.
    pub fn get_page<T>(&self, items: Vec<T>, raw: Option<&str>) -> Page<T> {
        let window = self.window(items.len() as u64, raw);
        let page_items = items
            .into_iter()
            .skip(window.offset as usize)
            .take(window.limit as usize)
            .collect();
        window.into_page(page_items)
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PER_PAGE)
    }
}

/// The slice of a feed a page covers, before the items are fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub number: usize,
    pub num_pages: usize,
    pub count: u64,
    pub per_page: usize,
    pub offset: u64,
    pub limit: u64,
}

impl PageWindow {
    pub fn into_page<T>(self, items: Vec<T>) -> Page<T> {
        Page {
            items,
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            per_page: self.per_page,
        }
    }
}

/// One page of a feed plus the metadata needed to link its neighbours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub num_pages: usize,
    pub count: u64,
    pub per_page: usize,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn next_page_number(&self) -> Option<usize> {
        self.has_next().then_some(self.number + 1)
    }

    pub fn previous_page_number(&self) -> Option<usize> {
        self.has_previous().then(|| self.number - 1)
    }

    /// 1-based index of the first item on this page, 0 for an empty feed.
    pub fn start_index(&self) -> u64 {
        if self.count == 0 {
            0
        } else {
            (self.number as u64 - 1) * self.per_page as u64 + 1
        }
    }

    /// 1-based index of the last item on this page, 0 for an empty feed.
    pub fn end_index(&self) -> u64 {
        if self.number == self.num_pages {
            self.count
        } else {
            self.number as u64 * self.per_page as u64
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            num_pages: self.num_pages,
            count: self.count,
            per_page: self.per_page,
        }
    }
}
