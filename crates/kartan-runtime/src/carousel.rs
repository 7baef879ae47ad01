#![forbid(unsafe_code)]

//! Initiative carousel navigation and the paged municipality list.

use std::ops::Range;

/// Dots shown at once under the carousel.
pub const DEFAULT_DOTS_IN_VIEW: usize = 5;

/// Rows per page in the vertical list.
pub const DEFAULT_PAGE_LIMIT: usize = 8;

/// Rendered size of a pagination dot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotSize {
    Full,
    /// Edge dot with more slides beyond it.
    Half,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dot {
    pub index: usize,
    pub active: bool,
    pub size: DotSize,
}

/// Sliding window of pagination dots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotWindow {
    /// First dot inside the window.
    pub offset: usize,
    pub dots_in_view: usize,
    /// One dot per slide; the host clips to `visible()`.
    pub dots: Vec<Dot>,
}

impl DotWindow {
    /// `None` when there is at most one slide.
    #[must_use]
    pub fn compute(current: usize, total: usize, dots_in_view: usize) -> Option<Self> {
        if total <= 1 {
            return None;
        }
        let current = current.min(total - 1);
        let offset = current.saturating_sub(2).min(total.saturating_sub(dots_in_view));
        let last = (total - 1).min((current + 2).max(dots_in_view.saturating_sub(1)));
        let more_before = current > 2;
        let more_after = total - current > 3;

        let dots = (0..total)
            .map(|index| {
                let neighbour = index.abs_diff(current) <= 1;
                let shrunk = (index == offset && more_before) || (index == last && more_after);
                Dot {
                    index,
                    active: index == current,
                    size: if shrunk && !neighbour {
                        DotSize::Half
                    } else {
                        DotSize::Full
                    },
                }
            })
            .collect();
        Some(Self {
            offset,
            dots_in_view,
            dots,
        })
    }

    /// Indexes of the dots inside the window.
    pub fn visible(&self) -> Range<usize> {
        self.offset..(self.offset + self.dots_in_view).min(self.dots.len())
    }
}

/// Previous slide, stopping at the first.
#[inline]
pub fn prev(current: usize) -> usize {
    current.saturating_sub(1)
}

/// Next slide, stopping at the last.
#[inline]
pub fn next(current: usize, total: usize) -> usize {
    if total == 0 {
        0
    } else {
        (current + 1).min(total - 1)
    }
}

/// Groups a list into fixed-size pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListPager {
    pub page_limit: usize,
}

impl Default for ListPager {
    fn default() -> Self {
        Self {
            page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl ListPager {
    #[must_use]
    pub fn new(page_limit: usize) -> Self {
        Self {
            page_limit: page_limit.max(1),
        }
    }

    /// Page that holds `index`.
    #[inline]
    pub fn page_of(&self, index: usize) -> usize {
        index / self.page_limit.max(1)
    }

    pub fn page_count(&self, len: usize) -> usize {
        len.div_ceil(self.page_limit.max(1))
    }

    /// Row range of `page`, empty past the end.
    pub fn page_range(&self, page: usize, len: usize) -> Range<usize> {
        let limit = self.page_limit.max(1);
        let start = (page * limit).min(len);
        start..(start + limit).min(len)
    }
}
