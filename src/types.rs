//! Common types used throughout siftpage
//!
//! This module contains the page and top-window value types shared by
//! the paginators and their callers.

use serde::{Deserialize, Serialize};

// ============================================================================
// Page
// ============================================================================

/// One page of filtered items, as produced by the top-window paginator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Filtered items in source order
    pub items: Vec<T>,
    /// 1-based page number
    pub page_number: usize,
    /// Requested page size
    pub page_size: usize,
    /// Total used for "N results" displays
    pub total_unfiltered_items: usize,
}

impl<T> Page<T> {
    /// Create a new page
    pub fn new(
        items: Vec<T>,
        page_number: usize,
        page_size: usize,
        total_unfiltered_items: usize,
    ) -> Self {
        Self {
            items,
            page_number,
            page_size,
            total_unfiltered_items,
        }
    }

    /// Number of items on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if this page has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of pages implied by the total and page size
    pub fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total_unfiltered_items.div_ceil(self.page_size)
    }

    /// Check if a page precedes this one
    pub fn has_previous_page(&self) -> bool {
        self.page_number > 1
    }

    /// Check if the total implies a page after this one
    pub fn has_next_page(&self) -> bool {
        self.page_number < self.total_pages()
    }

    /// 1-based position of the first item on this page (0 when empty)
    pub fn first_item_number(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.page_number - 1) * self.page_size + 1
        }
    }

    /// 1-based position of the last item on this page (0 when empty)
    pub fn last_item_number(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.page_number - 1) * self.page_size + self.items.len()
        }
    }

    /// Map the items while keeping the page bookkeeping
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_unfiltered_items: self.total_unfiltered_items,
        }
    }

    /// Consume the page, returning its items
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

// ============================================================================
// Top Window
// ============================================================================

/// A capped prefix of a source plus the source's authoritative size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Top<T> {
    /// Up to `window` raw, unfiltered items from the start of the source
    pub items: Vec<T>,
    /// Size of the whole source, independent of the window
    pub total_unfiltered_items: usize,
}

impl<T> Top<T> {
    /// Create a new top window
    pub fn new(items: Vec<T>, total_unfiltered_items: usize) -> Self {
        Self {
            items,
            total_unfiltered_items,
        }
    }

    /// Build a top window from a full in-memory slice
    pub fn from_slice(source: &[T], window: usize) -> Self
    where
        T: Clone,
    {
        Self {
            items: source.iter().take(window).cloned().collect(),
            total_unfiltered_items: source.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_navigation() {
        let page = Page::new(vec![4, 5, 6], 2, 3, 10);
        assert_eq!(page.len(), 3);
        assert_eq!(page.total_pages(), 4);
        assert!(page.has_previous_page());
        assert!(page.has_next_page());
        assert_eq!(page.first_item_number(), 4);
        assert_eq!(page.last_item_number(), 6);
    }

    #[test]
    fn test_page_last_and_empty() {
        let page = Page::new(vec![10], 4, 3, 10);
        assert!(!page.has_next_page());
        assert_eq!(page.last_item_number(), 10);

        let empty: Page<i32> = Page::new(Vec::new(), 1, 5, 0);
        assert!(empty.is_empty());
        assert_eq!(empty.total_pages(), 0);
        assert!(!empty.has_previous_page());
        assert!(!empty.has_next_page());
        assert_eq!(empty.first_item_number(), 0);
        assert_eq!(empty.last_item_number(), 0);
    }

    #[test]
    fn test_page_map_and_serialize() {
        let page = Page::new(vec![1, 2], 1, 2, 2).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["page_number"], 1);
        assert_eq!(json["total_unfiltered_items"], 2);
        assert_eq!(page.into_items(), vec![10, 20]);
    }

    #[test]
    fn test_top_from_slice() {
        let source = [1, 2, 3, 4, 5];
        let top = Top::from_slice(&source, 3);
        assert_eq!(top.items, vec![1, 2, 3]);
        assert_eq!(top.total_unfiltered_items, 5);

        let top = Top::from_slice(&source, 50);
        assert_eq!(top.items.len(), 5);
    }
}
