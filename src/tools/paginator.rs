//! Splitting result lists into fixed-size pages.

use std::slice;

use crate::error::{Result, SearchError};

/// Borrowed pages over a slice. Every page except possibly the last holds
/// exactly `page_size` items.
#[derive(Clone, Debug)]
pub struct Paginator<'a, T> {
    pages: Vec<&'a [T]>,
}

impl<'a, T> Paginator<'a, T> {
    /// Split `items` into pages of `page_size`.
    pub fn new(items: &'a [T], page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(SearchError::validation("page size must be positive"));
        }
        Ok(Paginator {
            pages: items.chunks(page_size).collect(),
        })
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// The page at `index`, if any.
    pub fn page(&self, index: usize) -> Option<&'a [T]> {
        self.pages.get(index).copied()
    }

    /// Iterate over the pages.
    pub fn iter(&self) -> slice::Iter<'_, &'a [T]> {
        self.pages.iter()
    }
}

impl<'a, T> IntoIterator for Paginator<'a, T> {
    type Item = &'a [T];
    type IntoIter = std::vec::IntoIter<&'a [T]>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.into_iter()
    }
}

impl<'p, 'a, T> IntoIterator for &'p Paginator<'a, T> {
    type Item = &'p &'a [T];
    type IntoIter = slice::Iter<'p, &'a [T]>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

/// Split `items` into pages of `page_size`.
pub fn paginate<T>(items: &[T], page_size: usize) -> Result<Paginator<'_, T>> {
    Paginator::new(items, page_size)
}
