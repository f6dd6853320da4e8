//! Lazy, restartable pattern queries over keyset pages.

use std::collections::VecDeque;

use crate::entities::Pattern;
use crate::errors::RepositoryError;
use crate::traits::PatternRepository;

use super::PatternFilter;

/// Patterns fetched per backend round-trip.
pub const DEFAULT_PAGE_SIZE: usize = 256;

/// One keyset page. `next_cursor` is `None` once the sequence is exhausted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatternPage {
    pub items: Vec<Pattern>,
    pub next_cursor: Option<u64>,
}

impl PatternPage {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// A query that has not run yet. Each call to [`PatternQuery::iter`] starts
/// a fresh pass from the beginning; pages are fetched only as the iterator
/// advances.
pub struct PatternQuery<'a, R: PatternRepository + ?Sized> {
    repo: &'a R,
    filter: PatternFilter,
    page_size: usize,
}

impl<'a, R: PatternRepository + ?Sized> PatternQuery<'a, R> {
    pub fn new(repo: &'a R, filter: PatternFilter) -> Self {
        Self {
            repo,
            filter,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn filter(&self) -> &PatternFilter {
        &self.filter
    }

    pub fn iter(&self) -> PatternIter<'_, R> {
        PatternIter {
            repo: self.repo,
            filter: &self.filter,
            page_size: self.page_size,
            buffer: VecDeque::new(),
            cursor: None,
            exhausted: false,
        }
    }

    /// Drain one full pass into a vector.
    pub fn collect_all(&self) -> Result<Vec<Pattern>, RepositoryError> {
        self.iter().collect()
    }
}

impl<'q, 'a, R: PatternRepository + ?Sized> IntoIterator for &'q PatternQuery<'a, R> {
    type Item = Result<Pattern, RepositoryError>;
    type IntoIter = PatternIter<'q, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over one pass of a [`PatternQuery`]. Stops after the first
/// backend error.
pub struct PatternIter<'q, R: PatternRepository + ?Sized> {
    repo: &'q R,
    filter: &'q PatternFilter,
    page_size: usize,
    buffer: VecDeque<Pattern>,
    cursor: Option<u64>,
    exhausted: bool,
}

impl<R: PatternRepository + ?Sized> Iterator for PatternIter<'_, R> {
    type Item = Result<Pattern, RepositoryError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(pattern) = self.buffer.pop_front() {
                return Some(Ok(pattern));
            }
            if self.exhausted {
                return None;
            }
            match self
                .repo
                .find_patterns_page(self.filter, self.cursor, self.page_size)
            {
                Ok(page) => {
                    self.exhausted = page.next_cursor.is_none();
                    self.cursor = page.next_cursor;
                    self.buffer.extend(page.items);
                }
                Err(e) => {
                    self.exhausted = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
