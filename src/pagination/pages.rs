//! Page-level iteration.

use std::future::Future;

use crate::jsonapi::Page;
use crate::pagination::{PageRequest, PaginationOptions};

/// Yields whole pages of a paginated collection.
///
/// The first page is always yielded, even when empty, so callers can observe
/// an empty result set. Any later empty page ends iteration. With an item cap
/// the last page is truncated to the cap and no further page is fetched.
#[derive(Debug)]
pub struct PageIterator<F> {
    fetch: F,
    page_size: u32,
    next_page: Option<u32>,
    pages_yielded: usize,
    items_yielded: usize,
    max_items: Option<usize>,
    finished: bool,
}

impl<T, E, F, Fut> PageIterator<F>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    /// Creates an iterator positioned before the first page.
    #[must_use]
    pub fn new(fetch: F, options: PaginationOptions) -> Self {
        Self {
            fetch,
            page_size: options.get_page_size(),
            next_page: Some(options.get_start_page()),
            pages_yielded: 0,
            items_yielded: 0,
            max_items: options.get_max_items(),
            finished: false,
        }
    }

    /// Fetches and returns the next page.
    #[allow(clippy::should_implement_trait)]
    pub async fn next(&mut self) -> Option<Result<Page<T>, E>> {
        if self.finished {
            return None;
        }

        let remaining = self.max_items.map(|max| max.saturating_sub(self.items_yielded));
        if remaining == Some(0) {
            self.finished = true;
            return None;
        }

        let Some(number) = self.next_page else {
            self.finished = true;
            return None;
        };

        let mut page = match (self.fetch)(PageRequest::new(number, self.page_size)).await {
            Ok(page) => page,
            Err(error) => {
                self.finished = true;
                return Some(Err(error));
            }
        };

        if page.data.is_empty() && self.pages_yielded > 0 {
            self.finished = true;
            return None;
        }

        if let Some(remaining) = remaining {
            if page.data.len() >= remaining {
                page.data.truncate(remaining);
                self.finished = true;
            }
        }

        self.next_page = page.meta.next_page;
        self.pages_yielded += 1;
        self.items_yielded += page.data.len();
        Some(Ok(page))
    }

    /// Drains the remaining pages into a `Vec`.
    ///
    /// # Errors
    ///
    /// Returns the first fetch error.
    pub async fn to_vec(mut self) -> Result<Vec<Page<T>>, E> {
        let mut pages = Vec::new();
        while let Some(page) = self.next().await {
            pages.push(page?);
        }
        Ok(pages)
    }

    /// Returns how many pages have been yielded so far.
    #[must_use]
    pub const fn pages_yielded(&self) -> usize {
        self.pages_yielded
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::future::ready;
    use std::rc::Rc;

    use super::*;
    use crate::jsonapi::PaginationMeta;
    use crate::pagination::test_support::{numbered_pages, stub};

    #[tokio::test]
    async fn test_yields_each_page() {
        let requests = Rc::new(RefCell::new(Vec::new()));
        let fetch = stub(numbered_pages(25, 10), Rc::clone(&requests));

        let pages = PageIterator::new(fetch, PaginationOptions::new().page_size(10))
            .to_vec()
            .await
            .unwrap();

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[2].data, vec![20, 21, 22, 23, 24]);
        assert_eq!(pages[0].meta.total_count, 25);
    }

    #[tokio::test]
    async fn test_first_empty_page_is_yielded() {
        let fetch = |_request: PageRequest| {
            ready(Ok::<_, String>(Page::<u32>::new(
                Vec::new(),
                PaginationMeta::default(),
            )))
        };

        let mut iterator = PageIterator::new(fetch, PaginationOptions::new());

        let first = iterator.next().await.unwrap().unwrap();
        assert!(first.is_empty());
        assert!(iterator.next().await.is_none());
        assert_eq!(iterator.pages_yielded(), 1);
    }

    #[tokio::test]
    async fn test_later_empty_page_terminates() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let fetch = move |request: PageRequest| {
            counter.set(counter.get() + 1);
            let meta = PaginationMeta {
                next_page: Some(request.number + 1),
                ..PaginationMeta::default()
            };
            let data = if request.number == 1 { vec![1, 2] } else { Vec::new() };
            ready(Ok::<_, String>(Page::new(data, meta)))
        };

        let pages = PageIterator::new(fetch, PaginationOptions::new())
            .to_vec()
            .await
            .unwrap();

        assert_eq!(pages.len(), 1);
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_max_items_truncates_last_page() {
        let requests = Rc::new(RefCell::new(Vec::new()));
        let fetch = stub(numbered_pages(30, 10), Rc::clone(&requests));
        let options = PaginationOptions::new().page_size(10).max_items(15);

        let pages = PageIterator::new(fetch, options).to_vec().await.unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].data.len(), 5);
        assert_eq!(requests.borrow().len(), 2);
    }
}
