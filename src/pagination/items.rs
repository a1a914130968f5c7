//! Item-level iteration across pages.

use std::collections::VecDeque;
use std::future::Future;

use crate::jsonapi::Page;
use crate::pagination::{PageRequest, PaginationOptions};

/// Yields the items of a paginated collection one at a time.
///
/// The next page is fetched only once the buffered page is used up and the
/// previous page reported a `next_page`. A fetch error is yielded once, after
/// which the iterator is finished.
///
/// # Example
///
/// ```rust
/// use jsonapi_client::jsonapi::{Page, PaginationMeta};
/// use jsonapi_client::pagination::{ItemIterator, PageRequest, PaginationOptions};
///
/// # tokio_test::block_on(async {
/// let fetch = |request: PageRequest| async move {
///     let next_page = (request.number < 2).then_some(request.number + 1);
///     let meta = PaginationMeta { next_page, ..Default::default() };
///     Ok::<_, String>(Page::new(vec![request.number * 10, request.number * 10 + 1], meta))
/// };
///
/// let mut items = ItemIterator::new(fetch, PaginationOptions::new());
/// let mut seen = Vec::new();
/// while let Some(item) = items.next().await {
///     seen.push(item.unwrap());
/// }
/// assert_eq!(seen, vec![10, 11, 20, 21]);
/// # });
/// ```
#[derive(Debug)]
pub struct ItemIterator<T, F> {
    fetch: F,
    page_size: u32,
    next_page: Option<u32>,
    buffer: VecDeque<T>,
    yielded: usize,
    max_items: Option<usize>,
    finished: bool,
}

impl<T, E, F, Fut> ItemIterator<T, F>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    /// Creates an iterator positioned before the first item.
    ///
    /// No request is made until [`next`](Self::next) is first awaited.
    #[must_use]
    pub fn new(fetch: F, options: PaginationOptions) -> Self {
        Self {
            fetch,
            page_size: options.get_page_size(),
            next_page: Some(options.get_start_page()),
            buffer: VecDeque::new(),
            yielded: 0,
            max_items: options.get_max_items(),
            finished: false,
        }
    }

    /// Advances to the next item, fetching a page if needed.
    ///
    /// Returns `None` once the collection is exhausted.
    #[allow(clippy::should_implement_trait)]
    pub async fn next(&mut self) -> Option<Result<T, E>> {
        loop {
            if self.finished {
                return None;
            }

            if self.max_items.is_some_and(|max| self.yielded >= max) {
                self.finish();
                return None;
            }

            if let Some(item) = self.buffer.pop_front() {
                self.yielded += 1;
                return Some(Ok(item));
            }

            let Some(number) = self.next_page else {
                self.finish();
                return None;
            };

            match (self.fetch)(PageRequest::new(number, self.page_size)).await {
                Ok(page) if page.data.is_empty() => {
                    self.finish();
                    return None;
                }
                Ok(page) => {
                    self.next_page = page.meta.next_page;
                    self.buffer.extend(page.data);
                }
                Err(error) => {
                    self.finish();
                    return Some(Err(error));
                }
            }
        }
    }

    /// Drains the remaining items into a `Vec`.
    ///
    /// # Errors
    ///
    /// Returns the first fetch error; items gathered before it are dropped.
    pub async fn to_vec(mut self) -> Result<Vec<T>, E> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await {
            items.push(item?);
        }
        Ok(items)
    }

    /// Returns how many items have been yielded so far.
    #[must_use]
    pub const fn yielded(&self) -> usize {
        self.yielded
    }

    /// Returns `true` once iteration has ended.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    fn finish(&mut self) {
        self.finished = true;
        self.buffer.clear();
    }
}
