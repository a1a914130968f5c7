//! Lazy pagination over page-numbered collections.
//!
//! Every list endpoint returns one page at a time together with
//! [`PaginationMeta`](crate::jsonapi::PaginationMeta). The iterators in this
//! module drive a caller-supplied fetch function page by page:
//!
//! - [`ItemIterator`]: yields individual items, fetching the next page only
//!   when the buffered one is used up
//! - [`PageIterator`]: yields whole pages
//! - [`collect_all`] and [`take`]: drain an item iterator into a `Vec`
//!
//! Iteration stops when the last fetched page reported no `next_page`, when a
//! fetched page is empty, or when the optional item cap is reached.
//! Iterators are single-pass and single-consumer: `next` takes `&mut self`.
//! Start over by constructing a new iterator.
//!
//! # Example
//!
//! ```rust
//! use jsonapi_client::jsonapi::{Page, PaginationMeta};
//! use jsonapi_client::pagination::{take, PageRequest, PaginationOptions};
//!
//! # tokio_test::block_on(async {
//! let fetch = |request: PageRequest| async move {
//!     let start = (request.number - 1) * request.size;
//!     let data: Vec<u32> = (start..start + request.size).collect();
//!     let meta = PaginationMeta { next_page: Some(request.number + 1), ..Default::default() };
//!     Ok::<_, std::convert::Infallible>(Page::new(data, meta))
//! };
//!
//! let first = take(fetch, 3, PaginationOptions::new().page_size(10)).await.unwrap();
//! assert_eq!(first, vec![0, 1, 2]);
//! # });
//! ```

mod items;
mod pages;

pub use items::ItemIterator;
pub use pages::PageIterator;

use std::future::Future;
use std::pin::Pin;

use crate::jsonapi::Page;

/// Boxed, sendable future returned by fetch closures whose future type
/// cannot be named.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Largest page size the service accepts. Larger requests are clamped.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Identifies a page to fetch: 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    /// 1-based page number.
    pub number: u32,
    /// Number of items per page.
    pub size: u32,
}

impl PageRequest {
    /// Creates a page descriptor.
    #[must_use]
    pub const fn new(number: u32, size: u32) -> Self {
        Self { number, size }
    }
}

/// Options shared by both iterator flavors.
///
/// # Example
///
/// ```rust
/// use jsonapi_client::pagination::{PaginationOptions, MAX_PAGE_SIZE};
///
/// let options = PaginationOptions::new().page_size(5000).max_items(120);
/// assert_eq!(options.get_page_size(), MAX_PAGE_SIZE);
/// assert_eq!(options.get_max_items(), Some(120));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationOptions {
    page_size: u32,
    max_items: Option<usize>,
    start_page: u32,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_items: None,
            start_page: 1,
        }
    }
}

impl PaginationOptions {
    /// Creates options with the default page size and no item cap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size, clamped to `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub const fn page_size(mut self, size: u32) -> Self {
        self.page_size = clamp_page_size(size);
        self
    }

    /// Caps the total number of items yielded.
    #[must_use]
    pub const fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    /// Sets the first page to fetch (1-based; 0 is treated as 1).
    #[must_use]
    pub const fn start_page(mut self, page: u32) -> Self {
        self.start_page = if page == 0 { 1 } else { page };
        self
    }

    /// Returns the effective page size.
    #[must_use]
    pub const fn get_page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the item cap, if any.
    #[must_use]
    pub const fn get_max_items(&self) -> Option<usize> {
        self.max_items
    }

    /// Returns the first page number.
    #[must_use]
    pub const fn get_start_page(&self) -> u32 {
        self.start_page
    }
}

const fn clamp_page_size(size: u32) -> u32 {
    if size == 0 {
        1
    } else if size > MAX_PAGE_SIZE {
        MAX_PAGE_SIZE
    } else {
        size
    }
}

/// Fetches every item of a collection.
///
/// Memory use grows with the collection; cap it with
/// [`PaginationOptions::max_items`] or use [`take`] for large collections.
///
/// # Errors
///
/// Returns the first error produced by `fetch`.
pub async fn collect_all<T, E, F, Fut>(fetch: F, options: PaginationOptions) -> Result<Vec<T>, E>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    ItemIterator::new(fetch, options).to_vec().await
}

/// Fetches at most `n` items, requesting no more pages than needed.
///
/// # Errors
///
/// Returns the first error produced by `fetch`.
pub async fn take<T, E, F, Fut>(fetch: F, n: usize, options: PaginationOptions) -> Result<Vec<T>, E>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    ItemIterator::new(fetch, options.max_items(n)).to_vec().await
}


#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::test_support::{numbered_pages, stub};
    use super::*;

    #[test]
    fn test_options_defaults() {
        let options = PaginationOptions::default();
        assert_eq!(options.get_page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(options.get_max_items(), None);
        assert_eq!(options.get_start_page(), 1);
    }

    #[test]
    fn test_page_size_is_clamped() {
        assert_eq!(PaginationOptions::new().page_size(1001).get_page_size(), 1000);
        assert_eq!(PaginationOptions::new().page_size(0).get_page_size(), 1);
        assert_eq!(PaginationOptions::new().page_size(200).get_page_size(), 200);
    }

    #[test]
    fn test_start_page_zero_means_first_page() {
        assert_eq!(PaginationOptions::new().start_page(0).get_start_page(), 1);
    }

    #[tokio::test]
    async fn test_take_fetches_only_needed_pages() {
        let requests = Rc::new(RefCell::new(Vec::new()));
        let fetch = stub(numbered_pages(30, 10), Rc::clone(&requests));

        let items = take(fetch, 3, PaginationOptions::new().page_size(10))
            .await
            .unwrap();

        assert_eq!(items, vec![0, 1, 2]);
        assert_eq!(requests.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_take_across_page_boundary() {
        let requests = Rc::new(RefCell::new(Vec::new()));
        let fetch = stub(numbered_pages(30, 10), Rc::clone(&requests));

        let items = take(fetch, 12, PaginationOptions::new().page_size(10))
            .await
            .unwrap();

        assert_eq!(items.len(), 12);
        assert_eq!(items[11], 11);
        assert_eq!(requests.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_collect_all_drains_every_page() {
        let requests = Rc::new(RefCell::new(Vec::new()));
        let fetch = stub(numbered_pages(25, 10), Rc::clone(&requests));

        let items = collect_all(fetch, PaginationOptions::new().page_size(10))
            .await
            .unwrap();

        assert_eq!(items, (0..25).collect::<Vec<_>>());
        assert_eq!(
            *requests.borrow(),
            vec![
                PageRequest::new(1, 10),
                PageRequest::new(2, 10),
                PageRequest::new(3, 10)
            ]
        );
    }
}
