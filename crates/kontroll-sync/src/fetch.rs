//! # Paginated Fetcher
//!
//! Both platforms page their list endpoints, each with its own continuation
//! style (a page count on the ERP, a `links.next` pointer on the field-service
//! API). The clients translate either style into a [`Page`]; this module
//! drives the page loop.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Page Loop                                         │
//! │                                                                         │
//! │  page 1 ──► fetch ──► items + has_next?                                │
//! │                │                                                        │
//! │                ├── has_next ──► page 2 ──► ... (strictly sequential)   │
//! │                │                                                        │
//! │                └── error ──► warn + STOP, return items collected       │
//! │                              so far (empty on a first-page failure)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The degrade-to-partial error policy is deliberate: one bad page must not
//! abort a whole job run. An explicit iterative loop replaces the upstream
//! services' recursive accumulation so a deep catalog cannot grow the stack.

use std::future::Future;

use tracing::warn;

use crate::error::SyncResult;

/// One page of a platform list endpoint.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,

    /// Whether another page follows.
    pub has_next: bool,
}

impl<T> Page<T> {
    /// A terminal page carrying the given items.
    pub fn last(items: Vec<T>) -> Self {
        Page {
            items,
            has_next: false,
        }
    }
}

/// Fetches every page of a collection, sequentially, starting at page 1.
///
/// `fetch` must be stateless with respect to pagination - it receives the
/// page number on every call, so the loop is restartable and holds no shared
/// cursor.
///
/// Errors never propagate: a failed page is logged and pagination stops with
/// whatever was collected up to that point.
pub async fn fetch_all_pages<T, F, Fut>(mut fetch: F) -> Vec<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = SyncResult<Page<T>>>,
{
    let mut items = Vec::new();
    let mut page_number: u32 = 1;

    loop {
        match fetch(page_number).await {
            Ok(page) => {
                items.extend(page.items);
                if !page.has_next {
                    break;
                }
                page_number += 1;
            }
            Err(err) => {
                warn!(page_number, error = %err, "Page fetch failed, returning partial results");
                break;
            }
        }
    }

    items
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_single_page() {
        let items = fetch_all_pages(|_page| async { Ok(Page::last(vec![1, 2, 3])) }).await;
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_accumulates_across_pages_in_order() {
        let items = fetch_all_pages(|page| async move {
            Ok(Page {
                items: vec![page * 10, page * 10 + 1],
                has_next: page < 3,
            })
        })
        .await;

        assert_eq!(items, vec![10, 11, 20, 21, 30, 31]);
    }

    #[tokio::test]
    async fn test_pages_fetched_sequentially() {
        let last_seen = AtomicU32::new(0);

        fetch_all_pages(|page| {
            let previous = last_seen.swap(page, Ordering::SeqCst);
            async move {
                assert_eq!(previous + 1, page, "page {page} requested out of order");
                Ok(Page::<u32> {
                    items: vec![],
                    has_next: page < 5,
                })
            }
        })
        .await;

        assert_eq!(last_seen.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_error_stops_pagination_keeps_partial() {
        let items = fetch_all_pages(|page| async move {
            if page == 3 {
                return Err(SyncError::Api {
                    status: 500,
                    body: "boom".into(),
                });
            }
            Ok(Page {
                items: vec![page],
                has_next: true,
            })
        })
        .await;

        assert_eq!(items, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_first_page_error_yields_empty() {
        let items: Vec<u32> = fetch_all_pages(|_page| async {
            Err(SyncError::Api {
                status: 502,
                body: "bad gateway".into(),
            })
        })
        .await;

        assert!(items.is_empty());
    }
}
