//! Paginated lookup with rate-limit backoff
//!
//! Slack collection endpoints hand back a page of items and an opaque
//! cursor. Finding one item by name or email means walking those pages in
//! order until something matches. Any fetch may instead come back
//! rate limited; we wait out `Retry-After` and re-issue the same fetch,
//! unless the caller cancels first.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::error::{Error, Result};


/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor for the next page. `None` on the last page.
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Build a page, normalising an empty cursor to "no more pages".
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self {
            items,
            next_cursor: next_cursor.filter(|c| !c.is_empty()),
        }
    }

    /// A page with nothing after it.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
        }
    }
}

/// The key a lookup matches on. Callers pick exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupKey {
    Id(String),
    Name(String),
    Email(String),
    Handle(String),
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, value) = match self {
            Self::Id(v) => ("id", v),
            Self::Name(v) => ("name", v),
            Self::Email(v) => ("email", v),
            Self::Handle(v) => ("handle", v),
        };
        write!(f, "{} {:?}", kind, value)
    }
}

/// A single lookup, built per call from caller-supplied identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub key: LookupKey,
    /// Also consider archived channels / deactivated users.
    pub include_inactive: bool,
}

impl LookupRequest {
    pub fn new(key: LookupKey) -> Self {
        Self {
            key,
            include_inactive: false,
        }
    }

    #[must_use]
    pub fn include_inactive(mut self, include: bool) -> Self {
        self.include_inactive = include;
        self
    }
}

/// Wait out `retry_after`, or fail with [`Error::Cancelled`] if the token
/// fires first. Cancellation wins when both are ready.
pub async fn backoff(cancel: &CancellationToken, retry_after: Duration) -> Result<()> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            debug!("cancelled while waiting for rate limit");
            Err(Error::Cancelled)
        }
        () = sleep(retry_after) => Ok(()),
    }
}

/// Run `op`, re-issuing it after every rate-limit signal.
///
/// Any other error comes back untouched on the first occurrence.
pub async fn retry_rate_limited<T, F, Fut>(cancel: &CancellationToken, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    loop {
        match op().await {
            Err(Error::RateLimited { retry_after }) => {
                debug!(retry_after_secs = retry_after.as_secs(), "rate limited, backing off");
                backoff(cancel, retry_after).await?;
            }
            other => return other,
        }
    }
}

/// Walk pages in order and return the first item `matches` accepts.
///
/// `fetch` gets the cursor for the page to load (`None` for the first one).
/// No page is fetched after a match. `Ok(None)` means the last page was
/// scanned without a hit.
pub async fn scan<T, F, Fut, P>(
    cancel: &CancellationToken,
    mut fetch: F,
    mut matches: P,
) -> Result<Option<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
    P: FnMut(&T) -> bool,
{
    let mut cursor: Option<String> = None;

    loop {
        trace!(cursor = cursor.as_deref().unwrap_or(""), "requesting page");
        let page = retry_rate_limited(cancel, || fetch(cursor.clone())).await?;

        if let Some(found) = page.items.into_iter().find(|item| matches(item)) {
            trace!("match found in page");
            return Ok(Some(found));
        }

        match page.next_cursor.filter(|c| !c.is_empty()) {
            Some(next) => cursor = Some(next),
            None => {
                trace!("reached last page without a match");
                return Ok(None);
            }
        }
    }
}

/// Drain every page into one list, in page order.
pub async fn collect<T, F, Fut>(cancel: &CancellationToken, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut all = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = retry_rate_limited(cancel, || fetch(cursor.clone())).await?;
        all.extend(page.items);

        match page.next_cursor.filter(|c| !c.is_empty()) {
            Some(next) => cursor = Some(next),
            None => return Ok(all),
        }
    }
}
