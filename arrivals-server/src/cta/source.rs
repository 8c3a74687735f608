//! Where raw arrivals bodies come from.

use std::future::Future;

use super::error::FeedError;

/// A source of raw arrivals feed bodies.
///
/// The live client implements this with one HTTP request per call;
/// [`MockFeed`](super::MockFeed) serves canned bodies for development and
/// tests.
pub trait FeedSource: Send + Sync {
    /// Fetch one raw response body.
    fn fetch(&self) -> impl Future<Output = Result<String, FeedError>> + Send;
}
