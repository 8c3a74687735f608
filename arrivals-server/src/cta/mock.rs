//! Mock arrivals feed for running without API access.
//!
//! Serves either a fixed body loaded from a JSON file or a scripted sequence
//! of bodies and failures.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use super::error::FeedError;
use super::source::FeedSource;

/// One scripted response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return this body.
    Body(String),
    /// Fail with an upstream status.
    Status(u16),
    /// Fail as if the payload were malformed.
    Malformed(String),
}

/// Mock feed that serves canned responses.
///
/// Scripted responses are served in order; once they run out the fallback
/// (if any) is served forever, otherwise every call fails with a 503.
#[derive(Clone, Default)]
pub struct MockFeed {
    script: Arc<Mutex<VecDeque<MockResponse>>>,
    fallback: Option<String>,
}

impl MockFeed {
    /// Serve the same body on every call.
    pub fn fixed(body: impl Into<String>) -> Self {
        Self {
            script: Arc::default(),
            fallback: Some(body.into()),
        }
    }

    /// Serve the contents of a JSON file on every call.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FeedError> {
        let path = path.as_ref();
        let body = std::fs::read_to_string(path).map_err(|e| {
            FeedError::NotConfigured(format!("failed to read mock feed {}: {}", path.display(), e))
        })?;
        Ok(Self::fixed(body))
    }

    /// Serve the given responses in order.
    pub fn scripted(responses: impl IntoIterator<Item = MockResponse>) -> Self {
        Self {
            script: Arc::new(Mutex::new(responses.into_iter().collect())),
            fallback: None,
        }
    }

    /// Queue another response.
    pub fn push(&self, response: MockResponse) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response);
    }

    fn next_response(&self) -> Option<MockResponse> {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}

impl FeedSource for MockFeed {
    async fn fetch(&self) -> Result<String, FeedError> {
        match self.next_response() {
            Some(MockResponse::Body(body)) => Ok(body),
            Some(MockResponse::Status(status)) => Err(FeedError::Status {
                status,
                message: "mock failure".to_string(),
            }),
            Some(MockResponse::Malformed(message)) => Err(FeedError::Malformed { message }),
            None => self.fallback.clone().ok_or(FeedError::Status {
                status: 503,
                message: "mock feed exhausted".to_string(),
            }),
        }
    }
}
