// ── Client event history ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One historical log entry for a client, in chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub timestamp: Option<DateTime<Utc>>,
    /// Free-form taxonomy string, e.g. `CLIENT_AUTH_FAILED`. Empty when absent.
    pub event_type: String,
    pub reason: Option<String>,
    pub detail: Option<String>,
}

impl EventRecord {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            timestamp: None,
            event_type: event_type.into(),
            reason: None,
            detail: None,
        }
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}
