// ── Event classification ──
//
// Two fixed keyword taxonomies over free-form event type strings. Matching
// is case-insensitive substring containment against literal keywords, so
// `CLIENT_EAP_FAILURE_TIMEOUT` matches `eap_failure`.

use crate::model::EventRecord;

/// Event type fragments that indicate an authentication/association failure.
pub const AUTH_FAILURE_KEYWORDS: [&str; 6] = [
    "auth_failed",
    "assoc_failed",
    "eap_failure",
    "radius_failure",
    "802_1x_failure",
    "psk_failure",
];

/// Event type or detail fragments that indicate a DHCP/DNS failure.
pub const NETWORK_FAILURE_KEYWORDS: [&str; 6] = [
    "dhcp_failure",
    "dhcp_timeout",
    "no_dhcp_response",
    "dns_failure",
    "dns_timeout",
    "ip_conflict",
];

/// Matches of both taxonomies over one event sequence, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification<'a> {
    pub auth_failures: Vec<&'a EventRecord>,
    pub network_failures: Vec<&'a EventRecord>,
}

impl Classification<'_> {
    pub fn is_clean(&self) -> bool {
        self.auth_failures.is_empty() && self.network_failures.is_empty()
    }
}

fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    let haystack = haystack.to_lowercase();
    keywords.iter().any(|kw| haystack.contains(kw))
}

/// Whether the event's type names an auth/association failure.
pub fn is_auth_failure(event: &EventRecord) -> bool {
    contains_any(&event.event_type, &AUTH_FAILURE_KEYWORDS)
}

/// Whether the event's type or detail text names a DHCP/DNS failure.
pub fn is_network_failure(event: &EventRecord) -> bool {
    contains_any(&event.event_type, &NETWORK_FAILURE_KEYWORDS)
        || event
            .detail
            .as_deref()
            .is_some_and(|detail| contains_any(detail, &NETWORK_FAILURE_KEYWORDS))
}

pub fn auth_failures(events: &[EventRecord]) -> Vec<&EventRecord> {
    events.iter().filter(|e| is_auth_failure(e)).collect()
}

pub fn network_failures(events: &[EventRecord]) -> Vec<&EventRecord> {
    events.iter().filter(|e| is_network_failure(e)).collect()
}

/// Run both checks independently over the full sequence.
pub fn classify(events: &[EventRecord]) -> Classification<'_> {
    Classification {
        auth_failures: auth_failures(events),
        network_failures: network_failures(events),
    }
}
