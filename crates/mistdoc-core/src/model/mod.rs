// ── Telemetry domain model ──
//
// Canonical types the diagnostic rules operate on. They are independent of
// the wire format; `convert` builds them from `mistdoc_api` responses.

pub mod access_point;
pub mod event;
pub mod mac;
pub mod organization;
pub mod session;

pub use access_point::AccessPointStats;
pub use event::EventRecord;
pub use mac::MacAddress;
pub use organization::Organization;
pub use session::ClientSession;
