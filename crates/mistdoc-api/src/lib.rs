// mistdoc-api: Async Rust client for the Mist cloud API

pub mod client;
pub mod clients;
pub mod devices;
pub mod error;
pub mod models;
pub mod orgs;
pub mod transport;

pub use client::MistClient;
pub use clients::DEFAULT_EVENT_LIMIT;
pub use error::Error;
pub use models::{ClientEvent, DeviceStats, Org, SearchPage, SelfInfo, WirelessClient};
pub use transport::TransportConfig;
