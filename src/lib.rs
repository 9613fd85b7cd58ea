//! Discovery and status polling for QuakeWorld-family servers.
//!
//! [`discover_addresses`] asks master servers for registered endpoints and
//! [`scrape`] polls each endpoint for its status, players, spectators and
//! QTV relay. Both always return a (possibly empty) collection; individual
//! unreachable or misbehaving targets are left out.

pub mod config;
pub mod error;
pub mod geo;
pub mod handlers;
pub mod models;
pub mod poller;
pub mod protocol;
pub mod scrape;
pub mod storage;

pub use error::QueryError;
pub use models::{Endpoint, Player, QtvRecord, ServerKind, ServerRecord, Spectator};
pub use protocol::master::discover_addresses;
pub use protocol::QueryOptions;
pub use scrape::{scrape, ScrapeResult};
