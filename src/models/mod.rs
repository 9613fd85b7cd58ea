pub mod endpoint;
pub mod server;

pub use endpoint::Endpoint;
pub use server::{Player, QtvRecord, ServerKind, ServerRecord, Spectator};
