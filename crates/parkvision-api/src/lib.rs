// parkvision-api: async client for the ParkVision REST backend (lots, spots, users)

pub mod auth;
pub mod client;
pub mod error;
pub mod lots;
pub mod spots;
pub mod transport;
pub mod types;
pub mod users;

pub use auth::Session;
pub use client::ParkClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
