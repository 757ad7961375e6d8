//! Gateway API client
//!
//! Everything that talks HTTP to the remote data gateway: endpoint URL
//! builders, wire types, the process-wide bearer token provider, and the
//! client itself.

pub mod client;
pub mod endpoints;
pub mod token;
pub mod types;

pub use client::{ArchiveFetcher, GatewayClient};
pub use token::TokenProvider;
