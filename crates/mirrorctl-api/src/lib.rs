// mirrorctl-api: Async Rust client for the MagicMirror MMM-Remote-Control HTTP API

pub mod client;
pub mod error;
pub mod models;
pub mod modules;
pub mod notify;
pub mod system;
pub mod transport;

pub use client::MirrorClient;
pub use error::Error;
pub use models::{ApiResponse, ModuleDescriptor, ModuleListing};
pub use transport::TransportConfig;
