//! Upstream content API: endpoint catalogue, HTTP client and the service
//! that ties them to the shared token cache.

pub mod client;
pub mod endpoint;
pub mod service;

pub use client::ContentClient;
pub use endpoint::ContentEndpoint;
pub use service::QuranContentService;
