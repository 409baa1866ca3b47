//! Multi-source media aggregation client
//!
//! An async client library that unifies four heterogeneous media APIs
//! (a YouTube-like stream video API, the Jikan anime metadata API, the
//! Consumet aggregator, and a HiAnime REST API) behind one typed client.
//! Upstream reads are deduplicated through a coalescing in-memory TTL
//! cache, HiAnime response envelopes persist through a pluggable key-value
//! store, and every upstream shape normalizes into a single
//! [`model::NormalizedMedia`] record that rendering code can consume
//! without knowing where it came from.

pub mod api;
pub mod cache;
pub mod error;
pub mod model;
pub mod response;
pub mod sources;

mod client;

pub use client::*;
pub use response::CacheStatus;
pub use response::Response;
