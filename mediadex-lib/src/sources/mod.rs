//! Upstream payload shapes and their normalizers
//!
//! One module per upstream API. Each defines the raw serde types mirroring
//! that API's wire format and a pure `From` conversion into
//! [`NormalizedMedia`](crate::model::NormalizedMedia). Conversions do no
//! I/O, no caching, and no logging: the same input always produces the same
//! record.

pub mod consumet;
pub mod hianime;
pub mod jikan;
pub mod stream;
