//! Unified media model
//!
//! Every upstream payload normalizes into [`NormalizedMedia`]; rendering
//! code consumes the unified record without knowing which API produced it.

mod episodes;
mod media;

pub use episodes::*;
pub use media::*;
