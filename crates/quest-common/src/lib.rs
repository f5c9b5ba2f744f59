//! # Quest Common
//!
//! Common types and shared abstractions for Quinn's Quest.
//!
//! This crate provides foundational types used by the simulation and the engine:
//! - ID types (EntityId, Generation)
//! - Axis-aligned rectangles and the padded intersection test
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod geometry;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::geometry::*;
    pub use crate::ids::*;
}

pub use prelude::*;
