//! Deforming low-poly hand mesh built from skeletal tracking data.
//!
//! Each finger's joint chain becomes a tube with `sides` faces around its
//! circumference, rebuilt in full every frame. Two topologies are available:
//! faceted (independent quads, flat shading) and smooth (shared rings).

pub mod buffer;
pub mod config;
pub mod error;
pub mod finger;
pub mod hand;
pub mod tube;

pub use buffer::*;
pub use config::*;
pub use error::*;
pub use finger::*;
pub use hand::*;
pub use tube::*;
