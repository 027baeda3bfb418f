//! Core math and timing types shared by the hand-mesh crates.
//!
//! This crate provides the foundational types used across the workspace:
//! - Transform with distinct point and direction mapping
//! - Safe normalization and degree-based axis rotations
//! - Frame timing for the host loop

pub mod math;
pub mod time;
pub mod transform;

pub use math::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec3};
