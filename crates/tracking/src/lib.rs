//! Skeletal hand-tracking data as consumed by the mesh builders.
//!
//! The real tracking device sits behind these types: a finger is a chain of
//! joints with bone directions between them, a hand is a palm frame plus up
//! to five fingers. [`SyntheticHand`] stands in for the device in the viewer
//! and in tests.

pub mod error;
pub mod hand;
pub mod skeleton;
pub mod synthetic;

pub use error::*;
pub use hand::*;
pub use skeleton::*;
pub use synthetic::*;
