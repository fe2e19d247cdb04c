//! # Domain Models
//!
//! This crate contains pure domain types with minimal dependencies (`serde`, `bitflags`).
//! Keep it lean: no I/O, networking, or heavy logic—just data and simple helpers.

pub mod constants;
pub mod environment;
pub mod features;
pub mod manifest;

pub use environment::{BuildProfile, Environment};
pub use features::FeatureSet;
pub use manifest::Manifest;
