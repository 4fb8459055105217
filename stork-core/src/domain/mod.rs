//! Core domain types
//!
//! Everything here is pure: no I/O, no remote calls. Descriptors are derived
//! once from a filename and never mutated afterwards.

pub mod artifact;
pub mod descriptor;
mod replace;
