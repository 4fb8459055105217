//! Data Transfer Objects for the workspace REST API
//!
//! Shapes read from and written to the remote workspace. Only the fields the
//! deployment workflow needs are typed; job definitions are handled as raw
//! JSON so that settings we do not know about survive a rewrite untouched.

pub mod cluster;
pub mod job;
pub mod library;
