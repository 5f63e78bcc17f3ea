//! Common utilities module
//!
//! Shared error types used across the camera pipeline.

pub mod error;

pub use error::{CameraError, Result};
