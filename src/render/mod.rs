//! Rendering module for serializing outline results.

mod json;

pub use json::{to_json, JsonFormat};
