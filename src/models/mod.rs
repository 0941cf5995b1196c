//! Data models for posts, templates and incidents.
//!
//! Field names serialize in camelCase to match the web client.

mod incident;
pub mod labels;
mod post;
mod template;
pub mod timestamp;
mod validate;

pub use incident::*;
pub use labels::*;
pub use post::*;
pub use template::*;
pub use validate::*;
