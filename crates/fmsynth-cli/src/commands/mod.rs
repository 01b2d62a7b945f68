//! CLI command implementations

pub mod info;
pub mod json_output;
pub mod new;
pub mod render;
pub mod validate;
