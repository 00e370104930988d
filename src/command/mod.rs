// src/command/mod.rs

//! Command building.
//!
//! - [`template`] parses and renders command templates.
//! - [`builder`] selects the template for an operation kind, computes the
//!   output path and renders the final shell command.

pub mod builder;
pub mod template;

pub use builder::{
    ConversionData, MergeData, RenderedCommand, build_conversion_command, build_merge_command,
};
pub use template::{CommandTemplate, Field, TemplateData, Value};
