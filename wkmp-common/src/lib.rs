//! # WKMP Common Library
//!
//! Shared code for WKMP tools including:
//! - Configuration loading and root folder resolution
//! - Standard tag field names
//! - Common error types

pub mod config;
pub mod error;
pub mod fields;

pub use error::{Error, Result};
pub use fields::{normalize_field_name, STANDARD_FIELDS};
