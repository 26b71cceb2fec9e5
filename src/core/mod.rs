//! # Core Module
//!
//! Configuration and shared Discord response helpers.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add reminder embed builder and listing pagination
//! - 1.0.0: Initial creation with config module

pub mod config;
pub mod embeds;
pub mod response;

// Re-export commonly used items
pub use config::Config;
pub use response::{
    paginate, truncate_for_embed, truncate_for_message, truncate_to, Page, EMBED_FIELD_LIMIT,
    EMBED_LIMIT, MESSAGE_LIMIT,
};
