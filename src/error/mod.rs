//! Error handling module for dump/restore operations.
//!
//! This module provides comprehensive error handling with:
//! - Structured error information extraction from store error responses
//! - Application-specific error types with a single crate-wide `Result`
//!
//! # Example
//!
//! ```rust,no_run
//! use esdump::error::{Result, EsdumpError};
//! use esdump::error::store::extract_error_info;
//!
//! fn example_operation() -> Result<()> {
//!     // Store operations automatically convert errors
//!     // into the crate-wide error type
//!     Ok(())
//! }
//!
//! fn handle_error(status: u16, body: &str) {
//!     let info = extract_error_info(status, body);
//!     println!("{}", info.summary());
//! }
//! ```

pub mod kinds;
pub mod store;

// Re-export commonly used types
pub use kinds::{ConfigError, EsdumpError, RestoreError, Result, StoreError};
pub use store::{StoreErrorInfo, extract_error_info};
