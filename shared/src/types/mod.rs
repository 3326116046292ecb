//! Type definitions module
//!
//! - `common` - Common types like sort order
//! - `response` - Success response envelope

pub mod common;
pub mod response;

pub use common::SortOrder;
pub use response::{ApiResponse, ResponseMeta};
