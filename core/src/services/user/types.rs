//! Input types for the user service

use serde::{Deserialize, Serialize};

/// Data needed to register a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub domain: String,
    pub username: String,
    /// Falls back to `pending`
    pub status: Option<String>,
}
