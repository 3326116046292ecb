//! User service module
//!
//! Registration, lookup and search of user profiles.

mod service;
mod types;


pub use service::UserService;
pub use types::CreateUser;
