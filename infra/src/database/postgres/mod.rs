//! PostgreSQL implementation of the store and session traits
//!
//! Statements are assembled with `sqlx::QueryBuilder`. Table and column
//! names come from the static entity schemas; every value is a bound
//! parameter.

mod codec;
mod session;
mod store;


pub use session::PgSession;
pub use store::PgStore;
