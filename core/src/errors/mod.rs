//! Domain-specific error types and error handling.

mod domain_error;
mod kind;

pub use domain_error::DomainError;
pub use kind::ErrorKind;

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests;
