pub mod errors;

pub use errors::{DomainError, DomainResult, InfraError};
