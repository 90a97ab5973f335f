//! Error types. Absence of a key is never an error; lookups return `Option`.

use thiserror::Error;

/// Rejected bucket count at construction or resize.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CapacityError {
    #[error("a chained map needs at least one bucket")]
    Zero,
}

/// Returned by `HashFunction::from_str` for a name it does not know.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown hash function `{0}` (expected `sum` or `weighted`)")]
pub struct UnknownHashFunction(pub String);
