//! Errors reported by the collections in this crate.

use std::error;
use std::fmt;
use std::result;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// A dynamically typed key was not of the collection's key type.
    TypeMismatch,
    /// A must-return operation was invoked on an empty collection.
    EmptyContainer,
    /// A cursor was advanced past its last element.
    IteratorExhausted,
    /// A cursor was asked to remove an element without a current element.
    InvalidIteratorState,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TypeMismatch => write!(f, "key is not of the collection's key type"),
            Error::EmptyContainer => write!(f, "collection is empty"),
            Error::IteratorExhausted => write!(f, "iterator has no more elements"),
            Error::InvalidIteratorState => write!(f, "iterator has no current element to remove"),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
