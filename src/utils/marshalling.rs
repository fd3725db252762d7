//! Marshalling module for serialising and deserialising types

use crate::errors::Error;

/// Trait for serialising and deserialising types
pub trait Marshalling<S>
where
    Self: Sized,
{
    /// Serialise the type into an array of bytes
    fn serialise(&self) -> S;
    /// Parse the type from an array of bytes
    fn parse(serialised: &S) -> Result<Self, Error>;
}
