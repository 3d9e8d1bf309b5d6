//! Domain layer for the smart tagging engine
//!
//! Contains the CRM tag vocabulary, sentiment levels, the validated
//! `TagAnalysis` value object and the notification entities.
//! This layer has no I/O and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
