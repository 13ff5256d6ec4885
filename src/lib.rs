#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]

//! A reader for INI-like configuration text with typed values.
//!
//! Each value is inferred as a boolean, integer, float or quoted string. Sections registered on a
//! [`Document`] before parsing serve as a schema: they fix the type of a key and may give it a
//! default that is filled in when the input omits the key.

mod document;
mod error;
mod parser;
mod section;
mod value;

pub use document::{Document, Table};
pub use error::{Error, Result, UsageError};
pub use section::Section;
pub use value::{Declaration, ScalarType, Value, ValueSlot, coerce};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
